use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use portaudio::stream::{
    Input, InputCallbackArgs, InputSettings, NonBlocking, Parameters, Stream,
};
use portaudio::{Continue, DeviceIndex, PortAudio};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::error::{Error, Result};
use crate::fifo::Fifo;

const INITIAL_HISTORY: usize = 8192;

/// Where the frame driver pulls samples from.
pub trait SampleSource {
    fn sample_rate(&self) -> f64;

    /// Replaces `out` with the newest `count` mono samples, or fewer if not
    /// that many have arrived yet. Empty until the first callback.
    fn snapshot(&self, count: usize, out: &mut Vec<f32>);
}

#[derive(Debug)]
struct History {
    samples: Fifo<f32>,
    received: usize,
}

impl History {
    fn push(&mut self, data: &[f32]) {
        self.samples.push(data);
        self.received = self.received.saturating_add(data.len());
    }
}

fn lock(history: &Mutex<History>) -> MutexGuard<'_, History> {
    // a panicked callback leaves plain sample data behind; keep using it
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MicInput {
    stream: Stream<NonBlocking, Input<f32>>,
    history: Arc<Mutex<History>>,
    rate: f64,
}

impl MicInput {
    pub fn open(pa: &PortAudio, settings: &AudioSettings) -> Result<MicInput> {
        let didx = find_device(pa, settings.device.as_deref())?;
        let info = pa.device_info(didx)?;
        if info.max_input_channels < settings.channels {
            return Err(Error::NoInputDevice(format!(
                "{} has {} input channels, {} requested",
                info.name, info.max_input_channels, settings.channels
            )));
        }

        let channels = settings.channels;
        let params = Parameters::<f32>::new(didx, channels, true, info.default_low_input_latency);
        let rate = settings.rate.unwrap_or(info.default_sample_rate);
        let pa_settings = InputSettings::new(params, rate, settings.period);
        info!(device = info.name, rate, channels, period = settings.period, "opening input stream");

        let history = Arc::new(Mutex::new(History {
            samples: Fifo::new(INITIAL_HISTORY),
            received: 0,
        }));
        let mut stream = pa.open_non_blocking_stream(pa_settings, {
            let history = history.clone();
            let mut mono: Vec<f32> = Vec::with_capacity(4096);
            let stride = channels as usize;
            move |InputCallbackArgs { buffer, .. }| {
                mono.clear();
                mono.extend(buffer.chunks(stride).map(|frame| frame.iter().sum::<f32>() / stride as f32));
                lock(&history).push(&mono);
                Continue
            }
        })?;
        stream.start()?;

        Ok(MicInput { stream, history, rate })
    }
}

impl SampleSource for MicInput {
    fn sample_rate(&self) -> f64 { self.rate }

    fn snapshot(&self, count: usize, out: &mut Vec<f32>) {
        let mut history = lock(&self.history);
        if history.samples.size() < count {
            debug!(from = history.samples.size(), to = count, "growing sample history");
            history.samples.resize(count);
        }
        out.clear();
        out.extend_from_slice(history.samples.latest(count.min(history.received)));
    }
}

impl Drop for MicInput {
    fn drop(&mut self) {
        if let Err(e) = self.stream.stop() {
            warn!("stopping input stream: {}", e);
        }
    }
}

fn find_device(pa: &PortAudio, name: Option<&str>) -> Result<DeviceIndex> {
    match name {
        Some(name) => pa
            .devices()?
            .filter_map(|dev| dev.ok())
            .find(|(_, info)| info.name == name && info.max_input_channels > 0)
            .map(|(idx, _)| idx)
            .ok_or_else(|| Error::NoInputDevice(format!("no input device named {:?}", name))),
        None => pa.default_input_device().map_err(|e| Error::NoInputDevice(e.to_string())),
    }
}

/// Prints every device with input channels.
pub fn list_devices(pa: &PortAudio) -> Result<()> {
    for dev in pa.devices()? {
        match dev {
            Ok((idx, info)) => {
                if info.max_input_channels == 0 { continue; }
                println!("{:?}: {} (default {} Hz, up to {} channels)", idx, info.name, info.default_sample_rate, info.max_input_channels);
            }
            Err(e) => warn!("enumerating device: {}", e),
        }
    }
    Ok(())
}
