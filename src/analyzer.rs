use std::ops::Deref;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::AnalysisSettings;
use crate::error::{Error, Result};
use crate::window::{self, Window};

/// One frame of byte magnitudes, index = frequency bin (DC first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectrumFrame(Vec<u8>);

impl From<Vec<u8>> for SpectrumFrame {
    fn from(bins: Vec<u8>) -> SpectrumFrame { SpectrumFrame(bins) }
}

impl Deref for SpectrumFrame {
    type Target = [u8];
    fn deref(&self) -> &[u8] { &self.0 }
}

/// Byte spectrum in the style of a Web Audio `AnalyserNode`.
pub struct Analyzer {
    fft: Arc<dyn Fft<f32>>,
    win: Box<dyn Window>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    samples: Vec<f32>,
    smoothed: Vec<f32>,
    frame: SpectrumFrame,
}

impl Analyzer {
    pub fn new(settings: &AnalysisSettings) -> Result<Analyzer> {
        let size = settings.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex { re: 0.0, im: 0.0 }; fft.get_inplace_scratch_len()];
        let win = window::windows()
            .get(settings.window.as_str())
            .map(|ctor| ctor(size))
            .ok_or_else(|| Error::config(format!("unknown window function '{}'", settings.window)))?;

        Ok(Analyzer {
            fft,
            win,
            smoothing: settings.smoothing,
            min_db: settings.min_db,
            max_db: settings.max_db,
            buf: Vec::with_capacity(size),
            scratch,
            samples: Vec::with_capacity(size),
            smoothed: vec![0.0; size / 2],
            frame: SpectrumFrame::default(),
        })
    }

    pub fn fft_size(&self) -> usize { self.win.size() }

    pub fn bins(&self) -> usize { self.fft_size() / 2 }

    /// Analyses the newest `fft_size` of `input`. Shorter input is zero
    /// padded at the old end; empty input yields an empty frame.
    pub fn analyze(&mut self, input: &[f32]) -> &SpectrumFrame {
        let _g = hprof::enter("Analyzer::analyze");
        self.frame.0.clear();
        if input.is_empty() {
            return &self.frame;
        }

        let size = self.fft_size();
        let take = input.len().min(size);
        self.samples.clear();
        self.samples.resize(size - take, 0.0);
        self.samples.extend_from_slice(&input[input.len() - take ..]);
        self.win.apply(&mut self.samples);

        self.buf.clear();
        self.buf.extend(self.samples.iter().map(|&x| Complex { re: x, im: 0.0 }));
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let norm = 1.0 / size as f32;
        let db_span = self.max_db - self.min_db;
        for (s, pt) in self.smoothed.iter_mut().zip(&self.buf) {
            *s = self.smoothing * *s + (1.0 - self.smoothing) * pt.norm() * norm;
            let db = 20.0 * s.log10();
            let scaled = 255.0 * (db - self.min_db) / db_span;
            // -inf for silence clamps to zero
            self.frame.0.push(scaled.clamp(0.0, 255.0) as u8);
        }
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn settings(fft_size: usize, smoothing: f32) -> AnalysisSettings {
        with_window(fft_size, smoothing, "blackman")
    }

    fn with_window(fft_size: usize, smoothing: f32, window: &str) -> AnalysisSettings {
        AnalysisSettings {
            fft_size,
            window: window.into(),
            smoothing,
            min_db: -100.0,
            max_db: -30.0,
        }
    }

    fn tone(bin: usize, size: usize) -> Vec<f32> {
        (0 .. size).map(|n| (2.0 * PI * bin as f32 * n as f32 / size as f32).sin()).collect()
    }

    #[test]
    fn empty_input_gives_empty_frame() {
        let mut a = Analyzer::new(&settings(256, 0.8)).unwrap();
        assert!(a.analyze(&[]).is_empty());
    }

    #[test]
    fn unknown_window_is_rejected() {
        assert!(Analyzer::new(&with_window(256, 0.8, "kaiser")).is_err());
    }

    #[test]
    fn silence_is_zero() {
        let mut a = Analyzer::new(&settings(256, 0.8)).unwrap();
        let frame = a.analyze(&[0.0; 256]).clone();
        assert_eq!(frame.len(), 128);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_in_its_bin() {
        // Bin-centred tone through a rectangular window has no leakage.
        let mut a = Analyzer::new(&with_window(512, 0.0, "rect")).unwrap();
        let frame = a.analyze(&tone(40, 512)).clone();
        let (peak, &val) = frame.iter().enumerate().max_by_key(|&(_, v)| *v).unwrap();
        assert_eq!(peak, 40);
        assert_eq!(val, 255);
        assert_eq!(frame[200], 0);
    }

    #[test]
    fn short_input_is_padded() {
        let mut a = Analyzer::new(&settings(256, 0.0)).unwrap();
        let frame = a.analyze(&tone(10, 64)).clone();
        assert_eq!(frame.len(), 128);
        assert!(frame.iter().any(|&b| b > 0));
    }

    #[test]
    fn smoothing_carries_energy_forward() {
        let mut a = Analyzer::new(&settings(256, 0.8)).unwrap();
        let quiet: Vec<f32> = tone(20, 256).iter().map(|x| x * 0.01).collect();
        let loud = a.analyze(&quiet)[20];
        let decayed = a.analyze(&[0.0; 256])[20];
        assert!(decayed > 0);
        assert!(decayed < loud);
    }
}
