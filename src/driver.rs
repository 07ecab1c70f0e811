use tracing::{debug, info};

use crate::analyzer::Analyzer;
use crate::audio::SampleSource;
use crate::config::Settings;
use crate::error::Result;
use crate::view::{Bounds, Info, Visualizer};

pub struct Running {
    source: Box<dyn SampleSource>,
    analyzer: Analyzer,
    visualizers: Vec<Visualizer>,
    samples: Vec<f32>,
}

pub enum Phase {
    /// Waiting for the user to start capture
    Idle,
    Running(Running),
}

pub struct AppState {
    settings: Settings,
    area: Bounds,
    phase: Phase,
}

impl AppState {
    pub fn new(settings: Settings, area: Bounds) -> AppState {
        AppState { settings, area, phase: Phase::Idle }
    }

    pub fn area(&self) -> Bounds { self.area }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Empty while idle.
    pub fn visualizers(&self) -> &[Visualizer] {
        match &self.phase {
            Phase::Idle => &[],
            Phase::Running(r) => &r.visualizers,
        }
    }

    pub fn activate(&mut self, source: Box<dyn SampleSource>) -> Result<()> {
        let analyzer = Analyzer::new(&self.settings.analysis)?;
        let rate = source.sample_rate();
        info!(rate, bins = analyzer.bins(), "capture started");
        let visualizers = Visualizer::layout(self.area, &self.settings.display, rate);
        self.phase = Phase::Running(Running {
            source,
            analyzer,
            visualizers,
            samples: Vec::new(),
        });
        Ok(())
    }

    pub fn tick(&mut self) {
        let Phase::Running(running) = &mut self.phase else {
            return;
        };
        let Running { source, analyzer, visualizers, samples } = running;

        let wanted = visualizers
            .iter()
            .map(Visualizer::requested_window)
            .fold(analyzer.fft_size(), usize::max);
        source.snapshot(wanted, samples);

        let spectrum = analyzer.analyze(samples.as_slice());
        let info = Info { samples: samples.as_slice(), spectrum };
        for vis in visualizers.iter_mut() {
            vis.update(&info);
        }
    }

    /// Lays the views out again over `area`, discarding scroll history.
    pub fn resize(&mut self, area: Bounds) {
        debug!(width = area.width, height = area.height, "resize");
        self.area = area;
        if let Phase::Running(running) = &mut self.phase {
            let rows = area.split_rows(running.visualizers.len());
            for (vis, bounds) in running.visualizers.iter_mut().zip(rows) {
                vis.resize(bounds);
            }
        }
    }
}
