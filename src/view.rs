pub mod color;
pub mod scope;
pub mod spec;
pub mod spectrogram;

use std::str::FromStr;

use crate::analyzer::SpectrumFrame;
use crate::config::DisplaySettings;
use crate::error::Error;
use scope::Scope;
use spec::Spec;
use spectrogram::Spectrogram;

/// Screen-space rectangle owned by one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Bounds {
        Bounds { x, y, width, height }
    }

    pub fn left(&self) -> i32 { self.x }
    pub fn right(&self) -> i32 { self.x + self.width as i32 }
    pub fn top(&self) -> i32 { self.y }
    pub fn bottom(&self) -> i32 { self.y + self.height as i32 }

    /// Edges are inclusive.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Splits into `n` stacked rows; the last row takes any remainder.
    pub fn split_rows(&self, n: usize) -> Vec<Bounds> {
        if n == 0 {
            return Vec::new();
        }
        let row = self.height / n as u32;
        (0 .. n as u32)
            .map(|i| {
                let height = if i + 1 == n as u32 { self.height - row * i } else { row };
                Bounds::new(self.x, self.y + (row * i) as i32, self.width, height)
            })
            .collect()
    }
}

impl From<Bounds> for sdl2::rect::Rect {
    fn from(b: Bounds) -> sdl2::rect::Rect {
        // SDL clamps zero sizes to one pixel
        sdl2::rect::Rect::new(b.x, b.y, b.width, b.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerKind {
    Spectrogram,
    Waveform,
    Spectrum,
}

impl FromStr for VisualizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<VisualizerKind, Error> {
        match s {
            "spectrogram" => Ok(VisualizerKind::Spectrogram),
            "waveform" => Ok(VisualizerKind::Waveform),
            "spectrum" => Ok(VisualizerKind::Spectrum),
            other => Err(Error::config(format!("unknown view '{}'", other))),
        }
    }
}

/// Everything a view may consume on one tick.
pub struct Info<'i> {
    pub samples: &'i [f32],
    pub spectrum: &'i SpectrumFrame,
}

pub enum Visualizer {
    Spectrogram(Spectrogram),
    Waveform(Scope),
    Spectrum(Spec),
}

impl Visualizer {
    pub fn new(kind: VisualizerKind, bounds: Bounds, display: &DisplaySettings, sample_rate: f64) -> Visualizer {
        match kind {
            VisualizerKind::Spectrogram => {
                let total = (display.length_secs * sample_rate).round().max(1.0) as u64;
                Visualizer::Spectrogram(Spectrogram::new(bounds, total, display.threshold, display.scheme))
            }
            VisualizerKind::Waveform => Visualizer::Waveform(Scope::new(bounds, display.trigger_search)),
            VisualizerKind::Spectrum => Visualizer::Spectrum(Spec::new(bounds, display.scheme)),
        }
    }

    /// Builds one visualizer per row of `area`.
    pub fn layout(area: Bounds, display: &DisplaySettings, sample_rate: f64) -> Vec<Visualizer> {
        area.split_rows(display.views.len())
            .into_iter()
            .zip(&display.views)
            .map(|(bounds, &kind)| Visualizer::new(kind, bounds, display, sample_rate))
            .collect()
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Visualizer::Spectrogram(v) => v.bounds(),
            Visualizer::Waveform(v) => v.bounds(),
            Visualizer::Spectrum(v) => v.bounds(),
        }
    }

    pub fn update(&mut self, info: &Info) {
        match self {
            Visualizer::Spectrogram(v) => v.update(info.spectrum),
            Visualizer::Waveform(v) => v.update(info.samples),
            Visualizer::Spectrum(v) => v.update(info.spectrum),
        }
    }

    pub fn resize(&mut self, bounds: Bounds) {
        match self {
            Visualizer::Spectrogram(v) => v.resize(bounds),
            Visualizer::Waveform(v) => v.resize(bounds),
            Visualizer::Spectrum(v) => v.resize(bounds),
        }
    }

    /// Samples of history this view wants to see each tick.
    pub fn requested_window(&self) -> usize {
        match self {
            Visualizer::Waveform(v) => v.requested_window(),
            _ => 0,
        }
    }
}

/// Maps a sample in `[-1, 1]` to a row of a `height`-tall view, 0 at the centre.
/// Maps `[-1, 1]` onto rows `[height - 1, 0]`.
fn normalize_centered(samp: f32, height: u32) -> i32 {
    let half = height.saturating_sub(1) as f32 / 2.0;
    (half - half * samp).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_edges() {
        let b = Bounds::new(10, 20, 100, 50);
        assert_eq!((b.left(), b.right(), b.top(), b.bottom()), (10, 110, 20, 70));
        assert!(b.contains(10, 20));
        assert!(b.contains(110, 70));
        assert!(!b.contains(111, 70));
        assert!(!b.contains(50, 19));
    }

    #[test]
    fn split_rows_covers_height() {
        let rows = Bounds::new(0, 0, 80, 101).split_rows(3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Bounds::new(0, 0, 80, 33));
        assert_eq!(rows[1], Bounds::new(0, 33, 80, 33));
        assert_eq!(rows[2], Bounds::new(0, 66, 80, 35));
        assert!(Bounds::new(0, 0, 1, 1).split_rows(0).is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!("waveform".parse::<VisualizerKind>().unwrap(), VisualizerKind::Waveform);
        assert!("oscilloscope".parse::<VisualizerKind>().is_err());
    }

    #[test]
    fn centered_mapping() {
        assert_eq!(normalize_centered(0.0, 100), 50);
        assert_eq!(normalize_centered(1.0, 100), 0);
        assert_eq!(normalize_centered(-1.0, 100), 99);
        assert_eq!(normalize_centered(-1.0, 1), 0);
    }
}
