use crate::analyzer::SpectrumFrame;
use super::Bounds;
use super::color::{ColorScheme, Rgba};

/// Sample clock driving the horizontal write position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    buffer_index: u64,
    total_samples: u64,
    width: u32,
}

impl ScrollState {
    pub fn new(total_samples: u64, width: u32) -> ScrollState {
        ScrollState { buffer_index: 0, total_samples: total_samples.max(1), width }
    }

    pub fn buffer_index(&self) -> u64 { self.buffer_index }

    /// Write position in `[0, width)`.
    pub fn position(&self) -> f64 {
        self.samples_to_pixels(self.buffer_index % self.total_samples)
    }

    /// Index of the surface currently receiving columns.
    pub fn parity(&self) -> usize {
        ((self.buffer_index / self.total_samples) % 2) as usize
    }

    /// True until the first full width of history has been written.
    pub fn filling(&self) -> bool {
        self.buffer_index < self.total_samples
    }

    /// Horizontal draw offsets of surfaces 0 and 1, relative to the view.
    pub fn offsets(&self) -> (f64, f64) {
        let width = self.width as f64;
        if self.filling() {
            return (0.0, width);
        }
        let pos = self.position();
        let (active, inactive) = (width - pos, -pos);
        if self.parity() == 0 {
            (active, inactive)
        } else {
            (inactive, active)
        }
    }

    /// `offsets` snapped to whole pixels, keeping the two exactly `width`
    /// apart so no seam opens between the surfaces.
    pub fn pixel_offsets(&self) -> (i32, i32) {
        let width = self.width as i32;
        let (a, b) = self.offsets();
        if a <= b {
            let a = a.floor() as i32;
            (a, a + width)
        } else {
            let b = b.floor() as i32;
            (b + width, b)
        }
    }

    pub fn samples_to_pixels(&self, samples: u64) -> f64 {
        samples as f64 * self.width as f64 / self.total_samples as f64
    }

    /// Oldest sample index still on screen.
    pub fn min_visible_sample(&self) -> u64 {
        self.buffer_index.saturating_sub(self.total_samples)
    }

    /// Sample index at the right edge of the view.
    pub fn max_visible_sample(&self) -> u64 {
        self.buffer_index.max(self.total_samples)
    }

    pub fn advance(&mut self, samples: u64) {
        self.buffer_index += samples;
    }

    pub fn reset(&mut self, width: u32) {
        self.buffer_index = 0;
        self.width = width;
    }
}

/// Row-major `ARGB8888` pixels, transparent when cleared.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    revision: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Surface {
        Surface {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT.to_argb(); width as usize * height as usize],
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    /// Bumped on every write; lets the compositor skip unchanged uploads.
    pub fn revision(&self) -> u64 { self.revision }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Fills columns `[x0, x1)` of rows `[y0, y1)`. Callers keep both
    /// ranges inside the surface.
    fn fill(&mut self, x0: u32, x1: u32, y0: u32, y1: u32, argb: u32) {
        for y in y0 .. y1 {
            let row = (y * self.width) as usize;
            self.pixels[row + x0 as usize .. row + x1 as usize].fill(argb);
        }
        self.revision += 1;
    }
}

#[derive(Debug, Clone)]
pub struct BufferPair([Surface; 2]);

impl BufferPair {
    pub fn new(width: u32, height: u32) -> BufferPair {
        BufferPair([Surface::new(width, height), Surface::new(width, height)])
    }

    pub fn get(&self, idx: usize) -> &Surface { &self.0[idx] }

    fn get_mut(&mut self, idx: usize) -> &mut Surface { &mut self.0[idx] }
}

/// Two surfaces that swap roles every `total_samples`; see `ScrollState::offsets`.
pub struct Spectrogram {
    bounds: Bounds,
    scroll: ScrollState,
    buffers: BufferPair,
    /// Bumped whenever `buffers` is reallocated
    generation: u64,
    threshold: u8,
    scheme: ColorScheme,
}

impl Spectrogram {
    pub fn new(bounds: Bounds, total_samples: u64, threshold: u8, scheme: ColorScheme) -> Spectrogram {
        Spectrogram {
            bounds,
            scroll: ScrollState::new(total_samples, bounds.width),
            buffers: BufferPair::new(bounds.width, bounds.height),
            generation: 0,
            threshold,
            scheme,
        }
    }

    pub fn bounds(&self) -> Bounds { self.bounds }
    pub fn scroll(&self) -> &ScrollState { &self.scroll }
    pub fn buffers(&self) -> &BufferPair { &self.buffers }
    pub fn generation(&self) -> u64 { self.generation }

    /// Writes one column for `frame` and advances the clock by its length.
    /// An empty frame is ignored entirely.
    pub fn update(&mut self, frame: &SpectrumFrame) {
        if frame.is_empty() {
            return;
        }
        let _g = hprof::enter("Spectrogram::update");

        let (width, height) = (self.bounds.width, self.bounds.height);
        if width > 0 && height > 0 {
            let pos = self.scroll.position();
            let span = self.scroll.samples_to_pixels(frame.len() as u64);
            let x0 = (pos.floor() as u32).min(width - 1);
            let end = if span <= 1.0 { x0 + 1 } else { ((pos + span).ceil() as u32).max(x0 + 1) };

            let active = self.scroll.parity();
            let (threshold, scheme) = (self.threshold, self.scheme);
            paint_column(self.buffers.get_mut(active), x0, end.min(width), frame, threshold, scheme);
            // the part past the right edge opens the next cycle's surface
            if end > width {
                let spill = (end - width).min(width);
                paint_column(self.buffers.get_mut(1 - active), 0, spill, frame, threshold, scheme);
            }
        }

        self.scroll.advance(frame.len() as u64);
    }

    /// Discards all history and reallocates both surfaces.
    pub fn resize(&mut self, bounds: Bounds) {
        tracing::debug!(
            samples = self.scroll.buffer_index(),
            visible = ?(self.scroll.min_visible_sample() .. self.scroll.max_visible_sample()),
            width = bounds.width,
            height = bounds.height,
            "resetting spectrogram"
        );
        self.bounds = bounds;
        self.scroll.reset(bounds.width);
        self.buffers = BufferPair::new(bounds.width, bounds.height);
        self.generation += 1;
    }
}

/// Clears columns `[x0, x1)` and draws every bin at or above `threshold`,
/// low bins at the bottom.
fn paint_column(surface: &mut Surface, x0: u32, x1: u32, frame: &SpectrumFrame, threshold: u8, scheme: ColorScheme) {
    let height = surface.height();
    surface.fill(x0, x1, 0, height, Rgba::TRANSPARENT.to_argb());

    let bins = frame.len() as u64;
    let h = height as u64;
    for (i, &mag) in frame.iter().enumerate() {
        if mag < threshold {
            continue;
        }
        let i = i as u64;
        let y0 = (h * (bins - i - 1) / bins) as u32;
        let y1 = ((h * (bins - i) / bins) as u32).max(y0 + 1).min(height);
        surface.fill(x0, x1, y0, y1, scheme.color(mag).to_argb());
    }
}
