use crate::analyzer::SpectrumFrame;
use super::Bounds;
use super::color::{ColorScheme, Rgba};

/// Live spectrum trace across the view width.
pub struct Spec {
    bounds: Bounds,
    scheme: ColorScheme,
    trace: Vec<(i32, i32, Rgba)>,
}

impl Spec {
    pub fn new(bounds: Bounds, scheme: ColorScheme) -> Spec {
        Spec { bounds, scheme, trace: Vec::new() }
    }

    pub fn bounds(&self) -> Bounds { self.bounds }

    /// `(x, y, color)` per pixel column.
    pub fn trace(&self) -> &[(i32, i32, Rgba)] { &self.trace }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.trace.clear();
    }

    pub fn update(&mut self, frame: &SpectrumFrame) {
        self.trace.clear();
        if frame.is_empty() || self.bounds.height == 0 {
            return;
        }

        let width = self.bounds.width as usize;
        let span = self.bounds.height as i32 - 1;
        let baseline = self.bounds.bottom() - 1;
        self.trace.extend((0 .. width).map(|x| {
            let specval = frame[x * frame.len() / width];
            let specy = baseline - specval as i32 * span / 255;
            (self.bounds.x + x as i32, specy, self.scheme.color(specval))
        }));
    }
}
