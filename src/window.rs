use std::collections::BTreeMap;
use std::f32::consts::PI;

pub trait Window {
    fn size(&self) -> usize;
    fn shape(&self) -> &[f32];

    fn apply(&self, data: &mut [f32]) {
        let shp = self.shape();
        assert_eq!(shp.len(), data.len());
        for (datum, factor) in data.iter_mut().zip(shp.iter()) {
            *datum *= factor;
        }
    }
}

pub struct GenericWindow(Vec<f32>);

impl GenericWindow {
    /// Builds a window from a shape function of `(index, size)`.
    fn from_fn(sz: usize, f: impl Fn(f32, f32) -> f32) -> GenericWindow {
        // A single-point window would divide by zero below.
        let denom = (sz.max(2) - 1) as f32;
        GenericWindow((0 .. sz).map(|i| f(i as f32, denom)).collect())
    }
}

impl Window for GenericWindow {
    fn size(&self) -> usize { self.0.len() }
    fn shape(&self) -> &[f32] { &self.0 }
}

fn new_rect(sz: usize) -> Box<dyn Window> {
    Box::new(GenericWindow::from_fn(sz, |_, _| 1.0))
}

fn new_hann(sz: usize) -> Box<dyn Window> {
    Box::new(GenericWindow::from_fn(sz, |n, d| 0.5 - 0.5 * (2.0 * PI * n / d).cos()))
}

fn new_hamming(sz: usize) -> Box<dyn Window> {
    Box::new(GenericWindow::from_fn(sz, |n, d| 0.54 - 0.46 * (2.0 * PI * n / d).cos()))
}

fn new_blackman(sz: usize) -> Box<dyn Window> {
    Box::new(GenericWindow::from_fn(sz, |n, d| {
        0.42 - 0.5 * (2.0 * PI * n / d).cos() + 0.08 * (4.0 * PI * n / d).cos()
    }))
}

pub type WindowCtor = fn(usize) -> Box<dyn Window>;

pub fn windows() -> BTreeMap<&'static str, WindowCtor> {
    let mut map: BTreeMap<&'static str, WindowCtor> = BTreeMap::new();
    map.insert("rect", new_rect);
    map.insert("hann", new_hann);
    map.insert("hamming", new_hamming);
    map.insert("blackman", new_blackman);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

    #[test]
    fn registry_names() {
        let names: Vec<_> = windows().keys().copied().collect();
        assert_eq!(names, vec!["blackman", "hamming", "hann", "rect"]);
    }

    #[test]
    fn hann_edges_and_centre() {
        let w = windows()["hann"](1025);
        assert_eq!(w.size(), 1025);
        assert!(close(w.shape()[0], 0.0));
        assert!(close(w.shape()[1024], 0.0));
        assert!(close(w.shape()[512], 1.0));
    }

    #[test]
    fn blackman_is_symmetric() {
        let w = windows()["blackman"](64);
        let s = w.shape();
        for i in 0 .. 32 {
            assert!(close(s[i], s[63 - i]));
        }
        assert!(close(s[0], 0.0));
    }

    #[test]
    fn apply_scales_data() {
        let w = windows()["rect"](4);
        let mut data = [0.5f32, -1.0, 2.0, 0.0];
        w.apply(&mut data);
        assert_eq!(data, [0.5, -1.0, 2.0, 0.0]);

        let w = windows()["hamming"](4);
        let mut data = [1.0f32; 4];
        w.apply(&mut data);
        assert!(close(data[0], 0.08));
    }
}
