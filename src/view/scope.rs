use super::{normalize_centered, Bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracePoint {
    pub x: i32,
    pub y: i32,
    /// Sample fell outside `[-1, 1]`
    pub clipped: bool,
}

/// Oscilloscope trace of the newest samples, triggered on a rising zero
/// crossing so periodic input stands still.
pub struct Scope {
    bounds: Bounds,
    trigger_search: usize,
    trace: Vec<TracePoint>,
}

impl Scope {
    pub fn new(bounds: Bounds, trigger_search: usize) -> Scope {
        Scope { bounds, trigger_search, trace: Vec::new() }
    }

    pub fn bounds(&self) -> Bounds { self.bounds }
    pub fn trace(&self) -> &[TracePoint] { &self.trace }

    pub fn requested_window(&self) -> usize {
        self.bounds.width as usize + self.trigger_search
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.trace.clear();
    }

    pub fn update(&mut self, samples: &[f32]) {
        let _g = hprof::enter("Scope::update");
        self.trace.clear();
        let width = self.bounds.width as usize;
        if samples.is_empty() || width == 0 {
            return;
        }

        // oldest sample we may still plot from
        let start = samples.len().saturating_sub(self.requested_window());
        let window = &samples[start ..];
        let search = self.trigger_search.min(window.len().saturating_sub(width));
        let offset = (1 .. search)
            .find(|&i| window[i - 1] < 0.0 && window[i] >= 0.0)
            .unwrap_or(search);

        let height = self.bounds.height;
        self.trace.extend(window[offset ..].iter().take(width).enumerate().map(|(x, &samp)| TracePoint {
            x: self.bounds.x + x as i32,
            y: self.bounds.y + normalize_centered(samp, height),
            clipped: samp > 1.0 || samp < -1.0,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_on_rising_crossing() {
        let mut sc = Scope::new(Bounds::new(0, 0, 4, 100), 4);
        // rising crossing between index 2 and 3
        sc.update(&[0.5, 0.2, -0.3, 0.0, 0.5, 1.0, 0.5, -0.5]);
        let ys: Vec<i32> = sc.trace().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![50, 25, 0, 25]);
        assert_eq!(sc.trace()[3].x, 3);
    }

    #[test]
    fn without_crossing_shows_newest() {
        let mut sc = Scope::new(Bounds::new(10, 20, 2, 100), 3);
        sc.update(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        let xs: Vec<i32> = sc.trace().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10, 11]);
        assert_eq!(sc.trace()[1].y, 20 + normalize_centered(0.5, 100));
    }

    #[test]
    fn full_scale_stays_inside_bounds() {
        let bounds = Bounds::new(0, 5, 2, 10);
        let mut sc = Scope::new(bounds, 0);
        sc.update(&[1.0, -1.0]);
        let ys: Vec<i32> = sc.trace().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![5, 14]);
        assert!(sc.trace().iter().all(|p| (bounds.top() .. bounds.bottom()).contains(&p.y)));
    }

    #[test]
    fn marks_clipping() {
        let mut sc = Scope::new(Bounds::new(0, 0, 3, 10), 0);
        sc.update(&[0.0, 1.5, -2.0]);
        let clipped: Vec<bool> = sc.trace().iter().map(|p| p.clipped).collect();
        assert_eq!(clipped, vec![false, true, true]);
    }

    #[test]
    fn short_history_draws_what_exists() {
        let mut sc = Scope::new(Bounds::new(0, 0, 100, 10), 16);
        sc.update(&[0.0; 8]);
        assert_eq!(sc.trace().len(), 8);
        sc.update(&[]);
        assert!(sc.trace().is_empty());
        assert_eq!(sc.requested_window(), 116);
    }
}
