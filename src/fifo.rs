use std::iter;
use std::ops::Deref;

/// Fixed-size sample history. The newest sample is always the last element.
#[derive(Debug, Clone)]
pub struct Fifo<T>(Vec<T>);

impl<T> Fifo<T> {
    pub fn new(sz: usize) -> Fifo<T> where T: Default + Clone {
        Fifo(iter::repeat(T::default()).take(sz).collect())
    }

    /// Appends `data`, discarding as many of the oldest samples as needed.
    pub fn push(&mut self, data: &[T]) where T: Copy {
        let dlen = data.len();
        let blen = self.0.len();

        if dlen >= blen {
            self.0.copy_from_slice(&data[dlen - blen ..]);
        } else {
            self.0.copy_within(dlen .., 0);
            self.0[blen - dlen ..].copy_from_slice(data);
        }
    }

    pub fn size(&self) -> usize { self.0.len() }

    /// The newest `count` samples (all of them if fewer are held).
    pub fn latest(&self, count: usize) -> &[T] {
        let start = self.0.len().saturating_sub(count);
        &self.0[start ..]
    }

    /// Grows by padding the old end, or shrinks by dropping the oldest
    /// samples, so the newest samples stay at the tail either way.
    pub fn resize(&mut self, newsz: usize) where T: Default + Clone {
        let blen = self.0.len();
        if newsz > blen {
            let pad = iter::repeat(T::default()).take(newsz - blen);
            self.0.splice(0 .. 0, pad);
        } else {
            self.0.drain(.. blen - newsz);
        }
    }
}

impl<T> Deref for Fifo<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { &self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_newest_at_tail() {
        let mut f: Fifo<i32> = Fifo::new(4);
        f.push(&[1, 2]);
        assert_eq!(&f[..], &[0, 0, 1, 2]);
        f.push(&[3, 4, 5]);
        assert_eq!(&f[..], &[2, 3, 4, 5]);
    }

    #[test]
    fn oversized_push_keeps_last_window() {
        let mut f: Fifo<i32> = Fifo::new(3);
        f.push(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(&f[..], &[4, 5, 6]);
    }

    #[test]
    fn latest_is_capped_by_size() {
        let mut f: Fifo<i32> = Fifo::new(3);
        f.push(&[7, 8, 9]);
        assert_eq!(f.latest(2), &[8, 9]);
        assert_eq!(f.latest(10), &[7, 8, 9]);
    }

    #[test]
    fn resize_preserves_newest() {
        let mut f: Fifo<i32> = Fifo::new(3);
        f.push(&[1, 2, 3]);
        f.resize(5);
        assert_eq!(&f[..], &[0, 0, 1, 2, 3]);
        f.resize(2);
        assert_eq!(&f[..], &[2, 3]);
        assert_eq!(f.size(), 2);
    }
}
