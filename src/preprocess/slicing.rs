// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::MatrixXF;
use crate::volumes::GridVolume;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlicingDirection {
    /// x is constant, the slice spans (t, y).
    X,
    /// y is constant, the slice spans (t, x).
    Y,
    /// t is constant, the slice is one stored frame.
    T,
}

/// The most recent `window` frames, oldest first. Together they form an
/// `(x, y, t)` volume.
pub struct FrameHistory {
    frames: VecDeque<MatrixXF>,
    window: usize,
}

impl FrameHistory {
    pub fn new(window: usize) -> Self {
        Self { frames: VecDeque::with_capacity(window.max(1)), window: window.max(1) }
    }

    pub fn push(&mut self, frame: MatrixXF) {
        if let Some(first) = self.frames.front() {
            if first.shape() != frame.shape() {
                log::warn!("Frame shape changed from {:?} to {:?}, clearing history.", first.shape(), frame.shape());
                self.frames.clear();
            }
        }
        if self.frames.len() == self.window {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn slice(&self, direction: SlicingDirection, index: usize) -> Option<MatrixXF> {
        let (rows, cols) = self.frames.front()?.shape();
        let t_len = self.frames.len();
        match direction {
            SlicingDirection::T => self.frames.get(index).cloned(),
            SlicingDirection::X => {
                if index >= cols {
                    return None;
                }
                Some(MatrixXF::from_fn(t_len, rows, |t, y| self.frames[t][(y, index)]))
            }
            SlicingDirection::Y => {
                if index >= rows {
                    return None;
                }
                Some(MatrixXF::from_fn(t_len, cols, |t, x| self.frames[t][(index, x)]))
            }
        }
    }

    /// Stacks the stored frames along z inside `bbox`.
    pub fn to_volume(&self, bbox: AABB) -> Result<GridVolume, String> {
        let frames: Vec<MatrixXF> = self.frames.iter().cloned().collect();
        GridVolume::from_frames(&frames, bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::volume::Volume;
    use crate::math::constants::{Float, Vector3f};

    // Frame t holds 100 t + 10 y + x.
    fn history(frames: usize, window: usize) -> FrameHistory {
        let mut h = FrameHistory::new(window);
        for t in 0..frames {
            h.push(MatrixXF::from_fn(3, 4, |y, x| (100 * t + 10 * y + x) as Float));
        }
        h
    }

    #[test]
    fn test_window_drops_oldest() {
        let h = history(5, 3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.slice(SlicingDirection::T, 0).expect("frame")[(0, 0)], 200.0);
        assert!(h.slice(SlicingDirection::T, 3).is_none());
    }

    #[test]
    fn test_spatial_slices() {
        let h = history(2, 4);
        let sx = h.slice(SlicingDirection::X, 1).expect("x slice");
        assert_eq!(sx.shape(), (2, 3));
        assert_eq!(sx[(1, 2)], 121.0);

        let sy = h.slice(SlicingDirection::Y, 2).expect("y slice");
        assert_eq!(sy.shape(), (2, 4));
        assert_eq!(sy[(0, 3)], 23.0);

        assert!(h.slice(SlicingDirection::X, 4).is_none());
        assert!(h.slice(SlicingDirection::Y, 3).is_none());
        assert!(FrameHistory::new(2).slice(SlicingDirection::T, 0).is_none());
    }

    #[test]
    fn test_shape_change_resets_history() {
        let mut h = history(2, 4);
        h.push(MatrixXF::zeros(2, 2));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_history_as_volume() {
        let h = history(3, 3);
        let volume = h.to_volume(AABB::unit()).expect("volume");
        assert_eq!(volume.resolution(), (4, 3, 3));
        assert_eq!(volume.eval(Vector3f::new(0.0, 0.0, 1.0)), 200.0);
    }
}
