//! Rolling-window momentum estimate toward a target surface.
//!
//! Parking behaviors push the target distance every tick. A new measurement
//! below the window mean means the vehicle is closing in. Until the window
//! is full every candidate counts as approaching.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent distances.
#[derive(Clone, Debug)]
pub struct MomentumTracker {
    window: VecDeque<f32>,
    capacity: usize,
}

impl MomentumTracker {
    /// Create an empty tracker holding at most `capacity` samples.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a measurement, evicting the oldest beyond capacity.
    pub fn push(&mut self, measurement: f32) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(measurement);
    }

    /// Check if `candidate` is closer than the window average.
    pub fn is_approaching(&self, candidate: f32) -> bool {
        match self.mean() {
            Some(mean) if self.is_full() => candidate < mean,
            _ => true,
        }
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Mean of the current window.
    pub fn mean(&self) -> Option<f32> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f32>() / self.window.len() as f32)
    }

    /// Number of samples held.
    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if no samples are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Check if the window holds `capacity` samples.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    /// Maximum number of samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.window.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_keeps_last_n() {
        let mut tracker = MomentumTracker::new(10);
        for i in 0..13 {
            tracker.push(i as f32);
        }

        assert_eq!(tracker.len(), 10);
        let samples: Vec<f32> = tracker.samples().collect();
        assert_eq!(samples.first(), Some(&3.0));
        assert_eq!(samples.last(), Some(&12.0));
        assert_relative_eq!(tracker.mean().unwrap(), 7.5);
    }

    #[test]
    fn test_approaching_until_full() {
        let mut tracker = MomentumTracker::new(3);
        tracker.push(10.0);
        tracker.push(10.0);
        assert!(tracker.is_approaching(1_000.0));

        tracker.push(10.0);
        assert!(tracker.is_full());
        assert!(!tracker.is_approaching(1_000.0));
        assert!(tracker.is_approaching(9.0));
        // Equal to the mean is not approaching
        assert!(!tracker.is_approaching(10.0));
    }

    #[test]
    fn test_reset_clears() {
        let mut tracker = MomentumTracker::new(2);
        tracker.push(5.0);
        tracker.push(6.0);
        tracker.reset();

        assert!(tracker.is_empty());
        assert_eq!(tracker.mean(), None);
        assert!(tracker.is_approaching(100.0));
    }

    #[test]
    fn test_verdict_depends_on_last_n_only() {
        let mut far_history = MomentumTracker::new(3);
        let mut near_history = MomentumTracker::new(3);
        for d in [100.0, 100.0, 100.0, 10.0, 20.0, 30.0] {
            far_history.push(d);
        }
        for d in [1.0, 2.0, 10.0, 20.0, 30.0] {
            near_history.push(d);
        }

        // Both windows hold [10, 20, 30], mean 20
        for candidate in [5.0, 19.0, 20.0, 21.0, 100.0] {
            assert_eq!(
                far_history.is_approaching(candidate),
                near_history.is_approaching(candidate),
                "candidate {}",
                candidate
            );
        }
        assert!(far_history.is_approaching(19.0));
        assert!(!far_history.is_approaching(21.0));
    }

    #[test]
    fn test_partial_window_after_reset_is_approaching() {
        let mut tracker = MomentumTracker::new(4);
        for d in [50.0, 40.0, 30.0, 20.0] {
            tracker.push(d);
        }
        assert!(!tracker.is_approaching(60.0));

        tracker.reset();
        tracker.push(10.0);
        tracker.push(10.0);
        tracker.push(10.0);
        assert!(!tracker.is_full());
        for candidate in [0.0, 10.0, 60.0, 1_000.0] {
            assert!(tracker.is_approaching(candidate), "candidate {}", candidate);
        }
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let mut tracker = MomentumTracker::new(0);
        tracker.push(1.0);
        tracker.push(2.0);
        assert_eq!(tracker.capacity(), 1);
        assert_eq!(tracker.samples().collect::<Vec<_>>(), vec![2.0]);
    }
}
