//! Rolling trajectory buffer
//!
//! Keeps the most recent ball samples (observed and extrapolated) in
//! chronological order. Oldest sample is dropped when full.

use std::collections::VecDeque;

use super::sample::{BallSample, SampleInput};

/// Default number of samples kept for detection and the trail display
pub const DEFAULT_CAPACITY: usize = 30;

/// Fixed-capacity FIFO of ball samples
#[derive(Clone, Debug)]
pub struct TrajectoryBuffer {
    samples: VecDeque<BallSample>,
    capacity: usize,
    /// Samples pushed since creation; not reset by `clear`
    pushed: u64,
}

impl TrajectoryBuffer {
    /// A zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            pushed: 0,
        }
    }

    /// Append a sample, evicting the oldest one when over capacity
    ///
    /// Missing velocity is derived by finite difference against the
    /// previous sample (units per second). Duplicate or backwards
    /// timestamps give zero velocity.
    pub fn push(&mut self, input: SampleInput) -> &BallSample {
        let velocity = match input.velocity {
            Some(v) => v,
            None => self.derive_velocity(input.position, input.timestamp_ms),
        };

        self.samples.push_back(BallSample {
            position: input.position,
            velocity,
            diameter: input.diameter,
            is_extrapolated: input.is_extrapolated,
            timestamp_ms: input.timestamp_ms,
            juggle_ordinal: None,
            label: None,
        });

        self.pushed += 1;

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        &self.samples[self.samples.len() - 1]
    }

    fn derive_velocity(&self, position: (f64, f64), timestamp_ms: f64) -> (f64, f64) {
        let prev = match self.samples.back() {
            Some(prev) => prev,
            None => return (0.0, 0.0),
        };
        let dt_seconds = (timestamp_ms - prev.timestamp_ms) / 1000.0;
        if dt_seconds > 0.0 {
            (
                (position.0 - prev.position.0) / dt_seconds,
                (position.1 - prev.position.1) / dt_seconds,
            )
        } else {
            (0.0, 0.0)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&BallSample> {
        self.samples.back()
    }

    pub fn get(&self, index: usize) -> Option<&BallSample> {
        self.samples.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut BallSample> {
        self.samples.get_mut(index)
    }

    /// Sequence number of the sample at `index`
    ///
    /// Unique for the lifetime of the buffer, so it identifies a sample
    /// across evictions and clears.
    pub fn sequence(&self, index: usize) -> Option<u64> {
        let len = self.samples.len();
        (index < len).then(|| self.pushed - (len - index) as u64)
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &BallSample> + '_ {
        self.samples.iter()
    }

    /// Buffer indices of the observed (non-extrapolated) samples, oldest first
    pub fn observed_indices(&self) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_extrapolated)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for TrajectoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: f64, t: f64) -> SampleInput {
        SampleInput::observed((0.0, y), 20.0, t)
    }

    #[test]
    fn test_capacity_bound_keeps_most_recent() {
        let mut buffer = TrajectoryBuffer::new(5);
        for i in 0..8 {
            buffer.push(at(i as f64, i as f64 * 33.0));
            assert!(buffer.len() <= 5);
        }
        assert_eq!(buffer.len(), 5);
        let ys: Vec<f64> = buffer.iter().map(|s| s.y()).collect();
        assert_eq!(ys, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_velocity_derived_from_previous_sample() {
        let mut buffer = TrajectoryBuffer::default();
        buffer.push(SampleInput::observed((0.0, 0.0), 20.0, 0.0));
        let sample = buffer.push(SampleInput::observed((10.0, 20.0), 20.0, 1000.0));
        assert_eq!(sample.velocity, (10.0, 20.0));
    }

    #[test]
    fn test_velocity_zero_on_duplicate_timestamp() {
        let mut buffer = TrajectoryBuffer::default();
        buffer.push(SampleInput::observed((0.0, 0.0), 20.0, 500.0));
        let sample = buffer.push(SampleInput::observed((10.0, 20.0), 20.0, 500.0));
        assert_eq!(sample.velocity, (0.0, 0.0));
        let sample = buffer.push(SampleInput::observed((30.0, 20.0), 20.0, 400.0));
        assert_eq!(sample.velocity, (0.0, 0.0));
    }

    #[test]
    fn test_explicit_velocity_kept() {
        let mut buffer = TrajectoryBuffer::default();
        buffer.push(SampleInput::observed((0.0, 0.0), 20.0, 0.0));
        let sample = buffer.push(
            SampleInput::observed((10.0, 20.0), 20.0, 1000.0).with_velocity((-1.0, 2.5)),
        );
        assert_eq!(sample.velocity, (-1.0, 2.5));
    }

    #[test]
    fn test_sequence_survives_eviction_and_clear() {
        let mut buffer = TrajectoryBuffer::new(3);
        for i in 0..5 {
            buffer.push(at(i as f64, i as f64 * 33.0));
        }
        assert_eq!(buffer.sequence(0), Some(2));
        assert_eq!(buffer.sequence(2), Some(4));
        assert_eq!(buffer.sequence(3), None);

        buffer.clear();
        buffer.push(at(0.0, 0.0));
        assert_eq!(buffer.sequence(0), Some(5));
    }

    #[test]
    fn test_observed_indices_skip_extrapolated() {
        let mut buffer = TrajectoryBuffer::default();
        buffer.push(at(1.0, 0.0));
        buffer.push(SampleInput::extrapolated((0.0, 2.0), 20.0, 33.0));
        buffer.push(at(3.0, 66.0));
        buffer.push(SampleInput::extrapolated((0.0, 4.0), 20.0, 99.0));
        assert_eq!(buffer.observed_indices(), vec![0, 2]);
    }
}
