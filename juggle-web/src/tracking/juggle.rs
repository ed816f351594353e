//! Juggle detection from the observed trajectory
//!
//! Looks at the last three observed samples. The middle one is either the
//! floor of the arc (local minimum in Y, screen coordinates) or an apex
//! (local maximum in Y, the lowest physical point). An apex is counted when
//! it sits at least one ball radius below the last recorded floor.

use super::sample::{round1, DebugLabel};
use super::trajectory::TrajectoryBuffer;

/// Result of evaluating an apex
#[derive(Clone, Debug, PartialEq)]
pub struct ApexOutcome {
    /// Was this apex counted as a juggle?
    pub fired: bool,
    /// Juggle number assigned to the apex (when fired)
    pub ordinal: Option<u32>,
    /// Vertical excursion from the last floor to the apex
    pub drop_from_top: f64,
    /// Noise threshold (apex radius)
    pub min_amplitude: f64,
    /// drop_from_top / min_amplitude, one decimal
    pub amplitude_ratio: f64,
    /// Buffer index of the apex sample at decision time
    pub apex_index: usize,
}

/// Turning-point juggle counter with optional debounce
#[derive(Clone, Debug)]
pub struct JuggleDetector {
    /// Minimum time between two counted juggles (0 = no debounce)
    min_interval_ms: u32,
    /// Juggles counted this session
    count: u32,
    /// Y of the most recent local minimum (arc floor)
    last_local_min_y: Option<f64>,
    /// Timestamp of the last counted juggle
    last_event_ms: Option<f64>,
    /// Buffer sequence of the newest observed sample already evaluated
    last_evaluated: Option<u64>,
}

impl JuggleDetector {
    pub fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_ms,
            count: 0,
            last_local_min_y: None,
            last_event_ms: None,
            last_evaluated: None,
        }
    }

    /// Evaluate the newest observed triple in `buffer`
    ///
    /// Must be called after every observed push. Back-fills the apex
    /// sample's ordinal and label. Returns `None` unless the middle sample
    /// is an apex. A triple is only ever evaluated once; calling again
    /// without a new observed sample changes nothing.
    pub fn evaluate(&mut self, buffer: &mut TrajectoryBuffer) -> Option<ApexOutcome> {
        let observed = buffer.observed_indices();
        let n = observed.len();
        if n < 3 {
            return None;
        }
        let (i_prev_prev, i_prev, i_curr) = (observed[n - 3], observed[n - 2], observed[n - 1]);

        let curr_seq = buffer.sequence(i_curr)?;
        if self.last_evaluated == Some(curr_seq) {
            return None;
        }
        self.last_evaluated = Some(curr_seq);

        let (prev_prev_y, prev_y, curr_y, diameter, now) = {
            let prev_prev = buffer.get(i_prev_prev)?;
            let prev = buffer.get(i_prev)?;
            let curr = buffer.get(i_curr)?;
            (prev_prev.y(), prev.y(), curr.y(), prev.diameter, curr.timestamp_ms)
        };

        // Floor of the arc
        if prev_y <= prev_prev_y && prev_y <= curr_y {
            self.last_local_min_y = Some(prev_y);
        }

        // Apex, checked independently of the floor test
        if !(prev_y >= prev_prev_y && prev_y >= curr_y) {
            return None;
        }

        let drop_from_top = prev_y - self.last_local_min_y.unwrap_or(prev_y);
        let min_amplitude = diameter / 2.0;
        let amplitude_ratio = if min_amplitude > 0.0 {
            round1(drop_from_top / min_amplitude)
        } else {
            0.0
        };

        let fired = drop_from_top >= min_amplitude && self.interval_elapsed(now);
        let ordinal = if fired {
            self.count += 1;
            self.last_event_ms = Some(now);
            log::debug!(
                "juggle {} at y={:.1} (drop {:.1}, ratio {})",
                self.count, prev_y, drop_from_top, amplitude_ratio
            );
            Some(self.count)
        } else {
            log::trace!("apex at y={:.1} not counted (ratio {})", prev_y, amplitude_ratio);
            None
        };

        if let Some(apex) = buffer.get_mut(i_prev) {
            apex.juggle_ordinal = ordinal;
            apex.label = Some(DebugLabel::new(ordinal, prev_y, amplitude_ratio));
        }

        Some(ApexOutcome {
            fired,
            ordinal,
            drop_from_top,
            min_amplitude,
            amplitude_ratio,
            apex_index: i_prev,
        })
    }

    /// Debounce check against the last counted juggle
    fn interval_elapsed(&self, now: f64) -> bool {
        match self.last_event_ms {
            Some(last) if self.min_interval_ms > 0 => now - last >= f64::from(self.min_interval_ms),
            _ => true,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_local_min_y(&self) -> Option<f64> {
        self.last_local_min_y
    }

    /// Reset detector state
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_local_min_y = None;
        self.last_event_ms = None;
        self.last_evaluated = None;
    }
}

impl Default for JuggleDetector {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::sample::SampleInput;

    /// Push observed Y values (one per 33 ms) and evaluate after each
    fn feed(detector: &mut JuggleDetector, buffer: &mut TrajectoryBuffer, ys: &[f64], diameter: f64) {
        for &y in ys {
            let t = buffer.latest().map_or(0.0, |s| s.timestamp_ms + 33.0);
            buffer.push(SampleInput::observed((0.0, y), diameter, t));
            detector.evaluate(buffer);
        }
    }

    #[test]
    fn test_apex_above_threshold_counts() {
        let mut detector = JuggleDetector::default();
        let mut buffer = TrajectoryBuffer::default();
        feed(&mut detector, &mut buffer, &[50.0, 50.0, 10.0, 50.0, 50.0], 20.0);

        assert_eq!(detector.count(), 1);
        assert_eq!(detector.last_local_min_y(), Some(10.0));
        let apex = buffer.get(3).unwrap();
        assert_eq!(apex.juggle_ordinal, Some(1));
        assert_eq!(apex.label.as_ref().unwrap().amplitude_ratio, 4.0);
    }

    #[test]
    fn test_apex_below_threshold_rejected() {
        let mut detector = JuggleDetector::default();
        let mut buffer = TrajectoryBuffer::default();
        feed(&mut detector, &mut buffer, &[50.0, 50.0, 10.0, 50.0], 200.0);

        // Pretend an earlier pass had tentatively marked the apex
        buffer.get_mut(3).unwrap().juggle_ordinal = Some(9);
        buffer.push(SampleInput::observed((0.0, 50.0), 200.0, 132.0));
        let outcome = detector.evaluate(&mut buffer).unwrap();

        assert!(!outcome.fired);
        assert_eq!(outcome.drop_from_top, 40.0);
        assert_eq!(outcome.min_amplitude, 100.0);
        assert_eq!(outcome.amplitude_ratio, 0.4);
        assert_eq!(detector.count(), 0);
        assert_eq!(buffer.get(3).unwrap().juggle_ordinal, None);
        assert_eq!(buffer.get(3).unwrap().label.as_ref().unwrap().lines().0, "-");
    }

    #[test]
    fn test_repeated_evaluate_changes_nothing() {
        for min_interval_ms in [0, 400] {
            let mut detector = JuggleDetector::new(min_interval_ms);
            let mut buffer = TrajectoryBuffer::default();
            feed(&mut detector, &mut buffer, &[50.0, 50.0, 10.0, 50.0, 50.0], 20.0);
            assert_eq!(detector.count(), 1);

            assert_eq!(detector.evaluate(&mut buffer), None);
            // an extrapolated push leaves the observed triple unchanged
            buffer.push(SampleInput::extrapolated((0.0, 80.0), 20.0, 165.0));
            assert_eq!(detector.evaluate(&mut buffer), None);

            assert_eq!(detector.count(), 1);
            assert_eq!(buffer.get(3).unwrap().juggle_ordinal, Some(1));
            assert_eq!(buffer.get(3).unwrap().label.as_ref().unwrap().ordinal, Some(1));
        }
    }

    #[test]
    fn test_no_floor_means_no_event() {
        let mut detector = JuggleDetector::default();
        let mut buffer = TrajectoryBuffer::default();
        feed(&mut detector, &mut buffer, &[10.0, 60.0], 20.0);
        buffer.push(SampleInput::observed((0.0, 20.0), 20.0, 66.0));
        let outcome = detector.evaluate(&mut buffer).unwrap();
        assert_eq!(outcome.drop_from_top, 0.0);
        assert!(!outcome.fired);
    }

    #[test]
    fn test_fewer_than_three_observed_is_noop() {
        let mut detector = JuggleDetector::default();
        let mut buffer = TrajectoryBuffer::default();
        buffer.push(SampleInput::observed((0.0, 50.0), 20.0, 0.0));
        buffer.push(SampleInput::extrapolated((0.0, 10.0), 20.0, 33.0));
        buffer.push(SampleInput::observed((0.0, 50.0), 20.0, 66.0));
        assert_eq!(detector.evaluate(&mut buffer), None);
        assert_eq!(detector.last_local_min_y(), None);
        assert_eq!(detector.count(), 0);
    }

    #[test]
    fn test_extrapolated_samples_ignored() {
        let ys = [50.0, 50.0, 10.0, 50.0, 50.0];

        let mut plain = JuggleDetector::default();
        let mut plain_buffer = TrajectoryBuffer::default();
        let mut plain_outcomes = Vec::new();
        for (i, &y) in ys.iter().enumerate() {
            plain_buffer.push(SampleInput::observed((0.0, y), 20.0, i as f64 * 100.0));
            plain_outcomes.push(plain.evaluate(&mut plain_buffer).map(|o| (o.fired, o.drop_from_top)));
        }

        let mut mixed = JuggleDetector::default();
        let mut mixed_buffer = TrajectoryBuffer::default();
        let mut mixed_outcomes = Vec::new();
        for (i, &y) in ys.iter().enumerate() {
            // A wild extrapolated point that would be an apex on its own
            mixed_buffer.push(SampleInput::extrapolated((0.0, 500.0), 20.0, i as f64 * 100.0 - 50.0));
            mixed_buffer.push(SampleInput::observed((0.0, y), 20.0, i as f64 * 100.0));
            mixed_outcomes.push(mixed.evaluate(&mut mixed_buffer).map(|o| (o.fired, o.drop_from_top)));
        }

        assert_eq!(plain_outcomes, mixed_outcomes);
        assert_eq!(plain.count(), mixed.count());
        assert!(mixed_buffer.iter().filter(|s| s.is_extrapolated).all(|s| s.juggle_ordinal.is_none()));
    }

    fn two_apexes(spacing_ms: f64) -> u32 {
        let mut detector = JuggleDetector::new(400);
        let mut buffer = TrajectoryBuffer::default();
        // floor, apex, floor, apex with the two apexes `spacing_ms` apart,
        // each confirmed by a sample 10 ms later
        let points = [
            (50.0, 0.0),
            (10.0, 10.0),
            (50.0, 20.0),
            (10.0, 30.0),
            (50.0, 20.0 + spacing_ms),
            (10.0, 30.0 + spacing_ms),
        ];
        for &(y, t) in &points {
            buffer.push(SampleInput::observed((0.0, y), 20.0, 1000.0 + t));
            detector.evaluate(&mut buffer);
        }
        detector.count()
    }

    #[test]
    fn test_debounce_suppresses_close_apexes() {
        assert_eq!(two_apexes(100.0), 1);
        assert_eq!(two_apexes(500.0), 2);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut detector = JuggleDetector::new(400);
        let mut buffer = TrajectoryBuffer::default();
        feed(&mut detector, &mut buffer, &[50.0, 50.0, 10.0, 50.0, 50.0], 20.0);
        assert_eq!(detector.count(), 1);
        detector.reset();
        assert_eq!(detector.count(), 0);
        assert_eq!(detector.last_local_min_y(), None);
    }
}
