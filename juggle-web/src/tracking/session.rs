//! Juggle tracking session
//!
//! Owns every piece of mutable tracking state. One `tick` is one frame:
//! filter update/predict → trajectory push → juggle detection → readout.

use super::ball_filter::BallFilter;
use super::config::TrackerConfig;
use super::detection::{DetectionFilter, Observation};
use super::juggle::{ApexOutcome, JuggleDetector};
use super::sample::{BallSample, SampleInput};
use super::trajectory::TrajectoryBuffer;
use crate::error::TrackerError;

/// What one frame produced
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    /// Juggles counted so far this session
    pub count: u32,
    /// Sample appended this frame (if any)
    pub latest: Option<BallSample>,
    /// Apex decided this frame (if any)
    pub apex: Option<ApexOutcome>,
}

impl TickOutcome {
    pub fn pushed(&self) -> bool {
        self.latest.is_some()
    }
}

/// Ball tracker + juggle counter for one session
#[derive(Clone, Debug)]
pub struct JuggleTracker {
    config: TrackerConfig,
    filter: BallFilter,
    trajectory: TrajectoryBuffer,
    detector: JuggleDetector,
    /// Wall-clock time of the previous tick (ms)
    last_tick_ms: Option<f64>,
}

impl JuggleTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: TrackerConfig) -> Self {
        Self {
            filter: BallFilter::new(config.process_variance, config.measurement_variance),
            trajectory: TrajectoryBuffer::new(config.buffer_capacity),
            detector: JuggleDetector::new(config.min_juggle_interval_ms),
            last_tick_ms: None,
            config,
        }
    }

    /// Process one frame
    ///
    /// `timestamp_ms` is the wall-clock time of the frame and must not go
    /// backwards; a late timestamp is treated as zero elapsed time.
    pub fn tick(&mut self, timestamp_ms: f64, observation: Option<Observation>) -> TickOutcome {
        let dt_seconds = self.advance_clock(timestamp_ms);
        // Samples carry the clamped clock so the trail stays in time order
        let now_ms = self.last_tick_ms.unwrap_or(timestamp_ms);

        let observation = observation.filter(|obs| {
            let usable = obs.is_finite();
            if !usable {
                log::warn!("dropping non-finite observation {:?} at t={}", obs, timestamp_ms);
            }
            usable
        });

        let (latest, apex) = match observation {
            Some(obs) => {
                let estimate = self.filter.observe(obs.center, dt_seconds);
                let sample = self
                    .trajectory
                    .push(
                        SampleInput::observed(estimate.position, obs.diameter, now_ms)
                            .with_velocity(estimate.velocity),
                    )
                    .clone();
                let apex = self.detector.evaluate(&mut self.trajectory);
                (Some(sample), apex)
            }
            None => match self.filter.extrapolate(dt_seconds) {
                Some(position) => {
                    let diameter = self
                        .trajectory
                        .latest()
                        .map_or(self.config.default_diameter, |s| s.diameter);
                    let sample = self
                        .trajectory
                        .push(SampleInput::extrapolated(position, diameter, now_ms))
                        .clone();
                    (Some(sample), None)
                }
                None => (None, None),
            },
        };

        log::trace!(
            "tick t={} dt={:.4}s observed={} count={}",
            timestamp_ms,
            dt_seconds,
            observation.is_some(),
            self.detector.count()
        );

        TickOutcome {
            count: self.detector.count(),
            latest,
            apex,
        }
    }

    /// Elapsed seconds since the previous tick (0 on the first one)
    fn advance_clock(&mut self, timestamp_ms: f64) -> f64 {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(timestamp_ms);
                0.0
            }
            Some(last) if timestamp_ms < last => {
                log::warn!("frame timestamp {} is earlier than {}, treating as dt=0", timestamp_ms, last);
                0.0
            }
            Some(last) => {
                self.last_tick_ms = Some(timestamp_ms);
                (timestamp_ms - last) / 1000.0
            }
        }
    }

    /// Start a new session: count 0, empty trail, unlocked filters
    pub fn reset(&mut self) {
        self.filter.reset();
        self.trajectory.clear();
        self.detector.reset();
        self.last_tick_ms = None;
        log::info!("juggle tracker reset");
    }

    pub fn count(&self) -> u32 {
        self.detector.count()
    }

    pub fn trajectory(&self) -> &TrajectoryBuffer {
        &self.trajectory
    }

    pub fn latest(&self) -> Option<&BallSample> {
        self.trajectory.latest()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn is_locked_on(&self) -> bool {
        self.filter.is_initialised()
    }

    /// Detection acceptance rules from the config
    pub fn detection_filter(&self) -> DetectionFilter {
        DetectionFilter {
            score_threshold: self.config.score_threshold,
            category_name: self.config.category_name.clone(),
        }
    }
}

impl Default for JuggleTracker {
    fn default() -> Self {
        Self::with_valid_config(TrackerConfig::default())
    }
}
