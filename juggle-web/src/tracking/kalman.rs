//! Kalman filter for one scalar axis
//!
//! State vector: [position, velocity, acceleration]ᵀ (3 elements)
//! Only position is observed. Time steps are in seconds.

use nalgebra::{Matrix3, RowVector3, Vector3};

/// 3-element state vector type
type State = Vector3<f64>;

/// Constant-acceleration Kalman filter for a single coordinate
///
/// The ball tracker runs one of these per screen axis.
#[derive(Clone, Debug)]
pub struct AxisKalman {
    /// State: [position, velocity, acceleration]
    state: State,

    /// State covariance matrix (uncertainty)
    covariance: Matrix3<f64>,

    /// Process noise, added to each diagonal term after propagation
    process_variance: f64,

    /// Measurement noise variance of the detector
    measurement_variance: f64,

    initialised: bool,
}

impl AxisKalman {
    pub fn new(process_variance: f64, measurement_variance: f64) -> Self {
        Self {
            state: State::zeros(),
            covariance: Matrix3::identity(),
            process_variance,
            measurement_variance,
            initialised: false,
        }
    }

    /// Build transition matrix F for given timestep
    ///
    /// ```text
    /// | 1  dt  0.5dt² |
    /// | 0  1   dt     |
    /// | 0  0   1      |
    /// ```
    fn transition_matrix(dt: f64) -> Matrix3<f64> {
        let dt2 = 0.5 * dt * dt;
        Matrix3::new(
            1.0, dt,  dt2,
            0.0, 1.0, dt,
            0.0, 0.0, 1.0,
        )
    }

    /// Observation matrix H (position only)
    fn observation_matrix() -> RowVector3<f64> {
        RowVector3::new(1.0, 0.0, 0.0)
    }

    /// Lock the filter onto a first measurement without a probabilistic update
    pub fn seed(&mut self, position: f64) {
        self.state = State::new(position, 0.0, 0.0);
        self.initialised = true;
    }

    /// Update step - fold in one observed position
    pub fn update(&mut self, measured: f64) {
        let h = Self::observation_matrix();

        // Innovation: y = z - H * x
        let innovation = measured - (h * self.state)[0];

        // Innovation covariance: S = H * P * Hᵀ + R, which for H = [1 0 0] is P₀₀ + R
        let s = self.covariance[(0, 0)] + self.measurement_variance;

        // Kalman gain: K = P * Hᵀ / S, i.e. the first column of P
        let gain: Vector3<f64> = self.covariance.column(0).into_owned() / s;

        self.state += gain * innovation;

        // Covariance update: P = (I - K * H) * P
        self.covariance = (Matrix3::identity() - gain * h) * self.covariance;

        self.initialised = true;
    }

    /// Predict step - advance the state by `dt` seconds
    ///
    /// A non-positive `dt` leaves the filter untouched. Returns the
    /// (predicted) position either way.
    pub fn predict(&mut self, dt: f64) -> f64 {
        if dt.is_nan() || dt <= 0.0 {
            return self.state[0];
        }
        let f = Self::transition_matrix(dt);

        // State prediction: x = F * x
        self.state = f * self.state;

        // Covariance prediction: P = F * P * Fᵀ + qI
        self.covariance = f * self.covariance * f.transpose()
            + Matrix3::from_diagonal_element(self.process_variance);

        self.state[0]
    }

    pub fn position(&self) -> f64 {
        self.state[0]
    }

    pub fn velocity(&self) -> f64 {
        self.state[1]
    }

    pub fn acceleration(&self) -> f64 {
        self.state[2]
    }

    pub fn state(&self) -> &Vector3<f64> {
        &self.state
    }

    pub fn covariance(&self) -> &Matrix3<f64> {
        &self.covariance
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}
