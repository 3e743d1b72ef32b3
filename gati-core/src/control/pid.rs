//! PID law for the line-following behavior.
//!
//! Error is `setpoint - input`. The integral term is accumulated with gain
//! already applied and clamped to the output limits (anti-windup). The
//! derivative acts on the measurement, not the error, so a setpoint change
//! does not kick the output.

use serde::{Deserialize, Serialize};

use crate::error::{GatiError, Result};

/// Gains and symmetric output limit of a PID law.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Output clamped to [-limit, limit]
    pub limit: f32,
}

impl PidGains {
    /// Create a gain set.
    pub const fn new(kp: f32, ki: f32, kd: f32, limit: f32) -> Self {
        Self { kp, ki, kd, limit }
    }

    /// Reject non-finite gains and a non-positive limit.
    pub fn validate(&self, name: &str) -> Result<()> {
        if ![self.kp, self.ki, self.kd, self.limit]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(GatiError::config(format!("{} gains must be finite", name)));
        }
        if self.limit <= 0.0 {
            return Err(GatiError::config(format!(
                "{} limit must be positive, got {}",
                name, self.limit
            )));
        }
        Ok(())
    }
}

/// PID controller state.
#[derive(Clone, Debug)]
pub struct Pid {
    gains: PidGains,
    setpoint: f32,
    integral: f32,
    last_input: Option<f32>,
}

impl Pid {
    /// Controller holding `setpoint`.
    pub fn new(gains: PidGains, setpoint: f32) -> Self {
        Self {
            gains,
            setpoint,
            integral: 0.0,
            last_input: None,
        }
    }

    /// Advance the law by `dt` seconds with a new measurement.
    ///
    /// A non-positive `dt` skips the integral and derivative terms.
    pub fn update(&mut self, input: f32, dt: f32) -> f32 {
        let limit = self.gains.limit;
        let error = self.setpoint - input;
        let proportional = self.gains.kp * error;

        let mut derivative = 0.0;
        if dt > 0.0 {
            self.integral = (self.integral + self.gains.ki * error * dt).clamp(-limit, limit);
            if let Some(last) = self.last_input {
                derivative = -self.gains.kd * (input - last) / dt;
            }
        }
        self.last_input = Some(input);

        (proportional + self.integral + derivative).clamp(-limit, limit)
    }

    /// Clear the integral and derivative memory.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_input = None;
    }

    /// Current integral term.
    #[inline]
    pub fn integral(&self) -> f32 {
        self.integral
    }
}
