//! Drive command issued once per tick.

use serde::{Deserialize, Serialize};

/// Normalized drive command.
///
/// - `speed`: -1.0 (full reverse) to 1.0 (full forward)
/// - `angle`: -1.0 (full left) to 1.0 (full right)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// Throttle, negative is reverse
    pub speed: f32,
    /// Steering, positive steers right
    pub angle: f32,
}

impl DriveCommand {
    /// Zero speed, wheels straight.
    pub const STOP: DriveCommand = DriveCommand {
        speed: 0.0,
        angle: 0.0,
    };

    /// Full speed ahead, wheels straight.
    pub const STRAIGHT: DriveCommand = DriveCommand {
        speed: 1.0,
        angle: 0.0,
    };

    /// Create a command, clamping both channels to [-1, 1].
    #[inline]
    pub fn new(speed: f32, angle: f32) -> Self {
        Self { speed, angle }.clamped()
    }

    /// Both channels clamped to [-1, 1]. Non-finite values collapse to 0.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            speed: clamp_unit(self.speed),
            angle: clamp_unit(self.angle),
        }
    }

    /// Same speed, different steering.
    #[inline]
    pub fn with_angle(self, angle: f32) -> Self {
        Self::new(self.speed, angle)
    }

    /// Check if the command keeps the vehicle still.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let cmd = DriveCommand::new(3.0, -7.5);
        assert_eq!(cmd.speed, 1.0);
        assert_eq!(cmd.angle, -1.0);
    }

    #[test]
    fn test_non_finite_collapses() {
        let cmd = DriveCommand::new(f32::NAN, f32::INFINITY);
        assert_eq!(cmd, DriveCommand::STOP);
    }
}
