//! Per-frame drive controller.
//!
//! Wraps one [`Behavior`] with the state every behavior shares and runs
//! the tick sequence:
//!
//! 1. Sanitize dt (negative or non-finite counts as zero)
//! 2. While the override timer runs, repeat the previous command
//! 3. Otherwise let the behavior evaluate its mode
//! 4. Apply any operator request on top of that decision
//! 5. Clamp, remember and return the command

use crate::behavior::{Behavior, ModeName, StepContext};
use crate::config::ControllerConfig;
use crate::control::OverrideTimer;
use crate::core::{DriveCommand, Frame};
use crate::error::Result;
use crate::sensing::MomentumTracker;

/// Drive controller for a single behavior.
///
/// Owns all controller state; two controllers never share anything.
#[derive(Clone, Debug)]
pub struct DriveController<B: Behavior> {
    config: ControllerConfig,
    behavior: B,
    timer: OverrideTimer,
    momentum: MomentumTracker,
    last: DriveCommand,
    ticks: u64,
}

impl<B: Behavior> DriveController<B> {
    /// Create a controller. Fails when the configuration is unusable.
    pub fn new(config: ControllerConfig, behavior: B) -> Result<Self> {
        config.validate()?;
        let momentum = MomentumTracker::new(config.momentum_window_size);
        tracing::debug!(
            "{} controller ready in {}",
            behavior.name(),
            behavior.mode().as_str()
        );
        Ok(Self {
            config,
            behavior,
            timer: OverrideTimer::default(),
            momentum,
            last: DriveCommand::STOP,
            ticks: 0,
        })
    }

    /// Evaluate one frame and return the command to actuate.
    pub fn tick(&mut self, frame: &Frame<'_>) -> DriveCommand {
        self.ticks += 1;
        let dt = sanitize_dt(frame.dt);
        let before = self.behavior.mode();

        let mut ctx = StepContext {
            frame,
            config: &self.config,
            momentum: &mut self.momentum,
            previous: self.last,
            dt,
        };

        let mut command = if self.timer.tick(dt) {
            tracing::trace!("Override holding, {:.2}s left", self.timer.remaining());
            self.last
        } else {
            let step = self.behavior.step(&mut ctx);
            if let Some(secs) = step.hold_for {
                self.timer.arm(secs);
            }
            step.command
        };

        if let Some(request) = frame.input.request
            && let Some(overridden) = self.behavior.handle_request(request, command, &mut ctx)
        {
            tracing::info!("Operator request {:?} honored", request);
            self.timer.cancel();
            command = overridden;
        }

        let after = self.behavior.mode();
        if after != before {
            tracing::debug!(
                "{}: {} -> {} (tick {})",
                self.behavior.name(),
                before.as_str(),
                after.as_str(),
                self.ticks
            );
        }

        let command = command.clamped();
        if frame.input.report {
            tracing::info!(
                "{} speed={:.3} angle={:.3}",
                after.as_str(),
                command.speed,
                command.angle
            );
        }

        self.last = command;
        command
    }

    /// Currently active mode.
    pub fn mode(&self) -> B::Mode {
        self.behavior.mode()
    }

    /// Command issued on the last tick.
    pub fn last_command(&self) -> DriveCommand {
        self.last
    }

    /// Seconds left on the override timer.
    pub fn override_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The wrapped behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Momentum window.
    pub fn momentum(&self) -> &MomentumTracker {
        &self.momentum
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        tracing::warn!("Ignoring invalid frame dt {}", dt);
        0.0
    }
}
