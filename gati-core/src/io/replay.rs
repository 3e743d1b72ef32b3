//! Offline replay of scripted scenarios through a controller.

use std::io::Write;

use crate::behavior::{Behavior, LineFollowing, ModeName, ObstacleAvoidance, Parking, ShapeDriving};
use crate::config::{ControllerConfig, GatiConfig};
use crate::controller::DriveController;
use crate::core::{DriveCommand, Frame};
use crate::error::Result;

use super::scenario::{BehaviorKind, Scenario};

/// One replayed tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRow {
    /// Tick index, starting at 0
    pub tick: usize,
    /// Scenario frame the tick was rendered from
    pub frame: usize,
    /// Mode after the tick
    pub mode: &'static str,
    /// Issued command
    pub command: DriveCommand,
}

/// Full output of a replay run.
#[derive(Clone, Debug)]
pub struct Trace {
    /// Behavior that produced the trace
    pub behavior: BehaviorKind,
    /// One row per tick
    pub rows: Vec<TraceRow>,
}

impl Trace {
    /// Mode names in tick order.
    pub fn modes(&self) -> Vec<&'static str> {
        self.rows.iter().map(|r| r.mode).collect()
    }

    /// Commands in tick order.
    pub fn commands(&self) -> Vec<DriveCommand> {
        self.rows.iter().map(|r| r.command).collect()
    }

    /// Write the trace as CSV with a header line.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "tick,frame,mode,speed,angle")?;
        for row in &self.rows {
            writeln!(
                out,
                "{},{},{},{:.6},{:.6}",
                row.tick, row.frame, row.mode, row.command.speed, row.command.angle
            )?;
        }
        Ok(())
    }
}

/// Run `scenario` through a fresh controller for `behavior`.
///
/// Line following and shape driving do not use the depth thresholds, so
/// they run with the generic controller defaults.
pub fn replay(scenario: &Scenario, config: &GatiConfig, behavior: BehaviorKind) -> Result<Trace> {
    tracing::info!(
        "Replaying '{}' ({} ticks) with {}",
        scenario.name,
        scenario.tick_count(),
        behavior.as_str()
    );

    let rows = match behavior {
        BehaviorKind::Avoidance => run(
            DriveController::new(config.avoidance.clone(), ObstacleAvoidance::new())?,
            scenario,
        ),
        BehaviorKind::WallParking => run(
            DriveController::new(config.wall_parking.clone(), Parking::wall())?,
            scenario,
        ),
        BehaviorKind::ConeParking => run(
            DriveController::new(config.cone_parking.clone(), Parking::cone())?,
            scenario,
        ),
        BehaviorKind::LineFollowing => run(
            DriveController::new(
                ControllerConfig::default(),
                LineFollowing::new(&config.line_following),
            )?,
            scenario,
        ),
        BehaviorKind::Shapes => run(
            DriveController::new(ControllerConfig::default(), ShapeDriving::new(&config.shapes))?,
            scenario,
        ),
    };

    Ok(Trace { behavior, rows })
}

fn run<B: Behavior>(mut controller: DriveController<B>, scenario: &Scenario) -> Vec<TraceRow> {
    let mut rows = Vec::with_capacity(scenario.tick_count());

    for (index, scripted) in scenario.frames.iter().enumerate() {
        let depth = scenario.build_depth_map(scripted);
        let dt = scenario.frame_dt(scripted);

        for repeat in 0..scripted.repeat {
            let mut input = scripted.input;
            if repeat > 0 {
                input.request = None;
            }
            let frame = Frame {
                depth: &depth,
                contour: scripted.contour,
                input,
                dt,
            };

            let command = controller.tick(&frame);
            rows.push(TraceRow {
                tick: rows.len(),
                frame: index,
                mode: controller.mode().as_str(),
                command,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
name: wall ahead
map: { width: 320, height: 240, base_depth: 500.0 }
dt: 0.1
frames:
  - repeat: 2
    input: { forward: 1.0 }
    patches:
      - { type: band, rows: [170, 240], depth: 30.0 }
  - repeat: 2
    input: { forward: 1.0 }
    patches:
      - { type: band, rows: [170, 240], depth: 30.0 }
      - { type: rect, rows: [70, 170], cols: [0, 320], depth: 40.0 }
"#;

    #[test]
    fn test_replay_avoidance() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let trace = replay(&scenario, &GatiConfig::default(), BehaviorKind::Avoidance).unwrap();

        assert_eq!(trace.rows.len(), 4);
        assert_eq!(
            trace.modes(),
            vec!["FORWARD", "FORWARD", "OBSTACLE_STOP", "OBSTACLE_STOP"]
        );
        assert_eq!(trace.rows[0].command, DriveCommand::new(1.0, 0.0));
        assert_eq!(trace.rows[3].frame, 1);
    }

    #[test]
    fn test_request_fires_once() {
        let yaml = r#"
name: circle
map: { width: 8, height: 8 }
frames:
  - repeat: 3
    input: { request: circle }
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        let trace = replay(&scenario, &GatiConfig::default(), BehaviorKind::Shapes).unwrap();

        assert_eq!(trace.modes(), vec!["CIRCLE"; 3]);
        assert!(trace.commands().iter().all(|c| *c == DriveCommand::new(1.0, 1.0)));
    }

    #[test]
    fn test_write_csv() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let trace = replay(&scenario, &GatiConfig::default(), BehaviorKind::Avoidance).unwrap();

        let mut out = Vec::new();
        trace.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "tick,frame,mode,speed,angle");
        assert_eq!(lines[1], "0,0,FORWARD,1.000000,0.000000");
    }

    #[test]
    fn test_bad_section_fails() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let mut config = GatiConfig::default();
        config.wall_parking.max_distance = 1.0;
        assert!(replay(&scenario, &config, BehaviorKind::WallParking).is_err());
    }
}
