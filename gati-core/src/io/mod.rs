//! Scenario files and offline replay.

mod replay;
mod scenario;

pub use replay::{Trace, TraceRow, replay};
pub use scenario::{BehaviorKind, MapLayout, Patch, Scenario, ScriptedFrame};
