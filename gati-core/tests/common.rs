//! Shared depth-map builders for integration tests.

#![allow(dead_code)]

use gati_core::{Behavior, DepthMap, DriveCommand, DriveController, DriveInput, Frame, ModeName};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// Far background with the floor visible under the bumper.
pub fn open_floor() -> DepthMap {
    let mut map = DepthMap::filled(WIDTH, HEIGHT, 500.0);
    map.fill_rect(170..HEIGHT, 0..WIDTH, 30.0);
    map
}

/// Open floor with a wall of `depth` across the center rows.
pub fn wall_at(depth: f32) -> DepthMap {
    let mut map = open_floor();
    map.fill_rect(70..170, 0..WIDTH, depth);
    map
}

/// Nothing within range anywhere, as seen over a drop.
pub fn void() -> DepthMap {
    DepthMap::filled(WIDTH, HEIGHT, 500.0)
}

/// Rising surface in the lower half, clear above.
pub fn ramp() -> DepthMap {
    let mut map = void();
    map.fill_rect(100..HEIGHT, 0..WIDTH, 40.0);
    map
}

/// Flat wall filling the whole view.
pub fn flat_wall(depth: f32) -> DepthMap {
    DepthMap::filled(WIDTH, HEIGHT, depth)
}

/// Run one tick per map and collect (mode, command) pairs.
pub fn drive<B: Behavior>(
    controller: &mut DriveController<B>,
    maps: &[DepthMap],
    input: DriveInput,
    dt: f32,
) -> Vec<(&'static str, DriveCommand)> {
    maps.iter()
        .map(|map| {
            let command = controller.tick(&Frame::new(map, dt).with_input(input));
            (controller.mode().as_str(), command)
        })
        .collect()
}

/// Mode names of a [`drive`] trace.
pub fn modes(trace: &[(&'static str, DriveCommand)]) -> Vec<&'static str> {
    trace.iter().map(|(mode, _)| *mode).collect()
}
