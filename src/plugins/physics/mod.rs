//! avian2d setup for a top-down arena.
//!
//! No gravity: everything that moves is driven by velocity writes. All
//! gameplay lengths are in pixels, so the physics length unit is the
//! pixels-per-meter tunable.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;

    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm))
        .insert_resource(Gravity(Vec2::ZERO));
}
