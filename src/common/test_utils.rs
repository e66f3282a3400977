//! Test helpers.
//!
//! Most unit tests here run a single system against a hand-built `World`
//! instead of constructing an `App`. `World::run_system_once` (the
//! `RunSystemOnce` trait) does that, but systems using `Commands` only
//! enqueue structural changes, so we flush the world afterwards to make
//! them visible to assertions.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}
