//! Buffered spawn descriptors.
//!
//! The hit-resolution engine produces *data*, not live objects: a
//! `SpawnBulletRequest` describes a kinetic projectile (position, velocity,
//! penetration budget, owner exclusion) and the allocator is the single
//! writer that turns it into an active pooled entity.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBulletRequest {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub penetration_budget: u32,
    /// Flight distance (px) before the round expires.
    pub range: f32,
    pub owner: Option<Entity>,
}
