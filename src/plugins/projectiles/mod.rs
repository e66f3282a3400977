//! Projectiles plugin: message-based producer -> consumer spawning +
//! data-driven pooling.
//!
//! The hit-resolution engine produces `SpawnBulletRequest` descriptors; the
//! allocator here is the **single writer** that mutates the pool. Walls
//! spend the bullet's penetration budget, actors absorb it, and the commit
//! system recycles spent bullets without structural changes (empty
//! collision filters stand in for "disabled").

pub mod components;
pub mod messages;
pub mod pool;

pub mod allocator;
pub mod collision;
pub mod commit;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

pub struct ProjectilesPlugin;

/// Maintain spawn request message buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnBulletRequest>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(pool::BulletPool::new(256))
            .add_systems(Startup, pool::init_bullet_pool);

        app.init_resource::<Messages<messages::SpawnBulletRequest>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        app.add_systems(
            Update,
            allocator::allocate_bullets_from_pool
                .after(crate::plugins::weapons::hitscan::resolve_shot_requests)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                collision::process_bullet_collisions.after(CollisionEventSystems),
                collision::bullet_range,
                commit::return_to_pool_commit.after(collision::process_bullet_collisions),
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}

#[cfg(test)]
mod tests;
