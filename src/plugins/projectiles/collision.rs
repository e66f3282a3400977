use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::enemies::Health;

use super::components::{Bullet, BulletState, PooledBullet};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget { collider: ev.collider1, body: ev.body1 },
        CollisionTarget { collider: ev.collider2, body: ev.body2 },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// Resolve bullet collisions.
///
/// - WORLD: spend one penetration credit; the bullet ends when none remain.
/// - ENEMY: apply damage once and end the bullet.
/// - owner: skipped entirely, costs nothing.
pub fn process_bullet_collisions(
    mut started: MessageReader<CollisionStart>,
    q_is_bullet: Query<(), With<PooledBullet>>,
    mut q_bullets: Query<(&mut Bullet, &mut BulletState), With<PooledBullet>>,
    q_layers: Query<&CollisionLayers>,
    mut q_health: Query<&mut Health>,
    // Per-frame dedupe.
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        // Identify the bullet side without get_mut probing.
        let b1 = q_is_bullet.contains(t1.collider);
        let b2 = q_is_bullet.contains(t2.collider);
        if !(b1 ^ b2) {
            continue; // must be exactly one bullet
        }
        let (bullet_side, other_side) = if b1 { (t1, t2) } else { (t2, t1) };

        // Deduplicate per bullet collider.
        if !seen.insert(bullet_side.collider) {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };

        let Ok((mut bullet, mut state)) = q_bullets.get_mut(bullet_side.collider) else {
            continue;
        };

        if *state != BulletState::Active {
            continue;
        }

        let other_entity = other_side.gameplay_owner();
        if bullet.owner == Some(other_entity) {
            continue;
        }

        // WORLD: penetration budget.
        if is_in_layer(other_layers, Layer::World) {
            if bullet.penetrations_left == 0 {
                *state = BulletState::PendingReturn;
            } else {
                bullet.penetrations_left -= 1;
            }
            continue;
        }

        // ENEMY: damage and absorb.
        if is_in_layer(other_layers, Layer::Enemy) {
            if let Ok(mut hp) = q_health.get_mut(other_entity) {
                hp.hp -= bullet.damage;
            }
            *state = BulletState::PendingReturn;
            continue;
        }
    }
}

/// Expire bullets that have flown their full range.
pub fn bullet_range(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Bullet, &mut BulletState, &LinearVelocity), With<PooledBullet>>,
) {
    let dt = time.delta_secs();
    for (mut bullet, mut state, vel) in &mut q {
        if *state != BulletState::Active {
            continue;
        }
        bullet.travel_left -= vel.0.length() * dt;
        if bullet.travel_left <= 0.0 {
            *state = BulletState::PendingReturn;
        }
    }
}
