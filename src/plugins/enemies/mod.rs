//! Enemies plugin: static targets with Health and a short death state.
//!
//! The ECS world is treated like a normalized database:
//! - FACTS: `Health`, `EnemyLifeState` describe gameplay reality. Both the
//!   hitscan resolver and the bullet collision system write `Health`; nothing
//!   else does.
//! - RULES: this module reads those facts and transitions `EnemyLifeState`.
//! - PRESENTATION: sprite alpha/scale are derived from `EnemyLifeState`.
//!
//! We avoid despawning physics entities inside the fixed physics step.
//! Instead we mark `PendingDespawn` and despawn later in PostUpdate.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::time::Fixed;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::Layer;
use crate::common::state::GameState;

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Gameplay truth: remaining hit points.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: i32,
}

/// Enemy lifecycle state machine.
///
/// - Alive: normal gameplay.
/// - Dying: short transition animation.
/// - Dead: terminal marker to stop further transitions.
#[derive(Component, Debug, Clone)]
pub enum EnemyLifeState {
    Alive,
    Dying { timer: Timer },
    Dead,
}

/// Marker: enemy should be removed from the world.
///
/// Marked in the fixed step, despawned later in PostUpdate, so structural
/// changes stay centralized.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_targets);

    // Death trigger runs after bullet collision resolution so it sees
    // updated Health.
    app.add_systems(
        FixedPostUpdate,
        enemy_death_trigger
            .after(crate::plugins::projectiles::collision::process_bullet_collisions)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        enemy_death_progress
            .after(enemy_death_trigger)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_enemies.run_if(in_state(GameState::InGame)),
    );
}

/// Collision layers for an enemy that should no longer interact with
/// anything: keep membership, clear filters. No structural change.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

/// Spawn a few stationary targets. Asset-free: plain sprites and circles.
fn spawn_targets(mut commands: Commands) {
    let enemy_layers = CollisionLayers::new(
        Layer::Enemy,
        [Layer::World, Layer::Player, Layer::PlayerBullet],
    );

    let initial_hp: i32 = 5;

    for (i, x) in [-200.0, 0.0, 200.0].into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Target{i}")),
            Enemy,
            Health { hp: initial_hp },
            EnemyLifeState::Alive,
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(32.0)),
                ..default()
            },
            Transform::from_xyz(x, 120.0, 1.0),
            RigidBody::Static,
            Collider::circle(16.0),
            enemy_layers,
            Occluder2d::circle(16.0),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Transition Alive -> Dying when HP drops to 0.
///
/// Does not despawn; only transitions state and stops collision interaction.
fn enemy_death_trigger(
    mut q: Query<
        (&Health, &mut EnemyLifeState, &mut CollisionLayers),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (hp, mut life, mut layers) in &mut q {
        if !matches!(*life, EnemyLifeState::Alive) {
            continue;
        }

        if hp.hp <= 0 {
            *life = EnemyLifeState::Dying {
                timer: Timer::from_seconds(0.35, TimerMode::Once),
            };
            *layers = non_interacting_enemy_layers();
        }
    }
}

/// Animate Dying and mark PendingDespawn once finished.
fn enemy_death_progress(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut q: Query<
        (Entity, &mut EnemyLifeState, &mut Sprite, &mut Transform),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, mut life, mut sprite, mut tf) in &mut q {
        let EnemyLifeState::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);

        tf.scale = Vec3::splat(1.0 - t);
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if timer.is_finished() {
            *life = EnemyLifeState::Dead;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

/// Despawn enemies marked for removal.
fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
