//! Projectiles plugin tests — **deterministic**.
//!
//! These tests avoid relying on the full physics pipeline to generate
//! collisions. Instead, they **inject `CollisionStart` messages directly**
//! and then run the projectile collision system once. Spawning goes through
//! the same `SpawnBulletRequest` path the hit-resolution engine uses.
use avian2d::prelude::*;
use bevy::{ecs::message::Messages, prelude::*};

use crate::common::layers::Layer;
use crate::common::test_utils::run_system_once;
use crate::plugins::enemies::Health;

use super::{allocator, collision, commit, components, messages, pool};

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn write_spawn_request(world: &mut World, req: messages::SpawnBulletRequest) {
    if world
        .get_resource::<Messages<messages::SpawnBulletRequest>>()
        .is_none()
    {
        world.init_resource::<Messages<messages::SpawnBulletRequest>>();
    }
    world.write_message(req);
}

/// Convenience: write a CollisionStart message.
fn write_collision_start(
    world: &mut World,
    collider1: Entity,
    collider2: Entity,
    body1: Option<Entity>,
    body2: Option<Entity>,
) {
    if world.get_resource::<Messages<CollisionStart>>().is_none() {
        world.init_resource::<Messages<CollisionStart>>();
    }
    world.write_message(CollisionStart {
        collider1,
        collider2,
        body1,
        body2,
    });
}

fn spawn_request(pos: Vec2, vel: Vec2) -> messages::SpawnBulletRequest {
    messages::SpawnBulletRequest {
        pos,
        vel,
        damage: 2,
        penetration_budget: 1,
        range: 600.0,
        owner: None,
    }
}

fn active_bullet(world: &mut World, damage: i32, penetrations: u32, owner: Option<Entity>) -> Entity {
    world
        .spawn((
            components::PooledBullet,
            components::BulletState::Active,
            components::Bullet {
                damage,
                penetrations_left: penetrations,
                travel_left: 600.0,
                owner,
            },
            pool::active_bullet_layers(),
        ))
        .id()
}

fn wall(world: &mut World) -> Entity {
    world
        .spawn((CollisionLayers::new(Layer::World, [Layer::PlayerBullet]),))
        .id()
}

fn enemy(world: &mut World, hp: i32) -> Entity {
    world
        .spawn((
            CollisionLayers::new(Layer::Enemy, [Layer::PlayerBullet]),
            Health { hp },
        ))
        .id()
}

// --------------------------------------------------------------------------------------
// Pooling unit tests (pure ECS)
// --------------------------------------------------------------------------------------

#[test]
fn init_bullet_pool_spawns_capacity_bullets_inactive() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(8));

    run_system_once(&mut world, pool::init_bullet_pool);

    let pool_res = world.resource::<pool::BulletPool>();
    assert_eq!(pool_res.free.len(), 8);

    let count = world
        .query::<&components::PooledBullet>()
        .iter(&world)
        .count();
    assert_eq!(count, 8);

    // Inactive state: hidden + BulletState::Inactive + empty collision filters
    let mut q = world.query::<(
        &components::BulletState,
        &Visibility,
        &CollisionLayers,
        &CollisionEventsEnabled,
    )>();
    for (state, vis, layers, _events_enabled) in q.iter(&world) {
        assert_eq!(*state, components::BulletState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        assert!(layers.memberships.has_all(Layer::PlayerBullet));
        assert!(!layers.filters.has_all(Layer::World));
        assert!(!layers.filters.has_all(Layer::Enemy));
    }
}

#[test]
fn spawn_request_activates_bullet_from_pool() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(1));
    run_system_once(&mut world, pool::init_bullet_pool);

    let owner = world.spawn_empty().id();
    write_spawn_request(
        &mut world,
        messages::SpawnBulletRequest {
            pos: Vec2::new(10.0, 20.0),
            vel: Vec2::new(100.0, 0.0),
            damage: 3,
            penetration_budget: 2,
            range: 450.0,
            owner: Some(owner),
        },
    );
    run_system_once(&mut world, allocator::allocate_bullets_from_pool);

    assert!(world.resource::<pool::BulletPool>().free.is_empty());

    let mut q = world.query_filtered::<Entity, With<components::PooledBullet>>();
    let e = q.single(&world).unwrap();

    assert_eq!(
        world.get::<Transform>(e).unwrap().translation.truncate(),
        Vec2::new(10.0, 20.0)
    );
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(100.0, 0.0));
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Visible);
    assert_eq!(
        *world.get::<components::BulletState>(e).unwrap(),
        components::BulletState::Active
    );

    // Active bullets collide with World + Enemy
    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(layers.filters.has_all(Layer::World));
    assert!(layers.filters.has_all(Layer::Enemy));

    let bullet = world.get::<components::Bullet>(e).unwrap();
    assert_eq!(bullet.damage, 3);
    assert_eq!(bullet.penetrations_left, 2);
    assert_eq!(bullet.travel_left, 450.0);
    assert_eq!(bullet.owner, Some(owner));
}

#[test]
fn spawn_request_on_empty_pool_is_dropped() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(0));
    run_system_once(&mut world, pool::init_bullet_pool);

    write_spawn_request(&mut world, spawn_request(Vec2::ZERO, Vec2::X));
    // Must not panic; the request is simply dropped.
    run_system_once(&mut world, allocator::allocate_bullets_from_pool);

    let count = world
        .query::<&components::PooledBullet>()
        .iter(&world)
        .count();
    assert_eq!(count, 0);
}

#[test]
fn return_to_pool_commit_deactivates_and_recycles() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(1));
    run_system_once(&mut world, pool::init_bullet_pool);

    write_spawn_request(&mut world, spawn_request(Vec2::ZERO, Vec2::new(10.0, 0.0)));
    run_system_once(&mut world, allocator::allocate_bullets_from_pool);

    let mut q = world.query_filtered::<Entity, With<components::PooledBullet>>();
    let e = q.single(&world).unwrap();

    *world.get_mut::<components::BulletState>(e).unwrap() =
        components::BulletState::PendingReturn;

    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(
        *world.get::<components::BulletState>(e).unwrap(),
        components::BulletState::Inactive
    );
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);

    // Inactive bullets collide with nothing (filters empty)
    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(!layers.filters.has_all(Layer::World));
    assert!(!layers.filters.has_all(Layer::Enemy));

    assert_eq!(world.resource::<pool::BulletPool>().free.len(), 1);
}

// --------------------------------------------------------------------------------------
// Collision system tests (inject CollisionStart messages)
// --------------------------------------------------------------------------------------

#[test]
fn collision_wall_spends_penetration_and_bullet_survives() {
    let mut world = World::new();

    let bullet = active_bullet(&mut world, 1, 1, None);
    let w = wall(&mut world);

    write_collision_start(&mut world, bullet, w, Some(bullet), Some(w));
    run_system_once(&mut world, collision::process_bullet_collisions);

    // One credit spent, still flying.
    assert_eq!(
        world.get::<components::Bullet>(bullet).unwrap().penetrations_left,
        0
    );
    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::Active
    );
}

#[test]
fn collision_wall_with_no_budget_absorbs_bullet() {
    let mut world = World::new();

    let bullet = active_bullet(&mut world, 1, 0, None);
    let w = wall(&mut world);

    write_collision_start(&mut world, bullet, w, Some(bullet), Some(w));
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::PendingReturn
    );
}

#[test]
fn collision_enemy_applies_damage_and_absorbs_bullet() {
    let mut world = World::new();

    let bullet = active_bullet(&mut world, 3, 2, None);
    let e = enemy(&mut world, 10);

    write_collision_start(&mut world, bullet, e, Some(bullet), Some(e));
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(world.get::<Health>(e).unwrap().hp, 7);
    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::PendingReturn
    );
}

#[test]
fn collision_with_owner_is_skipped() {
    let mut world = World::new();

    let owner = enemy(&mut world, 10);
    let bullet = active_bullet(&mut world, 3, 2, Some(owner));

    write_collision_start(&mut world, bullet, owner, Some(bullet), Some(owner));
    run_system_once(&mut world, collision::process_bullet_collisions);

    // No damage, no absorption, no budget spent.
    assert_eq!(world.get::<Health>(owner).unwrap().hp, 10);
    let b = world.get::<components::Bullet>(bullet).unwrap();
    assert_eq!(b.penetrations_left, 2);
    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::Active
    );
}

#[test]
fn collision_between_two_bullets_is_ignored() {
    let mut world = World::new();

    let a = active_bullet(&mut world, 1, 1, None);
    let b = active_bullet(&mut world, 1, 1, None);

    write_collision_start(&mut world, a, b, Some(a), Some(b));
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(
        *world.get::<components::BulletState>(a).unwrap(),
        components::BulletState::Active
    );
    assert_eq!(
        *world.get::<components::BulletState>(b).unwrap(),
        components::BulletState::Active
    );
}

#[test]
fn inactive_bullet_ignores_collisions() {
    let mut world = World::new();

    let bullet = world
        .spawn((
            components::PooledBullet,
            components::BulletState::Inactive,
            components::Bullet::inactive(),
            pool::inactive_bullet_layers(),
        ))
        .id();
    let e = enemy(&mut world, 10);

    write_collision_start(&mut world, bullet, e, Some(bullet), Some(e));
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(world.get::<Health>(e).unwrap().hp, 10);
    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::Inactive
    );
}

#[test]
fn bullet_expires_when_range_is_spent() {
    let mut world = World::new();
    world.insert_resource(Time::<Fixed>::default());
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(std::time::Duration::from_secs_f32(1.0 / 64.0));

    let bullet = world
        .spawn((
            components::PooledBullet,
            components::BulletState::Active,
            components::Bullet {
                damage: 1,
                penetrations_left: 0,
                travel_left: 1.0,
                owner: None,
            },
            LinearVelocity(Vec2::new(640.0, 0.0)),
        ))
        .id();

    run_system_once(&mut world, collision::bullet_range);

    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::PendingReturn
    );
}
