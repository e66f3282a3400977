use bevy::prelude::*;

/// Marker: this entity belongs to the bullet pool for its whole lifetime.
#[derive(Component)]
pub struct PooledBullet;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Live bullet payload, reset on every activation from a spawn descriptor.
#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub damage: i32,
    /// Walls this bullet may still pass through.
    pub penetrations_left: u32,
    /// Remaining flight distance (px) before the bullet expires.
    pub travel_left: f32,
    /// Firing owner; collisions with it are skipped.
    pub owner: Option<Entity>,
}

impl Bullet {
    #[inline]
    pub fn reset_for_fire(
        &mut self,
        damage: i32,
        penetrations: u32,
        range: f32,
        owner: Option<Entity>,
    ) {
        self.damage = damage;
        self.penetrations_left = penetrations;
        self.travel_left = range;
        self.owner = owner;
    }

    pub fn inactive() -> Self {
        Self {
            damage: 0,
            penetrations_left: 0,
            travel_left: 0.0,
            owner: None,
        }
    }
}
