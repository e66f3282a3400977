//! Domain events and buffered shot requests.
//!
//! Producers create *intent*; consumers apply it. External collaborators
//! (audio, camera shake, HUD, tracers) subscribe to `WeaponEvent` and supply
//! no logic the core depends on.

use bevy::prelude::*;

use super::actions::{CycleState, CylinderState};
use super::profile::{Delivery, ShakeSpec};

/// Everything the core tells the outside world.
#[derive(Message, Debug, Clone)]
pub struct WeaponEvent {
    pub shooter: Entity,
    pub kind: WeaponEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeaponEventKind {
    Fired {
        direction: Vec2,
        pellets: u32,
        loudness: f32,
        shake: ShakeSpec,
    },
    /// Trigger pulled with nothing to fire: wrong cycle state or no ammo.
    DryFire,
    ActionStateChanged(CycleState),
    ReloadStateChanged { reloading: bool },
    CartridgeInserted { chamber: Option<usize> },
    CasingsEjected { count: u32 },
    HammerCocked,
    CylinderStateChanged(CylinderState),
    SecondaryFired { direction: Vec2 },
    /// Hitscan terminal point, for cosmetic tracer rendering only.
    HitscanResolved {
        end_point: Vec2,
        walls_penetrated: u32,
        victims: u32,
    },
}

/// A resolved trigger pull, queued for the hit-resolution system.
/// One direction per pellet.
#[derive(Message, Debug, Clone)]
pub struct ShotRequest {
    pub shooter: Entity,
    pub origin: Vec2,
    pub dirs: Vec<Vec2>,
    pub damage: i32,
    pub speed: f32,
    pub max_range: f32,
    pub wall_penetrations: u32,
    pub delivery: Delivery,
}
