//! Immutable per-weapon configuration.
//!
//! A `WeaponProfile` is loaded once when a weapon is equipped and never
//! mutated by the core. The presets below are the project's stat table;
//! everything the action cycle, dispersion model, and hit resolution need
//! is read from here.

use super::dispersion::DispersionTuning;

/// How a fired shot resolves against the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Instantaneous multi-hit ray trace.
    Hitscan,
    /// Pooled kinetic projectile (spawn descriptor handed to the
    /// projectiles plugin).
    Projectile,
}

/// Which action-cycle state machine drives the weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    SemiAuto,
    FullAuto,
    PumpAction,
    BoltAction,
    Revolver,
}

/// Screen-shake parameters carried on `Fired` events for the camera
/// collaborator. The core never applies these itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeSpec {
    pub amplitude: f32,
    pub duration: f32,
}

#[derive(Clone, Debug)]
pub struct WeaponProfile {
    pub name: &'static str,
    pub archetype: Archetype,
    pub delivery: Delivery,

    /// Damage per bullet/pellet.
    pub damage: i32,
    /// Minimum seconds between shots.
    pub fire_interval: f32,
    /// Muzzle velocity (px/s) for kinetic delivery.
    pub bullet_speed: f32,
    /// Hitscan trace length (px).
    pub max_range: f32,
    /// Walls a shot may pass through before stopping.
    pub wall_penetrations: u32,

    /// Pellets per trigger pull (1 for everything but the shotgun).
    pub pellet_count: u32,
    /// Half-angle (radians) of the deterministic pellet fan.
    pub pellet_fan: f32,

    /// Magazine/tube/cylinder capacity.
    pub capacity: u32,
    /// Reserve rounds supplied with the weapon.
    pub reserve: u32,
    /// Timed magazine reload (auto/bolt archetypes only).
    pub reload_time: f32,

    /// Hammer cock-and-index delay (revolver only).
    pub cock_delay: f32,

    pub dispersion: DispersionTuning,

    pub loudness: f32,
    pub shake: ShakeSpec,
}

impl WeaponProfile {
    /// Semi-auto pistol. Kinetic delivery exercises the projectile pool.
    pub fn sidearm() -> Self {
        Self {
            name: "Sidearm",
            archetype: Archetype::SemiAuto,
            delivery: Delivery::Projectile,
            damage: 2,
            fire_interval: 0.18,
            bullet_speed: 900.0,
            max_range: 900.0,
            wall_penetrations: 0,
            pellet_count: 1,
            pellet_fan: 0.0,
            capacity: 12,
            reserve: 48,
            reload_time: 1.4,
            cock_delay: 0.0,
            dispersion: DispersionTuning {
                spread: 0.03,
                max_recoil: 0.12,
                recoil_per_shot: 0.02,
                recovery_delay: 0.25,
                recovery_speed: 0.6,
                burst_threshold: 3,
                burst_max_multiplier: 2.0,
                burst_ramp_shots: 6,
                burst_reset_window: 0.9,
            },
            loudness: 0.6,
            shake: ShakeSpec { amplitude: 2.0, duration: 0.08 },
        }
    }

    /// Full-auto machine pistol: trigger-held refire, fast burst ramp.
    pub fn machine_pistol() -> Self {
        Self {
            name: "MachinePistol",
            archetype: Archetype::FullAuto,
            delivery: Delivery::Projectile,
            damage: 1,
            fire_interval: 0.07,
            bullet_speed: 820.0,
            max_range: 700.0,
            wall_penetrations: 0,
            pellet_count: 1,
            pellet_fan: 0.0,
            capacity: 24,
            reserve: 96,
            reload_time: 1.8,
            cock_delay: 0.0,
            dispersion: DispersionTuning {
                spread: 0.05,
                max_recoil: 0.2,
                recoil_per_shot: 0.03,
                recovery_delay: 0.2,
                recovery_speed: 0.9,
                burst_threshold: 4,
                burst_max_multiplier: 3.0,
                burst_ramp_shots: 8,
                burst_reset_window: 0.7,
            },
            loudness: 0.7,
            shake: ShakeSpec { amplitude: 1.5, duration: 0.06 },
        }
    }

    /// Pump shotgun: hitscan pellets, gesture-cycled, shell-by-shell reload.
    pub fn pump_shotgun() -> Self {
        Self {
            name: "PumpShotgun",
            archetype: Archetype::PumpAction,
            delivery: Delivery::Hitscan,
            damage: 1,
            fire_interval: 0.25,
            bullet_speed: 0.0,
            max_range: 480.0,
            wall_penetrations: 0,
            pellet_count: 7,
            pellet_fan: 0.10,
            capacity: 6,
            reserve: 24,
            reload_time: 0.0,
            cock_delay: 0.0,
            dispersion: DispersionTuning {
                spread: 0.04,
                max_recoil: 0.25,
                recoil_per_shot: 0.08,
                recovery_delay: 0.3,
                recovery_speed: 0.8,
                burst_threshold: 1,
                burst_max_multiplier: 1.5,
                burst_ramp_shots: 3,
                burst_reset_window: 1.2,
            },
            loudness: 1.0,
            shake: ShakeSpec { amplitude: 6.0, duration: 0.15 },
        }
    }

    /// Bolt rifle: hitscan, wall penetration, key-edge bolt cycle.
    pub fn bolt_rifle() -> Self {
        Self {
            name: "BoltRifle",
            archetype: Archetype::BoltAction,
            delivery: Delivery::Hitscan,
            damage: 6,
            fire_interval: 0.4,
            bullet_speed: 0.0,
            max_range: 2200.0,
            wall_penetrations: 2,
            pellet_count: 1,
            pellet_fan: 0.0,
            capacity: 5,
            reserve: 20,
            reload_time: 2.6,
            cock_delay: 0.0,
            dispersion: DispersionTuning {
                spread: 0.0,
                max_recoil: 0.3,
                recoil_per_shot: 0.15,
                recovery_delay: 0.4,
                recovery_speed: 0.7,
                burst_threshold: 0,
                burst_max_multiplier: 1.0,
                burst_ramp_shots: 1,
                burst_reset_window: 1.5,
            },
            loudness: 1.0,
            shake: ShakeSpec { amplitude: 5.0, duration: 0.12 },
        }
    }

    /// Revolver: hitscan, hammer + cylinder state machine.
    pub fn revolver() -> Self {
        Self {
            name: "Revolver",
            archetype: Archetype::Revolver,
            delivery: Delivery::Hitscan,
            damage: 4,
            fire_interval: 0.5,
            bullet_speed: 0.0,
            max_range: 1100.0,
            wall_penetrations: 1,
            pellet_count: 1,
            pellet_fan: 0.0,
            capacity: 6,
            reserve: 18,
            reload_time: 0.0,
            cock_delay: 0.22,
            dispersion: DispersionTuning {
                spread: 0.015,
                max_recoil: 0.22,
                recoil_per_shot: 0.09,
                recovery_delay: 0.35,
                recovery_speed: 0.7,
                burst_threshold: 2,
                burst_max_multiplier: 1.8,
                burst_ramp_shots: 4,
                burst_reset_window: 1.0,
            },
            loudness: 0.9,
            shake: ShakeSpec { amplitude: 4.0, duration: 0.1 },
        }
    }

    #[inline]
    pub fn full_auto(&self) -> bool {
        self.archetype == Archetype::FullAuto
    }

    /// Archetypes whose reserve feeds a timed magazine swap rather than
    /// per-round insertion gestures.
    #[inline]
    pub fn magazine_reloads(&self) -> bool {
        matches!(
            self.archetype,
            Archetype::SemiAuto | Archetype::FullAuto | Archetype::BoltAction
        )
    }
}
