//! Weapon session controller: per-tick orchestration of the dispersion
//! model, gesture recognizer, action cycle, and ammo ledger.
//!
//! `WeaponSession::drive` is pure (no ECS access) so the whole per-tick
//! contract is testable by constructing a `WeaponInput` by hand; the
//! `drive_weapon_sessions` system is the thin adapter that feeds it from
//! resources and fans the results out as messages.

use bevy::prelude::*;
use rand::Rng;

use crate::plugins::core::{RecoilDifficulty, WeaponRng};

use super::actions::{ActionCycle, CycleState, FireDecision, HammerState};
use super::dispersion::{pellet_offset, DispersionState};
use super::gesture::{direction_blocked_by_edge, GestureRecognizer};
use super::ledger::AmmoLedger;
use super::messages::{ShotRequest, WeaponEvent, WeaponEventKind};
use super::profile::{Archetype, WeaponProfile};
use super::{Aim, WeaponInput};

/// Seconds between secondary (grenade) triggers.
const SECONDARY_COOLDOWN: f32 = 1.5;

/// Directions for one discharge, one entry per pellet.
#[derive(Clone, Debug, Default)]
pub struct ShotPlan {
    pub dirs: Vec<Vec2>,
}

#[derive(Component)]
pub struct WeaponSession {
    pub profile: WeaponProfile,
    pub dispersion: DispersionState,
    pub gesture: GestureRecognizer,
    pub action: ActionCycle,
    pub ledger: AmmoLedger,
    cooldown: f32,
    reload_remaining: Option<f32>,
    secondary_cooldown: f32,
    pending_recenter: Option<Vec2>,
}

impl WeaponSession {
    pub fn new(profile: WeaponProfile, min_drag_px: f32) -> Self {
        let ledger = match profile.archetype {
            Archetype::Revolver => AmmoLedger::cylinder(profile.capacity, profile.reserve),
            _ => AmmoLedger::magazine(profile.capacity, profile.reserve),
        };
        Self {
            action: ActionCycle::for_profile(&profile),
            ledger,
            dispersion: DispersionState::default(),
            gesture: GestureRecognizer::new(min_drag_px),
            profile,
            cooldown: 0.0,
            reload_remaining: None,
            secondary_cooldown: 0.0,
            pending_recenter: None,
        }
    }

    // ------------------------------------------------------------------
    // Read-only queries for HUD-style collaborators.
    // ------------------------------------------------------------------

    pub fn cycle_state(&self) -> CycleState {
        self.action.snapshot()
    }

    pub fn hammer(&self) -> Option<HammerState> {
        self.action.hammer()
    }

    pub fn ammo(&self) -> u32 {
        self.ledger.live_rounds()
    }

    pub fn reserve(&self) -> u32 {
        self.ledger.reserve
    }

    pub fn occupancy(&self) -> Option<Vec<bool>> {
        self.ledger.occupancy()
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown <= 0.0 && self.reload_remaining.is_none() && self.action.can_fire(&self.ledger)
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Side-effecting query: where the windowing layer should warp the
    /// pointer so a blocked gesture becomes possible. Clears on read.
    pub fn take_pointer_recenter(&mut self) -> Option<Vec2> {
        self.pending_recenter.take()
    }

    // ------------------------------------------------------------------
    // Per-tick drive.
    // ------------------------------------------------------------------

    fn plan_shot(&mut self, aim_dir: Vec2, difficulty: f32, rng: &mut impl Rng) -> ShotPlan {
        let base = self
            .dispersion
            .apply(aim_dir, &self.profile.dispersion, difficulty, rng);
        let count = self.profile.pellet_count.max(1);
        let dirs = (0..count)
            .map(|i| {
                let a = pellet_offset(i, count, self.profile.pellet_fan, rng);
                Vec2::from_angle(a).rotate(base)
            })
            .collect();
        self.cooldown = self.profile.fire_interval;
        ShotPlan { dirs }
    }

    fn try_start_reload(&mut self, out: &mut Vec<WeaponEventKind>) {
        if !self.profile.magazine_reloads() || self.reload_remaining.is_some() {
            return;
        }
        if !matches!(self.cycle_state(), CycleState::Ready | CycleState::NeedsCycle) {
            return;
        }
        if self.ledger.reserve == 0 || self.ledger.live_rounds() >= self.ledger.capacity() {
            return;
        }
        self.reload_remaining = Some(self.profile.reload_time);
        out.push(WeaponEventKind::ReloadStateChanged { reloading: true });
    }

    /// Advance one tick. Returns emitted events and an optional discharge.
    pub fn drive(
        &mut self,
        dt: f32,
        input: &WeaponInput,
        aim_dir: Vec2,
        difficulty: f32,
        rng: &mut impl Rng,
    ) -> (Vec<WeaponEventKind>, Option<ShotPlan>) {
        let mut out = Vec::new();
        let mut plan: Option<ShotPlan> = None;

        // Timers first: a delayed effect completing this tick must not see
        // this tick's input edges.
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.secondary_cooldown = (self.secondary_cooldown - dt).max(0.0);
        self.dispersion.tick(dt, &self.profile.dispersion);

        if let Some(remaining) = &mut self.reload_remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.reload_remaining = None;
                self.ledger.refill_from_reserve();
                out.push(WeaponEventKind::ReloadStateChanged { reloading: false });
            }
        }

        if self.action.tick(dt, &mut self.ledger, &mut out).is_some() {
            // Revolver hammer fell: the round is already consumed.
            plan = Some(self.plan_shot(aim_dir, difficulty, rng));
        }

        // Gesture input.
        if let Some(ev) = self.gesture.sample(
            input.pointer_down,
            input.pointer_pos,
            input.aux_polled,
            input.aux_edge,
            self.action.wants_retrigger(),
        ) {
            self.action.on_gesture(ev, &mut self.ledger, &mut out);
        }

        // Edge re-center: only when the cycle demands a direction the
        // pointer physically cannot travel.
        if input.pointer_down
            && self.pending_recenter.is_none()
            && let Some(required) = self.action.required_gesture()
            && direction_blocked_by_edge(
                input.pointer_pos,
                required,
                input.window_size,
                input.edge_margin,
            )
        {
            let neutral = input.window_size * 0.5;
            self.gesture.recenter(neutral);
            self.pending_recenter = Some(neutral);
        }

        // Discrete edges.
        for dir in &input.key_edges {
            self.action.on_key_edge(*dir, &self.ledger, &mut out);
        }
        if input.wheel_steps != 0 {
            self.action.on_wheel(input.wheel_steps, &mut self.ledger);
        }
        if input.precock_edge && self.action.on_precock(&mut self.ledger, &mut out) {
            // Pre-cock waives the normal fire-rate cooldown.
            self.cooldown = 0.0;
        }
        if input.reload_edge {
            self.try_start_reload(&mut out);
        }

        // Trigger.
        let fire_requested =
            input.trigger_edge || (input.trigger_held && self.profile.full_auto());
        if fire_requested && self.cooldown <= 0.0 && self.reload_remaining.is_none() {
            match self.action.request_fire(&mut self.ledger, &mut out) {
                FireDecision::Shoot => {
                    let shot = self.plan_shot(aim_dir, difficulty, rng);
                    match &mut plan {
                        Some(p) => p.dirs.extend(shot.dirs),
                        None => plan = Some(shot),
                    }
                }
                FireDecision::Deferred => {}
                FireDecision::Dry | FireDecision::Blocked => {
                    if input.trigger_edge {
                        out.push(WeaponEventKind::DryFire);
                    }
                }
            }
        }

        // Secondary fire: event-only; an external collaborator owns the
        // grenade itself.
        if input.secondary_edge && self.secondary_cooldown <= 0.0 {
            self.secondary_cooldown = SECONDARY_COOLDOWN;
            out.push(WeaponEventKind::SecondaryFired { direction: aim_dir });
        }

        if let Some(p) = &plan {
            if let Some(first) = p.dirs.first() {
                out.push(WeaponEventKind::Fired {
                    direction: *first,
                    pellets: p.dirs.len() as u32,
                    loudness: self.profile.loudness,
                    shake: self.profile.shake,
                });
            }
        }

        (out, plan)
    }
}

/// Adapter system: feed sessions from resources, fan results out as
/// messages.
pub fn drive_weapon_sessions(
    time: Res<Time>,
    input: Res<WeaponInput>,
    aim: Res<Aim>,
    difficulty: Res<RecoilDifficulty>,
    mut rng: ResMut<WeaponRng>,
    mut q: Query<(Entity, &Transform, &mut WeaponSession)>,
    mut events: MessageWriter<WeaponEvent>,
    mut shots: MessageWriter<ShotRequest>,
) {
    let dt = time.delta_secs();

    for (shooter, tf, mut session) in &mut q {
        let origin = tf.translation.truncate();
        let aim_dir = match aim.world_cursor {
            Some(cursor) if (cursor - origin).length_squared() > 1e-4 => {
                (cursor - origin).normalize()
            }
            _ => Vec2::Y,
        };

        let (kinds, plan) = session.drive(dt, &input, aim_dir, difficulty.0, &mut rng.0);

        for kind in kinds {
            events.write(WeaponEvent { shooter, kind });
        }

        if let Some(plan) = plan {
            shots.write(ShotRequest {
                shooter,
                origin: origin + aim_dir * 18.0,
                dirs: plan.dirs,
                damage: session.profile.damage,
                speed: session.profile.bullet_speed,
                max_range: session.profile.max_range,
                wall_penetrations: session.profile.wall_penetrations,
                delivery: session.profile.delivery,
            });
        }
    }
}
