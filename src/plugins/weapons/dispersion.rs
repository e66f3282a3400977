//! Dispersion model: per-shot firing direction from base aim, accumulated
//! recoil, and configured spread.
//!
//! Invariants:
//! - `|recoil_offset| <= tuning.max_recoil` after every shot.
//! - With no further shots, repeated `tick` calls move `recoil_offset`
//!   monotonically toward 0 and reach exactly 0.
//! - `consecutive_shots` resets once the burst window elapses.

use bevy::prelude::*;
use rand::Rng;

/// Recoil/spread parameters, part of the weapon profile.
#[derive(Clone, Copy, Debug)]
pub struct DispersionTuning {
    /// Base half-angle of the spread cone (radians). 0 = perfectly accurate.
    pub spread: f32,
    /// Bound on the accumulated recoil offset (radians).
    pub max_recoil: f32,
    /// Scale of the signed random recoil contribution per shot (radians).
    pub recoil_per_shot: f32,
    /// Seconds after the last shot before recoil starts recovering.
    pub recovery_delay: f32,
    /// Recovery rate (radians/second).
    pub recovery_speed: f32,
    /// Consecutive shots before the burst ramp starts widening spread.
    pub burst_threshold: u32,
    /// Upper bound of the burst spread multiplier.
    pub burst_max_multiplier: f32,
    /// Shots over which the multiplier ramps linearly from 1 to max.
    pub burst_ramp_shots: u32,
    /// Seconds of silence after which the burst counter resets.
    pub burst_reset_window: f32,
}

#[derive(Clone, Debug)]
pub struct DispersionState {
    pub recoil_offset: f32,
    pub time_since_last_shot: f32,
    pub consecutive_shots: u32,
    pub time_since_burst_start: f32,
}

impl Default for DispersionState {
    fn default() -> Self {
        Self {
            recoil_offset: 0.0,
            time_since_last_shot: f32::MAX,
            consecutive_shots: 0,
            time_since_burst_start: 0.0,
        }
    }
}

impl DispersionState {
    /// Spread multiplier from the burst ramp: 1 until the threshold, then a
    /// linear ramp clamped to `[1, burst_max_multiplier]`.
    fn burst_multiplier(&self, t: &DispersionTuning) -> f32 {
        if self.consecutive_shots <= t.burst_threshold {
            return 1.0;
        }
        let extra = (self.consecutive_shots - t.burst_threshold) as f32;
        let ramp = t.burst_ramp_shots.max(1) as f32;
        let m = 1.0 + (t.burst_max_multiplier - 1.0) * (extra / ramp);
        m.clamp(1.0, t.burst_max_multiplier.max(1.0))
    }

    /// Compute the fired direction for one shot and accumulate recoil.
    ///
    /// `difficulty` is the externally-owned global recoil multiplier; the
    /// model only reads it.
    pub fn apply(
        &mut self,
        aim: Vec2,
        t: &DispersionTuning,
        difficulty: f32,
        rng: &mut impl Rng,
    ) -> Vec2 {
        // Existing recoil applies even for zero-spread weapons.
        let mut dir = Vec2::from_angle(self.recoil_offset).rotate(aim);

        if t.spread > 0.0 {
            let eff = t.spread * self.burst_multiplier(t) * difficulty.max(0.0);
            if eff > 0.0 {
                let a = rng.gen_range(-eff..=eff);
                dir = Vec2::from_angle(a).rotate(dir);
            }
        }

        // New recoil: signed contribution proportional to spread pressure.
        let kick = rng.gen_range(-1.0..=1.0_f32) * t.recoil_per_shot * difficulty.max(0.0);
        self.recoil_offset = (self.recoil_offset + kick).clamp(-t.max_recoil, t.max_recoil);

        if self.consecutive_shots == 0 {
            self.time_since_burst_start = 0.0;
        }
        self.consecutive_shots = self.consecutive_shots.saturating_add(1);
        self.time_since_last_shot = 0.0;

        dir
    }

    /// Per-tick recovery and burst-window bookkeeping.
    pub fn tick(&mut self, dt: f32, t: &DispersionTuning) {
        self.time_since_last_shot = (self.time_since_last_shot + dt).min(f32::MAX);
        self.time_since_burst_start += dt;

        if self.consecutive_shots > 0 && self.time_since_burst_start > t.burst_reset_window {
            self.consecutive_shots = 0;
        }

        if self.time_since_last_shot >= t.recovery_delay && self.recoil_offset != 0.0 {
            let step = t.recovery_speed * dt;
            if self.recoil_offset.abs() <= step {
                self.recoil_offset = 0.0;
            } else {
                self.recoil_offset -= self.recoil_offset.signum() * step;
            }
        }
    }
}

/// Angular offset for pellet `index` of `count`.
///
/// Pellets fan deterministically across the cone with a little jitter on
/// top, so a point-blank burst never collapses into one point.
pub fn pellet_offset(index: u32, count: u32, fan: f32, rng: &mut impl Rng) -> f32 {
    if count <= 1 || fan <= 0.0 {
        return 0.0;
    }
    let n = count as f32;
    let lane = ((index as f32 + 0.5) / n - 0.5) * 2.0 * fan;
    let jitter_span = fan / n;
    lane + rng.gen_range(-jitter_span..=jitter_span)
}
