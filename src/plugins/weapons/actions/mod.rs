//! Action-cycle state machines, one per weapon archetype.
//!
//! Tagged-variant dispatch: one enum of archetype kind, one enum of
//! sub-state per kind, advanced by plain functions. No trait objects.
//!
//! Transition discipline:
//! - every transition is edge-triggered by exactly one gesture or key edge;
//!   no transition fires twice for the same physical input edge.
//! - invalid input (wrong axis, out-of-order edge) is silently ignored —
//!   expected noise from continuous sampling, not an error.
//! - machines degrade toward the nearest safe state instead of getting
//!   stuck; genuine ammo exhaustion is terminal-until-reload, not an error.

mod bolt;
mod pump;
mod revolver;

pub use bolt::{BoltAction, BoltState};
pub use pump::{PumpAction, PumpState};
pub use revolver::{HammerState, RevolverAction};

use super::gesture::{GestureDir, GestureEvent};
use super::ledger::AmmoLedger;
use super::messages::WeaponEventKind;
use super::profile::{Archetype, WeaponProfile};

/// Unified cycle-state snapshot for events and read-only queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Ready,
    // Pump.
    NeedsEject,
    NeedsChamber,
    // Bolt.
    NeedsCycle,
    Unlocked,
    Extracted,
    Chambered,
    // Revolver: readiness tracks the cylinder.
    Cylinder(CylinderState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CylinderState {
    Closed,
    Open,
    Loading,
    Closing,
}

/// Outcome of a trigger pull, before dispersion is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireDecision {
    /// Round consumed; discharge now.
    Shoot,
    /// Discharge deferred behind a timer (revolver hammer draw).
    Deferred,
    /// No round to fire: emit the empty click.
    Dry,
    /// Wrong cycle state: silently refused (click only on a trigger edge).
    Blocked,
}

/// A discharge completed by a timer rather than the trigger edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredShot;

/// Semi/full-auto: `Ready` only, no manual cycling.
#[derive(Clone, Debug, Default)]
pub struct AutoAction;

impl AutoAction {
    fn request_fire(&mut self, ledger: &mut AmmoLedger) -> FireDecision {
        if ledger.consume_current() {
            FireDecision::Shoot
        } else {
            FireDecision::Dry
        }
    }
}

#[derive(Clone, Debug)]
pub enum ActionCycle {
    Auto(AutoAction),
    Pump(PumpAction),
    Bolt(BoltAction),
    Revolver(RevolverAction),
}

impl ActionCycle {
    pub fn for_profile(profile: &WeaponProfile) -> Self {
        match profile.archetype {
            Archetype::SemiAuto | Archetype::FullAuto => Self::Auto(AutoAction),
            Archetype::PumpAction => Self::Pump(PumpAction::new()),
            Archetype::BoltAction => Self::Bolt(BoltAction::new()),
            Archetype::Revolver => Self::Revolver(RevolverAction::new(profile.cock_delay)),
        }
    }

    pub fn snapshot(&self) -> CycleState {
        match self {
            Self::Auto(_) => CycleState::Ready,
            Self::Pump(p) => p.snapshot(),
            Self::Bolt(b) => b.snapshot(),
            Self::Revolver(r) => r.snapshot(),
        }
    }

    /// Hammer sub-state, for revolvers only.
    pub fn hammer(&self) -> Option<HammerState> {
        match self {
            Self::Revolver(r) => Some(r.hammer),
            _ => None,
        }
    }

    /// Would a trigger pull discharge (now or after the hammer delay)?
    pub fn can_fire(&self, ledger: &AmmoLedger) -> bool {
        match self {
            Self::Auto(_) => ledger.current_live(),
            Self::Pump(p) => p.state == PumpState::Ready && ledger.current_live(),
            Self::Bolt(b) => b.state == BoltState::Ready && ledger.current_live(),
            Self::Revolver(r) => r.can_fire(ledger),
        }
    }

    pub fn request_fire(
        &mut self,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) -> FireDecision {
        match self {
            Self::Auto(a) => a.request_fire(ledger),
            Self::Pump(p) => p.request_fire(ledger, out),
            Self::Bolt(b) => b.request_fire(ledger, out),
            Self::Revolver(r) => r.request_fire(ledger, out),
        }
    }

    pub fn on_gesture(
        &mut self,
        ev: GestureEvent,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) {
        match self {
            Self::Auto(_) | Self::Bolt(_) => {}
            Self::Pump(p) => p.on_gesture(ev, ledger, out),
            Self::Revolver(r) => r.on_gesture(ev, ledger, out),
        }
    }

    pub fn on_key_edge(
        &mut self,
        dir: GestureDir,
        ledger: &AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) {
        if let Self::Bolt(b) = self {
            b.on_key_edge(dir, ledger, out);
        }
    }

    pub fn on_wheel(&mut self, steps: i32, ledger: &mut AmmoLedger) {
        if let Self::Revolver(r) = self {
            r.on_wheel(steps, ledger);
        }
    }

    /// Manual pre-cock. Returns true when it completed (and the session
    /// should waive the fire-rate cooldown for the next discharge).
    pub fn on_precock(&mut self, ledger: &mut AmmoLedger, out: &mut Vec<WeaponEventKind>) -> bool {
        if let Self::Revolver(r) = self {
            r.on_precock(ledger, out)
        } else {
            false
        }
    }

    /// Advance timers. A `DeferredShot` means a delayed discharge completed
    /// this tick and its round is already consumed.
    pub fn tick(
        &mut self,
        dt: f32,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) -> Option<DeferredShot> {
        match self {
            Self::Auto(_) | Self::Bolt(_) => None,
            Self::Pump(p) => {
                p.tick(dt);
                None
            }
            Self::Revolver(r) => r.tick(dt, ledger, out),
        }
    }

    /// The drag direction the cycle currently requires, if any.
    /// Used by the edge re-center helper; archetypes without gesture cycling
    /// return `None` and the helper stays disabled for them.
    pub fn required_gesture(&self) -> Option<GestureDir> {
        match self {
            Self::Pump(p) => p.required_gesture(),
            _ => None,
        }
    }

    /// Mid-drag re-triggering is only useful for gesture-cycled archetypes.
    pub fn wants_retrigger(&self) -> bool {
        matches!(self, Self::Pump(_) | Self::Revolver(_))
    }
}

#[cfg(test)]
mod tests;
