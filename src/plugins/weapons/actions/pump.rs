//! Pump action: fire -> eject (drag up) -> chamber (drag down) -> ready.
//!
//! A close cooldown absorbs incidental pointer jitter right after the pump
//! closes; the window is shorter for mid-drag re-opening so continuous
//! cycling stays fluid.

use super::super::gesture::{GestureDir, GestureEvent};
use super::super::ledger::AmmoLedger;
use super::super::messages::WeaponEventKind;
use super::{CycleState, FireDecision};

/// Seconds after closing before a released-and-re-pressed drag may re-open.
const CLOSE_COOLDOWN_RELEASE: f32 = 0.25;
/// Shorter window when the re-open arrives inside an active drag.
const CLOSE_COOLDOWN_MID_DRAG: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpState {
    Ready,
    NeedsEject,
    NeedsChamber,
}

#[derive(Clone, Debug)]
pub struct PumpAction {
    pub state: PumpState,
    time_since_close: f32,
}

impl PumpAction {
    pub fn new() -> Self {
        Self {
            state: PumpState::Ready,
            time_since_close: f32::MAX,
        }
    }

    pub fn snapshot(&self) -> CycleState {
        match self.state {
            PumpState::Ready => CycleState::Ready,
            PumpState::NeedsEject => CycleState::NeedsEject,
            PumpState::NeedsChamber => CycleState::NeedsChamber,
        }
    }

    pub fn required_gesture(&self) -> Option<GestureDir> {
        match self.state {
            PumpState::Ready => None,
            PumpState::NeedsEject => Some(GestureDir::Up),
            PumpState::NeedsChamber => Some(GestureDir::Down),
        }
    }

    pub fn request_fire(
        &mut self,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) -> FireDecision {
        if self.state != PumpState::Ready {
            return FireDecision::Blocked;
        }
        if !ledger.consume_current() {
            return FireDecision::Dry;
        }
        self.state = PumpState::NeedsEject;
        out.push(WeaponEventKind::ActionStateChanged(self.snapshot()));
        FireDecision::Shoot
    }

    pub fn on_gesture(
        &mut self,
        ev: GestureEvent,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) {
        match ev.dir {
            GestureDir::Up => {
                if self.state != PumpState::NeedsEject {
                    return;
                }
                let required = if ev.mid_drag {
                    CLOSE_COOLDOWN_MID_DRAG
                } else {
                    CLOSE_COOLDOWN_RELEASE
                };
                if self.time_since_close < required {
                    return;
                }
                self.state = PumpState::NeedsChamber;
                // A spent case is always pending here: NeedsEject is only
                // entered by firing.
                out.push(WeaponEventKind::CasingsEjected { count: 1 });
                out.push(WeaponEventKind::ActionStateChanged(self.snapshot()));
            }
            GestureDir::Down => {
                if ev.aux_held {
                    // Reload divert: insert one shell instead of closing.
                    // One gesture segment inserts at most one shell.
                    if matches!(self.state, PumpState::Ready | PumpState::NeedsChamber)
                        && ledger.insert()
                    {
                        out.push(WeaponEventKind::CartridgeInserted { chamber: None });
                    }
                    return;
                }
                if self.state != PumpState::NeedsChamber {
                    return;
                }
                self.state = PumpState::Ready;
                self.time_since_close = 0.0;
                out.push(WeaponEventKind::ActionStateChanged(self.snapshot()));
                if ledger.live_rounds() == 0 {
                    // Chambered on an empty tube: ready, but the next pull
                    // will click.
                    out.push(WeaponEventKind::DryFire);
                }
            }
            GestureDir::Left | GestureDir::Right => {}
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.time_since_close < f32::MAX {
            self.time_since_close += dt;
        }
    }
}
