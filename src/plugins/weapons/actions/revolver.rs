//! Revolver: hammer sub-state orthogonal to the cylinder open/closed
//! sub-state.
//!
//! A normal trigger pull draws the hammer over a short timer (the cylinder
//! indexes during the draw) and discharges when the timer elapses — after
//! re-validating readiness, since the cylinder may have been opened during
//! the delay. Manual pre-cock completes the draw instantly and waives the
//! fire-rate cooldown for the next discharge.

use super::super::gesture::{GestureDir, GestureEvent};
use super::super::ledger::AmmoLedger;
use super::super::messages::WeaponEventKind;
use super::{CycleState, CylinderState, DeferredShot, FireDecision};

/// Swing-shut animation time before the cylinder counts as closed.
const CLOSING_TIME: f32 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HammerState {
    Uncocked,
    AutoCocking { remaining: f32 },
    Cocked,
}

#[derive(Clone, Debug)]
pub struct RevolverAction {
    pub cylinder: CylinderState,
    pub hammer: HammerState,
    cock_delay: f32,
    /// Rounds fired since the last ejection; opening the cylinder ejects
    /// exactly this many casings.
    fired_since_eject: u32,
    /// One insert per chamber until an explicit rotate.
    inserted_since_rotate: bool,
    closing_remaining: f32,
}

impl RevolverAction {
    pub fn new(cock_delay: f32) -> Self {
        Self {
            cylinder: CylinderState::Closed,
            hammer: HammerState::Uncocked,
            cock_delay,
            fired_since_eject: 0,
            inserted_since_rotate: false,
            closing_remaining: 0.0,
        }
    }

    pub fn snapshot(&self) -> CycleState {
        CycleState::Cylinder(self.cylinder)
    }

    pub fn can_fire(&self, ledger: &AmmoLedger) -> bool {
        self.cylinder == CylinderState::Closed && ledger.live_rounds() > 0
    }

    fn discharge(&mut self, ledger: &mut AmmoLedger) -> bool {
        if ledger.consume_current() {
            self.fired_since_eject += 1;
            self.hammer = HammerState::Uncocked;
            true
        } else {
            // Hammer falls on an empty chamber.
            self.hammer = HammerState::Uncocked;
            false
        }
    }

    pub fn request_fire(
        &mut self,
        ledger: &mut AmmoLedger,
        _out: &mut Vec<WeaponEventKind>,
    ) -> FireDecision {
        if self.cylinder != CylinderState::Closed {
            return FireDecision::Blocked;
        }
        match self.hammer {
            HammerState::Cocked => {
                if self.discharge(ledger) {
                    FireDecision::Shoot
                } else {
                    FireDecision::Dry
                }
            }
            HammerState::Uncocked => {
                if ledger.live_rounds() == 0 {
                    return FireDecision::Dry;
                }
                self.hammer = HammerState::AutoCocking { remaining: self.cock_delay };
                FireDecision::Deferred
            }
            // Draw already in progress; this edge does nothing.
            HammerState::AutoCocking { .. } => FireDecision::Blocked,
        }
    }

    pub fn on_gesture(
        &mut self,
        ev: GestureEvent,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) {
        match ev.dir {
            GestureDir::Right => {
                if self.cylinder != CylinderState::Closed {
                    return;
                }
                // Opening cancels a pending hammer draw and drops a manual
                // cock; a cocked hammer over an open cylinder is unsafe.
                self.hammer = HammerState::Uncocked;
                self.cylinder = CylinderState::Open;
                self.inserted_since_rotate = false;
                if self.fired_since_eject > 0 {
                    out.push(WeaponEventKind::CasingsEjected { count: self.fired_since_eject });
                    self.fired_since_eject = 0;
                }
                out.push(WeaponEventKind::CylinderStateChanged(self.cylinder));
            }
            GestureDir::Down => {
                if !matches!(self.cylinder, CylinderState::Open | CylinderState::Loading) {
                    return;
                }
                if self.inserted_since_rotate {
                    return;
                }
                if ledger.insert() {
                    self.inserted_since_rotate = true;
                    let chamber = ledger.chamber_index();
                    if self.cylinder != CylinderState::Loading {
                        self.cylinder = CylinderState::Loading;
                        out.push(WeaponEventKind::CylinderStateChanged(self.cylinder));
                    }
                    out.push(WeaponEventKind::CartridgeInserted { chamber: Some(chamber) });
                }
            }
            GestureDir::Left => {
                if !matches!(self.cylinder, CylinderState::Open | CylinderState::Loading) {
                    return;
                }
                self.cylinder = CylinderState::Closing;
                self.closing_remaining = CLOSING_TIME;
                out.push(WeaponEventKind::CylinderStateChanged(self.cylinder));
            }
            GestureDir::Up => {}
        }
    }

    pub fn on_wheel(&mut self, steps: i32, ledger: &mut AmmoLedger) {
        if steps == 0 || self.hammer == HammerState::Cocked {
            return;
        }
        if !matches!(self.cylinder, CylinderState::Open | CylinderState::Loading) {
            return;
        }
        ledger.advance(steps.signum());
        self.inserted_since_rotate = false;
    }

    pub fn on_precock(&mut self, ledger: &mut AmmoLedger, out: &mut Vec<WeaponEventKind>) -> bool {
        if self.cylinder != CylinderState::Closed {
            return false;
        }
        if self.hammer != HammerState::Uncocked {
            return false;
        }
        ledger.advance(1);
        self.hammer = HammerState::Cocked;
        out.push(WeaponEventKind::HammerCocked);
        true
    }

    pub fn tick(
        &mut self,
        dt: f32,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) -> Option<DeferredShot> {
        if self.cylinder == CylinderState::Closing {
            self.closing_remaining -= dt;
            if self.closing_remaining <= 0.0 {
                self.cylinder = CylinderState::Closed;
                out.push(WeaponEventKind::CylinderStateChanged(self.cylinder));
            }
        }

        let HammerState::AutoCocking { remaining } = self.hammer else {
            return None;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.hammer = HammerState::AutoCocking { remaining };
            return None;
        }

        // Draw complete: index to the next chamber, then re-validate before
        // discharging — the world may have changed during the delay.
        ledger.advance(1);
        self.hammer = HammerState::Cocked;
        out.push(WeaponEventKind::HammerCocked);

        if self.cylinder != CylinderState::Closed {
            // Opened mid-delay: the pending shot is cancelled.
            self.hammer = HammerState::Uncocked;
            return None;
        }
        if self.discharge(ledger) {
            Some(DeferredShot)
        } else {
            out.push(WeaponEventKind::DryFire);
            None
        }
    }
}
