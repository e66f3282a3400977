//! Bolt action: four sequential key edges (left, down, up, right) between
//! firing and readiness. Out-of-order edges are ignored: no regression, no
//! skip.

use super::super::gesture::GestureDir;
use super::super::ledger::AmmoLedger;
use super::super::messages::WeaponEventKind;
use super::{CycleState, FireDecision};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoltState {
    Ready,
    NeedsCycle,
    Unlocked,
    Extracted,
    Chambered,
}

#[derive(Clone, Debug)]
pub struct BoltAction {
    pub state: BoltState,
    /// Set on fire, cleared on extraction. Cycling with no prior shot must
    /// not eject a phantom casing.
    spent_case_pending: bool,
}

impl BoltAction {
    pub fn new() -> Self {
        Self {
            state: BoltState::Ready,
            spent_case_pending: false,
        }
    }

    pub fn snapshot(&self) -> CycleState {
        match self.state {
            BoltState::Ready => CycleState::Ready,
            BoltState::NeedsCycle => CycleState::NeedsCycle,
            BoltState::Unlocked => CycleState::Unlocked,
            BoltState::Extracted => CycleState::Extracted,
            BoltState::Chambered => CycleState::Chambered,
        }
    }

    pub fn request_fire(
        &mut self,
        ledger: &mut AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) -> FireDecision {
        if self.state != BoltState::Ready {
            return FireDecision::Blocked;
        }
        if !ledger.consume_current() {
            return FireDecision::Dry;
        }
        self.spent_case_pending = true;
        self.state = BoltState::NeedsCycle;
        out.push(WeaponEventKind::ActionStateChanged(self.snapshot()));
        FireDecision::Shoot
    }

    pub fn on_key_edge(
        &mut self,
        dir: GestureDir,
        ledger: &AmmoLedger,
        out: &mut Vec<WeaponEventKind>,
    ) {
        let next = match (self.state, dir) {
            // Opening from Ready is allowed (manual cycling without firing).
            (BoltState::NeedsCycle | BoltState::Ready, GestureDir::Left) => BoltState::Unlocked,
            (BoltState::Unlocked, GestureDir::Down) => {
                if self.spent_case_pending {
                    self.spent_case_pending = false;
                    out.push(WeaponEventKind::CasingsEjected { count: 1 });
                }
                BoltState::Extracted
            }
            (BoltState::Extracted, GestureDir::Up) => BoltState::Chambered,
            (BoltState::Chambered, GestureDir::Right) => {
                // Closing on an empty magazine chambers nothing.
                if ledger.live_rounds() > 0 {
                    BoltState::Ready
                } else {
                    BoltState::NeedsCycle
                }
            }
            _ => return,
        };
        if next != self.state {
            self.state = next;
            out.push(WeaponEventKind::ActionStateChanged(self.snapshot()));
        }
    }
}
