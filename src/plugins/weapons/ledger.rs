//! Chamber/cylinder ammo ledger.
//!
//! Invariants:
//! - live rounds never exceed capacity.
//! - reserve is decremented exactly once per successful `insert`, never by
//!   `consume_current`.

/// Round storage: a simple count for tube/magazine weapons, per-chamber
/// occupancy plus a chamber pointer for revolvers.
#[derive(Clone, Debug)]
enum Store {
    Magazine { rounds: u32, capacity: u32 },
    Cylinder { chambers: Vec<bool>, index: usize },
}

#[derive(Clone, Debug)]
pub struct AmmoLedger {
    pub reserve: u32,
    store: Store,
}

impl AmmoLedger {
    pub fn magazine(capacity: u32, reserve: u32) -> Self {
        Self {
            reserve,
            store: Store::Magazine { rounds: capacity, capacity },
        }
    }

    pub fn cylinder(capacity: u32, reserve: u32) -> Self {
        Self {
            reserve,
            store: Store::Cylinder {
                chambers: vec![true; capacity as usize],
                index: 0,
            },
        }
    }

    pub fn capacity(&self) -> u32 {
        match &self.store {
            Store::Magazine { capacity, .. } => *capacity,
            Store::Cylinder { chambers, .. } => chambers.len() as u32,
        }
    }

    pub fn live_rounds(&self) -> u32 {
        match &self.store {
            Store::Magazine { rounds, .. } => *rounds,
            Store::Cylinder { chambers, .. } => {
                chambers.iter().filter(|c| **c).count() as u32
            }
        }
    }

    /// Is the round that would fire next actually live? For a magazine this
    /// is just "any rounds left"; for a cylinder it is the chamber under
    /// the hammer.
    pub fn current_live(&self) -> bool {
        match &self.store {
            Store::Magazine { rounds, .. } => *rounds > 0,
            Store::Cylinder { chambers, index } => chambers[*index],
        }
    }

    /// Mark the current round spent. Never touches reserve.
    pub fn consume_current(&mut self) -> bool {
        match &mut self.store {
            Store::Magazine { rounds, .. } => {
                if *rounds == 0 {
                    return false;
                }
                *rounds -= 1;
                true
            }
            Store::Cylinder { chambers, index } => {
                if !chambers[*index] {
                    return false;
                }
                chambers[*index] = false;
                true
            }
        }
    }

    /// Insert one round from reserve into the current slot.
    /// Fails when the slot is occupied or reserve is empty.
    pub fn insert(&mut self) -> bool {
        if self.reserve == 0 {
            return false;
        }
        let inserted = match &mut self.store {
            Store::Magazine { rounds, capacity } => {
                if *rounds >= *capacity {
                    false
                } else {
                    *rounds += 1;
                    true
                }
            }
            Store::Cylinder { chambers, index } => {
                if chambers[*index] {
                    false
                } else {
                    chambers[*index] = true;
                    true
                }
            }
        };
        if inserted {
            self.reserve -= 1;
        }
        inserted
    }

    /// Modular chamber advance. No-op for magazine storage.
    pub fn advance(&mut self, step: i32) -> usize {
        match &mut self.store {
            Store::Magazine { .. } => 0,
            Store::Cylinder { chambers, index } => {
                let n = chambers.len() as i32;
                *index = ((*index as i32 + step).rem_euclid(n)) as usize;
                *index
            }
        }
    }

    /// Current chamber pointer (0 for magazine storage).
    pub fn chamber_index(&self) -> usize {
        match &self.store {
            Store::Magazine { .. } => 0,
            Store::Cylinder { index, .. } => *index,
        }
    }

    /// Per-chamber occupancy snapshot for HUD-style queries. Magazine
    /// storage has no distinct chambers and reports `None`.
    pub fn occupancy(&self) -> Option<Vec<bool>> {
        match &self.store {
            Store::Magazine { .. } => None,
            Store::Cylinder { chambers, .. } => Some(chambers.clone()),
        }
    }

    /// Timed-reload completion: top the magazine up from reserve.
    /// Returns the number of rounds moved.
    pub fn refill_from_reserve(&mut self) -> u32 {
        match &mut self.store {
            Store::Magazine { rounds, capacity } => {
                let moved = (*capacity - *rounds).min(self.reserve);
                *rounds += moved;
                self.reserve -= moved;
                moved
            }
            Store::Cylinder { .. } => 0,
        }
    }
}
