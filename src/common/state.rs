//! App-level states.
//!
//! There is no menu or pause flow; the app boots straight into gameplay.
//! Spawn systems hang off `OnEnter(GameState::InGame)` and per-run entities
//! carry `DespawnOnExit(GameState::InGame)`, so an outer flow added later
//! can reset a run just by leaving and re-entering the state.

use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    InGame,
}
