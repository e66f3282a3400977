//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    /// Minimum pointer travel (px) before a drag qualifies as a gesture.
    pub min_drag_px: f32,
    /// Distance from a window edge (px) inside which a required drag
    /// direction is considered physically impossible.
    pub edge_margin_px: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 420.0,
            min_drag_px: 32.0,
            edge_margin_px: 12.0,
        }
    }
}
