//! Core plugin: shared resources and global settings.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::tunables::Tunables;

/// Global multiplier applied to every recoil kick. `1.0` is baseline;
/// assistive settings lower it, harder settings raise it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RecoilDifficulty(pub f32);

impl Default for RecoilDifficulty {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Seeded RNG for all weapon randomness (spread draws, recoil kicks).
/// One resource so replays with the same seed produce the same shots.
#[derive(Resource)]
pub struct WeaponRng(pub StdRng);

impl Default for WeaponRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(0x5eed))
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
    app.init_resource::<RecoilDifficulty>();
    app.init_resource::<WeaponRng>();
}
