//! Lighting plugin (Firefly) (render-only).
//!
//! A steady light follows the player; a second light flashes on every
//! `Fired` event and decays with the weapon's loudness.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;
use crate::plugins::weapons::messages::{WeaponEvent, WeaponEventKind};

#[derive(Component)]
pub struct PlayerLight;

#[derive(Component)]
pub struct MuzzleFlashLight {
    intensity: f32,
}

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, (follow_player_lights, muzzle_flash));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("MuzzleFlashLight"),
        MuzzleFlashLight { intensity: 0.0 },
        PointLight2d {
            color: Color::srgb(1.0, 0.85, 0.5),
            radius: 0.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_lights(
    q_player: Query<&Transform, (With<Player>, Without<PointLight2d>)>,
    mut q_lights: Query<&mut Transform, (With<PointLight2d>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    for mut tf_light in &mut q_lights {
        tf_light.translation.x = tf_player.translation.x;
        tf_light.translation.y = tf_player.translation.y;
    }
}

fn muzzle_flash(
    time: Res<Time>,
    mut fired: MessageReader<WeaponEvent>,
    mut q: Query<(&mut MuzzleFlashLight, &mut PointLight2d)>,
) {
    let Ok((mut flash, mut light)) = q.single_mut() else {
        return;
    };

    for ev in fired.read() {
        if let WeaponEventKind::Fired { loudness, .. } = &ev.kind {
            flash.intensity = flash.intensity.max(*loudness);
        }
    }

    flash.intensity = (flash.intensity - 6.0 * time.delta_secs()).max(0.0);
    light.radius = 320.0 * flash.intensity;
}
