//! Camera plugin (render-only).
//!
//! Follows the player and applies recoil shake. The weapon core never
//! touches the camera; it only publishes a `ShakeSpec` on every `Fired`
//! event, and this module is the single writer of the shake offset.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;
use crate::plugins::weapons::messages::{WeaponEvent, WeaponEventKind};

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

/// Decaying shake driven by `Fired` events.
#[derive(Resource, Debug, Default)]
struct CameraShake {
    remaining: f32,
    duration: f32,
    amplitude: f32,
    phase: f32,
    prev_offset: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(CameraShake::default())
        .add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { responsiveness: 5.0 },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    time: Res<Time>,
    mut shake: ResMut<CameraShake>,
    mut fired: MessageReader<WeaponEvent>,
    // Disjointness proof: Player entities are not MainCamera entities.
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok((mut tf_cam, main_cam)) = q_cam.single_mut() else {
        return;
    };

    let dt = time.delta_secs();

    // Remove last frame's shake offset first so it never drifts into the
    // follow target.
    tf_cam.translation.x -= shake.prev_offset.x;
    tf_cam.translation.y -= shake.prev_offset.y;
    shake.prev_offset = Vec2::ZERO;

    for ev in fired.read() {
        if let WeaponEventKind::Fired { shake: spec, .. } = &ev.kind {
            shake.remaining = shake.remaining.max(spec.duration);
            shake.duration = spec.duration.max(0.0001);
            shake.amplitude = shake.amplitude.max(spec.amplitude);
        }
    }

    let alpha = 1.0 - (-main_cam.responsiveness * dt).exp();
    tf_cam.translation.x += (tf_player.translation.x - tf_cam.translation.x) * alpha;
    tf_cam.translation.y += (tf_player.translation.y - tf_cam.translation.y) * alpha;

    if shake.remaining > 0.0 {
        shake.remaining = (shake.remaining - dt).max(0.0);
        shake.phase += dt;

        let falloff = (shake.remaining / shake.duration).clamp(0.0, 1.0);
        let amp = shake.amplitude * falloff;
        let x = (shake.phase * 37.0 * std::f32::consts::TAU).sin();
        let y = (shake.phase * 41.0 * std::f32::consts::TAU).cos();
        let offset = Vec2::new(x, y) * amp;

        tf_cam.translation.x += offset.x;
        tf_cam.translation.y += offset.y;
        shake.prev_offset = offset;

        if shake.remaining == 0.0 {
            shake.amplitude = 0.0;
        }
    }
}
