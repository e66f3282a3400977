//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input devices, write `PlayerInput` + `WeaponInput` + `Aim`
//! - FixedUpdate: apply velocity to the kinematic rigid body
//!
//! The weapon core never touches input devices; this module is the single
//! writer of `WeaponInput`. Both the polled aux state and its press edge are
//! forwarded so the gesture recognizer can reconcile backends that disagree
//! for a tick.

use avian2d::prelude::*;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::window::PrimaryWindow;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::camera::MainCamera;
use crate::plugins::weapons::gesture::GestureDir;
use crate::plugins::weapons::profile::WeaponProfile;
use crate::plugins::weapons::session::WeaponSession;
use crate::plugins::weapons::{Aim, WeaponInput};

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            Update,
            (
                gather_move_input,
                gather_weapon_input,
                update_aim,
                switch_weapon,
            )
                .before(crate::plugins::weapons::session::drive_weapon_sessions)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            apply_pointer_recenter
                .after(crate::plugins::weapons::session::drive_weapon_sessions)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(FixedUpdate, apply_movement);
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy]);

    commands.spawn((
        Name::new("Player"),
        Player,
        WeaponSession::new(WeaponProfile::sidearm(), tunables.min_drag_px),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(26.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -120.0, 1.0),
        RigidBody::Kinematic,
        Collider::circle(13.0),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_move_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

/// Sample every device the weapon core cares about into `WeaponInput`.
///
/// Bindings:
/// - LMB: trigger; RMB: manual-action drag pointer
/// - Shift: aux (load modifier) — polled AND edge, both forwarded
/// - Arrow keys: bolt handle; wheel: cylinder rotate
/// - F: pre-cock, R: reload, G: secondary
fn gather_weapon_input(
    tunables: Res<Tunables>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut input: ResMut<WeaponInput>,
) {
    input.trigger_edge = buttons.just_pressed(MouseButton::Left);
    input.trigger_held = buttons.pressed(MouseButton::Left);
    input.pointer_down = buttons.pressed(MouseButton::Right);

    input.aux_polled = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    input.aux_edge =
        keys.just_pressed(KeyCode::ShiftLeft) || keys.just_pressed(KeyCode::ShiftRight);

    input.key_edges.clear();
    for (key, dir) in [
        (KeyCode::ArrowUp, GestureDir::Up),
        (KeyCode::ArrowDown, GestureDir::Down),
        (KeyCode::ArrowLeft, GestureDir::Left),
        (KeyCode::ArrowRight, GestureDir::Right),
    ] {
        if keys.just_pressed(key) {
            input.key_edges.push(dir);
        }
    }

    input.wheel_steps = wheel.read().map(|ev| ev.y.signum() as i32).sum();

    input.precock_edge = keys.just_pressed(KeyCode::KeyF);
    input.reload_edge = keys.just_pressed(KeyCode::KeyR);
    input.secondary_edge = keys.just_pressed(KeyCode::KeyG);

    input.edge_margin = tunables.edge_margin_px;

    if let Ok(window) = q_window.single() {
        input.window_size = window.size();
        if let Some(pos) = window.cursor_position() {
            input.pointer_pos = pos;
        }
    }
}

/// Resolve the cursor into world space through the main camera.
fn update_aim(
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut aim: ResMut<Aim>,
) {
    aim.world_cursor = None;

    let Ok(window) = q_window.single() else {
        debug!("No single Window");
        return;
    };
    let Ok((camera, cam_tf)) = q_cam.single() else {
        debug!("No single MainCamera");
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    match camera.viewport_to_world_2d(cam_tf, cursor) {
        Ok(world_cursor) => aim.world_cursor = Some(world_cursor),
        Err(e) => debug!("viewport_to_world_2d failed: {e:?}"),
    }
}

/// Swap the whole session on a number key. A fresh session means a fresh
/// action cycle and full starting ammunition for the new weapon.
fn switch_weapon(
    tunables: Res<Tunables>,
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<&mut WeaponSession, With<Player>>,
) {
    let profile = if keys.just_pressed(KeyCode::Digit1) {
        WeaponProfile::sidearm()
    } else if keys.just_pressed(KeyCode::Digit2) {
        WeaponProfile::machine_pistol()
    } else if keys.just_pressed(KeyCode::Digit3) {
        WeaponProfile::pump_shotgun()
    } else if keys.just_pressed(KeyCode::Digit4) {
        WeaponProfile::bolt_rifle()
    } else if keys.just_pressed(KeyCode::Digit5) {
        WeaponProfile::revolver()
    } else {
        return;
    };

    let Ok(mut session) = q.single_mut() else {
        return;
    };
    *session = WeaponSession::new(profile, tunables.min_drag_px);
}

/// Warp the OS cursor when a session asked for a re-center (a required drag
/// direction ran out of screen).
fn apply_pointer_recenter(
    mut q_window: Query<&mut Window, With<PrimaryWindow>>,
    mut q: Query<&mut WeaponSession, With<Player>>,
) {
    let Ok(mut session) = q.single_mut() else {
        return;
    };
    let Some(target) = session.take_pointer_recenter() else {
        return;
    };
    let Ok(mut window) = q_window.single_mut() else {
        return;
    };
    window.set_cursor_position(Some(target));
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut LinearVelocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis * tunables.player_speed;
}
