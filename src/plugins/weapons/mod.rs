//! Weapons plugin: firing-readiness state machines, recoil/spread, gesture
//! cycling, and hit resolution.
//!
//! # Data flow (big picture)
//! ```text
//!   Update schedule (variable dt)
//!┌────────────────────────────────────────────────────────────────────────┐
//!│  (A) Input sampling (player plugin)                                    │
//!│      - writes: WeaponInput (pointer, aux poll+edge, key edges, wheel)  │
//!│      - writes: Aim { world_cursor: Option<Vec2> }                      │
//!│                                                                        │
//!│  (B) drive_weapon_sessions                                             │
//!│      - per session: gesture recognizer -> action cycle -> dispersion   │
//!│      - writes: WeaponEvent messages (fired, dry, cycle/cylinder/...)   │
//!│      - writes: ShotRequest messages (one per discharge)                │
//!│                                                                        │
//!│  (C) resolve_shot_requests                                             │
//!│      - hitscan: penetration-budget ray walk, damages Health once per   │
//!│        actor, emits HitscanResolved (tracer end point)                 │
//!│      - kinetic: writes SpawnBulletRequest for the projectile pool      │
//!└────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything per-weapon is owned by its `WeaponSession`; there is no
//! cross-weapon shared state. Delayed effects (hammer draw, close cooldown)
//! are countdown fields checked on later ticks, never blocking waits, and
//! they re-validate their preconditions when they elapse.

pub mod actions;
pub mod dispersion;
pub mod gesture;
pub mod hitscan;
pub mod ledger;
pub mod messages;
pub mod profile;
pub mod session;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

use gesture::GestureDir;

/// Raw per-tick input consumed by the core. The player plugin is the only
/// writer; the core only reads.
///
/// `aux_polled` and `aux_edge` are deliberately separate signals: either
/// backend alone misses transitions, so the gesture recognizer ORs them
/// with "first true wins for the drag" semantics.
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponInput {
    pub trigger_edge: bool,
    pub trigger_held: bool,
    pub pointer_down: bool,
    pub pointer_pos: Vec2,
    pub window_size: Vec2,
    pub edge_margin: f32,
    pub aux_polled: bool,
    pub aux_edge: bool,
    pub key_edges: Vec<GestureDir>,
    pub wheel_steps: i32,
    pub precock_edge: bool,
    pub reload_edge: bool,
    pub secondary_edge: bool,
}

/// World-space aim target, resolved by the aiming collaborator
/// (cursor -> world through the main camera).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Aim {
    pub world_cursor: Option<Vec2>,
}

pub struct WeaponsPlugin;

/// Maintain buffered message storage.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_weapon_messages(
    mut events: ResMut<Messages<messages::WeaponEvent>>,
    mut shots: ResMut<Messages<messages::ShotRequest>>,
) {
    events.update();
    shots.update();
}

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WeaponInput::default())
            .insert_resource(Aim::default());

        app.init_resource::<Messages<messages::WeaponEvent>>();
        app.init_resource::<Messages<messages::ShotRequest>>();
        app.add_systems(PostUpdate, update_weapon_messages);

        app.add_systems(
            Update,
            (
                session::drive_weapon_sessions,
                hitscan::resolve_shot_requests.after(session::drive_weapon_sessions),
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}
