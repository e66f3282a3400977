use super::*;
use crate::plugins::weapons::gesture::{GestureDir, GestureEvent};
use crate::plugins::weapons::ledger::AmmoLedger;
use crate::plugins::weapons::messages::WeaponEventKind;

fn gesture(dir: GestureDir) -> GestureEvent {
    GestureEvent {
        dir,
        magnitude: 64.0,
        mid_drag: false,
        aux_held: false,
    }
}

fn mid_drag(dir: GestureDir) -> GestureEvent {
    GestureEvent {
        mid_drag: true,
        ..gesture(dir)
    }
}

fn aux(dir: GestureDir) -> GestureEvent {
    GestureEvent {
        aux_held: true,
        ..gesture(dir)
    }
}

fn casings(out: &[WeaponEventKind]) -> u32 {
    out.iter()
        .filter_map(|k| match k {
            WeaponEventKind::CasingsEjected { count } => Some(*count),
            _ => None,
        })
        .sum()
}

fn inserts(out: &[WeaponEventKind]) -> usize {
    out.iter()
        .filter(|k| matches!(k, WeaponEventKind::CartridgeInserted { .. }))
        .count()
}

// --------------------------------------------------------------------------------------
// Pump
// --------------------------------------------------------------------------------------

#[test]
fn pump_full_cycle_fire_eject_chamber() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(6, 12);
    let mut out = Vec::new();

    assert_eq!(pump.request_fire(&mut ledger, &mut out), FireDecision::Shoot);
    assert_eq!(pump.state, PumpState::NeedsEject);
    assert_eq!(ledger.live_rounds(), 5);

    // Firing again while the action is open is refused, not dry.
    assert_eq!(pump.request_fire(&mut ledger, &mut out), FireDecision::Blocked);
    assert_eq!(ledger.live_rounds(), 5);

    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsChamber);
    assert_eq!(casings(&out), 1);

    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::Ready);
    assert_eq!(pump.request_fire(&mut ledger, &mut out), FireDecision::Shoot);
}

#[test]
fn pump_ignores_wrong_direction_and_wrong_state() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(6, 0);
    let mut out = Vec::new();

    // Up in Ready does nothing.
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::Ready);

    pump.request_fire(&mut ledger, &mut out);
    // Down while a case still sits in the chamber does nothing.
    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsEject);

    // Horizontal drags are not part of the pump cycle.
    pump.on_gesture(gesture(GestureDir::Left), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsEject);
}

#[test]
fn pump_close_cooldown_blocks_immediate_reopen() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(6, 0);
    let mut out = Vec::new();

    // Full cycle to arm the cooldown.
    pump.request_fire(&mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    pump.request_fire(&mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsEject);

    // Jitter right after closing is absorbed.
    pump.on_gesture(mid_drag(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsEject);

    // The mid-drag window is short; after it elapses the re-open lands.
    pump.tick(0.1);
    pump.on_gesture(mid_drag(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsChamber);
}

#[test]
fn pump_release_reopen_needs_longer_cooldown_than_mid_drag() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(6, 0);
    let mut out = Vec::new();

    pump.request_fire(&mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    pump.request_fire(&mut ledger, &mut out);

    // 0.1s is past the mid-drag window but inside the release window.
    pump.tick(0.1);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsEject);

    pump.tick(0.2);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    assert_eq!(pump.state, PumpState::NeedsChamber);
}

#[test]
fn pump_aux_down_inserts_one_shell_per_gesture() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(6, 12);
    let mut out = Vec::new();

    // Make room in the tube.
    pump.request_fire(&mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(ledger.live_rounds(), 5);

    let reserve_before = ledger.reserve;
    out.clear();
    pump.on_gesture(aux(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(ledger.live_rounds(), 6);
    assert_eq!(ledger.reserve, reserve_before - 1);
    assert_eq!(inserts(&out), 1);
    // The aux gesture loads; it never closes the action.
    assert_eq!(pump.state, PumpState::Ready);

    // Tube full: another aux gesture inserts nothing.
    out.clear();
    pump.on_gesture(aux(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(ledger.live_rounds(), 6);
    assert_eq!(ledger.reserve, reserve_before - 1);
    assert_eq!(inserts(&out), 0);
}

#[test]
fn pump_chambering_empty_tube_clicks() {
    let mut pump = PumpAction::new();
    let mut ledger = AmmoLedger::magazine(1, 0);
    let mut out = Vec::new();

    pump.request_fire(&mut ledger, &mut out);
    pump.on_gesture(gesture(GestureDir::Up), &mut ledger, &mut out);
    out.clear();
    pump.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);

    assert_eq!(pump.state, PumpState::Ready);
    assert!(out.iter().any(|k| matches!(k, WeaponEventKind::DryFire)));
    assert_eq!(pump.request_fire(&mut ledger, &mut out), FireDecision::Dry);
}

// --------------------------------------------------------------------------------------
// Bolt
// --------------------------------------------------------------------------------------

#[test]
fn bolt_full_cycle_ejects_exactly_one_casing() {
    let mut bolt = BoltAction::new();
    let mut ledger = AmmoLedger::magazine(5, 0);
    let mut out = Vec::new();

    assert_eq!(bolt.request_fire(&mut ledger, &mut out), FireDecision::Shoot);
    assert_eq!(bolt.state, BoltState::NeedsCycle);

    bolt.on_key_edge(GestureDir::Left, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::Unlocked);
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::Extracted);
    bolt.on_key_edge(GestureDir::Up, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::Chambered);
    bolt.on_key_edge(GestureDir::Right, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::Ready);

    assert_eq!(casings(&out), 1);
}

#[test]
fn bolt_out_of_order_edges_are_ignored() {
    let mut bolt = BoltAction::new();
    let mut ledger = AmmoLedger::magazine(5, 0);
    let mut out = Vec::new();

    bolt.request_fire(&mut ledger, &mut out);

    // Down/Up/Right before unlocking: no regression, no skip.
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Up, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Right, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::NeedsCycle);

    bolt.on_key_edge(GestureDir::Left, &ledger, &mut out);
    // Skipping extraction: Up in Unlocked is ignored.
    bolt.on_key_edge(GestureDir::Up, &ledger, &mut out);
    assert_eq!(bolt.state, BoltState::Unlocked);
}

#[test]
fn bolt_manual_cycle_without_firing_ejects_nothing() {
    let mut bolt = BoltAction::new();
    let mut ledger = AmmoLedger::magazine(5, 0);
    let mut out = Vec::new();

    bolt.on_key_edge(GestureDir::Left, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Up, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Right, &ledger, &mut out);

    assert_eq!(bolt.state, BoltState::Ready);
    assert_eq!(casings(&out), 0);
}

#[test]
fn bolt_repeated_extraction_cannot_double_eject() {
    let mut bolt = BoltAction::new();
    let mut ledger = AmmoLedger::magazine(5, 0);
    let mut out = Vec::new();

    bolt.request_fire(&mut ledger, &mut out);
    bolt.on_key_edge(GestureDir::Left, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    // A second Down edge in Extracted is ignored.
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    assert_eq!(casings(&out), 1);
}

#[test]
fn bolt_closing_on_empty_magazine_returns_to_needs_cycle() {
    let mut bolt = BoltAction::new();
    let mut ledger = AmmoLedger::magazine(1, 0);
    let mut out = Vec::new();

    bolt.request_fire(&mut ledger, &mut out);
    assert_eq!(ledger.live_rounds(), 0);

    bolt.on_key_edge(GestureDir::Left, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Down, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Up, &ledger, &mut out);
    bolt.on_key_edge(GestureDir::Right, &ledger, &mut out);

    assert_eq!(bolt.state, BoltState::NeedsCycle);
}

// --------------------------------------------------------------------------------------
// Revolver
// --------------------------------------------------------------------------------------

const COCK: f32 = 0.22;

#[test]
fn revolver_trigger_defers_then_discharges_on_timer() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 0);
    let mut out = Vec::new();

    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Deferred);
    // A second pull during the draw is ignored.
    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Blocked);

    assert!(rev.tick(COCK * 0.5, &mut ledger, &mut out).is_none());
    let shot = rev.tick(COCK, &mut ledger, &mut out);
    assert_eq!(shot, Some(DeferredShot));
    assert_eq!(ledger.live_rounds(), 5);
    assert!(out.iter().any(|k| matches!(k, WeaponEventKind::HammerCocked)));
    assert_eq!(rev.hammer, HammerState::Uncocked);
}

#[test]
fn revolver_precock_fires_instantly_on_next_pull() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 0);
    let mut out = Vec::new();

    assert!(rev.on_precock(&mut ledger, &mut out));
    assert_eq!(rev.hammer, HammerState::Cocked);
    // Cocking again over a cocked hammer does nothing.
    assert!(!rev.on_precock(&mut ledger, &mut out));

    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Shoot);
    assert_eq!(ledger.live_rounds(), 5);
}

#[test]
fn revolver_opening_cancels_pending_hammer_draw() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 0);
    let mut out = Vec::new();

    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Deferred);
    rev.on_gesture(gesture(GestureDir::Right), &mut ledger, &mut out);
    assert_eq!(rev.cylinder, CylinderState::Open);

    // The draw timer is gone; nothing discharges.
    assert!(rev.tick(COCK * 2.0, &mut ledger, &mut out).is_none());
    assert_eq!(ledger.live_rounds(), 6);
}

#[test]
fn revolver_opening_ejects_exactly_fired_count_once() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 6);
    let mut out = Vec::new();

    for _ in 0..3 {
        assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Deferred);
        assert!(rev.tick(COCK + 0.01, &mut ledger, &mut out).is_some());
    }
    assert_eq!(ledger.live_rounds(), 3);
    // Firing never touched reserve.
    assert_eq!(ledger.reserve, 6);

    out.clear();
    rev.on_gesture(gesture(GestureDir::Right), &mut ledger, &mut out);
    assert_eq!(casings(&out), 3);

    // Close and re-open without firing: nothing left to eject.
    rev.on_gesture(gesture(GestureDir::Left), &mut ledger, &mut out);
    rev.tick(0.2, &mut ledger, &mut out);
    out.clear();
    rev.on_gesture(gesture(GestureDir::Right), &mut ledger, &mut out);
    assert_eq!(casings(&out), 0);
}

#[test]
fn revolver_one_insert_per_chamber_until_rotate() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 6);
    let mut out = Vec::new();

    // Spend two rounds so there are empty chambers.
    for _ in 0..2 {
        rev.request_fire(&mut ledger, &mut out);
        rev.tick(COCK + 0.01, &mut ledger, &mut out);
    }
    rev.on_gesture(gesture(GestureDir::Right), &mut ledger, &mut out);

    // The hammer indexed past the spent chambers; rotate back onto one.
    while ledger.current_live() {
        rev.on_wheel(1, &mut ledger);
    }

    out.clear();
    rev.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(inserts(&out), 1);
    assert_eq!(rev.cylinder, CylinderState::Loading);

    // Same chamber: a second insert gesture is refused.
    out.clear();
    rev.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(inserts(&out), 0);

    // Rotate to the other empty chamber, insert lands again.
    while ledger.current_live() {
        rev.on_wheel(1, &mut ledger);
    }
    out.clear();
    rev.on_gesture(gesture(GestureDir::Down), &mut ledger, &mut out);
    assert_eq!(inserts(&out), 1);
    assert_eq!(ledger.live_rounds(), 6);
}

#[test]
fn revolver_wheel_ignored_while_closed_or_cocked() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 0);

    let before = ledger.chamber_index();
    rev.on_wheel(1, &mut ledger);
    assert_eq!(ledger.chamber_index(), before);

    let mut out = Vec::new();
    rev.on_precock(&mut ledger, &mut out);
    rev.on_wheel(1, &mut ledger);
    assert_eq!(rev.hammer, HammerState::Cocked);
}

#[test]
fn revolver_closing_takes_time_and_blocks_fire_until_closed() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(6, 0);
    let mut out = Vec::new();

    rev.on_gesture(gesture(GestureDir::Right), &mut ledger, &mut out);
    rev.on_gesture(gesture(GestureDir::Left), &mut ledger, &mut out);
    assert_eq!(rev.cylinder, CylinderState::Closing);
    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Blocked);

    rev.tick(0.2, &mut ledger, &mut out);
    assert_eq!(rev.cylinder, CylinderState::Closed);
    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Deferred);
}

#[test]
fn revolver_hammer_falls_on_empty_chamber_clicks() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(2, 0);
    let mut out = Vec::new();

    // Empty the chamber the draw will index onto; keep the other live.
    ledger.advance(1);
    ledger.consume_current();
    ledger.advance(1);
    assert!(ledger.current_live());

    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Deferred);
    out.clear();
    let shot = rev.tick(COCK + 0.01, &mut ledger, &mut out);
    assert!(shot.is_none());
    assert!(out.iter().any(|k| matches!(k, WeaponEventKind::DryFire)));
    // The live round is untouched.
    assert_eq!(ledger.live_rounds(), 1);
}

#[test]
fn revolver_empty_cylinder_is_dry_immediately() {
    let mut rev = RevolverAction::new(COCK);
    let mut ledger = AmmoLedger::cylinder(2, 0);
    let mut out = Vec::new();

    ledger.consume_current();
    ledger.advance(1);
    ledger.consume_current();

    assert_eq!(rev.request_fire(&mut ledger, &mut out), FireDecision::Dry);
}
