//! Hit resolution: instantaneous multi-hit ray trace with a wall
//! penetration budget.
//!
//! The walk is written against a caster closure so the algorithm is
//! deterministic and unit-testable without a physics pipeline; the ECS
//! system adapts avian's `SpatialQuery` into that closure (the same pattern
//! the projectile tests use by injecting collision messages directly).

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::enemies::Health;
use crate::plugins::projectiles::messages::SpawnBulletRequest;

use super::messages::{ShotRequest, WeaponEvent, WeaponEventKind};
use super::profile::Delivery;

/// Hard iteration cap: safety bound against numerical stalls.
pub const MAX_TRACE_STEPS: usize = 24;

/// Distance advanced past a surface before the next segment starts, so the
/// follow-up cast does not re-hit the same face.
const SKIN: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Static obstacle; consumes penetration budget.
    Wall,
    /// Damageable actor; damaged once per trace, never blocks the budget.
    Actor,
}

/// First surface along a segment, as reported by the caster.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub entity: Entity,
    pub distance: f32,
    pub kind: SurfaceKind,
}

#[derive(Clone, Copy, Debug)]
pub struct TraceHit {
    pub entity: Entity,
    pub point: Vec2,
    pub kind: SurfaceKind,
}

#[derive(Clone, Debug)]
pub struct HitTraceResult {
    /// Encountered surfaces in order.
    pub hits: Vec<TraceHit>,
    pub walls_penetrated: u32,
    /// Where the visible tracer should terminate.
    pub end_point: Vec2,
}

impl HitTraceResult {
    pub fn victims(&self) -> u32 {
        self.hits.iter().filter(|h| h.kind == SurfaceKind::Actor).count() as u32
    }
}

/// Walk sequential ray segments from `origin` toward `max_range`.
///
/// `cast(pos, dir, remaining, excluded)` must return the first surface
/// along the segment that is not in `excluded`. The caller's filter is
/// expected to already exclude the firing owner, so self-hits never consume
/// budget.
pub fn trace_ray(
    origin: Vec2,
    dir: Vec2,
    max_range: f32,
    max_wall_penetrations: u32,
    mut cast: impl FnMut(Vec2, Vec2, f32, &[Entity]) -> Option<SurfaceHit>,
) -> HitTraceResult {
    let mut result = HitTraceResult {
        hits: Vec::new(),
        walls_penetrated: 0,
        end_point: origin + dir * max_range,
    };

    let mut pos = origin;
    let mut remaining = max_range;
    let mut excluded: Vec<Entity> = Vec::new();

    for _ in 0..MAX_TRACE_STEPS {
        if remaining <= 0.0 {
            result.end_point = pos;
            break;
        }
        let Some(hit) = cast(pos, dir, remaining, &excluded) else {
            result.end_point = pos + dir * remaining;
            break;
        };

        let point = pos + dir * hit.distance;
        result.hits.push(TraceHit { entity: hit.entity, point, kind: hit.kind });

        match hit.kind {
            SurfaceKind::Wall => {
                if result.walls_penetrated >= max_wall_penetrations {
                    // Budget exhausted: this wall is the terminal point.
                    result.end_point = point;
                    return result;
                }
                result.walls_penetrated += 1;
                excluded.push(hit.entity);
            }
            SurfaceKind::Actor => {
                // Damage once, keep tracing; actors cost no budget.
                excluded.push(hit.entity);
            }
        }

        remaining -= hit.distance + SKIN;
        pos = point + dir * SKIN;
        result.end_point = pos;
    }

    result
}

/// Consume queued shots: run the trace for hitscan weapons, or hand kinetic
/// weapons a spawn descriptor for the projectile pool.
pub fn resolve_shot_requests(
    mut shots: MessageReader<ShotRequest>,
    spatial: SpatialQuery,
    q_layers: Query<&CollisionLayers>,
    mut q_health: Query<&mut Health>,
    mut events: MessageWriter<WeaponEvent>,
    mut spawns: MessageWriter<SpawnBulletRequest>,
) {
    for shot in shots.read() {
        match shot.delivery {
            Delivery::Projectile => {
                for dir in &shot.dirs {
                    spawns.write(SpawnBulletRequest {
                        pos: shot.origin,
                        vel: *dir * shot.speed,
                        damage: shot.damage,
                        penetration_budget: shot.wall_penetrations,
                        range: shot.max_range,
                        owner: Some(shot.shooter),
                    });
                }
            }
            Delivery::Hitscan => {
                for dir in &shot.dirs {
                    let result = trace_ray(
                        shot.origin,
                        *dir,
                        shot.max_range,
                        shot.wall_penetrations,
                        |pos, dir, remaining, excluded| {
                            cast_surface(&spatial, &q_layers, shot.shooter, pos, dir, remaining, excluded)
                        },
                    );

                    for hit in &result.hits {
                        if hit.kind == SurfaceKind::Actor
                            && let Ok(mut health) = q_health.get_mut(hit.entity)
                        {
                            health.hp -= shot.damage;
                        }
                    }

                    events.write(WeaponEvent {
                        shooter: shot.shooter,
                        kind: WeaponEventKind::HitscanResolved {
                            end_point: result.end_point,
                            walls_penetrated: result.walls_penetrated,
                            victims: result.victims(),
                        },
                    });
                }
            }
        }
    }
}

/// `SpatialQuery` adapter for one trace segment. The owner and every
/// already-hit surface are excluded so self-hits are skipped without
/// consuming budget.
fn cast_surface(
    spatial: &SpatialQuery,
    q_layers: &Query<&CollisionLayers>,
    owner: Entity,
    pos: Vec2,
    dir: Vec2,
    remaining: f32,
    excluded: &[Entity],
) -> Option<SurfaceHit> {
    let direction = Dir2::new(dir).ok()?;

    let mut filter = SpatialQueryFilter::from_mask([Layer::World, Layer::Enemy]);
    filter.excluded_entities.insert(owner);
    filter.excluded_entities.extend(excluded.iter().copied());

    let hit = spatial.cast_ray(pos, direction, remaining, true, &filter)?;

    let layers = q_layers.get(hit.entity).ok()?;
    let kind = if layers.memberships.has_all(Layer::Enemy) {
        SurfaceKind::Actor
    } else {
        SurfaceKind::Wall
    };

    Some(SurfaceHit { entity: hit.entity, distance: hit.distance, kind })
}
