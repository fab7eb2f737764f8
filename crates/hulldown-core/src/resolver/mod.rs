//! Collision and sensing resolution.
//!
//! The [`CollisionResolver`] is the component the simulation driver consults
//! once per entity per tick to answer two questions:
//! - **Collision**: may this tank occupy its new position? Did this bullet's
//!   flight end?
//! - **Sensing**: what does this tank's radar cone see?
//!
//! # Ordering contract
//!
//! The resolver's registries are *not* stable snapshots. They are rebuilt
//! incrementally within a tick: a tank checked via [`CollisionResolver::check_tank`]
//! is only compared against tanks checked *earlier in the same tick*, and a
//! radar scan only sees what the preceding check phase registered. The driver
//! must therefore call operations in a consistent order every tick:
//!
//! 1. [`CollisionResolver::begin_tick`] to clear the per-tick registries
//! 2. [`CollisionResolver::check_tank`] for every live tank
//! 3. [`CollisionResolver::hit_test_bullet`] for every live bullet
//! 4. [`CollisionResolver::scan_tanks`] / [`CollisionResolver::scan_bullets`]
//!    for every live tank
//!
//! Only already-checked tanks count as obstacles. This makes registry growth
//! O(n) without an all-pairs pass and gives the deliberate asymmetry that a
//! tank blocks only the tanks that move after it within the tick. The
//! asymmetry extends to notification: on a tank-tank overlap only the
//! later-checked tank hears `on_enemy_hit`.
//!
//! # Radar geometry
//!
//! A radar cone is rooted at the scanning tank, oriented along
//! `angle + radar_angle` (degrees, radar relative to hull), reaches
//! `radar_range` game units and spans [`RADAR_HALF_APERTURE_DEG`] to either
//! side of its axis. Of all candidates inside the cone, only the closest is
//! reported; on an exact distance tie the earlier-registered candidate wins.
//!
//! # Example
//!
//! ```
//! use hulldown_core::battlefield::Battlefield;
//! use hulldown_core::resolver::CollisionResolver;
//! use hulldown_core::world::World;
//! use glam::Vec2;
//!
//! let mut world = World::new();
//! let mut resolver = CollisionResolver::new(Battlefield::new(500.0, 500.0));
//!
//! let tank = world.spawn_tank("alpha", None, Vec2::new(250.0, 250.0), 0.0);
//! assert!(resolver.check_tank(&mut world, tank));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::battlefield::Battlefield;
use crate::entity::{BulletId, BulletSink, TankId, TankSink};
use crate::world::World;

/// Angular half-width of the radar cone, in degrees.
///
/// A candidate is inside the cone when its bearing deviates from the cone
/// axis by at most this much, giving a 20° beam.
pub const RADAR_HALF_APERTURE_DEG: f32 = 10.0;

/// A bullet-tank impact recorded during [`CollisionResolver::hit_test_bullet`].
///
/// The resolver only detects and notifies; applying damage and scoring is the
/// driver's job, so each impact names the parties for the driver to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    /// The bullet whose flight ended.
    pub bullet: BulletId,
    /// The tank it struck.
    pub victim: TankId,
}

/// Detects contact between tanks, walls and bullets, and resolves radar
/// perception.
///
/// One resolver exists per match, owned by the simulation driver and
/// constructed with the match's battlefield; there is no process-wide
/// instance. All state beyond the battlefield bounds is transient per tick.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    battlefield: Battlefield,
    /// Tanks registered this tick, in check order.
    tank_registry: Vec<TankId>,
    /// Bullets that survived their hit test this tick, in check order.
    bullet_registry: Vec<BulletId>,
    /// Bullet-tank impacts recorded this tick.
    impacts: Vec<Impact>,
}

impl CollisionResolver {
    /// Creates a resolver for the given battlefield.
    #[must_use]
    pub fn new(battlefield: Battlefield) -> Self {
        Self {
            battlefield,
            tank_registry: Vec::new(),
            bullet_registry: Vec::new(),
            impacts: Vec::new(),
        }
    }

    /// Replaces the stored battlefield bounds.
    ///
    /// Takes effect immediately: the very next wall test uses the new bounds.
    pub fn update_battlefield(&mut self, battlefield: Battlefield) {
        self.battlefield = battlefield;
    }

    /// Returns the battlefield the resolver currently checks against.
    #[must_use]
    pub const fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// Clears the per-tick registries and the impact ledger.
    ///
    /// The driver calls this at the top of every tick; registry membership
    /// never carries over between ticks except through explicit re-checks or
    /// [`Self::update_tank`] calls.
    pub fn begin_tick(&mut self) {
        self.tank_registry.clear();
        self.bullet_registry.clear();
        self.impacts.clear();
    }

    /// Seeds a tank into this tick's registry without any collision checks.
    ///
    /// Used to persist a tank's presence for comparisons before (or instead
    /// of) its own check. Idempotent: registering the same tank twice keeps a
    /// single entry at its original position in the check order.
    pub fn update_tank(&mut self, id: TankId) {
        if !self.tank_registry.contains(&id) {
            self.tank_registry.push(id);
        }
    }

    /// Tanks registered so far this tick, in check order.
    #[must_use]
    pub fn registered_tanks(&self) -> &[TankId] {
        &self.tank_registry
    }

    /// Bullets known to be in flight this tick, in check order.
    #[must_use]
    pub fn live_bullets(&self) -> &[BulletId] {
        &self.bullet_registry
    }

    /// Drains the bullet-tank impacts recorded so far this tick.
    pub fn take_impacts(&mut self) -> Vec<Impact> {
        std::mem::take(&mut self.impacts)
    }

    /// Checks whether a tank may occupy its current position.
    ///
    /// Runs the wall test, then the overlap test against every tank already
    /// registered this tick, in that fixed order. On the first failure the
    /// tank is notified (`on_wall_hit` or `on_enemy_hit`), left unregistered,
    /// and `false` is returned so the caller can roll the movement back. If
    /// both tests pass the tank joins the registry and `true` is returned.
    ///
    /// The earlier tank of an overlapping pair is *not* notified here.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in `world`; that is a driver bug, not a
    /// runtime condition. Registered tanks that have since been despawned are
    /// skipped instead.
    #[must_use]
    pub fn check_tank(&mut self, world: &mut World, id: TankId) -> bool {
        let tank = world.tank(id).expect("checked tank must exist in world");
        let position = tank.position;
        let radius = tank.radius;

        if !self.battlefield.contains_circle(position, radius) {
            trace!(tank = %id, ?position, "tank hit battlefield edge");
            let tank = world
                .tank_mut(id)
                .expect("checked tank must exist in world");
            tank.on_wall_hit();
            return false;
        }

        for &other_id in &self.tank_registry {
            if other_id == id {
                continue;
            }
            let Some(other) = world.tank(other_id) else {
                continue;
            };
            if position.distance(other.position) < radius + other.radius {
                trace!(tank = %id, other = %other_id, "tank-tank collision");
                let tank = world
                    .tank_mut(id)
                    .expect("checked tank must exist in world");
                tank.on_enemy_hit();
                return false;
            }
        }

        self.update_tank(id);
        true
    }

    /// Tests a bullet against the battlefield edges and registered tanks.
    ///
    /// Returns `true` when the bullet's flight ended: either against a wall
    /// (`on_wall_hit`) or against a registered tank other than its owner
    /// (`on_enemy_hit`, plus an [`Impact`] entry for the driver). Note the
    /// inverted polarity relative to [`Self::check_tank`]: `true` means a
    /// terminal event, not a clear position.
    ///
    /// Returns `false` when the bullet keeps flying; it then joins the
    /// live-bullet set consumed by [`Self::scan_bullets`] this tick. A bullet
    /// can never hit the tank that fired it, regardless of overlap.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in `world` (driver bug).
    #[must_use]
    pub fn hit_test_bullet(&mut self, world: &mut World, id: BulletId) -> bool {
        let bullet = world.bullet(id).expect("tested bullet must exist in world");
        let position = bullet.position;
        let size = bullet.size();
        let owner = bullet.owner();

        if !self.battlefield.contains_circle(position, size) {
            trace!(bullet = %id, ?position, "bullet left battlefield");
            let bullet = world
                .bullet_mut(id)
                .expect("tested bullet must exist in world");
            bullet.on_wall_hit();
            return true;
        }

        for &tank_id in &self.tank_registry {
            if tank_id == owner {
                continue;
            }
            let Some(tank) = world.tank(tank_id) else {
                continue;
            };
            if position.distance(tank.position) < size + tank.radius {
                trace!(bullet = %id, victim = %tank_id, "bullet impact");
                self.impacts.push(Impact {
                    bullet: id,
                    victim: tank_id,
                });
                let bullet = world
                    .bullet_mut(id)
                    .expect("tested bullet must exist in world");
                bullet.on_enemy_hit();
                return true;
            }
        }

        if !self.bullet_registry.contains(&id) {
            self.bullet_registry.push(id);
        }
        false
    }

    /// Sweeps the scanning tank's radar cone over the registered tanks.
    ///
    /// Reports at most one detection: the closest registered tank inside the
    /// cone. On a detection the scanner hears `on_enemy_spot(target)` and the
    /// target hears `on_targeting_alarm`, whatever the state of its own
    /// radar. Returns `false` and notifies nobody when the cone is empty.
    ///
    /// Bullets never satisfy this scan.
    ///
    /// # Panics
    ///
    /// Panics if `scanner` is not present in `world` (driver bug).
    pub fn scan_tanks(&mut self, world: &mut World, scanner: TankId) -> bool {
        let tank = world.tank(scanner).expect("scanner must exist in world");
        let origin = tank.position;
        let axis = tank.radar_heading();
        let range = tank.radar_range;

        let mut closest: Option<(TankId, f32)> = None;
        for &candidate in &self.tank_registry {
            if candidate == scanner {
                continue;
            }
            let Some(target) = world.tank(candidate) else {
                continue;
            };
            if let Some(distance) = cone_distance(origin, axis, range, target.position) {
                if closest.map_or(true, |(_, best)| distance < best) {
                    closest = Some((candidate, distance));
                }
            }
        }

        let Some((target, distance)) = closest else {
            return false;
        };
        trace!(scanner = %scanner, target = %target, distance, "radar contact");
        world
            .tank_mut(scanner)
            .expect("scanner must exist in world")
            .on_enemy_spot(target);
        world
            .tank_mut(target)
            .expect("registered scan target must exist in world")
            .on_targeting_alarm();
        true
    }

    /// Sweeps the scanning tank's radar cone over the live bullets.
    ///
    /// Same cone geometry as [`Self::scan_tanks`], iterating the bullets that
    /// survived this tick's hit tests. Reports the closest in-cone bullet via
    /// `on_bullet_spot`. The scanner's own bullets are valid targets; radar
    /// does not share the collision test's owner exclusion.
    ///
    /// # Panics
    ///
    /// Panics if `scanner` is not present in `world` (driver bug).
    pub fn scan_bullets(&mut self, world: &mut World, scanner: TankId) -> bool {
        let tank = world.tank(scanner).expect("scanner must exist in world");
        let origin = tank.position;
        let axis = tank.radar_heading();
        let range = tank.radar_range;

        let mut closest: Option<(BulletId, f32)> = None;
        for &candidate in &self.bullet_registry {
            let Some(bullet) = world.bullet(candidate) else {
                continue;
            };
            if let Some(distance) = cone_distance(origin, axis, range, bullet.position) {
                if closest.map_or(true, |(_, best)| distance < best) {
                    closest = Some((candidate, distance));
                }
            }
        }

        let Some((bullet, distance)) = closest else {
            return false;
        };
        trace!(scanner = %scanner, bullet = %bullet, distance, "bullet contact");
        world
            .tank_mut(scanner)
            .expect("scanner must exist in world")
            .on_bullet_spot(bullet);
        true
    }
}

/// Distance to `target` if it lies inside the cone, `None` otherwise.
///
/// The cone is rooted at `origin`, oriented along `axis_deg` and reaches
/// `range`. A target sitting exactly on the origin counts as dead ahead.
fn cone_distance(origin: Vec2, axis_deg: f32, range: f32, target: Vec2) -> Option<f32> {
    let delta = target - origin;
    let distance = delta.length();
    if distance > range {
        return None;
    }
    if distance <= f32::EPSILON {
        return Some(0.0);
    }
    let bearing = delta.y.atan2(delta.x).to_degrees();
    let off_axis = wrap_signed_degrees(bearing - axis_deg);
    (off_axis.abs() <= RADAR_HALF_APERTURE_DEG).then_some(distance)
}

/// Wraps an angle in degrees into `[-180, 180)`.
fn wrap_signed_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}
