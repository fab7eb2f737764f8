//! Simulation driver orchestrating the tick loop.
//!
//! The `Simulation` owns one [`World`], one [`CollisionResolver`] and the
//! match lifecycle. Each tick it runs a fixed sequence of phases:
//!
//! 1. **Tank phase**: integrate every live tank's controls (turn, radar turn,
//!    throttle), then run its collision check in join order. A failed check
//!    rolls the movement back and re-seeds the tank into the registry at its
//!    previous, valid position.
//! 2. **Contact damage**: wall and ram hits recorded during the check phase
//!    cost energy.
//! 3. **Fire phase**: loaded guns with a pending request spawn bullets.
//! 4. **Bullet phase**: integrate every bullet, run its hit test, then drain
//!    the impact ledger to apply damage and scoring and despawn spent
//!    bullets.
//! 5. **Scan phase**: radar sweeps for every live tank, tanks then bullets.
//! 6. **Match end**: once at most one side is left standing the match
//!    finishes and the highest score wins.
//!
//! Everything is single-threaded and synchronous; the resolver is consulted
//! once per entity per tick and the join-order iteration keeps its
//! order-sensitive contracts reproducible run after run.
//!
//! # Determinism
//!
//! Given the same seed, the same tank roster and the same control inputs, a
//! match plays out identically: spawn placement comes from a seeded
//! `ChaCha8Rng` and all iteration follows `BTreeMap` id order.
//!
//! # Example
//!
//! ```
//! use hulldown_core::simulation::{Simulation, TankDefinition};
//!
//! let mut sim = Simulation::new(500.0, 500.0, 42);
//! sim.add_tank(TankDefinition::new("alpha")).unwrap();
//! sim.add_tank(TankDefinition::new("bravo")).unwrap();
//! sim.start().unwrap();
//!
//! for _ in 0..10 {
//!     sim.step();
//! }
//! assert_eq!(sim.tick(), 10);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::battlefield::Battlefield;
use crate::entity::{heading_vec, BulletId, Tank, TankEvent, TankId, TANK_RADIUS};
use crate::resolver::CollisionResolver;
use crate::world::World;

/// Distance a tank covers per tick at full throttle.
pub const TANK_SPEED: f32 = 2.0;

/// Largest hull rotation per tick, in degrees.
pub const MAX_TURN_RATE: f32 = 5.0;

/// Largest radar rotation per tick, in degrees.
pub const MAX_RADAR_TURN_RATE: f32 = 10.0;

/// Energy lost when driving into a battlefield edge.
pub const WALL_HIT_DAMAGE: f32 = 10.0;

/// Energy lost when driving into another tank.
pub const RAM_DAMAGE: f32 = 10.0;

/// Reload ticks per unit of fire power.
pub const RELOAD_TICKS_PER_POWER: f32 = 30.0;

/// Minimum clearance between freshly placed tanks.
pub const SPAWN_CLEARANCE: f32 = TANK_RADIUS * 4.0;

/// Placement attempts before giving up on a joining tank.
const MAX_SPAWN_ATTEMPTS: u32 = 64;

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Tanks may still join; the tick loop has not started.
    Pending,
    /// The match is being simulated.
    Running,
    /// The match ended; a winner (if any) has been decided.
    Finished,
}

/// Declaration of a joining tank.
///
/// This is the driver-facing surface a user script is wrapped in: a declared
/// name (unique per match) and an optional team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankDefinition {
    name: String,
    team: Option<String>,
}

impl TankDefinition {
    /// Creates a definition for a teamless tank with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: None,
        }
    }

    /// Assigns the tank to a team.
    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// The tank's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tank's team, if any.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

/// Errors surfaced by the simulation driver.
///
/// A failed [`Simulation::add_tank`] names the offending tank and never
/// aborts the match for the other participants.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The definition itself is unusable (for example, an empty name).
    #[error("tank definition `{name}` is invalid: {reason}")]
    InvalidDefinition {
        /// Declared name of the offending tank.
        name: String,
        /// Human-readable explanation.
        reason: String,
    },
    /// Another tank already joined under the same name.
    #[error("a tank named `{name}` already joined this match")]
    DuplicateTank {
        /// Declared name of the offending tank.
        name: String,
    },
    /// No free spawn position was found on the battlefield.
    #[error("no free spawn position found for tank `{name}`")]
    NoSpawnPosition {
        /// Declared name of the offending tank.
        name: String,
    },
    /// A match needs at least two tanks before it can start.
    #[error("a match needs at least two tanks to start ({count} joined)")]
    NotEnoughTanks {
        /// Tanks joined so far.
        count: usize,
    },
    /// The operation is only valid before the match starts.
    #[error("the match has already started")]
    MatchAlreadyStarted,
}

/// The match orchestrator.
///
/// One `Simulation` exists per match; it is constructed with the battlefield
/// dimensions and a seed, and discarded when the match is over. There is no
/// process-wide simulation state.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    resolver: CollisionResolver,
    rng: ChaCha8Rng,
    status: MatchStatus,
    speed: f32,
    frame_budget: f32,
    tick: u64,
    winner: Option<TankId>,
}

impl Simulation {
    /// Creates a simulation for a battlefield of the given dimensions.
    ///
    /// The seed drives spawn placement; identical seeds with identical
    /// rosters and inputs reproduce identical matches.
    #[must_use]
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            world: World::new(),
            resolver: CollisionResolver::new(Battlefield::new(width, height)),
            rng: ChaCha8Rng::seed_from_u64(seed),
            status: MatchStatus::Pending,
            speed: 1.0,
            frame_budget: 0.0,
            tick: 0,
            winner: None,
        }
    }

    /// Replaces the battlefield bounds, effective from the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.resolver
            .update_battlefield(Battlefield::new(width, height));
    }

    /// Adds a tank to a pending match.
    ///
    /// Validates the definition (non-empty, unique name) and places the tank
    /// at a seeded random position with clearance from everyone already on
    /// the field.
    ///
    /// # Errors
    ///
    /// Returns a descriptive [`SimulationError`] naming the tank when the
    /// definition is invalid, the name is taken, no free position exists, or
    /// the match already started. Existing participants are unaffected.
    pub fn add_tank(&mut self, definition: TankDefinition) -> Result<TankId, SimulationError> {
        if self.status != MatchStatus::Pending {
            return Err(SimulationError::MatchAlreadyStarted);
        }
        if definition.name().trim().is_empty() {
            return Err(SimulationError::InvalidDefinition {
                name: definition.name().to_owned(),
                reason: "name must not be empty".to_owned(),
            });
        }
        if self.world.tanks().any(|t| t.name() == definition.name()) {
            return Err(SimulationError::DuplicateTank {
                name: definition.name().to_owned(),
            });
        }

        let position = self
            .find_spawn_position()
            .ok_or_else(|| SimulationError::NoSpawnPosition {
                name: definition.name().to_owned(),
            })?;
        let angle = self.rng.gen_range(0.0..360.0);

        let TankDefinition { name, team } = definition;
        let id = self.world.spawn_tank(name, team, position, angle);
        debug!(tank = %id, ?position, "tank joined");
        Ok(id)
    }

    /// Starts the match.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::MatchAlreadyStarted`] unless the match is
    /// pending, and [`SimulationError::NotEnoughTanks`] with fewer than two
    /// participants.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.status != MatchStatus::Pending {
            return Err(SimulationError::MatchAlreadyStarted);
        }
        let count = self.world.tank_count();
        if count < 2 {
            return Err(SimulationError::NotEnoughTanks { count });
        }
        self.status = MatchStatus::Running;
        debug!(tanks = count, "match started");
        Ok(())
    }

    /// Stops the match immediately and settles the winner.
    pub fn stop(&mut self) {
        if self.status != MatchStatus::Finished {
            self.finish();
        }
    }

    /// Sets the speed multiplier: simulated ticks per rendered frame.
    ///
    /// The resolver is speed-agnostic; this only affects how many ticks
    /// [`Self::run_frame`] executes. Non-positive values are clamped to a
    /// small positive minimum.
    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed = multiplier.max(0.01);
    }

    /// Current speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Runs the ticks one rendered frame is worth at the current speed.
    ///
    /// Fractional speeds accumulate across frames: at speed 0.5 every other
    /// frame simulates a tick.
    pub fn run_frame(&mut self) {
        self.frame_budget += self.speed;
        while self.frame_budget >= 1.0 {
            self.frame_budget -= 1.0;
            self.step();
        }
    }

    /// Executes one simulation tick.
    ///
    /// Does nothing once the match has finished. Stepping a pending match is
    /// allowed (useful for harnesses); the end-of-match evaluation only runs
    /// while the match is `Running`.
    pub fn step(&mut self) {
        if self.status == MatchStatus::Finished {
            return;
        }
        self.tick += 1;
        self.resolver.begin_tick();

        let tank_ids: Vec<TankId> = self.world.tank_ids().collect();

        self.move_and_check_tanks(&tank_ids);
        for &id in &tank_ids {
            self.apply_contact_damage(id);
        }
        self.fire_pending(&tank_ids);
        let spent = self.move_and_test_bullets();
        self.apply_impacts(spent);
        self.scan(&tank_ids);

        if self.status == MatchStatus::Running && self.sides_remaining() <= 1 {
            self.finish();
        }
    }

    /// Current simulation tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current match status.
    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    /// The winning tank once the match has finished.
    #[must_use]
    pub const fn winner(&self) -> Option<TankId> {
        self.winner
    }

    /// Team of the winning tank, if the winner fights on one.
    #[must_use]
    pub fn winning_team(&self) -> Option<&str> {
        self.winner
            .and_then(|id| self.world.tank(id))
            .and_then(Tank::team)
    }

    /// Read-only listing of every tank, dead or alive, in join order.
    pub fn tank_list(&self) -> impl Iterator<Item = &Tank> + '_ {
        self.world.tanks()
    }

    /// Distinct team names present in the match, in sorted order.
    #[must_use]
    pub fn team_list(&self) -> Vec<&str> {
        let teams: BTreeSet<&str> = self.world.tanks().filter_map(Tank::team).collect();
        teams.into_iter().collect()
    }

    /// Returns the entity store.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Returns the entity store mutably, for control input and test setup.
    #[must_use]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the collision resolver.
    #[must_use]
    pub const fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Integrates controls and runs collision checks for every live tank.
    fn move_and_check_tanks(&mut self, tank_ids: &[TankId]) {
        for &id in tank_ids {
            let previous = {
                let Some(tank) = self.world.tank_mut(id) else {
                    continue;
                };
                if !tank.alive {
                    continue;
                }
                tank.clear_events();

                let turn = tank.turn.clamp(-MAX_TURN_RATE, MAX_TURN_RATE);
                tank.angle = (tank.angle + turn).rem_euclid(360.0);
                let radar_turn = tank
                    .radar_turn
                    .clamp(-MAX_RADAR_TURN_RATE, MAX_RADAR_TURN_RATE);
                tank.radar_angle = (tank.radar_angle + radar_turn).rem_euclid(360.0);

                let previous = tank.position;
                let throttle = tank.throttle.clamp(-1.0, 1.0);
                tank.position = previous + heading_vec(tank.angle) * (throttle * TANK_SPEED);
                previous
            };

            if !self.resolver.check_tank(&mut self.world, id) {
                let tank = self
                    .world
                    .tank_mut(id)
                    .expect("tank cannot vanish during its own check");
                tank.position = previous;
                // Still an obstacle and a radar target at its old position.
                self.resolver.update_tank(id);
            }
        }
    }

    /// Applies energy loss for wall and ram contacts recorded this tick.
    fn apply_contact_damage(&mut self, id: TankId) {
        let Some(tank) = self.world.tank_mut(id) else {
            return;
        };
        if !tank.alive {
            return;
        }
        let contact_damage: f32 = tank
            .events()
            .iter()
            .map(|event| match event {
                TankEvent::WallHit => WALL_HIT_DAMAGE,
                TankEvent::EnemyHit => RAM_DAMAGE,
                _ => 0.0,
            })
            .sum();
        if contact_damage > 0.0 && tank.apply_damage(contact_damage) {
            debug!(tank = %id, "tank destroyed by collision");
        }
    }

    /// Spawns bullets for loaded guns with a pending fire request.
    fn fire_pending(&mut self, tank_ids: &[TankId]) {
        for &id in tank_ids {
            let request = {
                let Some(tank) = self.world.tank_mut(id) else {
                    continue;
                };
                if !tank.alive {
                    continue;
                }
                tank.take_fire_request().map(|power| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let reload = (power * RELOAD_TICKS_PER_POWER).ceil() as u32;
                    tank.start_reload(reload);
                    let muzzle = tank.position + heading_vec(tank.angle) * tank.radius;
                    (muzzle, tank.angle, power)
                })
            };
            if let Some((muzzle, direction, power)) = request {
                let bullet = self.world.spawn_bullet(id, muzzle, direction, power);
                debug!(owner = %id, bullet = %bullet, power, "bullet fired");
            }
        }
    }

    /// Integrates bullet flight and runs hit tests, returning the bullets
    /// whose flight ended this tick.
    fn move_and_test_bullets(&mut self) -> Vec<BulletId> {
        let bullet_ids: Vec<BulletId> = self.world.bullet_ids().collect();
        let mut spent = Vec::new();
        for &id in &bullet_ids {
            {
                let Some(bullet) = self.world.bullet_mut(id) else {
                    continue;
                };
                bullet.clear_events();
                let step = heading_vec(bullet.direction) * bullet.speed;
                bullet.position += step;
            }
            if self.resolver.hit_test_bullet(&mut self.world, id) {
                spent.push(id);
            }
        }
        spent
    }

    /// Applies damage and scoring for this tick's impacts, then removes the
    /// spent bullets.
    fn apply_impacts(&mut self, spent: Vec<BulletId>) {
        for impact in self.resolver.take_impacts() {
            let Some(bullet) = self.world.bullet(impact.bullet) else {
                continue;
            };
            let damage = bullet.damage();
            let owner = bullet.owner();

            if let Some(victim) = self.world.tank_mut(impact.victim) {
                if victim.apply_damage(damage) {
                    debug!(victim = %impact.victim, "tank destroyed");
                }
            }
            if let Some(owner_tank) = self.world.tank_mut(owner) {
                owner_tank.score += damage;
            }
        }
        for id in spent {
            self.world.despawn_bullet(id);
        }
    }

    /// Radar sweeps for every live tank: enemies first, then bullets.
    fn scan(&mut self, tank_ids: &[TankId]) {
        for &id in tank_ids {
            if !self.world.tank(id).is_some_and(|t| t.alive) {
                continue;
            }
            self.resolver.scan_tanks(&mut self.world, id);
            self.resolver.scan_bullets(&mut self.world, id);
        }
    }

    /// Number of distinct sides still standing (teams, or lone tanks).
    fn sides_remaining(&self) -> usize {
        let sides: BTreeSet<&str> = self
            .world
            .tanks()
            .filter(|t| t.alive)
            .map(|t| t.team().unwrap_or_else(|| t.name()))
            .collect();
        sides.len()
    }

    /// Ends the match and settles the winner: highest score across all
    /// participants, dead or alive.
    fn finish(&mut self) {
        self.status = MatchStatus::Finished;
        self.winner = self
            .world
            .tanks()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
            .map(Tank::id);
        debug!(winner = ?self.winner, tick = self.tick, "match finished");
    }

    /// Picks a seeded random position with clearance from everyone already
    /// placed.
    fn find_spawn_position(&mut self) -> Option<Vec2> {
        let battlefield = *self.resolver.battlefield();
        let margin = TANK_RADIUS * 2.0;
        if battlefield.width() <= margin * 2.0 || battlefield.height() <= margin * 2.0 {
            return None;
        }
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = Vec2::new(
                self.rng.gen_range(margin..battlefield.width() - margin),
                self.rng.gen_range(margin..battlefield.height() - margin),
            );
            let clear = self
                .world
                .tanks()
                .all(|tank| tank.position.distance(candidate) >= SPAWN_CLEARANCE);
            if clear {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tank_match() -> (Simulation, TankId, TankId) {
        let mut sim = Simulation::new(500.0, 500.0, 42);
        let a = sim.add_tank(TankDefinition::new("alpha")).unwrap();
        let b = sim.add_tank(TankDefinition::new("bravo")).unwrap();
        (sim, a, b)
    }

    /// Parks a tank at a known pose with all controls zeroed.
    fn place(sim: &mut Simulation, id: TankId, position: Vec2, angle: f32) {
        let tank = sim.world_mut().tank_mut(id).unwrap();
        tank.position = position;
        tank.angle = angle;
        tank.radar_angle = 0.0;
        tank.throttle = 0.0;
        tank.turn = 0.0;
        tank.radar_turn = 0.0;
    }

    mod add_tank_tests {
        use super::*;

        #[test]
        fn assigns_ids_and_clear_positions() {
            let (sim, a, b) = two_tank_match();

            assert_ne!(a, b);
            let pos_a = sim.world().tank(a).unwrap().position;
            let pos_b = sim.world().tank(b).unwrap().position;
            assert!(pos_a.distance(pos_b) >= SPAWN_CLEARANCE);

            let battlefield = sim.resolver().battlefield();
            assert!(battlefield.contains_circle(pos_a, TANK_RADIUS));
            assert!(battlefield.contains_circle(pos_b, TANK_RADIUS));
        }

        #[test]
        fn rejects_empty_name() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let err = sim.add_tank(TankDefinition::new("  ")).unwrap_err();
            assert!(matches!(err, SimulationError::InvalidDefinition { .. }));
        }

        #[test]
        fn rejects_duplicate_name_with_descriptive_error() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            sim.add_tank(TankDefinition::new("bravo")).unwrap();
            let err = sim.add_tank(TankDefinition::new("bravo")).unwrap_err();

            assert!(matches!(err, SimulationError::DuplicateTank { .. }));
            assert!(err.to_string().contains("bravo"));
        }

        #[test]
        fn rejects_joining_a_started_match() {
            let (mut sim, _, _) = two_tank_match();
            sim.start().unwrap();

            let err = sim.add_tank(TankDefinition::new("late")).unwrap_err();
            assert!(matches!(err, SimulationError::MatchAlreadyStarted));
        }

        #[test]
        fn a_bad_definition_does_not_poison_the_match() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            sim.add_tank(TankDefinition::new("alpha")).unwrap();
            sim.add_tank(TankDefinition::new("alpha")).unwrap_err();
            sim.add_tank(TankDefinition::new("bravo")).unwrap();

            assert_eq!(sim.world().tank_count(), 2);
            assert!(sim.start().is_ok());
        }

        #[test]
        fn fails_when_battlefield_cannot_fit_a_tank() {
            let mut sim = Simulation::new(50.0, 50.0, 1);
            let err = sim.add_tank(TankDefinition::new("alpha")).unwrap_err();
            assert!(matches!(err, SimulationError::NoSpawnPosition { .. }));
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn start_requires_two_tanks() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            sim.add_tank(TankDefinition::new("solo")).unwrap();

            let err = sim.start().unwrap_err();
            assert!(matches!(err, SimulationError::NotEnoughTanks { count: 1 }));
        }

        #[test]
        fn start_twice_errors() {
            let (mut sim, _, _) = two_tank_match();
            sim.start().unwrap();
            assert!(matches!(
                sim.start().unwrap_err(),
                SimulationError::MatchAlreadyStarted
            ));
        }

        #[test]
        fn stop_settles_a_winner_by_score() {
            let (mut sim, a, b) = two_tank_match();
            sim.start().unwrap();
            sim.world_mut().tank_mut(b).unwrap().score = 30.0;
            sim.world_mut().tank_mut(a).unwrap().score = 10.0;

            sim.stop();

            assert_eq!(sim.status(), MatchStatus::Finished);
            assert_eq!(sim.winner(), Some(b));
        }

        #[test]
        fn step_after_finish_is_a_noop() {
            let (mut sim, _, _) = two_tank_match();
            sim.stop();
            let tick = sim.tick();
            sim.step();
            assert_eq!(sim.tick(), tick);
        }

        #[test]
        fn run_frame_respects_speed_multiplier() {
            let (mut sim, a, b) = two_tank_match();
            place(&mut sim, a, Vec2::new(100.0, 100.0), 0.0);
            place(&mut sim, b, Vec2::new(400.0, 400.0), 0.0);

            sim.set_speed(3.0);
            sim.run_frame();
            assert_eq!(sim.tick(), 3);

            sim.set_speed(0.5);
            sim.run_frame();
            assert_eq!(sim.tick(), 3);
            sim.run_frame();
            assert_eq!(sim.tick(), 4);
        }

        #[test]
        fn set_speed_clamps_non_positive_values() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            sim.set_speed(-2.0);
            assert!(sim.speed() > 0.0);
        }
    }

    mod tick_tests {
        use super::*;
        use crate::entity::{BULLET_SPEED, DAMAGE_PER_POWER, TANK_ENERGY};

        #[test]
        fn throttle_moves_a_tank_along_its_heading() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let id = sim
                .world_mut()
                .spawn_tank("t", None, Vec2::new(250.0, 250.0), 0.0);
            sim.world_mut().tank_mut(id).unwrap().throttle = 1.0;

            sim.step();

            let tank = sim.world().tank(id).unwrap();
            assert!((tank.position.x - (250.0 + TANK_SPEED)).abs() < 1e-4);
            assert!(tank.events().is_empty());
        }

        #[test]
        fn turn_rates_are_clamped() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let id = sim
                .world_mut()
                .spawn_tank("t", None, Vec2::new(250.0, 250.0), 0.0);
            {
                let tank = sim.world_mut().tank_mut(id).unwrap();
                tank.turn = 90.0;
                tank.radar_turn = 90.0;
            }

            sim.step();

            let tank = sim.world().tank(id).unwrap();
            assert!((tank.angle - MAX_TURN_RATE).abs() < 1e-4);
            assert!((tank.radar_angle - MAX_RADAR_TURN_RATE).abs() < 1e-4);
        }

        #[test]
        fn wall_collision_rolls_back_and_costs_energy() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let id = sim
                .world_mut()
                .spawn_tank("t", None, Vec2::new(19.0, 250.0), 180.0);
            sim.world_mut().tank_mut(id).unwrap().throttle = 1.0;

            sim.step();

            let tank = sim.world().tank(id).unwrap();
            assert!((tank.position.x - 19.0).abs() < 1e-4);
            assert!(tank.events().contains(&TankEvent::WallHit));
            assert!((tank.energy - (TANK_ENERGY - WALL_HIT_DAMAGE)).abs() < 1e-4);
            // Rolled-back tanks stay registered at their old position.
            assert!(sim.resolver().registered_tanks().contains(&id));
        }

        #[test]
        fn ram_collision_hurts_only_the_moving_tank() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let blocker = sim
                .world_mut()
                .spawn_tank("blocker", None, Vec2::new(200.0, 200.0), 0.0);
            let rammer = sim
                .world_mut()
                .spawn_tank("rammer", None, Vec2::new(237.0, 200.0), 180.0);
            sim.world_mut().tank_mut(rammer).unwrap().throttle = 1.0;

            sim.step();

            let rammer_tank = sim.world().tank(rammer).unwrap();
            assert!((rammer_tank.position.x - 237.0).abs() < 1e-4);
            assert!(rammer_tank.events().contains(&TankEvent::EnemyHit));
            assert!((rammer_tank.energy - (TANK_ENERGY - RAM_DAMAGE)).abs() < 1e-4);

            let blocker_tank = sim.world().tank(blocker).unwrap();
            assert_eq!(blocker_tank.energy, TANK_ENERGY);
            assert!(!blocker_tank.events().contains(&TankEvent::EnemyHit));
        }

        #[test]
        fn firing_spawns_a_bullet_and_starts_reload() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let id = sim
                .world_mut()
                .spawn_tank("t", None, Vec2::new(250.0, 250.0), 0.0);
            sim.world_mut().tank_mut(id).unwrap().fire(1.0);

            sim.step();

            assert_eq!(sim.world().bullet_count(), 1);
            let bullet = sim.world().bullets().next().unwrap();
            assert_eq!(bullet.owner(), id);
            // Muzzle offset plus one tick of flight.
            let expected_x = 250.0 + TANK_RADIUS + BULLET_SPEED;
            assert!((bullet.position.x - expected_x).abs() < 1e-3);
            assert!(sim.world().tank(id).unwrap().is_reloading());
        }

        #[test]
        fn bullets_eventually_hit_a_downrange_tank() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let shooter = sim
                .world_mut()
                .spawn_tank("shooter", None, Vec2::new(100.0, 250.0), 0.0);
            let victim = sim
                .world_mut()
                .spawn_tank("victim", None, Vec2::new(200.0, 250.0), 0.0);
            sim.world_mut().tank_mut(shooter).unwrap().fire(1.0);

            for _ in 0..30 {
                sim.step();
            }

            assert_eq!(sim.world().bullet_count(), 0);
            let victim_tank = sim.world().tank(victim).unwrap();
            assert!((victim_tank.energy - (TANK_ENERGY - DAMAGE_PER_POWER)).abs() < 1e-3);
            let shooter_tank = sim.world().tank(shooter).unwrap();
            assert!((shooter_tank.score - DAMAGE_PER_POWER).abs() < 1e-3);
        }

        #[test]
        fn resize_takes_effect_on_the_next_tick() {
            let mut sim = Simulation::new(500.0, 500.0, 1);
            let id = sim
                .world_mut()
                .spawn_tank("t", None, Vec2::new(450.0, 250.0), 0.0);

            sim.step();
            assert!(sim.world().tank(id).unwrap().events().is_empty());

            sim.resize(400.0, 400.0);
            sim.step();
            assert!(sim
                .world()
                .tank(id)
                .unwrap()
                .events()
                .contains(&TankEvent::WallHit));
        }
    }

    mod match_end_tests {
        use super::*;

        #[test]
        fn match_finishes_when_one_side_remains() {
            let (mut sim, shooter, victim) = two_tank_match();
            sim.start().unwrap();
            place(&mut sim, shooter, Vec2::new(100.0, 250.0), 0.0);
            place(&mut sim, victim, Vec2::new(200.0, 250.0), 0.0);
            sim.world_mut().tank_mut(victim).unwrap().energy = 5.0;
            sim.world_mut().tank_mut(shooter).unwrap().fire(1.0);

            for _ in 0..30 {
                sim.step();
            }

            assert_eq!(sim.status(), MatchStatus::Finished);
            assert!(!sim.world().tank(victim).unwrap().alive);
            assert_eq!(sim.winner(), Some(shooter));
            assert_eq!(sim.winning_team(), None);
        }

        #[test]
        fn a_single_team_counts_as_one_side() {
            let mut sim = Simulation::new(500.0, 500.0, 7);
            let a = sim
                .add_tank(TankDefinition::new("alpha").with_team("red"))
                .unwrap();
            let _b = sim
                .add_tank(TankDefinition::new("bravo").with_team("red"))
                .unwrap();
            sim.start().unwrap();
            sim.world_mut().tank_mut(a).unwrap().score = 12.0;

            sim.step();

            assert_eq!(sim.status(), MatchStatus::Finished);
            assert_eq!(sim.winner(), Some(a));
            assert_eq!(sim.winning_team(), Some("red"));
            assert_eq!(sim.team_list(), vec!["red"]);
        }

        #[test]
        fn tank_list_reports_all_participants_in_join_order() {
            let (mut sim, a, b) = two_tank_match();
            sim.start().unwrap();
            sim.world_mut().tank_mut(b).unwrap().alive = false;
            sim.step();

            let listed: Vec<TankId> = sim.tank_list().map(Tank::id).collect();
            assert_eq!(listed, vec![a, b]);
        }
    }
}
