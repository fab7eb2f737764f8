//! Entity types for the combat simulation.
//!
//! This module provides the participants the resolver reasons about:
//! - [`TankId`] / [`BulletId`]: unique, ordered identifiers
//! - [`Tank`]: an autonomous combat agent with a circular footprint and a
//!   directional radar
//! - [`Bullet`]: an in-flight projectile with a damage-proportional footprint
//!
//! Identifiers are separate newtypes per entity kind so a radar scan can
//! never confuse a bullet contact with a tank contact at the type level.
//!
//! # Coordinate conventions
//!
//! Positions are in game units with the origin at the battlefield's top-left
//! corner. Angles are in degrees; 0° points along +x and angles grow toward
//! +y. A tank's radar cone is oriented along `angle + radar_angle`.

pub mod events;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use events::{BulletEvent, BulletSink, TankEvent, TankSink};

/// Default collision footprint radius for a tank, in game units.
pub const TANK_RADIUS: f32 = 18.0;

/// Energy a freshly constructed tank starts with.
pub const TANK_ENERGY: f32 = 100.0;

/// Default radar reach, in game units.
pub const TANK_RADAR_RANGE: f32 = 300.0;

/// Distance a bullet travels per tick.
pub const BULLET_SPEED: f32 = 4.0;

/// Damage dealt per unit of fire power.
pub const DAMAGE_PER_POWER: f32 = 10.0;

/// Collision radius of a bullet per unit of damage.
pub const BULLET_SIZE_PER_DAMAGE: f32 = 0.3;

/// Smallest accepted fire power.
pub const MIN_FIRE_POWER: f32 = 0.1;

/// Largest accepted fire power.
pub const MAX_FIRE_POWER: f32 = 5.0;

/// Unit vector for a heading given in degrees.
///
/// 0° points along +x; 90° points along +y (downward on screen).
#[must_use]
pub fn heading_vec(angle_deg: f32) -> Vec2 {
    let radians = angle_deg.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Unique identifier for a tank.
///
/// Ordered by numeric value; the owning [`World`](crate::world::World)
/// allocates ids monotonically so id order is also join order, which keeps
/// iteration deterministic.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TankId(u64);

impl TankId {
    /// Creates a `TankId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TankId({})", self.0)
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a bullet.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BulletId(u64);

impl BulletId {
    /// Creates a `BulletId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BulletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BulletId({})", self.0)
    }
}

impl fmt::Display for BulletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An autonomous combat agent.
///
/// Geometry and control fields are public: the driver integrates movement by
/// writing `position`/`angle` directly, and whatever controls the tank steers
/// it through `throttle`, `turn` and `radar_turn`. Identity, the reload
/// state and the event queue are managed through methods.
///
/// # Example
///
/// ```
/// use hulldown_core::entity::{Tank, TankId, TANK_RADIUS};
/// use glam::Vec2;
///
/// let tank = Tank::new(TankId::new(0), "rover", None, Vec2::new(200.0, 200.0), 0.0);
/// assert_eq!(tank.radius, TANK_RADIUS);
/// assert!(tank.alive);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    id: TankId,
    name: String,
    team: Option<String>,
    /// Center position in game units.
    pub position: Vec2,
    /// Hull heading in degrees.
    pub angle: f32,
    /// Radar heading in degrees, relative to the hull.
    pub radar_angle: f32,
    /// Radar reach in game units.
    pub radar_range: f32,
    /// Collision footprint radius.
    pub radius: f32,
    /// Remaining energy; the tank is destroyed at zero.
    pub energy: f32,
    /// Whether the tank is still in the fight.
    pub alive: bool,
    /// Accumulated score from damage dealt by this tank's bullets.
    pub score: f32,
    /// Requested drive, clamped to `[-1, 1]` by the driver.
    pub throttle: f32,
    /// Requested hull rotation in degrees per tick.
    pub turn: f32,
    /// Requested radar rotation in degrees per tick.
    pub radar_turn: f32,
    pending_fire: Option<f32>,
    reload: u32,
    events: Vec<TankEvent>,
}

impl Tank {
    /// Creates a tank at the given position and heading with default
    /// footprint, energy and radar reach.
    #[must_use]
    pub fn new(
        id: TankId,
        name: impl Into<String>,
        team: Option<String>,
        position: Vec2,
        angle: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            position,
            angle,
            radar_angle: 0.0,
            radar_range: TANK_RADAR_RANGE,
            radius: TANK_RADIUS,
            energy: TANK_ENERGY,
            alive: true,
            score: 0.0,
            throttle: 0.0,
            turn: 0.0,
            radar_turn: 0.0,
            pending_fire: None,
            reload: 0,
            events: Vec::new(),
        }
    }

    /// Returns the tank's unique identifier.
    #[must_use]
    pub const fn id(&self) -> TankId {
        self.id
    }

    /// Returns the tank's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tank's team, if it fights on one.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Absolute heading of the radar cone in degrees.
    #[must_use]
    pub fn radar_heading(&self) -> f32 {
        self.angle + self.radar_angle
    }

    /// Requests a shot with the given power.
    ///
    /// Power is clamped to `[MIN_FIRE_POWER, MAX_FIRE_POWER]`. The request is
    /// honored by the driver on the next tick the gun is loaded; a second
    /// request before then replaces the first.
    pub fn fire(&mut self, power: f32) {
        self.pending_fire = Some(power.clamp(MIN_FIRE_POWER, MAX_FIRE_POWER));
    }

    /// Takes the pending fire request if the gun is loaded.
    ///
    /// Counts down the reload timer as a side effect; the driver calls this
    /// exactly once per tick.
    pub fn take_fire_request(&mut self) -> Option<f32> {
        if self.reload > 0 {
            self.reload -= 1;
            return None;
        }
        self.pending_fire.take()
    }

    /// Starts a reload period of the given number of ticks.
    pub fn start_reload(&mut self, ticks: u32) {
        self.reload = ticks;
    }

    /// Returns `true` while the gun is reloading.
    #[must_use]
    pub const fn is_reloading(&self) -> bool {
        self.reload > 0
    }

    /// Applies damage and returns `true` if the tank was destroyed by it.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.energy -= amount;
        if self.energy <= 0.0 {
            self.energy = 0.0;
            self.alive = false;
            return true;
        }
        false
    }

    /// Notifications recorded since the last [`Self::clear_events`].
    #[must_use]
    pub fn events(&self) -> &[TankEvent] {
        &self.events
    }

    /// Clears the event queue; the driver calls this at the start of the
    /// tank's tick so consumers see exactly one tick's worth of events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl TankSink for Tank {
    fn on_wall_hit(&mut self) {
        self.events.push(TankEvent::WallHit);
    }

    fn on_enemy_hit(&mut self) {
        self.events.push(TankEvent::EnemyHit);
    }

    fn on_enemy_spot(&mut self, target: TankId) {
        self.events.push(TankEvent::EnemySpotted { target });
    }

    fn on_targeting_alarm(&mut self) {
        self.events.push(TankEvent::TargetingAlarm);
    }

    fn on_bullet_spot(&mut self, bullet: BulletId) {
        self.events.push(TankEvent::BulletSpotted { bullet });
    }
}

/// An in-flight projectile.
///
/// A bullet never owns its firing tank; it holds the owner's id so the
/// resolver can exclude self-hits. Damage and collision size are fixed at
/// fire time from the shot's power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    id: BulletId,
    owner: TankId,
    /// Center position in game units.
    pub position: Vec2,
    /// Flight direction in degrees.
    pub direction: f32,
    /// Distance travelled per tick.
    pub speed: f32,
    size: f32,
    damage: f32,
    events: Vec<BulletEvent>,
}

impl Bullet {
    /// Creates a bullet fired by `owner` with the given power.
    ///
    /// Damage scales linearly with power and the collision footprint scales
    /// linearly with damage.
    #[must_use]
    pub fn new(id: BulletId, owner: TankId, position: Vec2, direction: f32, power: f32) -> Self {
        let damage = power * DAMAGE_PER_POWER;
        Self {
            id,
            owner,
            position,
            direction,
            speed: BULLET_SPEED,
            size: damage * BULLET_SIZE_PER_DAMAGE,
            damage,
            events: Vec::new(),
        }
    }

    /// Returns the bullet's unique identifier.
    #[must_use]
    pub const fn id(&self) -> BulletId {
        self.id
    }

    /// Returns the id of the tank that fired this bullet.
    #[must_use]
    pub const fn owner(&self) -> TankId {
        self.owner
    }

    /// Collision footprint radius, proportional to damage.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Notifications recorded since the last [`Self::clear_events`].
    #[must_use]
    pub fn events(&self) -> &[BulletEvent] {
        &self.events
    }

    /// Clears the event queue at the start of the bullet's tick.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl BulletSink for Bullet {
    fn on_wall_hit(&mut self) {
        self.events.push(BulletEvent::WallHit);
    }

    fn on_enemy_hit(&mut self) {
        self.events.push(BulletEvent::EnemyHit);
    }
}
