//! World store for simulation entities.
//!
//! The `World` is the container the simulation driver owns for all tanks and
//! bullets in a match. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Monotonic id allocation per entity kind
//! - Entity lifecycle management (spawn/despawn)
//!
//! # Determinism
//!
//! Ids are assigned monotonically and storage is a `BTreeMap`, so iterating
//! entities always visits them in join order on every platform. The driver
//! relies on this to feed the collision resolver in a consistent order tick
//! after tick, which the resolver's order-sensitive contracts require.
//!
//! The `World` itself performs no collision or sensing logic; the
//! [`CollisionResolver`](crate::resolver::CollisionResolver) borrows it per
//! operation.
//!
//! # Example
//!
//! ```
//! use hulldown_core::world::World;
//! use glam::Vec2;
//!
//! let mut world = World::new();
//! let id = world.spawn_tank("alpha", None, Vec2::new(100.0, 100.0), 0.0);
//!
//! assert_eq!(world.tank(id).unwrap().name(), "alpha");
//! assert_eq!(world.tank_count(), 1);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Bullet, BulletId, Tank, TankId};

/// Store of all entities participating in a match.
///
/// One instance exists per match, owned by the simulation driver and
/// discarded when the match ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Monotonically increasing tank id counter.
    next_tank_id: u64,
    /// Monotonically increasing bullet id counter.
    next_bullet_id: u64,
    /// Tank storage with deterministic iteration order.
    tanks: BTreeMap<TankId, Tank>,
    /// Bullet storage with deterministic iteration order.
    bullets: BTreeMap<BulletId, Bullet>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a tank at the given position and heading.
    ///
    /// The tank gets the next free id and default footprint, energy and
    /// radar reach.
    pub fn spawn_tank(
        &mut self,
        name: impl Into<String>,
        team: Option<String>,
        position: Vec2,
        angle: f32,
    ) -> TankId {
        let id = TankId::new(self.next_tank_id);
        self.next_tank_id += 1;
        self.tanks
            .insert(id, Tank::new(id, name, team, position, angle));
        id
    }

    /// Spawns a bullet fired by `owner` with the given power.
    pub fn spawn_bullet(
        &mut self,
        owner: TankId,
        position: Vec2,
        direction: f32,
        power: f32,
    ) -> BulletId {
        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id += 1;
        self.bullets
            .insert(id, Bullet::new(id, owner, position, direction, power));
        id
    }

    /// Removes a tank from the world, returning it if it existed.
    pub fn despawn_tank(&mut self, id: TankId) -> Option<Tank> {
        self.tanks.remove(&id)
    }

    /// Removes a bullet from the world, returning it if it existed.
    pub fn despawn_bullet(&mut self, id: BulletId) -> Option<Bullet> {
        self.bullets.remove(&id)
    }

    /// Returns a reference to a tank by id.
    #[must_use]
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    /// Returns a mutable reference to a tank by id.
    #[must_use]
    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(&id)
    }

    /// Returns a reference to a bullet by id.
    #[must_use]
    pub fn bullet(&self, id: BulletId) -> Option<&Bullet> {
        self.bullets.get(&id)
    }

    /// Returns a mutable reference to a bullet by id.
    #[must_use]
    pub fn bullet_mut(&mut self, id: BulletId) -> Option<&mut Bullet> {
        self.bullets.get_mut(&id)
    }

    /// Returns an iterator over tank ids in deterministic (join) order.
    pub fn tank_ids(&self) -> impl Iterator<Item = TankId> + '_ {
        self.tanks.keys().copied()
    }

    /// Returns an iterator over bullet ids in deterministic order.
    pub fn bullet_ids(&self) -> impl Iterator<Item = BulletId> + '_ {
        self.bullets.keys().copied()
    }

    /// Returns an iterator over tanks in deterministic order.
    pub fn tanks(&self) -> impl Iterator<Item = &Tank> + '_ {
        self.tanks.values()
    }

    /// Returns an iterator over bullets in deterministic order.
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> + '_ {
        self.bullets.values()
    }

    /// Returns the number of tanks in the world.
    #[must_use]
    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    /// Returns the number of bullets in the world.
    #[must_use]
    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }
}
