//! Capability traits and event types for resolver notifications.
//!
//! The collision resolver never mutates combat state directly. When it
//! detects something (a wall hit, an overlap, a radar contact) it notifies
//! the entities involved through a fixed capability set per entity kind:
//! [`TankSink`] for tanks, [`BulletSink`] for bullets. A single detection may
//! notify two independent parties (the scanning tank *and* the scanned
//! target), which is why the callbacks live on the entities rather than on
//! the resolver.
//!
//! The concrete entity types implement these traits by recording typed events
//! ([`TankEvent`], [`BulletEvent`]) into a per-tick queue. The queue is the
//! input surface for whatever controls the entity: the driver reads it to
//! apply collision damage, and AI scripts read it as their sensor feed.
//!
//! Events carry entity ids, not references; consumers resolve them against
//! the [`World`](crate::world::World) that owns the entities.

use serde::{Deserialize, Serialize};

use super::{BulletId, TankId};

/// Collision and sensor callbacks a tank must accept.
///
/// All methods are side-effecting notifications; the resolver never consumes
/// a return value.
pub trait TankSink {
    /// The tank's footprint crossed a battlefield edge this tick.
    fn on_wall_hit(&mut self);

    /// The tank drove into another tank that was checked earlier this tick.
    fn on_enemy_hit(&mut self);

    /// The tank's radar cone picked up an enemy; `target` is the closest one.
    fn on_enemy_spot(&mut self, target: TankId);

    /// Another tank's radar acquired this tank.
    fn on_targeting_alarm(&mut self);

    /// The tank's radar cone picked up an in-flight bullet.
    fn on_bullet_spot(&mut self, bullet: BulletId);
}

/// Collision callbacks a bullet must accept.
///
/// Both notifications are terminal: a bullet that hits anything is spent.
pub trait BulletSink {
    /// The bullet left the battlefield.
    fn on_wall_hit(&mut self);

    /// The bullet struck a tank other than its owner.
    fn on_enemy_hit(&mut self);
}

/// A notification recorded on a tank during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankEvent {
    /// Collided with a battlefield edge; movement was rolled back.
    WallHit,
    /// Collided with another tank; movement was rolled back.
    EnemyHit,
    /// Radar detected an enemy tank.
    EnemySpotted {
        /// The detected tank.
        target: TankId,
    },
    /// This tank was acquired by an enemy radar.
    TargetingAlarm,
    /// Radar detected an in-flight bullet.
    BulletSpotted {
        /// The detected bullet.
        bullet: BulletId,
    },
}

/// A notification recorded on a bullet during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletEvent {
    /// Flew out of the battlefield; the bullet is spent.
    WallHit,
    /// Struck an enemy tank; the bullet is spent.
    EnemyHit,
}
