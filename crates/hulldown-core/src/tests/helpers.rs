//! Test helper functions for setting up worlds, resolvers and matches.

use glam::Vec2;

use crate::battlefield::Battlefield;
use crate::entity::TankId;
use crate::resolver::CollisionResolver;
use crate::simulation::{Simulation, TankDefinition};
use crate::world::World;

/// Standard battlefield dimensions used across the reference scenarios.
pub const FIELD: f32 = 500.0;

/// Creates an empty world and a resolver for the standard 500×500 field.
pub fn combat_setup() -> (World, CollisionResolver) {
    (
        World::new(),
        CollisionResolver::new(Battlefield::new(FIELD, FIELD)),
    )
}

/// Spawns a teamless tank with default components at the given position.
pub fn spawn_tank_at(world: &mut World, name: &str, position: Vec2) -> TankId {
    world.spawn_tank(name, None, position, 0.0)
}

/// Spawns a tank with its radar pointed along its hull heading and the given
/// reach.
pub fn spawn_scanner(
    world: &mut World,
    name: &str,
    position: Vec2,
    angle: f32,
    radar_range: f32,
) -> TankId {
    let id = world.spawn_tank(name, None, position, angle);
    let tank = world.tank_mut(id).expect("freshly spawned tank");
    tank.radar_angle = 0.0;
    tank.radar_range = radar_range;
    id
}

/// Checks a batch of tanks in order, asserting that every check passes.
pub fn check_all(resolver: &mut CollisionResolver, world: &mut World, ids: &[TankId]) {
    for &id in ids {
        assert!(
            resolver.check_tank(world, id),
            "expected clear position for tank {id}"
        );
    }
}

/// Creates a pending two-tank match with the given seed.
pub fn two_tank_sim(seed: u64) -> (Simulation, TankId, TankId) {
    let mut sim = Simulation::new(FIELD, FIELD, seed);
    let a = sim
        .add_tank(TankDefinition::new("alpha"))
        .expect("roster slot for alpha");
    let b = sim
        .add_tank(TankDefinition::new("bravo"))
        .expect("roster slot for bravo");
    (sim, a, b)
}

/// Parks a tank at a known pose with zeroed controls, bypassing the seeded
/// placement.
pub fn park(sim: &mut Simulation, id: TankId, position: Vec2, angle: f32) {
    let tank = sim
        .world_mut()
        .tank_mut(id)
        .expect("parked tank must exist");
    tank.position = position;
    tank.angle = angle;
    tank.radar_angle = 0.0;
    tank.throttle = 0.0;
    tank.turn = 0.0;
    tank.radar_turn = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_setup_uses_reference_field() {
        let (world, resolver) = combat_setup();
        assert_eq!(world.tank_count(), 0);
        assert_eq!(resolver.battlefield().width(), FIELD);
        assert_eq!(resolver.battlefield().height(), FIELD);
    }

    #[test]
    fn spawn_scanner_configures_radar() {
        let (mut world, _) = combat_setup();
        let id = spawn_scanner(&mut world, "s", Vec2::new(200.0, 200.0), 90.0, 500.0);

        let tank = world.tank(id).unwrap();
        assert_eq!(tank.radar_range, 500.0);
        assert_eq!(tank.radar_heading(), 90.0);
    }

    #[test]
    fn two_tank_sim_places_distinct_tanks() {
        let (sim, a, b) = two_tank_sim(42);
        assert_ne!(a, b);
        assert_eq!(sim.world().tank_count(), 2);
    }

    #[test]
    fn park_zeroes_controls() {
        let (mut sim, a, _) = two_tank_sim(42);
        park(&mut sim, a, Vec2::new(123.0, 321.0), 45.0);

        let tank = sim.world().tank(a).unwrap();
        assert_eq!(tank.position, Vec2::new(123.0, 321.0));
        assert_eq!(tank.angle, 45.0);
        assert_eq!(tank.throttle, 0.0);
    }
}
