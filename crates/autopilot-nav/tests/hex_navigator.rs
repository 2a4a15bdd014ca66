use autopilot_core::{embedded_rules, CivId, GameMap, Hex, UnitId, World};
use autopilot_nav::{HexNavigator, Navigator, ROAD_STEP_MILLI};

const ROME: CivId = CivId(0);
const CARTHAGE: CivId = CivId(1);

fn plains_world(width: u32, height: u32) -> World {
    let rules = embedded_rules().expect("rules load");
    let plains = rules.terrain_id("plains").expect("plains");
    World::new(rules, GameMap::new(width, height, plains), &["Rome", "Carthage"])
}

fn set_terrain(world: &mut World, hex: Hex, key: &str) {
    let terrain = world.rules().terrain_id(key).expect("terrain");
    world.map_mut().get_mut(hex).expect("tile").terrain = terrain;
}

fn warrior(world: &mut World, hex: Hex) -> UnitId {
    world.spawn_unit_named("warrior", ROME, hex).expect("spawn")
}

#[test]
fn open_terrain_range_is_bounded_by_movement() {
    let mut world = plains_world(10, 10);
    let start = Hex::new(4, 4);
    let unit = warrior(&mut world, start);

    let range = HexNavigator.movement_range(&world, unit);

    assert_eq!(range.cost_milli(start), Some(0));
    assert_eq!(range.cost_milli(Hex::new(5, 4)), Some(1000));
    assert_eq!(range.cost_milli(Hex::new(6, 4)), Some(2000));
    assert!(range.exhausts(Hex::new(6, 4)));
    assert!(!range.contains(Hex::new(7, 4)));
    assert_eq!(range.len(), 19);
}

#[test]
fn last_movement_point_always_buys_one_step() {
    let mut world = plains_world(10, 10);
    let start = Hex::new(4, 4);
    let hills = Hex::new(5, 4);
    set_terrain(&mut world, hills, "hills");
    let unit = warrior(&mut world, start);
    world.set_movement(unit, 1.0).expect("set");

    let range = HexNavigator.movement_range(&world, unit);

    assert_eq!(range.cost_milli(hills), Some(1000));
    assert!(range.exhausts(hills));
    assert!(!range.contains(Hex::new(6, 4)));
}

#[test]
fn roads_cost_a_third() {
    let mut world = plains_world(10, 3);
    for q in 0..10 {
        world.map_mut().get_mut(Hex::new(q, 1)).expect("tile").road = true;
    }
    let unit = warrior(&mut world, Hex::new(0, 1));

    let range = HexNavigator.movement_range(&world, unit);

    assert_eq!(range.cost_milli(Hex::new(6, 1)), Some(6 * ROAD_STEP_MILLI));
    assert!(range.contains(Hex::new(7, 1)));
    assert!(!range.contains(Hex::new(8, 1)));
}

#[test]
fn path_goes_around_mountains_and_may_end_on_enemy_city() {
    let mut world = plains_world(8, 8);
    for r in 0..7 {
        set_terrain(&mut world, Hex::new(3, r), "mountain");
    }
    let unit = warrior(&mut world, Hex::new(1, 1));
    let target = Hex::new(5, 1);
    world.add_city("Carthage", CARTHAGE, target).expect("city");

    let path = HexNavigator.shortest_path(&world, unit, target);

    assert_eq!(path.last().copied(), Some(target));
    assert!(path.iter().all(|h| h.r == 7 || h.q != 3));
    assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
    assert!(HexNavigator.can_reach(&world, unit, target));
    assert_eq!(path, HexNavigator.shortest_path(&world, unit, target));
}

#[test]
fn walled_in_unit_reaches_nothing() {
    let mut world = plains_world(8, 8);
    let start = Hex::new(4, 4);
    for n in start.neighbors() {
        set_terrain(&mut world, n, "mountain");
    }
    let unit = warrior(&mut world, start);

    assert!(HexNavigator.movement_range(&world, unit).is_empty());
    assert!(HexNavigator.shortest_path(&world, unit, Hex::new(0, 0)).is_empty());
    assert!(!HexNavigator.can_reach(&world, unit, Hex::new(0, 0)));
    assert!(HexNavigator.can_reach(&world, unit, start));
}

#[test]
fn head_towards_stops_short_of_an_occupied_destination() {
    let mut world = plains_world(10, 3);
    let unit = warrior(&mut world, Hex::new(0, 1));
    let enemy_city = Hex::new(2, 1);
    world.add_city("Carthage", CARTHAGE, enemy_city).expect("city");

    let moved = HexNavigator
        .head_towards(&mut world, unit, enemy_city)
        .expect("move");

    assert_eq!(moved, Some(Hex::new(1, 1)));
    assert_eq!(world.unit(unit).unwrap().position, Hex::new(1, 1));
    assert_eq!(world.unit(unit).unwrap().movement, 1.0);
}

#[test]
fn head_towards_spends_the_whole_turn_on_long_routes() {
    let mut world = plains_world(12, 3);
    let unit = warrior(&mut world, Hex::new(0, 1));

    let moved = HexNavigator
        .head_towards(&mut world, unit, Hex::new(10, 1))
        .expect("move");

    assert_eq!(moved.map(|h| h.distance(Hex::new(0, 1))), Some(2));
    assert_eq!(world.unit(unit).unwrap().movement, 0.0);
}
