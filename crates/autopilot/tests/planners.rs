use autopilot::planners::{
    attackable_enemies, best_healing_tile, choose_attack, contains_attackable_enemy,
    rank_city_sites,
};
use autopilot::{AutomationConfig, AutomationContext, Services, StrengthCombatResolver, UnitTurn};
use autopilot_core::{embedded_rules, CivId, GameMap, Hex, TurnContext, World};
use autopilot_nav::{HexNavigator, MovementRange, Navigator};

const ROME: CivId = CivId(0);
const CARTHAGE: CivId = CivId(1);

fn world_of(width: u32, height: u32, terrain: &str) -> World {
    let rules = embedded_rules().expect("rules load");
    let terrain = rules.terrain_id(terrain).expect("terrain");
    World::new(rules, GameMap::new(width, height, terrain), &["Rome", "Carthage"])
}

fn set_terrain(world: &mut World, hex: Hex, key: &str) {
    let terrain = world.rules().terrain_id(key).expect("terrain");
    world.map_mut().get_mut(hex).expect("tile").terrain = terrain;
}

#[test]
fn attack_tiles_need_more_than_the_slack_left() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    let warrior = world
        .spawn_unit_named("warrior", ROME, Hex::new(5, 5))
        .expect("spawn");
    world
        .spawn_unit_named("warrior", CARTHAGE, Hex::new(7, 5))
        .expect("spawn");
    let from = Hex::new(6, 5);
    let slack = AutomationConfig::default().attack_slack_milli();

    let tight = MovementRange::from_costs(Hex::new(5, 5), 2000, [(from, 1900)]);
    assert!(attackable_enemies(&world, warrior, &tight, slack).is_empty());

    let loose = MovementRange::from_costs(Hex::new(5, 5), 2000, [(from, 1899)]);
    let attacks = attackable_enemies(&world, warrior, &loose, slack);
    assert_eq!(attacks.len(), 1);
    assert_eq!(attacks[0].from, from);
    assert_eq!(attacks[0].to, Hex::new(7, 5));
}

#[test]
fn lethal_attacks_are_never_chosen() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    let warrior = world
        .spawn_unit_named("warrior", ROME, Hex::new(5, 5))
        .expect("spawn");
    world.damage_unit(warrior, 80).expect("damage");
    world
        .spawn_unit_named("swordsman", CARTHAGE, Hex::new(6, 5))
        .expect("spawn");

    let range = HexNavigator.movement_range(&world, warrior);
    let attacks = attackable_enemies(&world, warrior, &range, 100);
    assert!(!attacks.is_empty());
    assert_eq!(
        choose_attack(&world, warrior, &attacks, &StrengthCombatResolver),
        None
    );
}

#[test]
fn ranged_units_attack_from_where_they_stand() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    let archer = world
        .spawn_unit_named("archer", ROME, Hex::new(5, 5))
        .expect("spawn");
    world
        .spawn_unit_named("warrior", CARTHAGE, Hex::new(7, 5))
        .expect("spawn");

    let range = HexNavigator.movement_range(&world, archer);
    let attacks = attackable_enemies(&world, archer, &range, 100);
    let chosen = choose_attack(&world, archer, &attacks, &StrengthCombatResolver).expect("attack");
    assert_eq!(chosen.from, Hex::new(5, 5));
    assert_eq!(chosen.to, Hex::new(7, 5));
}

#[test]
fn hills_block_direct_fire_but_not_indirect_fire() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    for hex in Hex::new(5, 5).neighbors() {
        set_terrain(&mut world, hex, "hills");
    }
    let target = Hex::new(7, 5);
    world
        .spawn_unit_named("warrior", CARTHAGE, target)
        .expect("spawn");
    let catapult = world
        .spawn_unit_named("catapult", ROME, Hex::new(5, 5))
        .expect("spawn");
    let artillery = world
        .spawn_unit_named("artillery", ROME, Hex::new(4, 5))
        .expect("spawn");
    // Spotter with a clear view of the target.
    world
        .spawn_unit_named("scout", ROME, Hex::new(9, 5))
        .expect("spawn");

    // Pinned in place: only their own tiles count as attack positions.
    let pinned = |at: Hex| MovementRange::from_costs(at, 2000, []);
    assert!(attackable_enemies(&world, catapult, &pinned(Hex::new(5, 5)), 100).is_empty());
    let hits = attackable_enemies(&world, artillery, &pinned(Hex::new(4, 5)), 100);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].to, target);
}

#[test]
fn healing_prefers_defensive_terrain_among_equals() {
    let mut world = world_of(12, 12, "plains");
    let hills = Hex::new(6, 5);
    set_terrain(&mut world, hills, "hills");
    let warrior = world
        .spawn_unit_named("warrior", ROME, Hex::new(5, 5))
        .expect("spawn");

    let config = AutomationConfig::default();
    let services = Services::standard(&config);
    let ctx = AutomationContext {
        world: &mut world,
        services: &services,
        config: &config,
        turn: TurnContext::new(1, 1),
    };
    let mut turn = UnitTurn::new(warrior);
    assert_eq!(best_healing_tile(&ctx, &mut turn), Some(hills));
}

#[test]
fn city_sites_skip_the_exclusion_zone_and_are_ranked_best_first() {
    let mut world = world_of(16, 16, "plains");
    let carthage = Hex::new(8, 5);
    world.add_city("Carthage", CARTHAGE, carthage).expect("city");
    let grassland = Hex::new(3, 7);
    set_terrain(&mut world, grassland, "grassland");
    let settler = world
        .spawn_unit_named("settler", ROME, Hex::new(5, 5))
        .expect("spawn");

    let config = AutomationConfig::default();
    let services = Services::standard(&config);
    let ctx = AutomationContext {
        world: &mut world,
        services: &services,
        config: &config,
        turn: TurnContext::new(1, 1),
    };
    let sites = rank_city_sites(&ctx, settler);

    assert!(!sites.is_empty());
    assert!(sites.iter().all(|(hex, _)| hex.distance(carthage) > 3));
    assert!(sites.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn enemies_out_of_sight_are_not_targeted() {
    let mut world = world_of(14, 10, "plains");
    world.set_war(ROME, CARTHAGE, true);
    let archer = world
        .spawn_unit_named("archer", ROME, Hex::new(5, 5))
        .expect("spawn");
    let hidden = Hex::new(8, 5);
    world
        .spawn_unit_named("warrior", CARTHAGE, hidden)
        .expect("spawn");
    assert!(!world.viewable_tiles(ROME).contains(&hidden));

    let range = HexNavigator.movement_range(&world, archer);
    assert!(attackable_enemies(&world, archer, &range, 100).is_empty());

    world
        .spawn_unit_named("scout", ROME, Hex::new(10, 5))
        .expect("spawn");
    let attacks = attackable_enemies(&world, archer, &range, 100);
    assert!(!attacks.is_empty());
    assert!(attacks.iter().all(|a| a.to == hidden));
}

#[test]
fn equally_weak_targets_go_to_the_cheapest_approach_then_the_lowest_hex() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    let warrior = world
        .spawn_unit_named("warrior", ROME, Hex::new(5, 5))
        .expect("spawn");
    let (west, east) = (Hex::new(3, 5), Hex::new(7, 5));
    world.spawn_unit_named("warrior", CARTHAGE, west).expect("spawn");
    world.spawn_unit_named("warrior", CARTHAGE, east).expect("spawn");
    let origin = Hex::new(5, 5);

    let east_is_cheaper =
        MovementRange::from_costs(origin, 2000, [(Hex::new(4, 5), 1000), (Hex::new(6, 5), 500)]);
    let attacks = attackable_enemies(&world, warrior, &east_is_cheaper, 100);
    assert_eq!(attacks.len(), 2);
    let chosen = choose_attack(&world, warrior, &attacks, &StrengthCombatResolver).expect("attack");
    assert_eq!((chosen.from, chosen.to), (Hex::new(6, 5), east));

    let same_cost =
        MovementRange::from_costs(origin, 2000, [(Hex::new(4, 5), 1000), (Hex::new(6, 5), 1000)]);
    let attacks = attackable_enemies(&world, warrior, &same_cost, 100);
    let chosen = choose_attack(&world, warrior, &attacks, &StrengthCombatResolver).expect("attack");
    assert_eq!((chosen.from, chosen.to), (Hex::new(4, 5), west));
}

#[test]
fn embarked_units_have_limited_targets() {
    let mut world = world_of(12, 12, "plains");
    world.set_war(ROME, CARTHAGE, true);
    for hex in [Hex::new(5, 5), Hex::new(6, 5), Hex::new(5, 6)] {
        set_terrain(&mut world, hex, "coast");
    }
    let on_land = Hex::new(4, 5);
    let at_sea = Hex::new(6, 5);
    world.spawn_unit_named("warrior", CARTHAGE, on_land).expect("spawn");
    world.spawn_unit_named("trireme", CARTHAGE, at_sea).expect("spawn");

    let warrior = world
        .spawn_unit_named("warrior", ROME, Hex::new(5, 5))
        .expect("spawn");
    assert!(world.is_embarked(warrior));
    assert!(contains_attackable_enemy(&world, on_land, warrior));
    assert!(!contains_attackable_enemy(&world, at_sea, warrior));

    let archer = world
        .spawn_unit_named("archer", ROME, Hex::new(5, 6))
        .expect("spawn");
    assert!(world.is_embarked(archer));
    assert!(!contains_attackable_enemy(&world, on_land, archer));
    assert!(!contains_attackable_enemy(&world, at_sea, archer));

    let ashore = world
        .spawn_unit_named("archer", ROME, Hex::new(3, 5))
        .expect("spawn");
    assert!(contains_attackable_enemy(&world, on_land, ashore));
    assert!(contains_attackable_enemy(&world, at_sea, ashore));
}

#[test]
fn equally_scored_city_sites_keep_spiral_order() {
    let mut world = world_of(30, 30, "plains");
    let start = Hex::new(15, 15);
    let settler = world
        .spawn_unit_named("settler", ROME, start)
        .expect("spawn");

    let config = AutomationConfig::default();
    let services = Services::standard(&config);
    let ctx = AutomationContext {
        world: &mut world,
        services: &services,
        config: &config,
        turn: TurnContext::new(1, 1),
    };
    let sites = rank_city_sites(&ctx, settler);

    assert!(sites.windows(2).all(|w| w[0].1 == w[1].1));
    let order: Vec<Hex> = sites.iter().map(|(hex, _)| *hex).collect();
    assert_eq!(order, start.spiral(config.site_candidate_radius));
}
