use autopilot::{AutomationConfig, UnitAutomation};
use autopilot_core::{embedded_rules, CivId, GameMap, Hex, TurnContext, World};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const ROME: CivId = CivId(0);
const CARTHAGE: CivId = CivId(1);

fn skirmish() -> World {
    let rules = embedded_rules().expect("rules load");
    let plains = rules.terrain_id("plains").expect("plains");
    let forest = rules.terrain_id("forest").expect("forest");
    let mut world = World::new(rules, GameMap::new(48, 48, plains), &["Rome", "Carthage"]);
    for q in (6..42).step_by(9) {
        for r in 4..44 {
            if let Some(tile) = world.map_mut().get_mut(Hex::new(q, r)) {
                tile.terrain = forest;
            }
        }
    }
    world.set_war(ROME, CARTHAGE, true);
    world.add_city("Rome", ROME, Hex::new(4, 24)).expect("city");
    world.add_city("Carthage", CARTHAGE, Hex::new(44, 24)).expect("city");
    for (i, key) in ["warrior", "archer", "horseman", "catapult"].iter().enumerate() {
        let r = 18 + 3 * i as i32;
        world.spawn_unit_named(key, ROME, Hex::new(8, r)).expect("spawn");
        world.spawn_unit_named(key, CARTHAGE, Hex::new(40, r)).expect("spawn");
    }
    world
}

fn bench_decide(c: &mut Criterion) {
    let automation = UnitAutomation::standard(AutomationConfig::default());
    let world = skirmish();

    let mut group = c.benchmark_group("autopilot/decide");

    group.bench_function("civilization_turn", |b| {
        b.iter_batched(
            || world.clone(),
            |mut world| {
                let decided = automation
                    .decide_civilization(&mut world, TurnContext::new(1, 42), ROME)
                    .expect("decide");
                black_box(decided);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
