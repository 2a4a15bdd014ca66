use autopilot_core::{embedded_rules, CivId, GameMap, Hex, World};
use autopilot_nav::{HexNavigator, Navigator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_hex_navigator(c: &mut Criterion) {
    let rules = embedded_rules().expect("rules load");
    let plains = rules.terrain_id("plains").expect("plains");
    let hills = rules.terrain_id("hills").expect("hills");
    let mut world = World::new(rules, GameMap::new(64, 64, plains), &["Rome"]);
    for q in (4..60).step_by(7) {
        for r in 0..56 {
            if let Some(tile) = world.map_mut().get_mut(Hex::new(q, r)) {
                tile.terrain = hills;
            }
        }
    }
    let unit = world
        .spawn_unit_named("horseman", CivId(0), Hex::new(1, 1))
        .expect("spawn");
    let goal = Hex::new(62, 62);

    let mut group = c.benchmark_group("autopilot-nav/hex");

    group.bench_function("movement_range", |b| {
        b.iter(|| {
            let range = HexNavigator.movement_range(&world, unit);
            black_box(range.len());
        })
    });

    group.bench_function("shortest_path", |b| {
        b.iter(|| {
            let path = HexNavigator.shortest_path(&world, unit, goal);
            black_box(path.len());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_hex_navigator);
criterion_main!(benches);
