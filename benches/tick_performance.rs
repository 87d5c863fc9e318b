use criterion::{black_box, criterion_group, criterion_main, Criterion};
use intersection_sim::config::SimulationConfig;
use intersection_sim::simulation::{Direction, Intersection};

fn loaded_simulation() -> Intersection {
    let config = SimulationConfig::load_from_files("intersection.toml", "vehicles.toml")
        .expect("Failed to load configuration");
    let mut simulation = Intersection::new(config, 1.0 / 60.0, Some(42));

    // Build up realistic traffic before measuring.
    for _ in 0..25 {
        for direction in Direction::ALL {
            let _ = simulation.spawn_request(direction, None);
        }
        for _ in 0..20 {
            simulation.tick();
        }
    }
    simulation
}

fn benchmark_tick(c: &mut Criterion) {
    let mut simulation = loaded_simulation();

    c.bench_function("intersection_tick", |b| {
        b.iter(|| {
            for direction in Direction::ALL {
                let _ = simulation.spawn_request(direction, None);
            }
            black_box(simulation.tick());
        });
    });
}

fn benchmark_snapshot(c: &mut Criterion) {
    let simulation = loaded_simulation();

    c.bench_function("intersection_snapshot", |b| {
        b.iter(|| black_box(simulation.snapshot()));
    });
}

criterion_group!(benches, benchmark_tick, benchmark_snapshot);
criterion_main!(benches);
