use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use horde_sim::{build_headless_app, run_tick, SimulationConfig};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for humans in [1_000usize, 5_000, 20_000] {
        group.bench_with_input(
            BenchmarkId::new("population", humans),
            &humans,
            |b, &humans| {
                b.iter_batched(
                    || {
                        let mut config = SimulationConfig::default();
                        config.population.human_count = humans;
                        config.population.zombie_count = humans / 100;
                        let width = (humans as f32).sqrt() * 2.0;
                        config.population.playfield.x = -width / 2.0;
                        config.population.playfield.y = -width / 2.0;
                        config.population.playfield.width = width;
                        config.population.playfield.height = width;
                        build_headless_app(config)
                    },
                    |mut app| {
                        let _ = run_tick(&mut app, 1.0 / 60.0);
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(tick_benches, bench_tick);
criterion_main!(tick_benches);
