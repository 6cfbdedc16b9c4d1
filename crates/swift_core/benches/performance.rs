//! Performance benchmarks for swift_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swift_core::geo::Coordinate;
use swift_core::map_sync::{MapSync, SyncInputs};
use swift_core::simulation::{PositionSimulator, SimulatorConfig, TripInputs};

fn trip_inputs() -> TripInputs {
    TripInputs {
        pickup: Some(Coordinate::new(12.9716, 77.5946)),
        dropoff: Some(Coordinate::new(12.9352, 77.6245)),
        active: true,
    }
}

fn bench_full_trip(c: &mut Criterion) {
    let frame_rates = vec![("30fps", 33u64), ("60fps", 16), ("120fps", 8)];

    let mut group = c.benchmark_group("simulated_trip");
    for (name, frame_ms) in frame_rates {
        group.bench_with_input(BenchmarkId::from_parameter(name), &frame_ms, |b, &frame_ms| {
            b.iter(|| {
                let mut sim = PositionSimulator::new(SimulatorConfig::default().with_seed(42));
                sim.sync(trip_inputs());
                let mut now = 0u64;
                let mut next = sim.frame_token();
                while let Some(token) = next {
                    next = sim.tick(token, now as f64);
                    now += frame_ms;
                }
                black_box(sim.snapshot())
            });
        });
    }
    group.finish();
}

fn bench_frame_reconcile(c: &mut Criterion) {
    c.bench_function("map_sync_driver_frames", |b| {
        b.iter(|| {
            let mut sim = PositionSimulator::new(SimulatorConfig::default().with_seed(7));
            let mut sync = MapSync::default();
            let inputs = trip_inputs();
            sim.sync(inputs);
            let mut commands = 0usize;
            for frame in 0..600u64 {
                if let Some(token) = sim.frame_token() {
                    sim.tick(token, (frame * 16) as f64);
                }
                commands += sync
                    .reconcile(&SyncInputs {
                        pickup: inputs.pickup,
                        dropoff: inputs.dropoff,
                        driver: sim.driver(),
                        show_route: true,
                    })
                    .len();
            }
            black_box(commands)
        });
    });
}

criterion_group!(benches, bench_full_trip, bench_frame_reconcile);
criterion_main!(benches);
