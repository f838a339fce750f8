// Benchmark for the motion planner and timeline sampling
// Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use laser_planner::motion::{MachineSettings, MotionPlanner, Vector2, Waypoint};
use std::hint::black_box;

/// Spiral-ish engraving path with a mix of gentle and sharp corners.
fn engraving_path(points: usize) -> Vec<Waypoint> {
    (0..points)
        .map(|i| {
            let angle = i as f64 * 0.35;
            let radius = 5.0 + (i % 50) as f64;
            Waypoint::new(radius * angle.cos(), radius * angle.sin(), 60.0 + (i % 7) as f64 * 20.0)
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let planner = MotionPlanner::new(MachineSettings::default()).unwrap();
    let path = engraving_path(10_000);
    c.bench_function("plan 10k waypoints", |b| {
        b.iter(|| {
            let plan = planner.plan(black_box(&path), Vector2::ZERO).unwrap();
            assert!(plan.estimated_time > 0.0);
        });
    });
}

fn bench_timeline(c: &mut Criterion) {
    let planner = MotionPlanner::new(MachineSettings::default()).unwrap();
    let plan = planner.plan(&engraving_path(1_000), Vector2::ZERO).unwrap();
    let timeline = plan.timeline();
    c.bench_function("sample 1k-waypoint plan at 1 kHz", |b| {
        b.iter(|| {
            let samples = timeline.samples(black_box(1000.0));
            assert!(!samples.is_empty());
        });
    });
}

criterion_group!(benches, bench_plan, bench_timeline);
criterion_main!(benches);
