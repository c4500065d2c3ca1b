use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use navcore::models::{Coordinate, ManeuverKind, RouteStep};
use navcore::polyline::{decode_path, encode_path};
use navcore::step_matcher::current_step;

fn synthetic_path(points: usize) -> Vec<Coordinate> {
    (0..points)
        .map(|i| {
            let t = i as f64 * 0.0005;
            Coordinate {
                lat: 45.93 + t,
                lon: 4.57 + (t * 7.0).sin() * 0.01,
            }
        })
        .collect()
}

fn synthetic_steps(path: &[Coordinate], every: usize) -> Vec<RouteStep> {
    path.iter()
        .step_by(every)
        .enumerate()
        .map(|(i, start)| RouteStep {
            start: *start,
            instruction: format!("Step {i}"),
            maneuver: ManeuverKind::Straight,
            distance_label: String::new(),
            duration_label: String::new(),
        })
        .collect()
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyline_decode");

    for points in [100, 1_000, 10_000] {
        let encoded = encode_path(&synthetic_path(points));
        group.bench_with_input(BenchmarkId::from_parameter(points), &encoded, |b, encoded| {
            b.iter(|| decode_path(black_box(encoded)))
        });
    }

    group.finish();
}

fn benchmark_current_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("current_step");
    let path = synthetic_path(10_000);
    let observer = Coordinate {
        lat: 47.1,
        lon: 4.58,
    };

    for every in [500, 50, 5] {
        let steps = synthetic_steps(&path, every);
        group.bench_with_input(BenchmarkId::from_parameter(steps.len()), &steps, |b, steps| {
            b.iter(|| current_step(black_box(observer), black_box(steps)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_decode, benchmark_current_step);
criterion_main!(benches);
