//! Performance benchmarks for route-guide-lib
//!
//! Run with: cargo bench --package route-guide-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use route_guide_lib::{
    Feature, FeatureStore, NoteRegistry, Point, Rectangle, RouteNote, RouteRecorder, distance,
};

/// Generate features on a grid around a base location, every tenth one unnamed
fn generate_features(count: usize, base_lat: i32, base_lon: i32) -> Vec<Feature> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let location = Point::new(
                base_lat + (i / side) as i32 * 1_000,
                base_lon + (i % side) as i32 * 1_000,
            );
            let name = if i % 10 == 0 {
                String::new()
            } else {
                format!("Feature {i}")
            };
            Feature::new(name, location)
        })
        .collect()
}

/// Generate a wobbly route of `count` points
fn generate_route(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            Point::from_degrees(
                40.5 + t * 0.5 + (t * 50.0).sin() * 0.001,
                -74.5 + t * 0.5 + (t * 30.0).cos() * 0.001,
            )
        })
        .collect()
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_query");

    let store = FeatureStore::load(generate_features(50_000, 400_000_000, -750_000_000)).unwrap();

    let small = Rectangle::new(
        Point::new(400_000_000, -750_000_000),
        Point::new(400_010_000, -749_990_000),
    );
    group.bench_function("small_rect_50k", |b| {
        b.iter(|| store.range_query(&small).count());
    });

    let large = Rectangle::new(
        Point::new(390_000_000, -760_000_000),
        Point::new(420_000_000, -730_000_000),
    );
    group.throughput(Throughput::Elements(store.len() as u64));
    group.bench_function("large_rect_50k", |b| {
        b.iter(|| store.range_query(&large).count());
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [100, 10_000] {
        let features = generate_features(size, 400_000_000, -750_000_000);
        let hit = features[size / 2].location;
        let store = FeatureStore::load(features).unwrap();

        group.bench_with_input(BenchmarkId::new("hit", size), &hit, |b, point| {
            b.iter(|| store.lookup(point));
        });
        group.bench_with_input(
            BenchmarkId::new("placeholder", size),
            &Point::new(1, 1),
            |b, point| {
                b.iter(|| store.lookup(point));
            },
        );
    }

    group.finish();
}

fn bench_record_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_route");

    let store = FeatureStore::load(generate_features(1_000, 405_000_000, -745_000_000)).unwrap();
    let route = generate_route(10_000);

    group.throughput(Throughput::Elements(route.len() as u64));
    group.bench_function("distance_only_10k", |b| {
        b.iter(|| {
            route
                .windows(2)
                .map(|leg| distance(&leg[0], &leg[1]))
                .fold(0i32, i32::saturating_add)
        });
    });
    group.bench_function("recorder_10k", |b| {
        b.iter(|| {
            let mut recorder = RouteRecorder::start(&store);
            for point in &route {
                recorder.feed(*point).unwrap();
            }
            recorder.finish().unwrap()
        });
    });

    group.finish();
}

fn bench_notes(c: &mut Criterion) {
    let mut group = c.benchmark_group("notes");

    let points: Vec<Point> = (0..64).map(|i| Point::new(i, i)).collect();
    group.bench_function("exchange_64_locations", |b| {
        b.iter(|| {
            let registry = NoteRegistry::new();
            for round in 0..4 {
                for point in &points {
                    registry.exchange(RouteNote::new(*point, format!("round {round}")));
                }
            }
            registry.total_notes()
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_range_query,
    bench_lookup,
    bench_record_route,
    bench_notes,
);

criterion_main!(benches);
