//! Performance benchmarks for ocean-map-lib
//!
//! Run with: cargo bench --package ocean-map-lib

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use geo::{MultiPolygon, polygon};
use ocean_map_lib::{
    FeatureRecord, Filter, FilterSet, MapConfig, MapScene, Navigation, OverlayController,
    PolygonRecord,
};

const COUNTRIES: [&str; 6] = ["Chile", "Peru", "Ecuador", "Mexico", "Belize", "Colombia"];
const SCALES: [&str; 3] = ["National", "Regional", "Local"];
const STATUSES: [&str; 3] = ["Active", "Pre-planning", "Completed"];

/// Generate a table of point areas spread along the Pacific coast
fn generate_points(count: usize) -> Vec<FeatureRecord> {
    (0..count)
        .map(|i| {
            let lat = -40.0 + (i % 600) as f64 * 0.1;
            let lon = -80.0 + (i / 600) as f64 * 0.1;
            FeatureRecord::from_attributes([
                ("ID".to_string(), (count - i).to_string()),
                ("Country".to_string(), COUNTRIES[i % COUNTRIES.len()].to_string()),
                ("Scale".to_string(), SCALES[i % SCALES.len()].to_string()),
                ("Status".to_string(), STATUSES[i % STATUSES.len()].to_string()),
                ("Location".to_string(), format!("Area {}", i)),
                ("Latitude".to_string(), lat.to_string()),
                ("Longitude".to_string(), lon.to_string()),
            ])
        })
        .collect()
}

/// Generate square polygon layers
fn generate_polygons(count: usize) -> Vec<PolygonRecord> {
    (0..count)
        .map(|i| {
            let x = -80.0 + (i % 50) as f64;
            let y = -40.0 + (i / 50) as f64;
            PolygonRecord {
                source_id: (count + i).to_string(),
                record: FeatureRecord::from_attributes([
                    ("ID".to_string(), (count + i).to_string()),
                    ("Country".to_string(), COUNTRIES[i % COUNTRIES.len()].to_string()),
                    ("Scale".to_string(), SCALES[i % SCALES.len()].to_string()),
                    ("Status".to_string(), STATUSES[i % STATUSES.len()].to_string()),
                    ("Location".to_string(), format!("Shape {}", i)),
                ]),
                geometry: MultiPolygon::new(vec![polygon![
                    (x: x, y: y),
                    (x: x + 0.5, y: y),
                    (x: x + 0.5, y: y + 0.5),
                    (x: x, y: y + 0.5),
                    (x: x, y: y),
                ]]),
            }
        })
        .collect()
}

fn loaded_controller(points: usize, polygons: usize) -> OverlayController<MapScene> {
    let mut controller =
        OverlayController::new(MapScene::new(), Navigation::default(), MapConfig::default());
    controller.on_data(generate_polygons(polygons), generate_points(points));
    controller
}

fn bench_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");
    group.sample_size(20);

    let points = generate_points(10_000);
    let polygons = generate_polygons(500);
    group.throughput(Throughput::Elements(10_500));
    group.bench_function("on_data_10k_points_500_polygons", |b| {
        b.iter(|| {
            let mut controller = OverlayController::new(
                MapScene::new(),
                Navigation::default(),
                MapConfig::default(),
            );
            controller.on_data(polygons.clone(), points.clone());
        });
    });

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let mut controller = loaded_controller(10_000, 500);
    let filters = FilterSet::new()
        .with(Filter::new("Country", "Chile"))
        .with(Filter::new("Status", "Active"));

    group.throughput(Throughput::Elements(controller.len() as u64));
    group.bench_function("country_and_status_10k", |b| {
        b.iter(|| controller.filter_on(filters.clone()));
    });
    group.bench_function("no_filters_10k", |b| {
        b.iter(|| controller.filter_on(FilterSet::new()));
    });

    group.finish();
}

fn bench_highlight_and_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction");

    let mut controller = loaded_controller(10_000, 500);
    group.bench_function("highlight_10k", |b| {
        b.iter(|| controller.highlight_overlay(Some("42")));
    });
    group.bench_function("zoom_10k_markers", |b| {
        let mut zoom = 3.0;
        b.iter(|| {
            zoom = if zoom > 10.0 { 3.0 } else { zoom + 1.0 };
            controller.on_zoom(zoom);
        });
    });
    group.bench_function("regroup_by_country", |b| {
        b.iter(|| controller.country_change(Some("peru")));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_ingestion,
    bench_filtering,
    bench_highlight_and_zoom,
);

criterion_main!(benches);
