//! Outfit replacement benchmarks using Criterion

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wardrobe_core::{apply_catalog, OutfitConfig};

fn generate_catalog(count: usize) -> String {
    let entries: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "item_id": format!("shirt-n_{:05}", i),
                "active_palette": i % 8,
                "account_bound": i % 2 == 0,
                "nft_metadata": null,
                "remote_render_metadata": { "version": 3 },
            })
        })
        .collect();
    serde_json::to_string(&entries).unwrap()
}

fn replace_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");
    let config = OutfitConfig::default();
    let outfit = r#"{"includeFallbacks":true,"skeleton":"female","clothing":[{"id":"old","colorIndex":1}]}"#;

    for count in [10, 500] {
        let catalog = generate_catalog(count);
        group.throughput(Throughput::Bytes(catalog.len() as u64));
        group.bench_function(format!("apply_catalog_{}", count), |b| {
            b.iter(|| black_box(apply_catalog(outfit, "outfit", black_box(&catalog), "catalog", &config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, replace_benchmarks);
criterion_main!(benches);
