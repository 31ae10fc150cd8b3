//! Codec Performance Benchmarks
//!
//! Measures decoding of list responses, encoding of write views and
//! query string assembly.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use idm_management::managers::SelfServiceProfile;
use idm_management::{Page, RequestOptions, SortOrder, WritableResource};
use serde_json::{Value, json};

fn profile_json(id: usize) -> Value {
    json!({
        "id": format!("ssp_{id}"),
        "name": format!("Profile {id}"),
        "description": "Self-service SSO for partners",
        "allowed_strategies": ["oidc", "samlp", "waad"],
        "user_attributes": [
            {"name": "email", "description": "Work email", "is_optional": false},
            {"name": "department", "description": null, "is_optional": true}
        ],
        "created_at": "2024-05-01T10:00:00.000Z",
        "updated_at": "2024-05-02T08:30:00.000Z",
        "branding": {"logo_url": "https://cdn.example.com/logo.png", "colors": {"primary": "#19aecc"}}
    })
}

fn list_body(size: usize, wrapped: bool) -> Vec<u8> {
    let items: Vec<Value> = (0..size).map(profile_json).collect();
    let body = if wrapped {
        json!({
            "self_service_profiles": items,
            "start": 0,
            "limit": 50,
            "length": size,
            "total": size * 3
        })
    } else {
        Value::Array(items)
    };
    serde_json::to_vec(&body).unwrap()
}

/// Benchmark list decoding for both response shapes
fn bench_list_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_decoding");

    for size in [1, 10, 100].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let wrapped = list_body(*size, true);
        group.bench_with_input(BenchmarkId::new("with_totals", size), &wrapped, |b, body| {
            b.iter(|| {
                let page: Page<SelfServiceProfile> = serde_json::from_slice(black_box(body)).unwrap();
                black_box(page)
            })
        });

        let bare = list_body(*size, false);
        group.bench_with_input(BenchmarkId::new("bare_array", size), &bare, |b, body| {
            b.iter(|| {
                let page: Page<SelfServiceProfile> = serde_json::from_slice(black_box(body)).unwrap();
                black_box(page)
            })
        });
    }

    group.finish();
}

/// Benchmark the restricted write shape against the full entity
fn bench_entity_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_encoding");
    let profile: SelfServiceProfile = serde_json::from_value(profile_json(1)).unwrap();

    group.bench_function("write_view", |b| {
        b.iter(|| black_box(serde_json::to_vec(&black_box(&profile).write_view()).unwrap()))
    });

    group.bench_function("full_entity", |b| {
        b.iter(|| black_box(serde_json::to_vec(black_box(&profile)).unwrap()))
    });

    group.finish();
}

/// Benchmark query pair assembly with overrides
fn bench_query_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_pairs");

    let options = RequestOptions::list_defaults()
        .merge(
            &RequestOptions::new()
                .page(3)
                .per_page(25)
                .include_fields(["id", "name", "allowed_strategies"])
                .sort_by("created_at", SortOrder::Descending)
                .query("name:partners*"),
        );

    group.bench_function("list_with_overrides", |b| {
        b.iter(|| black_box(black_box(&options).query_pairs()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_list_decoding,
    bench_entity_encoding,
    bench_query_pairs
);
criterion_main!(benches);
