// Criterion benchmarks for the pet profile proxy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pet_profile_proxy::core::fields::{from_metaobject, to_metaobject_fields};
use pet_profile_proxy::models::{Metaobject, PetData, PetDetails};
use serde_json::json;

fn create_details(allergy_count: usize) -> PetDetails {
    let allergies: Vec<String> = (0..allergy_count).map(|i| format!("allergen-{}", i)).collect();

    let data: PetData = serde_json::from_value(json!({
        "name": "Buddy",
        "type": "dog",
        "birthday": "2020-05-17",
        "breed": "Labrador",
        "weight": "large",
        "allergies": allergies,
        "health_boost": "joint_support"
    }))
    .unwrap();

    data.into_details().unwrap()
}

fn bench_to_fields(c: &mut Criterion) {
    let details = create_details(5);

    c.bench_function("to_metaobject_fields", |b| {
        b.iter(|| to_metaobject_fields(black_box("gid://shopify/Customer/123"), black_box(&details)));
    });
}

fn bench_from_metaobject(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_metaobject");

    for allergy_count in [0, 5, 30].iter() {
        let object = Metaobject {
            id: "gid://shopify/Metaobject/1".to_string(),
            handle: Some("pet-profile-buddy".to_string()),
            fields: to_metaobject_fields("gid://shopify/Customer/123", &create_details(*allergy_count)),
        };

        group.bench_with_input(
            BenchmarkId::new("allergies", allergy_count),
            allergy_count,
            |b, _| {
                b.iter(|| from_metaobject(black_box(&object)));
            },
        );
    }

    group.finish();
}

fn bench_request_validation(c: &mut Criterion) {
    let body = json!({
        "name": "Buddy",
        "type": "dog",
        "weight": "medium",
        "allergies": "beef, chicken, wheat, beef"
    });

    c.bench_function("pet_data_into_details", |b| {
        b.iter(|| {
            let data: PetData = serde_json::from_value(black_box(body.clone())).unwrap();
            black_box(data.into_details())
        });
    });
}

criterion_group!(
    benches,
    bench_to_fields,
    bench_from_metaobject,
    bench_request_validation
);

criterion_main!(benches);
