//! parse benchmarks

use criterion::{Criterion, criterion_group, criterion_main};
use gmod_gma::{Archive, hierarchy};
use std::hint::black_box;

#[path = "../src/test_utils.rs"]
#[allow(dead_code)]
mod gma_builder;

use gma_builder::GmaBuilder;

fn large_addon() -> Vec<u8> {
    (0..2000)
        .fold(GmaBuilder::new("Bench"), |builder, i| {
            builder.file(
                &format!("materials/models/set{}/part{}/texture_{i}.vtf", i % 7, i % 31),
                &[0u8; 16],
            )
        })
        .build()
}

fn bench_parse_table(c: &mut Criterion) {
    let data = large_addon();

    c.bench_function("parse_2000_entries", |b| {
        b.iter(|| Archive::from_bytes(black_box(&data)));
    });
}

fn bench_build_hierarchy(c: &mut Criterion) {
    let data = large_addon();
    let archive = Archive::from_bytes(&data).expect("bench archive parses");

    c.bench_function("hierarchy_2000_entries", |b| {
        b.iter(|| hierarchy::build(black_box(archive.entries())));
    });
}

criterion_group!(benches, bench_parse_table, bench_build_hierarchy);
criterion_main!(benches);
