//! # Bank Benchmark
//!
//! Allocation churn through the object bank compared with plain boxing.
//!
//! Run with: `cargo bench --package ltsdk_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ltsdk_core::{LinkArena, List, ObjectBank, StructBank};

#[derive(Clone, Copy)]
struct Particle {
    pos: [f32; 3],
    vel: [f32; 3],
    life: f32,
}

const PARTICLE: Particle = Particle {
    pos: [0.0; 3],
    vel: [1.0, 0.0, 0.0],
    life: 1.0,
};

fn bench_object_bank(c: &mut Criterion) {
    let mut bank = ObjectBank::new(256);

    // Warm the pages so the loop measures free-list traffic only
    let warm: Vec<_> = (0..1024).filter_map(|_| bank.allocate(PARTICLE)).collect();
    for h in warm {
        bank.free(h);
    }

    c.bench_function("object_bank_churn_1000", |b| {
        let mut handles = Vec::with_capacity(1000);
        b.iter(|| {
            for _ in 0..1000 {
                handles.extend(bank.allocate(black_box(PARTICLE)));
            }
            for h in handles.drain(..) {
                black_box(bank.free(h).map(|p| p.life + p.pos[0] + p.vel[0]));
            }
        });
    });

    c.bench_function("box_churn_1000", |b| {
        let mut boxes = Vec::with_capacity(1000);
        b.iter(|| {
            for _ in 0..1000 {
                boxes.push(Box::new(black_box(PARTICLE)));
            }
            boxes.clear();
        });
    });
}

fn bench_struct_bank(c: &mut Criterion) {
    let mut bank = StructBank::new(64, 256);

    c.bench_function("struct_bank_churn_1000", |b| {
        let mut handles = Vec::with_capacity(1000);
        b.iter(|| {
            for _ in 0..1000 {
                handles.extend(bank.allocate());
            }
            for h in handles.drain(..) {
                bank.free(h);
            }
        });
    });
}

fn bench_list_splice(c: &mut Criterion) {
    let mut arena = LinkArena::with_capacity(1001);
    let list = List::new(&mut arena);
    let nodes: Vec<_> = (0..1000u32).map(|i| arena.new_link(i)).collect();

    c.bench_function("list_add_remove_1000", |b| {
        b.iter(|| {
            for &node in &nodes {
                list.add_tail(&mut arena, node);
            }
            list.remove_all(&mut arena);
        });
    });
}

criterion_group!(benches, bench_object_bank, bench_struct_bank, bench_list_splice);
criterion_main!(benches);
