//! Benchmarks for fragmenting and reassembling oversized payloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slirc_proto::multipart::{Fragmenter, Reassembler};
use slirc_proto::Message;

fn benchmark_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fragmenter::fragment");

    for size in [512usize, 4096, 65536] {
        let payload = "x".repeat(size);
        let msg = Message::privmsg("#channel", payload);
        group.bench_with_input(BenchmarkId::new("payload_bytes", size), &msg, |b, msg| {
            let fragmenter = Fragmenter::new();
            b.iter(|| black_box(fragmenter.fragment(black_box(msg)).unwrap()))
        });
    }

    group.finish();
}

fn benchmark_reassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reassembler::process");

    for size in [512usize, 4096, 65536] {
        let payload = "x".repeat(size);
        let msg = Message::privmsg("#channel", payload);
        let fragments = Fragmenter::new().fragment(&msg).unwrap();

        group.bench_with_input(
            BenchmarkId::new("payload_bytes", size),
            &fragments,
            |b, fragments| {
                b.iter(|| {
                    let mut reassembler = Reassembler::default();
                    for fragment in fragments {
                        black_box(reassembler.process(fragment.clone()).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn benchmark_interleaved_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reassembler::process (interleaved)");

    let fragmenter = Fragmenter::new();
    let groups: Vec<_> = (0..16)
        .map(|i| {
            let payload = format!("group {i} payload ").repeat(50);
            fragmenter
                .fragment(&Message::privmsg("#channel", payload))
                .unwrap()
        })
        .collect();

    group.bench_function("16_groups_round_robin", |b| {
        b.iter(|| {
            let mut reassembler = Reassembler::default();
            let max_len = groups.iter().map(Vec::len).max().unwrap_or(0);
            for i in 0..max_len {
                for fragments in &groups {
                    if let Some(fragment) = fragments.get(i) {
                        black_box(reassembler.process(fragment.clone()).unwrap());
                    }
                }
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_fragment,
    benchmark_reassemble,
    benchmark_interleaved_groups,
);
criterion_main!(benches);
