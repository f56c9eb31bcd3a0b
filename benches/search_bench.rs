use criterion::{criterion_group, criterion_main, Criterion};
use fingerforge::config::{EngineParams, SearchContext};
use fingerforge::midi::ChordEvent;
use fingerforge::piano::Piano;
use fingerforge::recorder::RecorderPool;
use std::hint::black_box;

fn chromatic_events(count: usize) -> Vec<ChordEvent> {
    (0..count)
        .map(|i| ChordEvent {
            notes: vec![60 + (i % 12) as u8],
            frame: (i as f64 + 1.0) * 10.0,
            real_tick: 0.0,
        })
        .collect()
}

fn chord_events(count: usize) -> Vec<ChordEvent> {
    (0..count)
        .map(|i| {
            let root = 48 + (i % 24) as u8;
            ChordEvent {
                notes: vec![root, root + 4, root + 7],
                frame: (i as f64 + 1.0) * 10.0,
                real_tick: 0.0,
            }
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let piano = Piano::new(21, 108, 52, 76).unwrap();
    let params = EngineParams {
        pool_size: 50,
        ..EngineParams::default()
    };

    let singles = chromatic_events(32);
    c.bench_function("advance_32_single_notes_pool_50", |b| {
        b.iter(|| {
            let ctx = SearchContext::resolve(&params).unwrap();
            let mut pool = RecorderPool::bootstrap(piano.clone(), ctx).unwrap();
            for event in &singles {
                pool.advance(black_box(event));
            }
            pool.best().current_entropy
        })
    });

    let triads = chord_events(16);
    c.bench_function("advance_16_triads_pool_50", |b| {
        b.iter(|| {
            let ctx = SearchContext::resolve(&params).unwrap();
            let mut pool = RecorderPool::bootstrap(piano.clone(), ctx).unwrap();
            for event in &triads {
                pool.advance(black_box(event));
            }
            pool.best().current_entropy
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
