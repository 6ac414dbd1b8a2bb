//! Pattern Matching Benchmarks
//!
//! Measures sequence stepping, chord evaluation, and full dispatcher
//! throughput at various registration counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keyweave::{ChordMatcher, InputDispatcher, KeyEvent, SequenceMatcher};

/// Generate `count` distinct sequence paths of the given length over a
/// small synthetic alphabet, with heavy prefix sharing.
fn generate_paths(count: usize, length: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            (0..length)
                .map(|step| format!("k{}", (i * 7 + step * 3) % 16))
                .collect()
        })
        .collect()
}

/// A symbol stream that wanders the alphabet without completing anything.
fn generate_stream(length: usize) -> Vec<String> {
    (0..length).map(|i| format!("k{}", (i * 5 + 1) % 16)).collect()
}

/// Benchmark single-symbol trie stepping at various trie sizes
fn bench_sequence_stepping(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_stepping");

    let stream = generate_stream(1024);

    for count in [1usize, 16, 64, 256] {
        let mut matcher: SequenceMatcher<String> = SequenceMatcher::new();
        for path in generate_paths(count, 5) {
            matcher.register(path, || {}).unwrap();
        }

        group.throughput(Throughput::Elements(stream.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &stream,
            |b, stream| {
                b.iter(|| {
                    for symbol in stream {
                        black_box(matcher.on_symbol(symbol));
                    }
                    matcher.reset();
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a full press pass over the chord table
fn bench_chord_press_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("chord_press_pass");

    for count in [1usize, 16, 64, 256] {
        let mut matcher: ChordMatcher<String> = ChordMatcher::new();
        for i in 0..count {
            let chord = [format!("k{}", i % 16), format!("k{}", (i + 1) % 16)];
            matcher.register_pressed(chord, || {}).unwrap();
        }

        let held = ["k0", "k1", "k2"]
            .iter()
            .map(|s| s.to_string())
            .collect::<std::collections::HashSet<_>>();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &held, |b, held| {
            b.iter(|| {
                black_box(matcher.on_press(held));
                matcher.reset();
            });
        });
    }

    group.finish();
}

/// Benchmark the dispatcher end to end with a typing-like event stream
fn bench_dispatcher_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher_feed");

    let events: Vec<KeyEvent> = generate_stream(512)
        .into_iter()
        .flat_map(|key| {
            let code = format!("c{key}");
            [
                KeyEvent::Down {
                    key: key.clone(),
                    code: code.clone(),
                },
                KeyEvent::Up { key, code },
            ]
        })
        .collect();

    for count in [4usize, 64] {
        let mut dispatcher = InputDispatcher::new();
        for path in generate_paths(count, 4) {
            dispatcher.add_key_sequence(path, || {}).unwrap();
        }
        for i in 0..count {
            let chord = [format!("k{}", i % 16), format!("k{}", (i + 5) % 16)];
            dispatcher.add_key_chord_pressed(chord, || {}).unwrap();
        }

        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &events,
            |b, events| {
                b.iter(|| {
                    for event in events {
                        dispatcher.feed(black_box(event.clone()));
                    }
                    dispatcher.reset();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sequence_stepping,
    bench_chord_press_pass,
    bench_dispatcher_feed
);
criterion_main!(benches);
