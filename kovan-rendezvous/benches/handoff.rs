//! Hand-off benchmarks for the rendezvous channel

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kovan_rendezvous::Rendezvous;
use std::sync::Arc;
use std::thread;

const MESSAGES: u64 = 10_000;

fn bench_ping(c: &mut Criterion) {
    let mut group = c.benchmark_group("ping");
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("one_speaker_one_listener", |b| {
        b.iter(|| {
            let channel = Arc::new(Rendezvous::<u64>::new());
            let speaker = {
                let channel = channel.clone();
                thread::spawn(move || {
                    for i in 0..MESSAGES {
                        channel.speak(i);
                    }
                })
            };
            for _ in 0..MESSAGES {
                black_box(channel.listen());
            }
            speaker.join().unwrap();
        });
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for threads in [2u64, 4, 8].iter() {
        group.throughput(Throughput::Elements(MESSAGES));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                b.iter(|| {
                    let channel = Arc::new(Rendezvous::<u64>::new());
                    let per_thread = MESSAGES / threads;
                    let mut handles = Vec::new();

                    for t in 0..threads {
                        let speaker = channel.clone();
                        handles.push(thread::spawn(move || {
                            for i in 0..per_thread {
                                speaker.speak(t * per_thread + i);
                            }
                        }));
                        let listener = channel.clone();
                        handles.push(thread::spawn(move || {
                            for _ in 0..per_thread {
                                black_box(listener.listen());
                            }
                        }));
                    }

                    for h in handles {
                        h.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_try_speak_miss(c: &mut Criterion) {
    let channel = Rendezvous::<u64>::new();
    c.bench_function("try_speak_no_listener", |b| {
        b.iter(|| black_box(channel.try_speak(black_box(1)).is_err()));
    });
}

criterion_group!(benches, bench_ping, bench_contended, bench_try_speak_miss);
criterion_main!(benches);
