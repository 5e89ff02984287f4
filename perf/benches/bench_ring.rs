use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use morse_device::{AccessMode, Blocking, Direction};
use morse_perf::{bench_device, sample_text};
use morse_ring::{ByteRing, RingConfig};

fn bench_ring_cycle(c: &mut Criterion) {
    let mut ring = ByteRing::new(RingConfig::new(20));
    let data = sample_text(19);

    let mut group = c.benchmark_group("ring");
    group.throughput(Throughput::Bytes(data.len() as u64));

    // Fill, then drain (two reads when the data wraps).
    group.bench_function("write+read 19B", |b| {
        b.iter(|| {
            let mut left = ring.write(black_box(&data));
            while left > 0 {
                left -= black_box(ring.read(left)).len();
            }
        });
    });
    group.finish();
}

fn bench_channel_round_trip(c: &mut Criterion) {
    let device = bench_device(64);
    let data = sample_text(32);

    let mut group = c.benchmark_group("channel");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for dir in Direction::ALL {
        let h = device
            .attach(dir, AccessMode::ReadWrite)
            .expect("failed to attach");
        group.bench_function(format!("{} write+read 32B", dir.name()), |b| {
            b.iter(|| {
                h.write(black_box(&data), Blocking::NonBlocking)
                    .expect("ring has room");
                while let Ok(out) = h.read(64, Blocking::NonBlocking) {
                    black_box(out);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ring_cycle, bench_channel_round_trip);
criterion_main!(benches);
