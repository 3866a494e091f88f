use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use msp_codec::{Decoder, Encoder, MspCode, Role};

const SIZES: [usize; 3] = [16, 254, 4096];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let encoder = Encoder::new(Role::GroundStation);

    for size in SIZES {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &payload, |b, payload| {
            b.iter(|| {
                black_box(encoder.encode(MspCode::SetRawRc, payload).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let encoder = Encoder::new(Role::FlightController);

    for size in SIZES {
        let frame = encoder.encode(MspCode::DataflashRead, &vec![0x5Au8; size]).unwrap();
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", size), &frame, |b, frame| {
            let mut decoder = Decoder::new(Role::GroundStation);
            b.iter(|| {
                black_box(decoder.feed(frame));
            });
        });
    }

    group.finish();
}

fn bench_noisy_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    // Telemetry frames separated by garbage, one of them corrupted.
    let encoder = Encoder::new(Role::FlightController);
    let mut stream = Vec::new();
    for code in [MspCode::Status, MspCode::Attitude, MspCode::Altitude, MspCode::Analog] {
        stream.extend(encoder.encode(code, &[0x11; 12]).unwrap());
        stream.extend_from_slice(b"\x00\xFF\x42");
    }
    stream[10] ^= 0x01;

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("decode_noisy_stream", |b| {
        let mut decoder = Decoder::new(Role::GroundStation);
        b.iter(|| {
            black_box(decoder.feed(&stream));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_noisy_stream);
criterion_main!(benches);
