//! CRC engine benchmarks.
//!
//! Run: `cargo bench -p checksum -- engine`
//!
//! This benchmarks:
//! - Table-driven engine across the catalogue's widths
//! - Bitwise reference (one-shot path and test oracle)

use checksum::{Crc, catalog, compute};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Message sizes seen by the auditor (short protocol frames up to a few KiB).
const SIZES: [usize; 5] = [4, 16, 64, 250, 4096];

/// Smaller sizes for the bitwise path.
const BITWISE_SIZES: [usize; 3] = [4, 16, 64];

fn bench_table(c: &mut Criterion) {
  let mut group = c.benchmark_group("engine/table");

  for params in [catalog::CRC_8, catalog::XMODEM, catalog::CRC_24, catalog::CRC_32, catalog::CRC_64_WE] {
    let crc = Crc::new(params).unwrap();
    for size in SIZES {
      let data = vec![0xA5u8; size];
      group.throughput(Throughput::Bytes(size as u64));
      group.bench_with_input(BenchmarkId::new(crc.name().to_string(), size), &data, |b, data| {
        b.iter(|| core::hint::black_box(crc.checksum_with_init(data, 0x1234_5678)));
      });
    }
  }

  group.finish();
}

fn bench_bitwise(c: &mut Criterion) {
  let mut group = c.benchmark_group("engine/bitwise");
  let params = catalog::CRC_32;

  for size in BITWISE_SIZES {
    let data = vec![0xA5u8; size];
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(compute(&params, data, None)));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_table, bench_bitwise);
criterion_main!(benches);
