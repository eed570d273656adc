use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hostwatch::format::summary_line;
use hostwatch::system::backend::procfs::parse_meminfo;
use hostwatch::system::cpu::parse_proc_stat;
use hostwatch::system::snapshot::Snapshot;
use std::hint::black_box;

fn make_proc_stat(cores: usize) -> String {
    let mut out = String::from("cpu  4705 356 584 3699176 23060 0 277 0 0 0\n");
    for core in 0..cores {
        out.push_str(&format!(
            "cpu{core} {} 44 {} 462397 2882 0 {} 0 0 0\n",
            588 + core,
            73 + core,
            core % 7
        ));
    }
    out.push_str("intr 1462898 0 0 0\nctxt 115315\nbtime 1718000000\nprocesses 4208\n");
    out
}

fn make_meminfo(extra_lines: usize) -> String {
    let mut out = String::from("MemTotal:       16318400 kB\nMemFree:         1048576 kB\n");
    for i in 0..extra_lines {
        out.push_str(&format!("Filler{i}:        {i} kB\n"));
    }
    out.push_str("MemAvailable:    8159200 kB\n");
    out
}

fn bench_parse_proc_stat(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_proc_stat_4_64_256");
    for cores in [4usize, 64, 256] {
        let stat = make_proc_stat(cores);
        group.bench_with_input(BenchmarkId::from_parameter(cores), &stat, |b, stat| {
            b.iter(|| black_box(parse_proc_stat(black_box(stat))))
        });
    }
    group.finish();
}

fn bench_parse_meminfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_meminfo_0_20_50");
    for extra in [0usize, 20, 50] {
        let meminfo = make_meminfo(extra);
        group.bench_with_input(BenchmarkId::from_parameter(extra), &meminfo, |b, meminfo| {
            b.iter(|| black_box(parse_meminfo(black_box(meminfo))))
        });
    }
    group.finish();
}

fn bench_summary_line(c: &mut Criterion) {
    let snapshot = Snapshot {
        cpu_usage_percent: 37.25,
        ram_used_mb: 6123.5,
        total_ram_mb: 15936.0,
        disk_used_mb: 210_433.75,
        total_disk_mb: 476_940.0,
    };
    c.bench_function("summary_line", |b| {
        b.iter(|| black_box(summary_line(black_box(&snapshot))))
    });
}

criterion_group!(
    benches,
    bench_parse_proc_stat,
    bench_parse_meminfo,
    bench_summary_line
);
criterion_main!(benches);
