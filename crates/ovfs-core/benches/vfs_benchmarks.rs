//! Benchmarks for the hot read paths.
//!
//! Mount resolution and tree lookups run on every request, so they are
//! measured across mount-table and tree sizes.
//!
//! # Run Benchmarks
//!
//! ```bash
//! cargo bench --bench vfs_benchmarks
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ovfs_core::{EmbeddedFile, Vfs, VfsBuilder};
use std::hint::black_box;
use std::io::Read;
use tempfile::TempDir;

/// Longest-prefix resolution with a growing number of mounts.
fn bench_find_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_mount_by_mount_count");
    let temp = TempDir::new().unwrap();

    for mount_count in [1, 10, 50, 200] {
        let mut vfs = Vfs::new();
        vfs.add_mount("/", temp.path()).unwrap();
        for i in 1..mount_count {
            vfs.add_mount(&format!("/app{i}/assets"), temp.path()).unwrap();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(mount_count),
            &mount_count,
            |b, _| {
                b.iter(|| vfs.find_mount(black_box("/app1/assets/css/app.css")).unwrap());
            },
        );
    }

    group.finish();
}

/// Opening and reading embedded files from trees of different sizes.
fn bench_open_from_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_from_tree_by_file_count");
    let temp = TempDir::new().unwrap();

    for file_count in [10, 100, 1000] {
        let mut builder = VfsBuilder::new().mount("/static", temp.path()).add_dir("/static/js");
        for i in 0..file_count {
            builder = builder.add_file(
                &format!("/static/js/module{i}.js"),
                EmbeddedFile::new(format!("export const value{i} = {i};")),
            );
        }
        let vfs = builder.build().unwrap();
        let target = format!("/static/js/module{}.js", file_count / 2);

        group.bench_with_input(
            BenchmarkId::from_parameter(file_count),
            &target,
            |b, target| {
                b.iter(|| {
                    let mut file = vfs.open(black_box(target)).unwrap();
                    let mut content = Vec::new();
                    file.read_to_end(&mut content).unwrap();
                    content
                });
            },
        );
    }

    group.finish();
}

/// Plain versus gzip-decompressing reads of the same payload.
fn bench_read_gzip(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_file_encoding");
    let temp = TempDir::new().unwrap();
    let body = "body { margin: 0; padding: 0; }\n".repeat(512);

    let vfs = VfsBuilder::new()
        .mount("/", temp.path())
        .add_file("/plain.css", EmbeddedFile::new(body.clone()))
        .add_file("/gzip.css", EmbeddedFile::new(body).compress().unwrap())
        .build()
        .unwrap();

    group.bench_function("plain", |b| {
        b.iter(|| vfs.read_file(black_box("/plain.css")).unwrap());
    });
    group.bench_function("gzip", |b| {
        b.iter(|| vfs.read_file(black_box("/gzip.css")).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_find_mount, bench_open_from_tree, bench_read_gzip);
criterion_main!(benches);
