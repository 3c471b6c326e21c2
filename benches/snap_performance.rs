use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dirsnap::scan::{self, RootDir};
use dirsnap::store::{self, diff};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Fixture generator for directory trees
mod fixtures {
    use super::*;

    /// Create a tree `depth` levels deep, three subdirectories per level
    pub fn create_deep_tree(base: &Path, depth: usize, files_per_dir: usize) -> std::io::Result<()> {
        if depth == 0 {
            return Ok(());
        }

        fs::create_dir_all(base)?;

        for i in 0..files_per_dir {
            fs::write(base.join(format!("file-{i}.txt")), "test content")?;
        }

        for i in 0..3 {
            create_deep_tree(&base.join(format!("dir-{i}")), depth - 1, files_per_dir)?;
        }

        Ok(())
    }

    /// Create a single wide directory
    pub fn create_flat_dir(base: &Path, files: usize) -> std::io::Result<()> {
        for i in 0..files {
            fs::write(base.join(format!("entry-{i:05}.dat")), [0u8; 64])?;
        }
        Ok(())
    }
}

/// Benchmark: walk trees of growing depth
fn bench_build_deep_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_deep_tree");

    for depth in [2, 4, 6] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let temp_dir = TempDir::new().unwrap();
            fixtures::create_deep_tree(temp_dir.path(), depth, 5).unwrap();
            let root = RootDir::resolve(temp_dir.path()).unwrap();

            b.iter(|| {
                let result = scan::build(black_box(&root)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark: walk one directory with many entries
fn bench_build_flat_dir(c: &mut Criterion) {
    c.bench_function("build_flat_dir", |b| {
        let temp_dir = TempDir::new().unwrap();
        fixtures::create_flat_dir(temp_dir.path(), 5_000).unwrap();
        let root = RootDir::resolve(temp_dir.path()).unwrap();

        b.iter(|| {
            let result = scan::build(black_box(&root)).unwrap();
            black_box(result);
        });
    });
}

/// Benchmark: write and read back a document
fn bench_save_load(c: &mut Criterion) {
    c.bench_function("save_load_document", |b| {
        let temp_dir = TempDir::new().unwrap();
        let tree = temp_dir.path().join("tree");
        fixtures::create_deep_tree(&tree, 5, 5).unwrap();
        let root = RootDir::resolve(&tree).unwrap();
        let snapshot = scan::build(&root).unwrap().snapshot;
        let out = temp_dir.path().join("snap.json");

        b.iter(|| {
            store::save(black_box(&snapshot), &out).unwrap();
            black_box(store::load(&out).unwrap());
        });
    });
}

/// Benchmark: diff two snapshots where a tenth of the files changed
fn bench_diff(c: &mut Criterion) {
    c.bench_function("diff_with_changes", |b| {
        let temp_dir = TempDir::new().unwrap();
        fixtures::create_flat_dir(temp_dir.path(), 5_000).unwrap();
        let root = RootDir::resolve(temp_dir.path()).unwrap();
        let before = scan::build(&root).unwrap().snapshot;

        for i in (0..5_000).step_by(10) {
            fs::remove_file(temp_dir.path().join(format!("entry-{i:05}.dat"))).unwrap();
        }
        fixtures::create_deep_tree(&temp_dir.path().join("new"), 3, 5).unwrap();
        let after = scan::build(&root).unwrap().snapshot;

        b.iter(|| {
            let result = diff::diff(black_box(&before), black_box(&after)).unwrap();
            assert!(!result.is_empty());
            black_box(result);
        });
    });
}

criterion_group!(
    benches,
    bench_build_deep_tree,
    bench_build_flat_dir,
    bench_save_load,
    bench_diff,
);

criterion_main!(benches);
