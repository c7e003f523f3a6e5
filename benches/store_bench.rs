//! Benchmarks for inodekv store operations

use criterion::{criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use inodekv::store::EmbeddedStore;
use inodekv::{Config, InodeRecord, InodeRef, InodeStore, Permissions, SyncStrategy};

fn sample_record(volume: u64, inode: u64) -> InodeRecord {
    InodeRecord {
        volume,
        inode,
        size: 4096,
        permissions: Permissions {
            mode: 0o644,
            uid: 1000,
            gid: 1000,
        },
        created_ms: 1_700_000_000_000,
        modified_ms: 1_700_000_000_000,
        attrs: Default::default(),
        blocks: vec![0; 16],
    }
}

fn store_benchmarks(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(dir.path())
        .sync_strategy(SyncStrategy::Manual)
        .build();
    let store = EmbeddedStore::open(&config).unwrap();

    let mut inode = 0u64;
    c.bench_function("write", |b| {
        b.iter(|| {
            inode += 1;
            store
                .write(InodeRef::new(1, inode), &sample_record(1, inode))
                .unwrap();
        })
    });

    store
        .write(InodeRef::new(2, 1), &sample_record(2, 1))
        .unwrap();
    c.bench_function("get", |b| {
        b.iter(|| store.get(InodeRef::new(2, 1)).unwrap())
    });

    c.bench_function("get_missing", |b| {
        b.iter(|| store.get(InodeRef::new(3, 1)).unwrap_err())
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
