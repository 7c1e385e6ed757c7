use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use freqcache::{LfuCache, LruCache, RandomTable};

fn bench_lfu_hot_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hot_1kb", |b| {
        let mut cache = LfuCache::new(1000).unwrap();
        let data = vec![b'x'; 1024];

        for i in 0..100u64 {
            cache.put(i, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_lfu_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = LfuCache::new(1000).unwrap();

        for i in 0..1000u64 {
            cache.put(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 1000)));
            } else {
                black_box(cache.put(counter % 2000, counter));
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_eviction_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("lfu_put_unique", |b| {
        let mut cache = LfuCache::new(100).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.put(counter, counter));
            counter += 1;
        });
    });

    group.bench_function("lru_put_unique", |b| {
        let mut cache = LruCache::new(100).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.put(counter, counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_random_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_table");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_remove_sample", |b| {
        let mut table = RandomTable::with_capacity(1000);
        for i in 0..1000u64 {
            table.insert(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            let key = counter % 1000;
            table.remove(&key);
            table.insert(key, counter);
            black_box(table.random());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lfu_hot_get,
    bench_lfu_mixed_50_50,
    bench_eviction_heavy,
    bench_random_table
);
criterion_main!(benches);
