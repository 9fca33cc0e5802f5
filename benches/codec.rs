use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use velocypack::{Builder, Item, Slice, VPack};

#[derive(Serialize, Deserialize)]
struct Doc<'a> {
    _key: &'a str,
    name: &'a str,
    count: u64,
    score: f64,
    tags: Vec<&'a str>,
}

fn random_keys(n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..n)
        .map(|i| {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            format!("{}{}", i, suffix)
        })
        .collect()
}

fn object_with(keys: &[String]) -> Vec<u8> {
    let mut builder = Builder::new();
    builder.add(Item::object()).unwrap();
    for (i, key) in keys.iter().enumerate() {
        builder.add_entry(key, Item::Long(i as i64)).unwrap();
    }
    builder.close().unwrap();
    builder.into_vec().unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [10usize, 100, 1000] {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("object", n), &keys, |b, keys| {
            b.iter(|| object_with(black_box(keys)))
        });
        group.bench_with_input(BenchmarkId::new("array", n), &n, |b, &n| {
            b.iter(|| {
                let mut builder = Builder::new();
                builder.add(Item::array()).unwrap();
                for i in 0..n {
                    builder.add(Item::Long(black_box(i as i64))).unwrap();
                }
                builder.close().unwrap();
                builder.into_vec().unwrap()
            })
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for n in [10usize, 100, 1000] {
        let keys = random_keys(n);
        let encoded = object_with(&keys);
        let probe = keys[n / 2].clone();
        group.bench_with_input(BenchmarkId::new("get", n), &probe, |b, probe| {
            let slice = Slice::new(&encoded);
            b.iter(|| slice.get(black_box(probe)).unwrap())
        });
    }
    group.finish();
}

fn bench_serde(c: &mut Criterion) {
    let vpack = VPack::new();
    let doc = Doc {
        _key: "abc123",
        name: "a reasonably long document name",
        count: 1 << 40,
        score: 0.75,
        tags: vec!["one", "two", "three", "four"],
    };
    let encoded = vpack.serialize(&doc).unwrap();

    let mut group = c.benchmark_group("serde");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("serialize", |b| {
        b.iter(|| vpack.serialize(black_box(&doc)).unwrap())
    });
    group.bench_function("deserialize", |b| {
        b.iter(|| {
            let doc: Doc = vpack.deserialize(black_box(&encoded)).unwrap();
            doc
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_lookup, bench_serde);
criterion_main!(benches);
