use criterion::{criterion_group, criterion_main, Criterion};
use rustymat::MatFile;
use rustymat_container::{AttrValue, MemBuilder, MemContainer, RawData, StorageType};

const N: usize = 100_000;
const CELLS: usize = 256;

fn f64_raw(shape: Vec<u64>, values: &[f64]) -> RawData {
    RawData::Numeric {
        dtype: StorageType::F64,
        shape,
        bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
    }
}

fn build_fixture() -> MemContainer {
    let mut b = MemBuilder::new();
    let root = b.root();

    let signal: Vec<f64> = (0..N).map(|i| i as f64).collect();
    let ds = b.add_dataset(root, "signal", f64_raw(vec![1, N as u64], &signal));
    b.set_attr(ds, "MATLAB_class", AttrValue::String("double".into()));

    let mut tokens = Vec::with_capacity(CELLS);
    for i in 0..CELLS {
        let t = b.detached_dataset(f64_raw(vec![1, 1], &[i as f64]));
        b.set_attr(t, "MATLAB_class", AttrValue::String("double".into()));
        tokens.push(b.ref_to(t));
    }
    let cell = b.add_dataset(
        root,
        "chunks",
        RawData::Refs {
            shape: vec![1, CELLS as u64],
            tokens,
        },
    );
    b.set_attr(cell, "MATLAB_class", AttrValue::String("cell".into()));

    b.finish()
}

fn bench_read_all(c: &mut Criterion) {
    let file = MatFile::from_container(build_fixture()).unwrap();
    c.bench_function("read_all_signal_and_cells", |b| {
        b.iter(|| file.read_all().unwrap())
    });
}

fn bench_read_one(c: &mut Criterion) {
    let file = MatFile::from_container(build_fixture()).unwrap();
    c.bench_function("read_cell_array", |b| {
        b.iter(|| file.read(&["chunks"]).unwrap())
    });
}

criterion_group!(benches, bench_read_all, bench_read_one);
criterion_main!(benches);
