use criterion::{black_box, criterion_group, criterion_main, Criterion};

use suffix_tray::index::{LcpComputer, Method, SuffixChecker, SuffixTrayBuilder, Text};
use suffix_tray::util::alphabet::Alphabet;

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn coded_reference(len: usize, alphabet: &Alphabet) -> Vec<u8> {
    let mut seq = alphabet.encode(&make_reference(len), true).unwrap();
    // a repetitive tail makes the walks long
    let tail = alphabet.encode(&b"ACGT".repeat(len / 40), true).unwrap();
    seq.extend(tail);
    seq
}

fn bench_methods(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let seq = coded_reference(20_000, &alphabet);
    let text = Text::new(&seq, &alphabet).unwrap();

    for method in Method::ALL {
        c.bench_function(&format!("suffixtray_{}_20k", method), |b| {
            b.iter(|| {
                let mut builder = SuffixTrayBuilder::new(text);
                black_box(builder.build::<i32>(black_box(method)).unwrap());
            })
        });
    }
}

fn bench_lcp(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let seq = coded_reference(20_000, &alphabet);
    let text = Text::new(&seq, &alphabet).unwrap();
    let linked = SuffixTrayBuilder::new(text).build::<i32>(Method::L).unwrap();
    let xor = SuffixTrayBuilder::new(text).build::<i32>(Method::BothLR).unwrap();
    let lcp = LcpComputer::new(text);

    c.bench_function("lcp_twin_array_20k", |b| {
        b.iter(|| {
            black_box(lcp.compute(black_box(&linked)));
        })
    });
    c.bench_function("lcp_xor_20k", |b| {
        b.iter(|| {
            black_box(lcp.compute(black_box(&xor)));
        })
    });
}

fn bench_check(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let seq = coded_reference(20_000, &alphabet);
    let text = Text::new(&seq, &alphabet).unwrap();
    let list = SuffixTrayBuilder::new(text).build::<i64>(Method::MinLR).unwrap();
    let checker = SuffixChecker::new(text);

    c.bench_function("check_20k", |b| {
        b.iter(|| {
            black_box(checker.check_list(black_box(&list)));
        })
    });
}

criterion_group!(benches, bench_methods, bench_lcp, bench_check);
criterion_main!(benches);
