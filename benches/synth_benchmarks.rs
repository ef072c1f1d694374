//! Benchmarks for the hot loops this crate's callers iterate most: cube
//! algebra (the ESOP/EXORLINK inner loop) and k-feasible cut enumeration
//! over a moderately wide AIG.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xmg_synth::cuts::{enumerate_cuts, CutConfig};
use xmg_synth::esop::{minimize, EsopConfig, EsopCover};
use xmg_synth::graph::aig::Aig;
use xmg_synth::stats::Stats;
use xmg_synth::tt::cube::Cube;

fn random_cubes(nvars: usize, count: usize) -> Vec<Cube> {
    // A small LCG keeps this deterministic without pulling in `rand`
    // (this crate's dependency stack has no use for it elsewhere).
    let mut state: u64 = 0x9E3779B97F4A7C15;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        state
    };
    (0..count)
        .map(|_| {
            let mut pattern = String::with_capacity(nvars);
            for _ in 0..nvars {
                pattern.push(match next() % 3 {
                    0 => '0',
                    1 => '1',
                    _ => '-',
                });
            }
            Cube::from_pattern(&pattern)
        })
        .collect()
}

fn wide_and_chain(width: usize) -> Aig {
    let mut aig = Aig::new(width);
    let mut acc = aig.input(0);
    for i in 1..width {
        let lit = aig.input(i);
        acc = aig.and(acc, lit);
    }
    aig.add_output(acc);
    aig
}

fn bench_esop_minimize(c: &mut Criterion) {
    let cover = EsopCover::new(8, random_cubes(8, 40));
    c.bench_function("esop_minimize_8vars_40cubes", |b| {
        b.iter(|| {
            let mut stats = Stats::default();
            let result = minimize(black_box(&cover), &EsopConfig::default(), &mut stats);
            black_box(result);
        });
    });
}

fn bench_cut_enumeration(c: &mut Criterion) {
    let aig = wide_and_chain(16);
    c.bench_function("enumerate_cuts_16input_and_chain", |b| {
        b.iter(|| {
            let cuts = enumerate_cuts(black_box(&aig), CutConfig::default());
            black_box(cuts);
        });
    });
}

criterion_group!(benches, bench_esop_minimize, bench_cut_enumeration);
criterion_main!(benches);
