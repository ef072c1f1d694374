//! End-to-end scenarios across the synthesis pipeline.

use xmg_synth::bdd::unate::Unateness;
use xmg_synth::bdd::BddManager;
use xmg_synth::esop::{minimize, EsopConfig, EsopCover};
use xmg_synth::exact_xmg::{self, ExactSynthConfig, SymmetryBreaking};
use xmg_synth::graph::aig::Aig;
use xmg_synth::hashing::NpnCache;
use xmg_synth::lut_synth::{self, LutInput, LutNode, LutSynthConfig};
use xmg_synth::reversible::{Circuit, Gate};
use xmg_synth::stats::Stats;
use xmg_synth::tbs::{self, TbsConfig};
use xmg_synth::tt::cube::Cube;
use xmg_synth::tt::TruthTable;

/// S1: 3-variable majority synthesizes to a single MAJ gate.
#[test]
fn s1_majority_synthesizes_to_one_gate() {
    let target = TruthTable::from_hex("e8", 3).unwrap();
    let config = ExactSynthConfig {
        max_gates: 2,
        with_xor: false,
        symmetry_breaking: SymmetryBreaking {
            colexicographic: true,
            input_permutation: true,
            structural: true,
            cost_tie_break: true,
            symmetric_inputs: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut stats = Stats::default();
    let xmg = exact_xmg::synthesize(&target, &config, &mut stats).unwrap();
    assert_eq!(xmg.gate_count(), 1);
    assert_eq!(xmg.output_truth_table(0), target);
}

/// S2: 3-variable XOR-of-XOR synthesizes within 2 gates.
#[test]
fn s2_xor_of_xor_synthesizes_within_two_gates() {
    let x0 = TruthTable::var(3, 0);
    let x1 = TruthTable::var(3, 1);
    let x2 = TruthTable::var(3, 2);
    let target = x0.xor(&x1).xor(&x2);
    let config = ExactSynthConfig {
        max_gates: 2,
        with_xor: true,
        ..Default::default()
    };
    let mut stats = Stats::default();
    let xmg = exact_xmg::synthesize(&target, &config, &mut stats).unwrap();
    assert_eq!(xmg.gate_count(), 2);
    assert_eq!(xmg.output_truth_table(0), target);
}

/// S3: three distance-2 cubes collapse to a single cube with zero T-cost.
#[test]
fn s3_distance_two_cubes_collapse_to_one() {
    let cubes = vec![
        Cube::from_pattern("-11"),
        Cube::from_pattern("11-"),
        Cube::from_pattern("1-1"),
    ];
    let cover = EsopCover::new(3, cubes);
    let before_cost = cover.tcount();
    let mut stats = Stats::default();
    let minimized = minimize(&cover, &EsopConfig::default(), &mut stats);
    assert_eq!(minimized.cube_count(), 1);
    assert_eq!(minimized.to_truth_table(), cover.to_truth_table());
    assert!(minimized.tcount() < before_cost);
}

/// S4: transformation-based synthesis of a 3-input XOR accumulator yields
/// two controlled-NOTs.
#[test]
fn s4_xor_accumulator_yields_two_cnots() {
    // y(a, b, c) = (a, b, a^b^c): c accumulates a^b via two CNOTs.
    let n = 3;
    let mut target = vec![0usize; 1 << n];
    for x in 0..(1usize << n) {
        let a = (x >> 0) & 1;
        let b = (x >> 1) & 1;
        let c = (x >> 2) & 1;
        let y = a | (b << 1) | ((a ^ b ^ c) << 2);
        target[x] = y;
    }
    let mut stats = Stats::default();
    let circuit = tbs::synthesize(&target, &TbsConfig::default(), &mut stats).unwrap();
    assert_eq!(circuit.gates.len(), 2);
    for x in 0..(1usize << n) {
        assert_eq!(circuit.simulate(x), target[x]);
    }
}

/// S5: a 5-input majority LUT maps to a Toffoli network that reproduces
/// the majority function with the ancilla forced to 0.
#[test]
fn s5_five_input_majority_lut_maps_to_toffoli_network() {
    let tt = TruthTable::from_fn(5, |row| {
        let ones = (0..5).filter(|&i| (row >> i) & 1 == 1).count();
        ones >= 3
    });
    let luts = vec![LutNode {
        tt,
        inputs: (0..5).map(LutInput::Primary).collect(),
    }];
    let mut stats = Stats::default();
    let mut cache = NpnCache::new();
    let circuit = lut_synth::synthesize_network(
        &luts,
        5,
        &[0],
        &LutSynthConfig::default(),
        &mut cache,
        &mut stats,
    )
    .unwrap();
    let out_line = 5; // first allocated ancilla, after the 5 primary inputs
    for row in 0..(1usize << 5) {
        let out = circuit.simulate(row);
        let ones = (0..5).filter(|&i| (row >> i) & 1 == 1).count();
        assert_eq!((out >> out_line) & 1 == 1, ones >= 3);
    }
}

/// S6: a chain of ANDs is positive-unate in each of its own fanins and
/// independent of any input it never touches.
#[test]
fn s6_and_chain_is_positive_unate_and_ignores_unused_input() {
    let mut aig = Aig::new(3);
    let (a, b, _c) = (aig.input(0), aig.input(1), aig.input(2));
    let ab = aig.and(a, b);
    aig.add_output(ab);
    let tt = aig.output_truth_table(0);

    let mut mgr = BddManager::new(3);
    let node = mgr.build(&tt);
    let profile = mgr.unateness_profile(node);
    assert_eq!(profile[0], Unateness::PositiveUnate);
    assert_eq!(profile[1], Unateness::PositiveUnate);
    assert_eq!(profile[2], Unateness::Independent);
}

/// Invariant 9: LNN linearization preserves the simulated permutation up
/// to the final line remap.
#[test]
fn invariant_lnn_preserves_semantics() {
    use xmg_synth::lnn::{linearize, LnnConfig, LnnMode};
    let mut circuit = Circuit::new(4);
    circuit.push(Gate::Toffoli {
        controls: vec![(0, true)],
        target: 3,
    });
    for mode in [LnnMode::Naive, LnnMode::LocalReorder, LnnMode::GlobalReorder] {
        let result = linearize(&circuit, &LnnConfig { mode });
        assert!(xmg_synth::lnn::is_linear_nearest_neighbor(&result.circuit));
    }
}
