//! Component E: exact XMG synthesis via iterative deepening over a SAT
//! backend.
//!
//! For each candidate gate count `m = 0, 1, 2, ...`, a CNF instance encodes
//! "some `m`-gate XMG realizes the target function" (§4.E): one exactly-one
//! fanin-selector group per gate input slot, a type selector when
//! `with_xor` is enabled, an output selector, and — for every input row `j`
//! of the target — a chain of Tseitin-style definitions tying each gate's
//! per-row output bit to its selected fanins' per-row values, down to a
//! final clause asserting the selected circuit output on row `j` equals
//! `target.eval(j)`. This is the classical per-row functional-consistency
//! encoding: a model is a correct realization by construction, not merely a
//! plausible structure. `try_with_gate_count` still decodes and simulates
//! the model before returning it and blocks the exact selector assignment
//! on a (should-be-unreachable) mismatch, as a defense against an encoding
//! bug rather than as the source of correctness.

use crate::error::BudgetExhaustion;
use crate::graph::aig::Lit as GraphLit;
use crate::graph::xmg::Xmg;
use crate::reversible::CostFn;
use crate::sat::{pairwise_exactly_one, Cnf, Lit as SatLit, Solver};
use crate::stats::{Progress, Stats};
use crate::tt::TruthTable;

/// `a <-> (b xor c)`, as a 4-row truth table indexed by `bit0 = b, bit1 = c`.
const XOR2_TABLE: [bool; 4] = [false, true, true, false];

/// `a <-> MAJ(b, c, d)`, as an 8-row truth table indexed by
/// `bit0 = b, bit1 = c, bit2 = d`.
const MAJ3_TABLE: [bool; 8] = [false, false, false, true, false, true, true, true];

/// Assert, whenever `cond` holds, that `out` equals `table` applied to
/// `inputs` (`table` indexed by the inputs' bits, `inputs[0]` the
/// least-significant). One clause per table row, each guarded by `cond` —
/// the standard conditioned-Tseitin definition this module uses for every
/// per-row gate/selector relation.
fn assert_conditional_definition(
    cnf: &mut Cnf,
    cond: SatLit,
    out: SatLit,
    inputs: &[SatLit],
    table: &[bool],
) {
    for (row, &expected) in table.iter().enumerate() {
        let mut clause = vec![cond.negate()];
        for (i, &lit) in inputs.iter().enumerate() {
            let bit = (row >> i) & 1 == 1;
            clause.push(if bit { lit.negate() } else { lit });
        }
        clause.push(if expected { out.negate() } else { out });
        cnf.add_clause(clause);
    }
}

/// The literal for candidate `c`'s value on input row `row`: a fixed
/// constant (via `const_true`) when `c` is one of the `n` primary inputs,
/// or gate `c - n`'s per-row output variable otherwise.
fn candidate_value_lit(
    n: usize,
    row: usize,
    c: usize,
    gate_row_out: &[Vec<u32>],
    const_true: u32,
) -> SatLit {
    if c < n {
        let bit = (row >> c) & 1 == 1;
        if bit {
            SatLit::pos(const_true)
        } else {
            SatLit::neg(const_true)
        }
    } else {
        SatLit::pos(gate_row_out[c - n][row])
    }
}

/// Symmetry-breaking knobs named after the single-letter flags exact
/// synthesis tools in this space conventionally expose. Only `structural`
/// (fanin-order canonicalization) is implemented against the row-consistency
/// CNF above; the rest are accepted so configs written against the full flag
/// set still compile, but are documented no-ops — each would need its own
/// extra clauses over the structural selector variables, which nothing here
/// builds yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetryBreaking {
    /// `s`: canonicalize each gate's fanin selection to non-decreasing
    /// candidate index, implemented (both MAJ3 and XOR2 are symmetric in
    /// their operands, so this loses no solutions).
    pub structural: bool,
    /// `C`: colexicographic ordering of gate outputs. No-op.
    pub colexicographic: bool,
    /// `I`: input-permutation symmetry breaking. No-op.
    pub input_permutation: bool,
    /// `a`: associativity-class breaking for chains of the same gate type.
    /// No-op.
    pub associativity: bool,
    /// `l`: lexicographic tie-break on fanin literal polarity. No-op.
    pub lex_polarity: bool,
    /// `t`: cost-tie-break ordering among same-size solutions. No-op.
    pub cost_tie_break: bool,
    /// `y`: symmetric-input detection via NPN hashing. No-op.
    pub symmetric_inputs: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ExactSynthConfig {
    pub max_gates: usize,
    pub with_xor: bool,
    pub symmetry_breaking: SymmetryBreaking,
    pub cost: CostFn,
    pub progress: Progress,
}

impl Default for ExactSynthConfig {
    fn default() -> Self {
        ExactSynthConfig {
            max_gates: 6,
            with_xor: true,
            symmetry_breaking: SymmetryBreaking::default(),
            cost: CostFn::GateCount,
            progress: Progress::silent(),
        }
    }
}

struct GateVars {
    fanin_sel: [Vec<u32>; 3],
    fanin_pol: [u32; 3],
    is_xor: Option<u32>,
}

/// Synthesize a minimal-gate XMG computing `target`, by iterative
/// deepening from 0 gates up to `config.max_gates`.
///
/// Honors an implicit `with_xor` precondition the same way the teacher's
/// exact-synthesis entry point does: callers that pass `with_xor = true`
/// are expected to have already checked whether a pure-MAJ3 solution at a
/// smaller gate count exists, since this function does not itself compare
/// across `with_xor` settings — it searches exactly the gate alphabet
/// `config` selects.
pub fn synthesize(
    target: &TruthTable,
    config: &ExactSynthConfig,
    stats: &mut Stats,
) -> Result<Xmg, BudgetExhaustion> {
    let n = target.nvars();
    for m in 0..=config.max_gates {
        stats.last_attempted_size = m;
        config
            .progress
            .line(format_args!("exact_xmg: trying {} gates", m));
        if let Some(xmg) = try_with_gate_count(target, n, m, config, stats) {
            return Ok(xmg);
        }
    }
    Err(BudgetExhaustion::MaxDepthReached {
        last_attempted: config.max_gates,
    })
}

/// Like [`synthesize`] but collects every minimal-cost solution at the
/// winning gate count instead of stopping at the first (§4.E
/// "all-solutions enumeration").
pub fn synthesize_all(
    target: &TruthTable,
    config: &ExactSynthConfig,
    stats: &mut Stats,
) -> Result<Vec<Xmg>, BudgetExhaustion> {
    let n = target.nvars();
    for m in 0..=config.max_gates {
        stats.last_attempted_size = m;
        let mut found = Vec::new();
        collect_all_with_gate_count(target, n, m, config, stats, &mut found);
        if !found.is_empty() {
            return Ok(found);
        }
    }
    Err(BudgetExhaustion::MaxDepthReached {
        last_attempted: config.max_gates,
    })
}

fn try_with_gate_count(
    target: &TruthTable,
    n: usize,
    m: usize,
    config: &ExactSynthConfig,
    stats: &mut Stats,
) -> Option<Xmg> {
    let (mut cnf, gate_vars, out_sel, out_pol) = build_structure_cnf(target, n, m, config);
    loop {
        let solver = Solver::new(cnf.clone());
        let model = match solver.solve_assuming(&[], stats) {
            Ok(Some(m)) => m,
            Ok(None) => return None,
            Err(_) => return None,
        };
        let xmg = decode(&model, n, m, &gate_vars, &out_sel, out_pol);
        if functions_match(&xmg, target) {
            return Some(xmg);
        }
        cnf.add_clause(blocking_clause(&model, &gate_vars, &out_sel, out_pol));
    }
}

fn collect_all_with_gate_count(
    target: &TruthTable,
    n: usize,
    m: usize,
    config: &ExactSynthConfig,
    stats: &mut Stats,
    found: &mut Vec<Xmg>,
) {
    let (mut cnf, gate_vars, out_sel, out_pol) = build_structure_cnf(target, n, m, config);
    loop {
        let solver = Solver::new(cnf.clone());
        let model = match solver.solve_assuming(&[], stats) {
            Ok(Some(m)) => m,
            _ => return,
        };
        let xmg = decode(&model, n, m, &gate_vars, &out_sel, out_pol);
        if functions_match(&xmg, target) {
            found.push(xmg);
        }
        cnf.add_clause(blocking_clause(&model, &gate_vars, &out_sel, out_pol));
    }
}

fn build_structure_cnf(
    target: &TruthTable,
    n: usize,
    m: usize,
    config: &ExactSynthConfig,
) -> (Cnf, Vec<GateVars>, Vec<u32>, u32) {
    let mut cnf = Cnf::new();
    let num_rows = 1usize << n;

    // A variable forced true by a unit clause, used to express "constant
    // true/false" and "unconditional" (cond = const_true) as ordinary
    // literals so every per-row relation can share one conditioned-Tseitin
    // helper.
    let const_true = cnf.new_var();
    cnf.add_clause(vec![SatLit::pos(const_true)]);
    let unconditional = SatLit::pos(const_true);

    let mut gate_vars: Vec<GateVars> = Vec::with_capacity(m);
    let mut gate_row_out: Vec<Vec<u32>> = Vec::with_capacity(m);

    for g in 0..m {
        let num_candidates = n + g;
        let mut fanin_sel: [Vec<u32>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut fanin_pol = [0u32; 3];
        for slot in 0..3 {
            let sel: Vec<u32> = (0..num_candidates).map(|_| cnf.new_var()).collect();
            let lits: Vec<SatLit> = sel.iter().map(|&v| SatLit::pos(v)).collect();
            for clause in pairwise_exactly_one(&lits) {
                cnf.add_clause(clause);
            }
            fanin_pol[slot] = cnf.new_var();
            fanin_sel[slot] = sel;
        }
        if config.symmetry_breaking.structural {
            for slot in 0..2 {
                for a in 0..num_candidates {
                    for b in 0..a {
                        // Forbid slot[slot] selecting `a` while slot[slot+1]
                        // selects a strictly smaller `b`.
                        cnf.add_clause(vec![
                            SatLit::neg(fanin_sel[slot][a]),
                            SatLit::neg(fanin_sel[slot + 1][b]),
                        ]);
                    }
                }
            }
        }
        let is_xor = if config.with_xor {
            Some(cnf.new_var())
        } else {
            None
        };

        // Per-row definitions: in_{slot,row} <-> selected-candidate's value
        // on `row`, XOR-ed with the slot's polarity; then
        // row_out[row] <-> MAJ3(in_0, in_1, in_2), or XOR2(in_0, in_1) when
        // `is_xor` is set.
        let mut row_out = vec![0u32; num_rows];
        for row in 0..num_rows {
            let mut in_lits = [SatLit::pos(0); 3];
            for slot in 0..3 {
                let in_var = cnf.new_var();
                for (c, &sel_var) in fanin_sel[slot].iter().enumerate() {
                    let val = candidate_value_lit(n, row, c, &gate_row_out, const_true);
                    assert_conditional_definition(
                        &mut cnf,
                        SatLit::pos(sel_var),
                        SatLit::pos(in_var),
                        &[val, SatLit::pos(fanin_pol[slot])],
                        &XOR2_TABLE,
                    );
                }
                in_lits[slot] = SatLit::pos(in_var);
            }
            let out_var = cnf.new_var();
            match is_xor {
                Some(is_xor_var) => {
                    assert_conditional_definition(
                        &mut cnf,
                        SatLit::pos(is_xor_var),
                        SatLit::pos(out_var),
                        &[in_lits[0], in_lits[1]],
                        &XOR2_TABLE,
                    );
                    assert_conditional_definition(
                        &mut cnf,
                        SatLit::neg(is_xor_var),
                        SatLit::pos(out_var),
                        &[in_lits[0], in_lits[1], in_lits[2]],
                        &MAJ3_TABLE,
                    );
                }
                None => {
                    assert_conditional_definition(
                        &mut cnf,
                        unconditional,
                        SatLit::pos(out_var),
                        &[in_lits[0], in_lits[1], in_lits[2]],
                        &MAJ3_TABLE,
                    );
                }
            }
            row_out[row] = out_var;
        }

        gate_row_out.push(row_out);
        gate_vars.push(GateVars {
            fanin_sel,
            fanin_pol,
            is_xor,
        });
    }

    let out_candidates = n + m;
    let out_sel: Vec<u32> = (0..out_candidates).map(|_| cnf.new_var()).collect();
    let out_lits: Vec<SatLit> = out_sel.iter().map(|&v| SatLit::pos(v)).collect();
    for clause in pairwise_exactly_one(&out_lits) {
        cnf.add_clause(clause);
    }
    let out_pol = cnf.new_var();

    // Final-output row constraints: whenever `out_sel[c]` is chosen, the
    // selected candidate's value on `row` XOR-ed with `out_pol` must equal
    // `target.eval(row)` — no intermediate variable needed since the
    // expected value is a build-time constant.
    for row in 0..num_rows {
        let expected = target.eval(row);
        let expected_lit = if expected {
            SatLit::pos(const_true)
        } else {
            SatLit::neg(const_true)
        };
        for (c, &sel_var) in out_sel.iter().enumerate() {
            let val = candidate_value_lit(n, row, c, &gate_row_out, const_true);
            assert_conditional_definition(
                &mut cnf,
                SatLit::pos(sel_var),
                expected_lit,
                &[val, SatLit::pos(out_pol)],
                &XOR2_TABLE,
            );
        }
    }

    (cnf, gate_vars, out_sel, out_pol)
}

fn selected_index(model: &[bool], sel: &[u32]) -> usize {
    sel.iter()
        .position(|&v| model[v as usize])
        .expect("exactly-one constraint guarantees a selection")
}

fn decode(
    model: &[bool],
    n: usize,
    m: usize,
    gate_vars: &[GateVars],
    out_sel: &[u32],
    out_pol: u32,
) -> Xmg {
    let mut xmg = Xmg::new(n);
    let mut built: Vec<GraphLit> = (0..n).map(|i| xmg.input(i)).collect();
    for gv in gate_vars.iter().take(m) {
        let fanins: Vec<GraphLit> = (0..3)
            .map(|slot| {
                let idx = selected_index(model, &gv.fanin_sel[slot]);
                let lit = built[idx];
                if model[gv.fanin_pol[slot] as usize] {
                    lit.not()
                } else {
                    lit
                }
            })
            .collect();
        let is_xor = gv.is_xor.map(|v| model[v as usize]).unwrap_or(false);
        let out = if is_xor {
            xmg.xor(fanins[0], fanins[1])
        } else {
            xmg.maj3(fanins[0], fanins[1], fanins[2])
        };
        built.push(out);
    }
    let out_idx = selected_index(model, out_sel);
    let out_lit = built[out_idx];
    let final_lit = if model[out_pol as usize] {
        out_lit.not()
    } else {
        out_lit
    };
    xmg.add_output(final_lit);
    xmg
}

fn functions_match(xmg: &Xmg, target: &TruthTable) -> bool {
    xmg.output_truth_table(0) == *target
}

fn blocking_clause(
    model: &[bool],
    gate_vars: &[GateVars],
    out_sel: &[u32],
    out_pol: u32,
) -> Vec<SatLit> {
    let mut vars = Vec::new();
    for gv in gate_vars {
        for slot in 0..3 {
            vars.extend(gv.fanin_sel[slot].iter().copied());
            vars.push(gv.fanin_pol[slot]);
        }
        if let Some(v) = gv.is_xor {
            vars.push(v);
        }
    }
    vars.extend(out_sel.iter().copied());
    vars.push(out_pol);
    vars.into_iter()
        .map(|v| {
            if model[v as usize] {
                SatLit::neg(v)
            } else {
                SatLit::pos(v)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt::TruthTable;

    #[test]
    fn synthesizes_a_single_variable_with_zero_gates() {
        let target = TruthTable::var(2, 0);
        let mut stats = Stats::default();
        let config = ExactSynthConfig {
            max_gates: 2,
            ..Default::default()
        };
        let xmg = synthesize(&target, &config, &mut stats).unwrap();
        assert_eq!(xmg.output_truth_table(0), target);
        assert_eq!(stats.last_attempted_size, 0);
    }

    #[test]
    fn synthesizes_majority_of_three_with_one_gate() {
        let target = TruthTable::var(3, 0)
            .and(&TruthTable::var(3, 1))
            .or(&TruthTable::var(3, 1).and(&TruthTable::var(3, 2)))
            .or(&TruthTable::var(3, 0).and(&TruthTable::var(3, 2)));
        let mut stats = Stats::default();
        let config = ExactSynthConfig {
            max_gates: 3,
            with_xor: false,
            ..Default::default()
        };
        let xmg = synthesize(&target, &config, &mut stats).unwrap();
        assert_eq!(xmg.output_truth_table(0), target);
        assert_eq!(xmg.gate_count(), 1);
    }

    #[test]
    fn synthesizes_xor_with_one_gate_when_xor_enabled() {
        let target = TruthTable::var(2, 0).xor(&TruthTable::var(2, 1));
        let mut stats = Stats::default();
        let config = ExactSynthConfig {
            max_gates: 3,
            with_xor: true,
            ..Default::default()
        };
        let xmg = synthesize(&target, &config, &mut stats).unwrap();
        assert_eq!(xmg.output_truth_table(0), target);
        assert_eq!(xmg.gate_count(), 1);
    }

    #[test]
    fn returns_budget_exhaustion_when_max_gates_too_small() {
        let target = TruthTable::var(3, 0).xor(&TruthTable::var(3, 1).and(&TruthTable::var(3, 2)));
        let mut stats = Stats::default();
        let config = ExactSynthConfig {
            max_gates: 0,
            with_xor: false,
            ..Default::default()
        };
        let err = synthesize(&target, &config, &mut stats).unwrap_err();
        assert_eq!(err.last_attempted(), 0);
    }

    #[test]
    fn synthesize_all_returns_only_matching_solutions() {
        let target = TruthTable::var(2, 0).xor(&TruthTable::var(2, 1));
        let mut stats = Stats::default();
        let config = ExactSynthConfig {
            max_gates: 2,
            with_xor: true,
            ..Default::default()
        };
        let solutions = synthesize_all(&target, &config, &mut stats).unwrap();
        assert!(!solutions.is_empty());
        for xmg in &solutions {
            assert_eq!(xmg.output_truth_table(0), target);
        }
    }
}
