//! Component H: symbolic transformation-based synthesis (§4.H).
//!
//! Realizes a permutation `f: {0,1}^n -> {0,1}^n` as a Toffoli network by
//! driving an incremental SAT solver with one query per Hamming weight: at
//! weight `k`, ask whether any `x` of that weight still differs from its
//! current image `y(x)` under the gates emitted so far; if so, emit two
//! Toffoli gates that fix `x` and loop, otherwise advance to `k+1`. Grounded
//! on `sat.rs`'s `Solver`/`Cnf`/`sinz_at_most_k` for exactly this
//! "incremental SAT-based gate selection" role.
//!
//! The function-table-as-CNF encoding (one implication block per row) keeps
//! the whole loop expressible over the SAT solver instead of scanning the
//! table directly, at the cost of `O(2^n * n)` clauses per query — fine for
//! the small `n` this crate's exact components target.

use crate::error::{BudgetExhaustion, InvalidInput, SynthError};
use crate::reversible::{Circuit, Gate};
use crate::sat::{sinz_at_most_k, Cnf, Lit, Solver};
use crate::stats::{Progress, Stats};

#[derive(Debug, Clone, Copy)]
pub struct TbsConfig {
    pub progress: Progress,
    /// Safety cap on total SAT queries, guarding against a malformed
    /// (non-permutation) target ever causing a non-terminating loop.
    pub max_queries: usize,
}

impl Default for TbsConfig {
    fn default() -> Self {
        TbsConfig {
            progress: Progress::silent(),
            max_queries: 1 << 16,
        }
    }
}

fn validate_permutation(target: &[usize]) -> Result<usize, SynthError> {
    let size = target.len();
    if size == 0 || !size.is_power_of_two() {
        return Err(InvalidInput::DimensionMismatch {
            expected: size.next_power_of_two(),
            actual: size,
        }
        .into());
    }
    let n = size.trailing_zeros() as usize;
    let mut seen = vec![false; size];
    for &v in target {
        if v >= size || seen[v] {
            return Err(InvalidInput::DimensionMismatch {
                expected: size,
                actual: v,
            }
            .into());
        }
        seen[v] = true;
    }
    Ok(n)
}

/// Encode "does some `x` with `popcount(x) = k` still satisfy `y(x) != x`
/// under the table `y_table`?" as a CNF over fresh `x`/`y` variables, the
/// table built in via one Tseitin-style implication block per row.
fn build_mismatch_cnf(n: usize, k: usize, y_table: &[usize]) -> (Cnf, Vec<u32>, Vec<u32>) {
    let mut cnf = Cnf::new();
    let x_vars: Vec<u32> = (0..n).map(|_| cnf.new_var()).collect();
    let y_vars: Vec<u32> = (0..n).map(|_| cnf.new_var()).collect();

    for (row, &image) in y_table.iter().enumerate() {
        for j in 0..n {
            let mut clause: Vec<Lit> = (0..n)
                .map(|i| {
                    let bit = (row >> i) & 1 == 1;
                    if bit {
                        Lit::neg(x_vars[i])
                    } else {
                        Lit::pos(x_vars[i])
                    }
                })
                .collect();
            let image_bit = (image >> j) & 1 == 1;
            clause.push(if image_bit {
                Lit::pos(y_vars[j])
            } else {
                Lit::neg(y_vars[j])
            });
            cnf.add_clause(clause);
        }
    }

    let x_lits: Vec<Lit> = x_vars.iter().map(|&v| Lit::pos(v)).collect();
    for clause in sinz_at_most_k(&mut cnf, &x_lits, k) {
        cnf.add_clause(clause);
    }
    let neg_x_lits: Vec<Lit> = x_vars.iter().map(|&v| Lit::neg(v)).collect();
    for clause in sinz_at_most_k(&mut cnf, &neg_x_lits, n - k) {
        cnf.add_clause(clause);
    }

    let mut mismatch_clause = Vec::with_capacity(n);
    for i in 0..n {
        let d = cnf.new_var();
        let (x, y) = (x_vars[i], y_vars[i]);
        cnf.add_clause(vec![Lit::neg(x), Lit::neg(y), Lit::neg(d)]);
        cnf.add_clause(vec![Lit::pos(x), Lit::pos(y), Lit::neg(d)]);
        cnf.add_clause(vec![Lit::pos(x), Lit::neg(y), Lit::pos(d)]);
        cnf.add_clause(vec![Lit::neg(x), Lit::pos(y), Lit::pos(d)]);
        mismatch_clause.push(Lit::pos(d));
    }
    cnf.add_clause(mismatch_clause);

    (cnf, x_vars, y_vars)
}

/// Synthesize a Toffoli network realizing the permutation `target` (row
/// `x` maps to `target[x]`).
pub fn synthesize(
    target: &[usize],
    config: &TbsConfig,
    stats: &mut Stats,
) -> Result<Circuit, SynthError> {
    let n = validate_permutation(target)?;
    let mut y_table = target.to_vec();
    let mut gates: Vec<Gate> = Vec::new();
    let mut queries = 0usize;

    for k in 0..=n {
        loop {
            if queries >= config.max_queries {
                return Err(BudgetExhaustion::MaxDepthReached {
                    last_attempted: queries,
                }
                .into());
            }
            queries += 1;
            let (cnf, x_vars, y_vars) = build_mismatch_cnf(n, k, &y_table);
            let solver = Solver::new(cnf);
            let model = match solver.solve_assuming(&[], stats)? {
                None => break,
                Some(model) => model,
            };
            stats.assignment_count += 1;

            let x_bits: Vec<bool> = x_vars.iter().map(|&v| model[v as usize]).collect();
            let y_bits: Vec<bool> = y_vars.iter().map(|&v| model[v as usize]).collect();
            let y1: Vec<(usize, bool)> = (0..n).filter(|&i| y_bits[i]).map(|i| (i, true)).collect();
            let x1: Vec<(usize, bool)> = (0..n).filter(|&i| x_bits[i]).map(|i| (i, true)).collect();
            let i10: Vec<usize> = (0..n).filter(|&i| x_bits[i] && !y_bits[i]).collect();
            let i01: Vec<usize> = (0..n).filter(|&i| !x_bits[i] && y_bits[i]).collect();

            let mut new_gates = Vec::with_capacity(i10.len() + i01.len());
            for &t in &i10 {
                new_gates.push(Gate::Toffoli {
                    controls: y1.clone(),
                    target: t,
                });
            }
            for &t in &i01 {
                new_gates.push(Gate::Toffoli {
                    controls: x1.clone(),
                    target: t,
                });
            }

            config.progress.line(format_args!(
                "tbs: weight {} mismatch, emitting {} gate(s)",
                k,
                new_gates.len()
            ));

            for gate in &new_gates {
                for image in y_table.iter_mut() {
                    *image = gate.apply(*image);
                }
            }
            gates.splice(0..0, new_gates);
        }
    }

    let mut circuit = Circuit::new(n);
    circuit.gates = gates;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_permutation_needs_no_gates() {
        let target: Vec<usize> = (0..4).collect();
        let mut stats = Stats::default();
        let circuit = synthesize(&target, &TbsConfig::default(), &mut stats).unwrap();
        assert!(circuit.gates.is_empty());
        assert_eq!(circuit.permutation(), target);
    }

    #[test]
    fn single_cnot_permutation_round_trips() {
        // CNOT(control=line1, target=line0): rows 2,3 swap, 0,1 fixed.
        let target = vec![0, 1, 3, 2];
        let mut stats = Stats::default();
        let circuit = synthesize(&target, &TbsConfig::default(), &mut stats).unwrap();
        assert_eq!(circuit.permutation(), target);
    }

    #[test]
    fn three_input_xor_accumulator_round_trips() {
        // f(a, b, c) = (a, b, c xor a xor b), matching S4: CNOT(a,c); CNOT(b,c).
        let n = 3;
        let target: Vec<usize> = (0..(1 << n))
            .map(|x| {
                let a = x & 1;
                let b = (x >> 1) & 1;
                let c = (x >> 2) & 1;
                let out_c = c ^ a ^ b;
                a | (b << 1) | (out_c << 2)
            })
            .collect();
        let mut stats = Stats::default();
        let circuit = synthesize(&target, &TbsConfig::default(), &mut stats).unwrap();
        assert_eq!(circuit.permutation(), target);
    }

    #[test]
    fn non_bijective_table_is_rejected() {
        let target = vec![0, 0, 2, 3];
        let mut stats = Stats::default();
        let err = synthesize(&target, &TbsConfig::default(), &mut stats).unwrap_err();
        assert!(matches!(err, SynthError::Invalid(_)));
    }

    #[test]
    fn non_power_of_two_length_is_rejected() {
        let target = vec![0, 1, 2];
        let mut stats = Stats::default();
        let err = synthesize(&target, &TbsConfig::default(), &mut stats).unwrap_err();
        assert!(matches!(err, SynthError::Invalid(_)));
    }
}
