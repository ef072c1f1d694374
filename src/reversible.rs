//! Reversible circuit data model shared by components F-I: gates over a
//! fixed line count, evaluated as permutations of `2^lines` basis states.
//!
//! Mirrors the teacher's plain-struct-plus-enum shape for `Cube`/`Cover`
//! rather than introducing a class hierarchy: one flat [`Gate`] enum, one
//! [`Circuit`] holding a `Vec<Gate>`, both directly simulatable.

use std::fmt;

/// A single reversible gate over `lines` wires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Multi-controlled NOT (Toffoli generalised to `n` controls): flip
    /// `target` iff every control in `controls` matches its required
    /// polarity.
    Toffoli {
        controls: Vec<(usize, bool)>,
        target: usize,
    },
    /// Controlled swap of two targets.
    Fredkin {
        controls: Vec<(usize, bool)>,
        targets: (usize, usize),
    },
    /// A single-target gate drawn from the Pauli group (`X`, `Z`, or `Y`),
    /// optionally controlled — covers the single-qubit corrections the LUT
    /// pipeline and EXORLINK-driven ESOP mapping both emit.
    Pauli {
        controls: Vec<(usize, bool)>,
        target: usize,
        axis: PauliAxis,
    },
    /// A single-target rotation-like gate used for the T/T-dagger count
    /// metric (§9): `kind` distinguishes `T`, `Tdg`, `S`, `Sdg` without
    /// modelling full continuous rotations.
    Stg { target: usize, kind: StgKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauliAxis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StgKind {
    T,
    Tdg,
    S,
    Sdg,
}

impl Gate {
    /// Largest wire index this gate touches.
    fn max_line(&self) -> usize {
        match self {
            Gate::Toffoli { controls, target } => {
                controls.iter().map(|(l, _)| *l).chain([*target]).max().unwrap()
            }
            Gate::Fredkin { controls, targets } => controls
                .iter()
                .map(|(l, _)| *l)
                .chain([targets.0, targets.1])
                .max()
                .unwrap(),
            Gate::Pauli {
                controls, target, ..
            } => controls.iter().map(|(l, _)| *l).chain([*target]).max().unwrap(),
            Gate::Stg { target, .. } => *target,
        }
    }

    fn controls_hold(controls: &[(usize, bool)], state: usize) -> bool {
        controls
            .iter()
            .all(|&(line, polarity)| ((state >> line) & 1 == 1) == polarity)
    }

    /// Apply this gate to a basis state `state` (bit `i` = wire `i`).
    pub fn apply(&self, state: usize) -> usize {
        match self {
            Gate::Toffoli { controls, target } => {
                if Self::controls_hold(controls, state) {
                    state ^ (1 << target)
                } else {
                    state
                }
            }
            Gate::Fredkin { controls, targets } => {
                if Self::controls_hold(controls, state) {
                    let (a, b) = *targets;
                    let va = (state >> a) & 1;
                    let vb = (state >> b) & 1;
                    if va == vb {
                        state
                    } else {
                        state ^ (1 << a) ^ (1 << b)
                    }
                } else {
                    state
                }
            }
            Gate::Pauli {
                controls,
                target,
                axis,
            } => {
                if !Self::controls_hold(controls, state) {
                    return state;
                }
                match axis {
                    PauliAxis::X | PauliAxis::Y => state ^ (1 << target),
                    PauliAxis::Z => state,
                }
            }
            // T/S-family gates are phase-only: they never change which
            // basis state a classical simulation occupies, only its phase.
            Gate::Stg { .. } => state,
        }
    }

    /// T-gate cost of this single gate, by control count against the
    /// cube-algebra cost table (§9): an `n`-controlled Toffoli costs the
    /// same as an `n`-literal cube.
    pub fn tcount(&self, total_lines: usize) -> u32 {
        match self {
            Gate::Toffoli { controls, .. } => {
                crate::tt::cube::tcount(controls.len() as u32, total_lines as u32)
            }
            Gate::Fredkin { controls, .. } => {
                crate::tt::cube::tcount((controls.len() + 1) as u32, total_lines as u32)
            }
            Gate::Pauli { .. } => 0,
            Gate::Stg {
                kind: StgKind::T | StgKind::Tdg,
                ..
            } => 1,
            Gate::Stg { .. } => 0,
        }
    }
}

/// A reversible circuit: an ordered gate list over a fixed line count.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub lines: usize,
    pub gates: Vec<Gate>,
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "circuit on {} lines, {} gates", self.lines, self.gates.len())?;
        for gate in &self.gates {
            writeln!(f, "  {:?}", gate)?;
        }
        Ok(())
    }
}

impl Circuit {
    pub fn new(lines: usize) -> Self {
        Circuit {
            lines,
            gates: Vec::new(),
        }
    }

    pub fn push(&mut self, gate: Gate) {
        debug_assert!(
            gate.max_line() < self.lines,
            "gate references a line outside the circuit"
        );
        self.gates.push(gate);
    }

    /// Apply every gate in order to `state`.
    pub fn simulate(&self, state: usize) -> usize {
        self.gates.iter().fold(state, |s, g| g.apply(s))
    }

    /// The permutation this circuit implements, as `perm[x] = circuit(x)`
    /// over all `2^lines` basis states.
    pub fn permutation(&self) -> Vec<usize> {
        (0..(1usize << self.lines)).map(|x| self.simulate(x)).collect()
    }

    /// Does this circuit implement the same permutation as `other` (same
    /// line count, same basis-state mapping)?
    pub fn is_equivalent_to(&self, other: &Circuit) -> bool {
        self.lines == other.lines && self.permutation() == other.permutation()
    }

    /// Total T-count cost across all gates (§9).
    pub fn tcount(&self) -> u32 {
        self.gates.iter().map(|g| g.tcount(self.lines)).sum()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }
}

/// A cost metric a synthesis pass can optimize for, tagged so callers can
/// switch strategy without the synthesis code depending on a specific
/// metric's internals (`original_source/costs.cpp`'s tagged cost-function
/// table, generalized from its C-struct-of-function-pointers shape into a
/// Rust enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostFn {
    /// Minimize gate count.
    GateCount,
    /// Minimize quantum cost (a per-gate weight by control count, distinct
    /// from T-count).
    QuantumCost,
    /// Minimize T-count (§9's table).
    TCount,
    /// Minimize circuit depth (longest dependency chain through shared
    /// lines), used by the LNN linearizer's local-reorder mode.
    Depth,
}

impl CostFn {
    /// Evaluate this metric over a circuit.
    pub fn evaluate(self, circuit: &Circuit) -> u32 {
        match self {
            CostFn::GateCount => circuit.gate_count() as u32,
            CostFn::QuantumCost => circuit
                .gates
                .iter()
                .map(|g| match g {
                    Gate::Toffoli { controls, .. } => (controls.len() as u32 + 1).pow(2),
                    Gate::Fredkin { controls, .. } => (controls.len() as u32 + 2).pow(2),
                    Gate::Pauli { .. } => 1,
                    Gate::Stg { .. } => 1,
                })
                .sum(),
            CostFn::TCount => circuit.tcount(),
            CostFn::Depth => depth(circuit),
        }
    }
}

fn depth(circuit: &Circuit) -> u32 {
    let mut last_use = vec![0u32; circuit.lines];
    for gate in &circuit.gates {
        let touched = gate_lines(gate);
        let start = touched.iter().map(|&l| last_use[l]).max().unwrap_or(0);
        for &l in &touched {
            last_use[l] = start + 1;
        }
    }
    last_use.into_iter().max().unwrap_or(0)
}

fn gate_lines(gate: &Gate) -> Vec<usize> {
    match gate {
        Gate::Toffoli { controls, target } => {
            controls.iter().map(|(l, _)| *l).chain([*target]).collect()
        }
        Gate::Fredkin { controls, targets } => controls
            .iter()
            .map(|(l, _)| *l)
            .chain([targets.0, targets.1])
            .collect(),
        Gate::Pauli {
            controls, target, ..
        } => controls.iter().map(|(l, _)| *l).chain([*target]).collect(),
        Gate::Stg { target, .. } => vec![*target],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toffoli(controls: &[(usize, bool)], target: usize) -> Gate {
        Gate::Toffoli {
            controls: controls.to_vec(),
            target,
        }
    }

    #[test]
    fn cnot_flips_target_only_when_control_matches() {
        let gate = toffoli(&[(0, true)], 1);
        assert_eq!(gate.apply(0b01), 0b11);
        assert_eq!(gate.apply(0b00), 0b00);
    }

    #[test]
    fn toffoli_requires_all_controls() {
        let gate = toffoli(&[(0, true), (1, true)], 2);
        assert_eq!(gate.apply(0b011), 0b111);
        assert_eq!(gate.apply(0b001), 0b001);
    }

    #[test]
    fn fredkin_swaps_targets_when_control_holds() {
        let gate = Gate::Fredkin {
            controls: vec![(0, true)],
            targets: (1, 2),
        };
        assert_eq!(gate.apply(0b011), 0b101);
        assert_eq!(gate.apply(0b001), 0b001);
    }

    #[test]
    fn circuit_is_self_inverse_for_two_identical_cnots() {
        let mut c = Circuit::new(2);
        c.push(toffoli(&[(0, true)], 1));
        c.push(toffoli(&[(0, true)], 1));
        let identity = Circuit::new(2);
        assert!(c.is_equivalent_to(&identity));
    }

    #[test]
    fn tcount_matches_cube_tcount_table() {
        let gate = toffoli(&[(0, true), (1, true)], 2);
        assert_eq!(gate.tcount(5), crate::tt::cube::tcount(2, 5));
    }

    #[test]
    fn gate_count_cost_matches_circuit_length() {
        let mut c = Circuit::new(2);
        c.push(toffoli(&[(0, true)], 1));
        c.push(toffoli(&[], 0));
        assert_eq!(CostFn::GateCount.evaluate(&c), 2);
    }

    #[test]
    fn depth_accounts_for_shared_lines() {
        let mut c = Circuit::new(3);
        c.push(toffoli(&[(0, true)], 1));
        c.push(toffoli(&[(1, true)], 2));
        assert_eq!(CostFn::Depth.evaluate(&c), 2);
    }
}
