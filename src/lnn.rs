//! Component I: LNN (linear nearest-neighbor) window/global reordering
//! (§4.I).
//!
//! Takes a two-input Toffoli network (one control, one target per gate) and
//! rewrites it so every gate's control and target end up on adjacent
//! physical lines, as required by architectures where only neighbouring
//! lines can interact. A `Gate::Fredkin` with an empty control list is used
//! as the unconditional SWAP primitive the window passes move values with.

use crate::reversible::{Circuit, Gate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LnnMode {
    #[default]
    Naive,
    LocalReorder,
    GlobalReorder,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LnnConfig {
    pub mode: LnnMode,
}

/// A linearized circuit plus the line permutation its last gate leaves in
/// place: `final_line_of[logical]` is the physical line holding logical
/// line `logical`'s value once every gate has run. Naive mode always swaps
/// back around each gate, so its `final_line_of` is the identity; the
/// reordering modes leave the permutation standing instead of paying to
/// undo it.
#[derive(Debug, Clone)]
pub struct Linearized {
    pub circuit: Circuit,
    pub final_line_of: Vec<usize>,
}

fn swap_gate(a: usize, b: usize) -> Gate {
    Gate::Fredkin {
        controls: Vec::new(),
        targets: (a, b),
    }
}

fn single_control(gate: &Gate) -> Option<(usize, bool, usize)> {
    match gate {
        Gate::Toffoli { controls, target } if controls.len() == 1 => {
            Some((controls[0].0, controls[0].1, *target))
        }
        _ => None,
    }
}

fn nnc_cost(a: usize, b: usize) -> u32 {
    (a.abs_diff(b) as u32).saturating_sub(1)
}

/// Naive mode (§4.I): for each off-adjacent gate, bring the control next to
/// the target with a chain of SWAPs, apply the gate, then undo the chain.
fn naive_expand(c: usize, polarity: bool, t: usize) -> Vec<Gate> {
    if c.abs_diff(t) <= 1 {
        return vec![Gate::Toffoli {
            controls: vec![(c, polarity)],
            target: t,
        }];
    }
    let (swaps, new_control): (Vec<Gate>, usize) = if c < t {
        ((c..t - 1).map(|i| swap_gate(i, i + 1)).collect(), t - 1)
    } else {
        (
            ((t + 2)..=c).rev().map(|i| swap_gate(i - 1, i)).collect(),
            t + 1,
        )
    };
    let mut out = swaps.clone();
    out.push(Gate::Toffoli {
        controls: vec![(new_control, polarity)],
        target: t,
    });
    out.extend(swaps.into_iter().rev());
    out
}

fn linearize_naive(circuit: &Circuit) -> Linearized {
    let mut gates = Vec::new();
    for gate in &circuit.gates {
        match single_control(gate) {
            Some((c, polarity, t)) => gates.extend(naive_expand(c, polarity, t)),
            None => gates.push(gate.clone()),
        }
    }
    Linearized {
        circuit: Circuit {
            lines: circuit.lines,
            gates,
        },
        final_line_of: (0..circuit.lines).collect(),
    }
}

/// Local-reorder and global-reorder modes both drive this: starting from
/// `initial_pos` (logical line -> physical line), walk the gate list once,
/// moving the control one physical step at a time toward the target and
/// keeping every move (never swapping back), updating the position map as
/// gates are placed.
fn linearize_from(circuit: &Circuit, initial_pos: Vec<usize>) -> Linearized {
    let l = circuit.lines;
    let mut pos = initial_pos;
    let mut line_at = vec![0usize; l];
    for (logical, &physical) in pos.iter().enumerate() {
        line_at[physical] = logical;
    }
    let mut gates = Vec::new();
    for gate in &circuit.gates {
        match single_control(gate) {
            Some((c, polarity, t)) => {
                let mut pc = pos[c];
                let pt = pos[t];
                while pc.abs_diff(pt) > 1 {
                    let step = if pc < pt { pc + 1 } else { pc - 1 };
                    gates.push(swap_gate(pc, step));
                    let displaced = line_at[step];
                    line_at[pc] = displaced;
                    line_at[step] = c;
                    pos[displaced] = pc;
                    pos[c] = step;
                    pc = step;
                }
                gates.push(Gate::Toffoli {
                    controls: vec![(pc, polarity)],
                    target: pos[t],
                });
            }
            None => gates.push(gate.clone()),
        }
    }
    Linearized {
        circuit: Circuit { lines: l, gates },
        final_line_of: pos,
    }
}

fn total_nnc_cost(gates: &[Gate], pos: &[usize]) -> u32 {
    gates
        .iter()
        .filter_map(single_control)
        .map(|(c, _, t)| nnc_cost(pos[c], pos[t]))
        .sum()
}

fn per_line_impact(gates: &[Gate], pos: &[usize], lines: usize) -> Vec<u32> {
    let mut impact = vec![0u32; lines];
    for (c, _, t) in gates.iter().filter_map(single_control) {
        let cost = nnc_cost(pos[c], pos[t]);
        impact[c] += cost;
        impact[t] += cost;
    }
    impact
}

fn invert(order: &[usize]) -> Vec<usize> {
    let mut pos = vec![0usize; order.len()];
    for (physical, &logical) in order.iter().enumerate() {
        pos[logical] = physical;
    }
    pos
}

/// Global-reorder mode (§4.I): greedily relocate the line with the highest
/// total nearest-neighbor cost to the median physical position, keeping the
/// move only if it lowers the overall cost, until a fixpoint.
fn optimize_global_order(gates: &[Gate], lines: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lines).collect();
    let mut pos = invert(&order);
    let mut best_cost = total_nnc_cost(gates, &pos);
    let median = lines / 2;
    for _ in 0..(lines.max(1) * 4) {
        let impact = per_line_impact(gates, &pos, lines);
        let Some(worst) = impact
            .iter()
            .enumerate()
            .max_by_key(|&(_, v)| *v)
            .map(|(i, _)| i)
        else {
            break;
        };
        if impact[worst] == 0 {
            break;
        }
        let mut candidate = order.clone();
        let cur_physical = pos[worst];
        candidate.remove(cur_physical);
        let insert_at = median.min(candidate.len());
        candidate.insert(insert_at, worst);
        let candidate_pos = invert(&candidate);
        let candidate_cost = total_nnc_cost(gates, &candidate_pos);
        if candidate_cost < best_cost {
            order = candidate;
            pos = candidate_pos;
            best_cost = candidate_cost;
        } else {
            break;
        }
    }
    pos
}

/// Total nearest-neighbor cost of `circuit` at its current (identity) line
/// arrangement: the number of extra adjacent transpositions each gate would
/// need to reach its control and target (`original_source/lnn_optimization.cpp`'s
/// NNC bookkeeping).
pub fn nnc(circuit: &Circuit) -> usize {
    let pos: Vec<usize> = (0..circuit.lines).collect();
    total_nnc_cost(&circuit.gates, &pos) as usize
}

pub fn linearize(circuit: &Circuit, config: &LnnConfig) -> Linearized {
    match config.mode {
        LnnMode::Naive => linearize_naive(circuit),
        LnnMode::LocalReorder => linearize_from(circuit, (0..circuit.lines).collect()),
        LnnMode::GlobalReorder => {
            let pos = optimize_global_order(&circuit.gates, circuit.lines);
            linearize_from(circuit, pos)
        }
    }
}

/// Does every gate in `circuit` act on adjacent lines?
pub fn is_linear_nearest_neighbor(circuit: &Circuit) -> bool {
    circuit
        .gates
        .iter()
        .filter_map(single_control)
        .all(|(c, _, t)| c.abs_diff(t) <= 1)
}

fn remap_output(state: usize, final_line_of: &[usize]) -> usize {
    let mut out = 0;
    for (logical, &physical) in final_line_of.iter().enumerate() {
        if (state >> physical) & 1 == 1 {
            out |= 1 << logical;
        }
    }
    out
}
