//! Component C: k-feasible structural cut enumeration over AIGs and XMGs.
//!
//! A *cut* of a node is a set of nodes ("leaves") such that every path from
//! a primary input to the node passes through at least one leaf; a cut is
//! *k-feasible* if it has at most `k` leaves. This mirrors the teacher's
//! `Cover`'s "represent a node by the set of cubes reachable below it"
//! shape, but walks a DAG instead of folding a flat cube list, and prunes
//! with dominance + a priority cap instead of `Cover`'s don't-care-driven
//! reduction (§4.C).

use std::collections::HashSet;

/// A single cut: a deduplicated, sorted set of leaf node indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cut {
    pub leaves: Vec<u32>,
}

impl Cut {
    fn trivial(node: u32) -> Self {
        Cut { leaves: vec![node] }
    }

    fn merge(a: &Cut, b: &Cut, k: usize) -> Option<Cut> {
        let mut leaves: Vec<u32> = a
            .leaves
            .iter()
            .chain(b.leaves.iter())
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if leaves.len() > k {
            return None;
        }
        leaves.sort_unstable();
        Some(Cut { leaves })
    }

    /// Does this cut's leaf set contain `other`'s (so `other` dominates it
    /// and this cut can be discarded)?
    fn dominated_by(&self, other: &Cut) -> bool {
        other.leaves.len() < self.leaves.len()
            && other.leaves.iter().all(|l| self.leaves.contains(l))
    }
}

/// Graph-agnostic accessor the cut enumerator needs: the structural fanins
/// of a node, empty for leaves (constants and primary inputs).
pub trait CutGraph {
    fn node_count(&self) -> usize;
    fn fanins(&self, node: u32) -> Vec<u32>;
}

impl CutGraph for crate::graph::aig::Aig {
    fn node_count(&self) -> usize {
        crate::graph::aig::Aig::node_count(self)
    }

    fn fanins(&self, node: u32) -> Vec<u32> {
        crate::graph::aig::Aig::fanins(self, node)
    }
}

impl CutGraph for crate::graph::xmg::Xmg {
    fn node_count(&self) -> usize {
        crate::graph::xmg::Xmg::node_count(self)
    }

    fn fanins(&self, node: u32) -> Vec<u32> {
        crate::graph::xmg::Xmg::fanins(self, node)
    }
}

/// Per-node enumeration parameters: `k` bounds leaf count, `priority_cap`
/// bounds how many cuts are kept per node (deepest-required-level cuts
/// kept first, ties broken by cut size) to stop cut counts blowing up on
/// wide fanout graphs.
#[derive(Debug, Clone, Copy)]
pub struct CutConfig {
    pub k: usize,
    pub priority_cap: usize,
}

impl Default for CutConfig {
    fn default() -> Self {
        CutConfig {
            k: 6,
            priority_cap: 8,
        }
    }
}

/// Enumerate k-feasible cuts for every node of `graph`, indexed by node id.
/// Assumes `graph`'s node ids are already in topological order (true of
/// both [`crate::graph::aig::Aig`] and [`crate::graph::xmg::Xmg`], since
/// both only ever reference already-built nodes when constructing a new
/// one).
pub fn enumerate_cuts<G: CutGraph>(graph: &G, config: CutConfig) -> Vec<Vec<Cut>> {
    let n = graph.node_count();
    let (_arrival, required) = compute_levels(graph);
    let mut cuts: Vec<Vec<Cut>> = Vec::with_capacity(n);
    for node in 0..n as u32 {
        let fanins = graph.fanins(node);
        let mut node_cuts = vec![Cut::trivial(node)];
        if !fanins.is_empty() {
            node_cuts.extend(merge_fanin_cuts(&fanins, &cuts, config.k));
        }
        prune(&mut node_cuts, config.priority_cap, &required);
        cuts.push(node_cuts);
    }
    cuts
}

/// Per-node `[arrival, required]` levels (§4.C): `arrival` is depth from
/// the primary inputs/constant (`0` for a fanin-less node, one more than
/// its deepest fanin otherwise); `required` is the deepest permissible
/// depth given every consumer's own required level, computed backward
/// from nodes with no consumers (whose required level is just their own
/// arrival) since `graph`'s node ids are topological.
fn compute_levels<G: CutGraph>(graph: &G) -> (Vec<u32>, Vec<u32>) {
    let n = graph.node_count();
    let mut arrival = vec![0u32; n];
    let mut fanout: Vec<Vec<u32>> = vec![Vec::new(); n];
    for node in 0..n as u32 {
        let fanins = graph.fanins(node);
        if let Some(deepest) = fanins.iter().map(|&f| arrival[f as usize] + 1).max() {
            arrival[node as usize] = deepest;
        }
        for &f in &fanins {
            fanout[f as usize].push(node);
        }
    }
    let mut required = arrival.clone();
    for node in (0..n as u32).rev() {
        let idx = node as usize;
        if let Some(tightest) = fanout[idx].iter().map(|&c| required[c as usize] - 1).min() {
            required[idx] = tightest;
        }
    }
    (arrival, required)
}

fn merge_fanin_cuts(fanins: &[u32], cuts: &[Vec<Cut>], k: usize) -> Vec<Cut> {
    let mut combos: Vec<Cut> = cuts[fanins[0] as usize].clone();
    for &fanin in &fanins[1..] {
        let mut next = Vec::new();
        for left in &combos {
            for right in &cuts[fanin as usize] {
                if let Some(merged) = Cut::merge(left, right, k) {
                    next.push(merged);
                }
            }
        }
        combos = next;
    }
    combos
}

/// Remove dominated cuts, then keep only the `cap` cuts with the deepest
/// required-level leaf (§4.C: larger required level means more slack, so
/// those cuts are retained preferentially), breaking ties by cut size and
/// then leaf ordering for determinism.
fn prune(cuts: &mut Vec<Cut>, cap: usize, required: &[u32]) {
    let deepest_required =
        |cut: &Cut| cut.leaves.iter().map(|&l| required[l as usize]).max().unwrap_or(0);
    cuts.sort_by(|a, b| {
        deepest_required(b)
            .cmp(&deepest_required(a))
            .then_with(|| a.leaves.len().cmp(&b.leaves.len()))
            .then_with(|| a.leaves.cmp(&b.leaves))
    });
    let mut kept: Vec<Cut> = Vec::new();
    for cut in cuts.drain(..) {
        if kept.iter().any(|k| cut.dominated_by(k)) {
            continue;
        }
        kept.retain(|k| !k.dominated_by(&cut));
        kept.push(cut);
    }
    kept.truncate(cap.max(1));
    *cuts = kept;
}
