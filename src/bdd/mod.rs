//! Component B: reduced ordered binary decision diagrams.
//!
//! Mirrors the teacher's `expression/manager.rs` hash-consing arena (a
//! shared table keyed by `(var, lo, hi)` so structurally equal sub-BDDs are
//! always the same node id) but drops the `Arc<RwLock<..>>` sharing, since
//! this kernel is single-threaded per call the way `cuts`/`exact_xmg` use it
//! (§6 "single-threaded per top-level call").

pub mod ops;
pub mod unate;

use crate::tt::TruthTable;
use std::collections::HashMap;
use std::fmt;

/// Opaque handle into a [`BddManager`]'s node arena. `0`/`1` are the
/// constant-false/constant-true terminals in every manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const ZERO: NodeId = NodeId(0);
    pub const ONE: NodeId = NodeId(1);

    pub fn is_terminal(self) -> bool {
        self == NodeId::ZERO || self == NodeId::ONE
    }

    pub fn is_zero(self) -> bool {
        self == NodeId::ZERO
    }

    pub fn is_one(self) -> bool {
        self == NodeId::ONE
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    var: u32,
    lo: NodeId,
    hi: NodeId,
}

/// A hash-consed ROBDD arena over a fixed variable ordering `0..nvars`.
pub struct BddManager {
    nvars: usize,
    nodes: Vec<Node>,
    unique: HashMap<(u32, NodeId, NodeId), NodeId>,
    ite_cache: HashMap<(NodeId, NodeId, NodeId), NodeId>,
    /// Per-node satisfying-assignment counts (§4.B), valid forever once
    /// populated since the arena never mutates an existing node.
    solcount_cache: HashMap<NodeId, u64>,
}

impl fmt::Debug for BddManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BddManager {{ nvars: {}, nodes: {} }}",
            self.nvars,
            self.nodes.len()
        )
    }
}

impl BddManager {
    pub fn new(nvars: usize) -> Self {
        // Terminals occupy slots 0 and 1; their `var` field is never
        // consulted (callers must check `is_terminal` first).
        let nodes = vec![
            Node {
                var: u32::MAX,
                lo: NodeId::ZERO,
                hi: NodeId::ZERO,
            },
            Node {
                var: u32::MAX,
                lo: NodeId::ONE,
                hi: NodeId::ONE,
            },
        ];
        BddManager {
            nvars,
            nodes,
            unique: HashMap::new(),
            ite_cache: HashMap::new(),
            solcount_cache: HashMap::new(),
        }
    }

    pub fn nvars(&self) -> usize {
        self.nvars
    }

    pub fn zero(&self) -> NodeId {
        NodeId::ZERO
    }

    pub fn one(&self) -> NodeId {
        NodeId::ONE
    }

    pub fn var(&self, node: NodeId) -> u32 {
        self.nodes[node.0 as usize].var
    }

    pub fn low(&self, node: NodeId) -> NodeId {
        self.nodes[node.0 as usize].lo
    }

    pub fn high(&self, node: NodeId) -> NodeId {
        self.nodes[node.0 as usize].hi
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Canonicalizing node constructor: reduces `(var, lo, lo)` to `lo` and
    /// hash-conses everything else.
    pub fn mk(&mut self, var: u32, lo: NodeId, hi: NodeId) -> NodeId {
        if lo == hi {
            return lo;
        }
        if let Some(&existing) = self.unique.get(&(var, lo, hi)) {
            return existing;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { var, lo, hi });
        self.unique.insert((var, lo, hi), id);
        id
    }

    /// The positive literal of variable `i`.
    pub fn var_node(&mut self, i: usize) -> NodeId {
        self.mk(i as u32, NodeId::ZERO, NodeId::ONE)
    }

    /// `if f then g else h`, the universal BDD operator; `and`/`or`/`not`/
    /// `xor` are all expressed through it (§4.B).
    pub fn ite(&mut self, f: NodeId, g: NodeId, h: NodeId) -> NodeId {
        if f.is_one() {
            return g;
        }
        if f.is_zero() {
            return h;
        }
        if g == h {
            return g;
        }
        if g.is_one() && h.is_zero() {
            return f;
        }
        let key = (f, g, h);
        if let Some(&cached) = self.ite_cache.get(&key) {
            return cached;
        }
        let top = [f, g, h]
            .iter()
            .filter(|n| !n.is_terminal())
            .map(|n| self.var(*n))
            .min()
            .unwrap();
        let at = |mgr: &BddManager, n: NodeId, value: bool| -> NodeId {
            if n.is_terminal() || mgr.var(n) != top {
                n
            } else if value {
                mgr.high(n)
            } else {
                mgr.low(n)
            }
        };
        let f0 = at(self, f, false);
        let f1 = at(self, f, true);
        let g0 = at(self, g, false);
        let g1 = at(self, g, true);
        let h0 = at(self, h, false);
        let h1 = at(self, h, true);
        let lo = self.ite(f0, g0, h0);
        let hi = self.ite(f1, g1, h1);
        let result = self.mk(top, lo, hi);
        self.ite_cache.insert(key, result);
        result
    }

    pub fn not(&mut self, f: NodeId) -> NodeId {
        self.ite(f, NodeId::ZERO, NodeId::ONE)
    }

    pub fn and(&mut self, f: NodeId, g: NodeId) -> NodeId {
        self.ite(f, g, NodeId::ZERO)
    }

    pub fn or(&mut self, f: NodeId, g: NodeId) -> NodeId {
        self.ite(f, NodeId::ONE, g)
    }

    pub fn xor(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let ng = self.not(g);
        self.ite(f, ng, g)
    }

    /// Evaluate `node` under a full assignment packed the same way as
    /// [`TruthTable::eval`] (bit `i` of `row` is variable `i`'s value).
    pub fn eval(&self, mut node: NodeId, row: usize) -> bool {
        loop {
            if node.is_zero() {
                return false;
            }
            if node.is_one() {
                return true;
            }
            let v = self.var(node) as usize;
            let bit = (row >> v) & 1 == 1;
            node = if bit { self.high(node) } else { self.low(node) };
        }
    }

    /// Build the BDD for a truth table, expanding variables in order
    /// `0..nvars` (§4.B).
    pub fn build(&mut self, tt: &TruthTable) -> NodeId {
        self.build_rec(tt, 0)
    }

    fn build_rec(&mut self, tt: &TruthTable, var: usize) -> NodeId {
        if var == tt.nvars() {
            return if tt.eval(0) {
                NodeId::ONE
            } else {
                NodeId::ZERO
            };
        }
        let lo = tt.cofactor0(var);
        let hi = tt.cofactor1(var);
        let lo_node = self.build_rec(&lo, var + 1);
        let hi_node = self.build_rec(&hi, var + 1);
        self.mk(var as u32, lo_node, hi_node)
    }

    /// Render `node` back out as a dense truth table over `self.nvars()`
    /// variables, by brute-force evaluation.
    pub fn to_truth_table(&self, node: NodeId) -> TruthTable {
        TruthTable::from_fn(self.nvars, |row| self.eval(node, row))
    }
}
