//! Derived BDD operators (§4.B): quantification, generalized cofactors, and
//! the equality/characteristic helpers used by exact synthesis's symmetry
//! checks.

use super::{BddManager, NodeId};

impl BddManager {
    /// Positive (`f` with `i` forced to 1) and negative cofactors of `f`
    /// with respect to variable `i`.
    pub fn cof1(&mut self, f: NodeId, i: usize) -> NodeId {
        self.restrict_var(f, i, true)
    }

    pub fn cof0(&mut self, f: NodeId, i: usize) -> NodeId {
        self.restrict_var(f, i, false)
    }

    fn restrict_var(&mut self, f: NodeId, i: usize, value: bool) -> NodeId {
        if f.is_terminal() {
            return f;
        }
        let var = self.var(f) as usize;
        if var > i {
            return f;
        }
        if var == i {
            return if value { self.high(f) } else { self.low(f) };
        }
        let lo = self.restrict_var(self.low(f), i, value);
        let hi = self.restrict_var(self.high(f), i, value);
        self.mk(var as u32, lo, hi)
    }

    /// Existential quantification: `∃x_i. f = f|_{x_i=0} ∨ f|_{x_i=1}`.
    pub fn exists(&mut self, f: NodeId, i: usize) -> NodeId {
        let c0 = self.cof0(f, i);
        let c1 = self.cof1(f, i);
        self.or(c0, c1)
    }

    /// Universal quantification: `∀x_i. f = f|_{x_i=0} ∧ f|_{x_i=1}`.
    pub fn forall(&mut self, f: NodeId, i: usize) -> NodeId {
        let c0 = self.cof0(f, i);
        let c1 = self.cof1(f, i);
        self.and(c0, c1)
    }

    /// Coudert/Madre generalized cofactor `restrict(f, care)`: simplify `f`
    /// using `care` as a don't-care set, returning a function that agrees
    /// with `f` wherever `care` holds (§4.B). Beyond the `c0`/`c1`-is-zero
    /// cases every generalized cofactor handles, `restrict` additionally
    /// detects a variable absent from `f` (`f0 == f1`, the classical fast
    /// path) and skips branching the result on it too: since `f`'s value
    /// doesn't depend on it, either of `care`'s branches is an equally
    /// valid region to restrict against, so the two are merged before
    /// recursing rather than kept separate.
    pub fn restrict(&mut self, f: NodeId, care: NodeId) -> NodeId {
        if care.is_one() || f.is_terminal() {
            return f;
        }
        if care.is_zero() {
            return NodeId::ONE;
        }
        let top = self.var(f).min(self.var(care));
        let (f0, f1) = self.split(f, top);
        if f0 == f1 {
            let (c0, c1) = self.split(care, top);
            let merged_care = self.or(c0, c1);
            return self.restrict(f0, merged_care);
        }
        let (c0, c1) = self.split(care, top);
        if c0.is_zero() {
            return self.restrict(f1, c1);
        }
        if c1.is_zero() {
            return self.restrict(f0, c0);
        }
        let lo = self.restrict(f0, c0);
        let hi = self.restrict(f1, c1);
        self.mk(top, lo, hi)
    }

    /// Brace/Rudell/Bryant `constrain(f, care)`: also a generalized
    /// cofactor agreeing with `f` wherever `care` holds, but co-recursing
    /// on both operands' top variable and cofactoring `f` through `care`'s
    /// *own* branch at each step, rather than `restrict`'s single shared
    /// top variable — the two operators can simplify a given `(f, care)`
    /// pair to different (both valid) results.
    pub fn constrain(&mut self, f: NodeId, care: NodeId) -> NodeId {
        if care.is_one() || f.is_terminal() {
            return f;
        }
        if care.is_zero() {
            return NodeId::ONE;
        }
        if f == care {
            return NodeId::ONE;
        }
        let top = self.var(care);
        let (c0, c1) = self.split(care, top);
        if c0.is_zero() {
            let f1 = self.split(f, top).1;
            return self.constrain(f1, c1);
        }
        if c1.is_zero() {
            let f0 = self.split(f, top).0;
            return self.constrain(f0, c0);
        }
        let (f0, f1) = self.split(f, top);
        let lo = self.constrain(f0, c0);
        let hi = self.constrain(f1, c1);
        self.mk(top, lo, hi)
    }

    fn split(&self, f: NodeId, top: u32) -> (NodeId, NodeId) {
        if f.is_terminal() || self.var(f) != top {
            (f, f)
        } else {
            (self.low(f), self.high(f))
        }
    }

    /// `f <-> g` as a BDD node (XNOR), used to check functional equivalence
    /// without brute-force enumeration.
    pub fn make_eq(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let x = self.xor(f, g);
        self.not(x)
    }

    /// Are `f` and `g` identical functions? (Hash-consing already makes this
    /// an id comparison, but this is the intention-revealing call site.)
    pub fn equivalent(&self, f: NodeId, g: NodeId) -> bool {
        f == g
    }

    /// The characteristic function of the relation `{(x, y) : f(x) = y}`
    /// over a fresh output variable `y_var`: `(f ∧ y) ∨ (¬f ∧ ¬y)`, i.e.
    /// `f <-> y_var`. Used by exact synthesis to embed a target function's
    /// graph into the same BDD space as a candidate circuit's outputs.
    pub fn characteristic(&mut self, f: NodeId, y_var: usize) -> NodeId {
        let y = self.var_node(y_var);
        self.make_eq(f, y)
    }

    /// Number of variables the node's own subdomain spans before its next
    /// decision, i.e. the level its children's counts are already
    /// expressed at (`nvars` for a terminal, since it has no children).
    fn child_level(&self, n: NodeId) -> u32 {
        if n.is_terminal() {
            self.nvars as u32
        } else {
            self.var(n)
        }
    }

    /// Number of satisfying assignments to the variables at `f`'s own level
    /// and below, i.e. treating `f` as if it were the root of a BDD over
    /// just those variables. Cached per node (§4.B): once a node exists in
    /// this hash-consed, immutable arena its solution count never changes.
    fn node_solution_count(&mut self, f: NodeId) -> u64 {
        if let Some(&cached) = self.solcount_cache.get(&f) {
            return cached;
        }
        let count = if f.is_zero() {
            0
        } else if f.is_one() {
            1
        } else {
            let v = self.var(f);
            let lo = self.low(f);
            let hi = self.high(f);
            let lo_gap = self.child_level(lo) - v - 1;
            let hi_gap = self.child_level(hi) - v - 1;
            (self.node_solution_count(lo) << lo_gap) + (self.node_solution_count(hi) << hi_gap)
        };
        self.solcount_cache.insert(f, count);
        count
    }

    /// Total number of satisfying assignments of `f` over all `nvars`
    /// variables.
    pub fn solution_count(&mut self, f: NodeId) -> u64 {
        if f.is_zero() {
            return 0;
        }
        if f.is_one() {
            return 1u64 << self.nvars;
        }
        let top_gap = self.var(f);
        self.node_solution_count(f) << top_gap
    }

    /// The constant a terminal subproblem at `node` should collapse to, by
    /// majority vote of its remaining satisfying assignments. `tie` decides
    /// what to return when the vote is exactly even; `None` means "no
    /// majority, don't collapse" (the un-forced case `round` uses).
    fn majority(&mut self, node: NodeId, tie: Option<bool>) -> Option<NodeId> {
        let v = self.child_level(node);
        let ones = self.node_solution_count(node);
        let total = 1u64 << (self.nvars as u32 - v);
        let zeros = total - ones;
        if ones > zeros {
            Some(NodeId::ONE)
        } else if zeros > ones {
            Some(NodeId::ZERO)
        } else {
            tie.map(|t| if t { NodeId::ONE } else { NodeId::ZERO })
        }
    }

    /// Truncate `f` at `level`: every subgraph reached once `level`
    /// variables have been decided collapses to whichever constant covers
    /// strictly more of its remaining assignments (§4.B "preserves the
    /// majority outcome for each terminal subproblem"); subproblems with no
    /// majority (an exact tie) are left unrounded.
    pub fn round(&mut self, f: NodeId, level: usize) -> NodeId {
        self.round_to(f, level as u32, None)
    }

    /// Like [`BddManager::round`], but every terminal subproblem's tie is
    /// forced to `1` — the largest function consistent with majority
    /// rounding everywhere the vote wasn't a tie (§4.B "force... choice by
    /// solution count weight").
    pub fn round_up(&mut self, f: NodeId, level: usize) -> NodeId {
        self.round_to(f, level as u32, Some(true))
    }

    /// Like [`BddManager::round_up`], but ties are forced to `0` — the
    /// smallest such function.
    pub fn round_down(&mut self, f: NodeId, level: usize) -> NodeId {
        self.round_to(f, level as u32, Some(false))
    }

    fn round_to(&mut self, f: NodeId, level: u32, tie: Option<bool>) -> NodeId {
        if f.is_terminal() {
            return f;
        }
        let v = self.var(f);
        if v >= level {
            return self.majority(f, tie).unwrap_or(f);
        }
        let lo = self.round_to(self.low(f), level, tie);
        let hi = self.round_to(self.high(f), level, tie);
        self.mk(v, lo, hi)
    }
}
