//! Unateness checking (§5): classify how a function depends on each
//! variable, used to prune exact-synthesis search and to detect when two
//! AIGs compute provably order-equivalent functions.

use super::{BddManager, NodeId};

/// How `f` depends on one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unateness {
    /// `f` does not depend on the variable at all.
    Independent,
    /// `f|_{x=1} ⊇ f|_{x=0}` everywhere: raising the variable can only turn
    /// outputs on.
    PositiveUnate,
    /// `f|_{x=0} ⊇ f|_{x=1}` everywhere: raising the variable can only turn
    /// outputs off.
    NegativeUnate,
    /// Neither cofactor dominates the other.
    Binate,
}

impl BddManager {
    /// Does `f|_{x=1}` imply `f|_{x=0}` everywhere (is cofactor1 a subset of
    /// cofactor0 as a relation over the remaining variables)? Used as the
    /// core `EQ`/`LT`/`GT`/`Incomparable` primitive both unateness checking
    /// and the exact-synthesis symmetry-breaking comparator need.
    fn implies(&mut self, a: NodeId, b: NodeId) -> bool {
        // a => b iff a ∧ ¬b is unsatisfiable iff a ∧ ¬b reduces to the zero
        // terminal in the hash-consed arena.
        let nb = self.not(b);
        let conj = self.and(a, nb);
        conj.is_zero()
    }

    /// Ternary comparator between two cofactors, returning one of
    /// `Eq`/`Lt`/`Gt`/`Incomparable` the way a totally-ordered dominance
    /// check would, generalized to the partial order `=>` induces over
    /// boolean functions.
    pub fn compare(&mut self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Eq;
        }
        let a_implies_b = self.implies(a, b);
        let b_implies_a = self.implies(b, a);
        match (a_implies_b, b_implies_a) {
            (true, true) => Ordering::Eq,
            (true, false) => Ordering::Lt,
            (false, true) => Ordering::Gt,
            (false, false) => Ordering::Incomparable,
        }
    }

    /// Classify `f`'s dependence on variable `i`.
    pub fn unateness(&mut self, f: NodeId, i: usize) -> Unateness {
        let c0 = self.cof0(f, i);
        let c1 = self.cof1(f, i);
        if c0 == c1 {
            return Unateness::Independent;
        }
        match self.compare(c0, c1) {
            Ordering::Lt => Unateness::PositiveUnate,
            Ordering::Gt => Unateness::NegativeUnate,
            _ => Unateness::Binate,
        }
    }

    /// Classify `f`'s dependence on every variable in `0..self.nvars()`.
    pub fn unateness_profile(&mut self, f: NodeId) -> Vec<Unateness> {
        (0..self.nvars()).map(|i| self.unateness(f, i)).collect()
    }
}

/// The four-way outcome of [`BddManager::compare`]: an implication-based
/// partial order rather than a total one, so `Incomparable` is a real,
/// distinct case from `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Eq,
    Lt,
    Gt,
    Incomparable,
}
