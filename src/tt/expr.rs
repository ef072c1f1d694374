//! Boolean expression AST (§3): `{const, var(i), inv(e), and(e,e), or(e,e),
//! maj(e,e,e), xor(e,e)}`, evaluated compositionally into a [`TruthTable`] of
//! minimal width.
//!
//! Mirrors the teacher's `expression/ast.rs` node shape (a boxed recursive
//! enum with a separate `eval` pass), generalized with the `Maj` node exact
//! synthesis and the reversible pipeline need for majority gates.

use super::TruthTable;

/// A boolean expression over variables `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Var(usize),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Maj(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(i: usize) -> Expr {
        Expr::Var(i)
    }

    pub fn not(e: Expr) -> Expr {
        Expr::Not(Box::new(e))
    }

    pub fn and(a: Expr, b: Expr) -> Expr {
        Expr::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Expr, b: Expr) -> Expr {
        Expr::Or(Box::new(a), Box::new(b))
    }

    pub fn xor(a: Expr, b: Expr) -> Expr {
        Expr::Xor(Box::new(a), Box::new(b))
    }

    pub fn maj(a: Expr, b: Expr, c: Expr) -> Expr {
        Expr::Maj(Box::new(a), Box::new(b), Box::new(c))
    }

    /// Highest variable index referenced, if any.
    fn max_var(&self) -> Option<usize> {
        match self {
            Expr::Const(_) => None,
            Expr::Var(i) => Some(*i),
            Expr::Not(e) => e.max_var(),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Xor(a, b) => {
                merge_max(a.max_var(), b.max_var())
            }
            Expr::Maj(a, b, c) => {
                merge_max(merge_max(a.max_var(), b.max_var()), c.max_var())
            }
        }
    }

    /// Minimal variable width needed to evaluate this expression (at least 1,
    /// so constant expressions still produce a well-formed one-variable
    /// table rather than a degenerate zero-variable one).
    pub fn width(&self) -> usize {
        self.max_var().map(|m| m + 1).unwrap_or(1)
    }

    /// Evaluate compositionally into a [`TruthTable`] of `self.width()`
    /// variables.
    pub fn eval(&self) -> TruthTable {
        let n = self.width();
        self.eval_with_width(n)
    }

    /// Evaluate into a table of exactly `nvars` variables (must be `>=
    /// self.width()`).
    pub fn eval_with_width(&self, nvars: usize) -> TruthTable {
        assert!(
            nvars >= self.width(),
            "requested width {} too narrow for expression needing {}",
            nvars,
            self.width()
        );
        match self {
            Expr::Const(false) => TruthTable::zero(nvars),
            Expr::Const(true) => TruthTable::one(nvars),
            Expr::Var(i) => TruthTable::var(nvars, *i),
            Expr::Not(e) => e.eval_with_width(nvars).not(),
            Expr::And(a, b) => a.eval_with_width(nvars).and(&b.eval_with_width(nvars)),
            Expr::Or(a, b) => a.eval_with_width(nvars).or(&b.eval_with_width(nvars)),
            Expr::Xor(a, b) => a.eval_with_width(nvars).xor(&b.eval_with_width(nvars)),
            Expr::Maj(a, b, c) => {
                let (a, b, c) = (
                    a.eval_with_width(nvars),
                    b.eval_with_width(nvars),
                    c.eval_with_width(nvars),
                );
                a.and(&b).or(&b.and(&c)).or(&a.and(&c))
            }
        }
    }
}

fn merge_max(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(x), Some(y)) => Some(x.max(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_expressions_evaluate_flat() {
        assert_eq!(Expr::Const(true).eval(), TruthTable::one(1));
        assert_eq!(Expr::Const(false).eval(), TruthTable::zero(1));
    }

    #[test]
    fn variable_width_matches_highest_index() {
        let e = Expr::and(Expr::var(0), Expr::var(2));
        assert_eq!(e.width(), 3);
    }

    #[test]
    fn and_or_not_match_truth_table_primitives() {
        let e = Expr::or(Expr::var(0), Expr::not(Expr::var(1)));
        let tt = e.eval();
        let expected = TruthTable::var(2, 0).or(&TruthTable::var(2, 1).not());
        assert_eq!(tt, expected);
    }

    #[test]
    fn xor_expression_matches_xor_primitive() {
        let e = Expr::xor(Expr::var(0), Expr::var(1));
        assert_eq!(e.eval(), TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
    }

    #[test]
    fn maj_expression_is_majority_of_three() {
        let e = Expr::maj(Expr::var(0), Expr::var(1), Expr::var(2));
        let tt = e.eval();
        for row in 0..8usize {
            let ones = (row & 1) + ((row >> 1) & 1) + ((row >> 2) & 1);
            assert_eq!(tt.eval(row), ones >= 2, "row {}", row);
        }
    }

    #[test]
    fn nested_expression_widens_to_max_referenced_variable() {
        let e = Expr::maj(Expr::var(0), Expr::var(3), Expr::Const(true));
        assert_eq!(e.width(), 4);
        let tt = e.eval();
        assert_eq!(tt.nvars(), 4);
    }
}
