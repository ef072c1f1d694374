//! Textual expression parser wrapping the generated `lalrpop` grammar
//! (§3's "variables `x0..xn`, `&`/`|`/`^`/`!`, and a `maj(a,b,c)` form").
//!
//! Mirrors the teacher's `expression/parser.rs`, which wraps a
//! `lalrpop_util::lalrpop_mod!` module and converts its opaque parse errors
//! into the crate's own error type instead of leaking `lalrpop_util`'s
//! internal token types across the public API.

use super::expr::Expr;
use crate::error::ParseError;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    pub bool_expr,
    "/tt/bool_expr.rs"
);

/// Parse a boolean expression in infix notation (`x0 & !x1 | maj(x0,x1,x2)`)
/// into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    bool_expr::ExprParser::new()
        .parse(input)
        .map_err(|_| ParseError::MalformedInput {
            text: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variable() {
        let e = parse("x0").unwrap();
        assert_eq!(e, Expr::var(0));
    }

    #[test]
    fn parses_and_or_not_precedence() {
        // `&` binds tighter than `|`: x0 | x1 & !x2 == x0 | (x1 & !x2)
        let e = parse("x0 | x1 & !x2").unwrap();
        let expected = Expr::or(Expr::var(0), Expr::and(Expr::var(1), Expr::not(Expr::var(2))));
        assert_eq!(e, expected);
    }

    #[test]
    fn parses_maj_call() {
        let e = parse("maj(x0, x1, x2)").unwrap();
        assert_eq!(e, Expr::maj(Expr::var(0), Expr::var(1), Expr::var(2)));
    }

    #[test]
    fn parses_parenthesised_xor() {
        let e = parse("(x0 ^ x1)").unwrap();
        assert_eq!(e, Expr::xor(Expr::var(0), Expr::var(1)));
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse("x0 &&& x1").unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { .. }));
    }
}
