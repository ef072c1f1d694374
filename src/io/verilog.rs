//! A small Verilog subset reader/writer (§6): a module header, `input`/
//! `output` declarations, and `assign lhs = expr;` statements built from
//! `&`, `|`, `^`, `~`, parentheses, bare constants (`0`/`1`), and bare
//! signal aliases. A structurally balanced `(a&b)|(a&c)|(b&c)` expression
//! collapses to a single `Aig::maj3` node instead of the AND/OR expansion,
//! mirroring §4.D's MAJ recognition. Assignments may reference signals
//! declared later in the file; the module body is topologically sorted
//! before the AIG is built.

use std::collections::{HashMap, HashSet};

use crate::error::ParseError;
use crate::graph::aig::{Aig, Lit};

#[derive(Debug, Clone)]
pub struct VerilogModule {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub aig: Aig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Const(bool),
    Var(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn free_vars(&self, out: &mut HashSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Not(a) => a.free_vars(out),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Xor(a, b) => {
                a.free_vars(out);
                b.free_vars(out);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Amp,
    Pipe,
    Caret,
    Tilde,
    LParen,
    RParen,
    Comma,
    Semi,
    Eq,
}

fn tokenize(text: &str) -> Vec<Tok> {
    let mut toks = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '&' => {
                toks.push(Tok::Amp);
                chars.next();
            }
            '|' => {
                toks.push(Tok::Pipe);
                chars.next();
            }
            '^' => {
                toks.push(Tok::Caret);
                chars.next();
            }
            '~' => {
                toks.push(Tok::Tilde);
                chars.next();
            }
            '(' => {
                toks.push(Tok::LParen);
                chars.next();
            }
            ')' => {
                toks.push(Tok::RParen);
                chars.next();
            }
            ',' => {
                toks.push(Tok::Comma);
                chars.next();
            }
            ';' => {
                toks.push(Tok::Semi);
                chars.next();
            }
            '=' => {
                toks.push(Tok::Eq);
                chars.next();
            }
            '/' => {
                // `// line comment` is dropped entirely.
                chars.next();
                if chars.peek() == Some(&'/') {
                    while let Some(&c) = chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
            }
            _ if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                toks.push(Tok::Ident(ident));
            }
            _ => {
                chars.next();
            }
        }
    }
    toks
}

struct Parser<'a> {
    toks: &'a [Tok],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn next(&mut self) -> Option<&Tok> {
        let t = self.toks.get(self.pos);
        self.pos += 1;
        t
    }

    fn expect(&mut self, tok: &Tok) -> Result<(), ParseError> {
        if self.peek() == Some(tok) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::MalformedInput {
                text: format!("expected {:?}", tok),
            })
        }
    }

    // Precedence (tight to loose): atom/~, &, ^, |.
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_xor()?;
        while self.peek() == Some(&Tok::Pipe) {
            self.pos += 1;
            let rhs = self.parse_xor()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_xor(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Tok::Caret) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Xor(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while self.peek() == Some(&Tok::Amp) {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Tok::Tilde) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.next().cloned() {
            Some(Tok::LParen) => {
                let e = self.parse_or()?;
                self.expect(&Tok::RParen)?;
                Ok(e)
            }
            Some(Tok::Ident(name)) if name == "0" => Ok(Expr::Const(false)),
            Some(Tok::Ident(name)) if name == "1" => Ok(Expr::Const(true)),
            Some(Tok::Ident(name)) => Ok(Expr::Var(name)),
            other => Err(ParseError::MalformedInput {
                text: format!("unexpected token {:?}", other),
            }),
        }
    }
}

fn parse_expr(toks: &[Tok]) -> Result<Expr, ParseError> {
    let mut p = Parser { toks, pos: 0 };
    let e = p.parse_or()?;
    if p.pos != toks.len() {
        return Err(ParseError::MalformedInput {
            text: "trailing tokens in expression".to_string(),
        });
    }
    Ok(e)
}

/// Try to recognize `(a&b)|(a&c)|(b&c)` (any nesting/order of the three OR
/// operands, any polarity) as a three-input majority.
fn as_majority(expr: &Expr) -> Option<(Expr, Expr, Expr)> {
    let mut ands = Vec::new();
    fn collect_or<'a>(e: &'a Expr, ands: &mut Vec<&'a Expr>) -> bool {
        match e {
            Expr::Or(a, b) => collect_or(a, ands) && collect_or(b, ands),
            Expr::And(_, _) => {
                ands.push(e);
                true
            }
            _ => false,
        }
    }
    if !collect_or(expr, &mut ands) || ands.len() != 3 {
        return None;
    }
    let pairs: Vec<(&Expr, &Expr)> = ands
        .iter()
        .map(|e| match e {
            Expr::And(a, b) => (a.as_ref(), b.as_ref()),
            _ => unreachable!(),
        })
        .collect();
    let mut vars: Vec<&Expr> = Vec::new();
    for (a, b) in &pairs {
        for v in [*a, *b] {
            if !vars.iter().any(|&existing| existing == v) {
                vars.push(v);
            }
        }
    }
    if vars.len() != 3 {
        return None;
    }
    let has_pair = |x: &Expr, y: &Expr| {
        pairs
            .iter()
            .any(|&(a, b)| (a == x && b == y) || (a == y && b == x))
    };
    if has_pair(vars[0], vars[1]) && has_pair(vars[0], vars[2]) && has_pair(vars[1], vars[2]) {
        Some((vars[0].clone(), vars[1].clone(), vars[2].clone()))
    } else {
        None
    }
}

fn build_expr(aig: &mut Aig, expr: &Expr, sig: &HashMap<String, Lit>) -> Result<Lit, ParseError> {
    if let Some((a, b, c)) = as_majority(expr) {
        let la = build_expr(aig, &a, sig)?;
        let lb = build_expr(aig, &b, sig)?;
        let lc = build_expr(aig, &c, sig)?;
        return Ok(aig.maj3(la, lb, lc));
    }
    match expr {
        Expr::Const(v) => Ok(aig.constant(*v)),
        Expr::Var(name) => sig
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::UndefinedSignal { name: name.clone() }),
        Expr::Not(a) => Ok(build_expr(aig, a, sig)?.not()),
        Expr::And(a, b) => {
            let (la, lb) = (build_expr(aig, a, sig)?, build_expr(aig, b, sig)?);
            Ok(aig.and(la, lb))
        }
        Expr::Or(a, b) => {
            let (la, lb) = (build_expr(aig, a, sig)?, build_expr(aig, b, sig)?);
            Ok(aig.or(la, lb))
        }
        Expr::Xor(a, b) => {
            let (la, lb) = (build_expr(aig, a, sig)?, build_expr(aig, b, sig)?);
            Ok(aig.xor(la, lb))
        }
    }
}

struct Assign {
    lhs: String,
    rhs: Expr,
}

/// Parse a `module ... ; ... endmodule` document.
pub fn read_verilog(text: &str) -> Result<VerilogModule, ParseError> {
    let toks = tokenize(text);
    let mut pos = 0;
    let expect_ident = |toks: &[Tok], pos: &mut usize| -> Result<String, ParseError> {
        match toks.get(*pos) {
            Some(Tok::Ident(name)) => {
                *pos += 1;
                Ok(name.clone())
            }
            other => Err(ParseError::MalformedInput {
                text: format!("expected identifier, got {:?}", other),
            }),
        }
    };
    if toks.get(pos) != Some(&Tok::Ident("module".to_string())) {
        return Err(ParseError::MissingHeader {
            directive: "module".to_string(),
        });
    }
    pos += 1;
    let name = expect_ident(&toks, &mut pos)?;
    // Skip the port list `(...)`.
    if toks.get(pos) == Some(&Tok::LParen) {
        let mut depth = 0i32;
        while let Some(t) = toks.get(pos) {
            match t {
                Tok::LParen => depth += 1,
                Tok::RParen => {
                    depth -= 1;
                    pos += 1;
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                _ => {}
            }
            pos += 1;
        }
    }
    if toks.get(pos) == Some(&Tok::Semi) {
        pos += 1;
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut assigns = Vec::new();

    while pos < toks.len() {
        match toks.get(pos) {
            Some(Tok::Ident(kw)) if kw == "endmodule" => break,
            Some(Tok::Ident(kw)) if kw == "input" || kw == "output" => {
                let is_input = kw == "input";
                pos += 1;
                loop {
                    let name = expect_ident(&toks, &mut pos)?;
                    if is_input {
                        inputs.push(name);
                    } else {
                        outputs.push(name);
                    }
                    match toks.get(pos) {
                        Some(Tok::Comma) => {
                            pos += 1;
                            continue;
                        }
                        Some(Tok::Semi) => {
                            pos += 1;
                            break;
                        }
                        other => {
                            return Err(ParseError::MalformedInput {
                                text: format!("unexpected token {:?} in declaration", other),
                            })
                        }
                    }
                }
            }
            Some(Tok::Ident(kw)) if kw == "wire" => {
                // Wires are untyped aliases here; skip the declaration, the
                // signal is defined by whichever `assign` targets it.
                pos += 1;
                while toks.get(pos) != Some(&Tok::Semi) && pos < toks.len() {
                    pos += 1;
                }
                pos += 1;
            }
            Some(Tok::Ident(kw)) if kw == "assign" => {
                pos += 1;
                let lhs = expect_ident(&toks, &mut pos)?;
                match toks.get(pos) {
                    Some(Tok::Eq) => pos += 1,
                    other => {
                        return Err(ParseError::MalformedInput {
                            text: format!("expected '=' in assign, got {:?}", other),
                        })
                    }
                }
                let start = pos;
                while toks.get(pos) != Some(&Tok::Semi) && pos < toks.len() {
                    pos += 1;
                }
                let rhs = parse_expr(&toks[start..pos])?;
                pos += 1; // consume ';'
                assigns.push(Assign { lhs, rhs });
            }
            other => {
                return Err(ParseError::MalformedInput {
                    text: format!("unexpected token {:?} in module body", other),
                })
            }
        }
    }

    // Topologically sort assigns so every referenced signal is already
    // built (inputs are always ready; forward references among assigns are
    // resolved by dependency order, not textual order, §6).
    let defined: HashMap<&str, usize> = assigns
        .iter()
        .enumerate()
        .map(|(i, a)| (a.lhs.as_str(), i))
        .collect();
    let mut visited = vec![false; assigns.len()];
    let mut on_stack = vec![false; assigns.len()];
    let mut order = Vec::with_capacity(assigns.len());

    fn visit(
        i: usize,
        assigns: &[Assign],
        defined: &HashMap<&str, usize>,
        visited: &mut [bool],
        on_stack: &mut [bool],
        order: &mut Vec<usize>,
    ) -> Result<(), ParseError> {
        if visited[i] {
            return Ok(());
        }
        if on_stack[i] {
            return Err(ParseError::UndefinedSignal {
                name: assigns[i].lhs.clone(),
            });
        }
        on_stack[i] = true;
        let mut deps = HashSet::new();
        assigns[i].rhs.free_vars(&mut deps);
        for dep in deps {
            if let Some(&j) = defined.get(dep.as_str()) {
                visit(j, assigns, defined, visited, on_stack, order)?;
            }
        }
        on_stack[i] = false;
        visited[i] = true;
        order.push(i);
        Ok(())
    }

    for i in 0..assigns.len() {
        visit(i, &assigns, &defined, &mut visited, &mut on_stack, &mut order)?;
    }

    let mut aig = Aig::new(inputs.len());
    let mut sig: HashMap<String, Lit> = HashMap::new();
    for (i, name) in inputs.iter().enumerate() {
        sig.insert(name.clone(), aig.input(i));
    }
    for &i in &order {
        let lit = build_expr(&mut aig, &assigns[i].rhs, &sig)?;
        sig.insert(assigns[i].lhs.clone(), lit);
    }
    for name in &outputs {
        let lit = sig
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::UndefinedSignal { name: name.clone() })?;
        aig.add_output(lit);
    }

    Ok(VerilogModule {
        name,
        inputs,
        outputs,
        aig,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt::TruthTable;

    #[test]
    fn parses_and_gate() {
        let text = "module m(a, b, y); input a, b; output y; assign y = a & b; endmodule";
        let m = read_verilog(text).unwrap();
        assert_eq!(m.name, "m");
        let tt = m.aig.output_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).and(&TruthTable::var(2, 1)));
    }

    #[test]
    fn parses_forward_referenced_assign() {
        let text = "\
module m(a, b, y);
input a, b;
output y;
assign y = t;
assign t = a ^ b;
endmodule";
        let m = read_verilog(text).unwrap();
        let tt = m.aig.output_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
    }

    #[test]
    fn recognizes_majority_pattern() {
        let text = "\
module m(a, b, c, y);
input a, b, c;
output y;
assign y = (a&b)|(a&c)|(b&c);
endmodule";
        let m = read_verilog(text).unwrap();
        assert_eq!(m.aig.node_count(), 1 + 3 + 1); // const0 + 3 inputs + 1 maj node
        let (va, vb, vc) = (
            TruthTable::var(3, 0),
            TruthTable::var(3, 1),
            TruthTable::var(3, 2),
        );
        let expected = va.and(&vb).or(&vb.and(&vc)).or(&va.and(&vc));
        assert_eq!(m.aig.output_truth_table(0), expected);
    }

    #[test]
    fn bare_constant_assign() {
        let text = "module m(a, y); input a; output y; assign y = 1; endmodule";
        let m = read_verilog(text).unwrap();
        assert_eq!(m.aig.output_truth_table(0), TruthTable::one(1));
    }

    #[test]
    fn undefined_output_is_reported() {
        let text = "module m(a, y); input a; output y; endmodule";
        let err = read_verilog(text).unwrap_err();
        assert!(matches!(err, ParseError::UndefinedSignal { .. }));
    }
}
