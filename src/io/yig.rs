//! YIG reader (§6): `.i N`, `.o N`, `.w N`, `.e`, and
//! `name = Yk(args...)` statements where `Yk` is a k-step majority
//! aggregator.
//!
//! §6 points at §4.D for `Yk`'s semantics but §4.D only defines the plain
//! 3-input `MAJ` primitive; there is no direct k-ary majority gate in this
//! crate's graph representation. Resolved (see `DESIGN.md`) by cascading
//! `Aig::maj3`, the standard way an odd-arity majority is built from 3-input
//! majority gates: `Y1(a) = a`, `Y3(a,b,c) = MAJ(a,b,c)`, and for odd `k>3`,
//! `Yk(a_1..a_k) = MAJ(a_1, a_2, Y_{k-2}(a_3..a_k))`. `k` must equal
//! `args.len()` and must be odd, since an even-arity majority has no
//! tie-breaking rule to resolve.

use std::collections::HashMap;

use crate::error::ParseError;
use crate::graph::aig::{Aig, Lit};

#[derive(Debug, Clone)]
pub struct YigNetwork {
    pub aig: Aig,
    pub num_inputs: usize,
    pub num_outputs: usize,
}

struct Statement {
    name: String,
    k: usize,
    args: Vec<String>,
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn resolve(sig: &HashMap<String, Lit>, name: &str) -> Result<Lit, ParseError> {
    sig.get(name)
        .copied()
        .ok_or_else(|| ParseError::UndefinedSignal {
            name: name.to_string(),
        })
}

fn cascade_majority(aig: &mut Aig, lits: &[Lit]) -> Lit {
    match lits {
        [] => unreachable!("Yk statements always carry at least one argument"),
        [a] => *a,
        [a, b, c] => aig.maj3(*a, *b, *c),
        [a, b, rest @ ..] => {
            let tail = cascade_majority(aig, rest);
            aig.maj3(*a, *b, tail)
        }
    }
}

fn parse_statement(name: &str, rhs: &str) -> Result<Statement, ParseError> {
    let rhs = rhs.trim();
    let (head, rest) = rhs.split_once('(').ok_or_else(|| ParseError::MalformedInput {
        text: rhs.to_string(),
    })?;
    let head = head.trim();
    let k: usize = head
        .strip_prefix('Y')
        .or_else(|| head.strip_prefix('y'))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| ParseError::UnknownGateKind {
            kind: head.to_string(),
        })?;
    let args: Vec<String> = rest
        .trim_end_matches(')')
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if args.len() != k || k == 0 || k % 2 == 0 {
        return Err(ParseError::MalformedInput {
            text: format!("Y{} requires {} odd-numbered arguments", k, k),
        });
    }
    Ok(Statement {
        name: name.to_string(),
        k,
        args,
    })
}

/// Parse a YIG-format document.
pub fn read_yig(text: &str) -> Result<YigNetwork, ParseError> {
    let mut num_inputs = None;
    let mut num_outputs = None;
    let mut num_wires = None;
    let mut statements = Vec::new();

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(".i") {
            num_inputs = Some(rest.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedInput {
                    text: line.to_string(),
                }
            })?);
        } else if let Some(rest) = line.strip_prefix(".o") {
            num_outputs = Some(rest.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedInput {
                    text: line.to_string(),
                }
            })?);
        } else if let Some(rest) = line.strip_prefix(".w") {
            num_wires = Some(rest.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedInput {
                    text: line.to_string(),
                }
            })?);
        } else if line.starts_with(".e") {
            break;
        } else if line.starts_with('.') {
            return Err(ParseError::UnknownGateKind {
                kind: line.to_string(),
            });
        } else if let Some((name, rhs)) = line.split_once('=') {
            statements.push(parse_statement(name.trim(), rhs)?);
        } else {
            return Err(ParseError::MalformedInput {
                text: line.to_string(),
            });
        }
    }

    let num_inputs = num_inputs.ok_or_else(|| ParseError::MissingHeader {
        directive: ".i".to_string(),
    })?;
    let num_outputs = num_outputs.ok_or_else(|| ParseError::MissingHeader {
        directive: ".o".to_string(),
    })?;
    let _num_wires = num_wires.unwrap_or(0);

    let mut aig = Aig::new(num_inputs);
    let mut sig: HashMap<String, Lit> = HashMap::new();
    for i in 0..num_inputs {
        sig.insert(format!("i{}", i), aig.input(i));
    }

    for stmt in &statements {
        let lits: Result<Vec<Lit>, ParseError> =
            stmt.args.iter().map(|a| resolve(&sig, a)).collect();
        let lits = lits?;
        debug_assert_eq!(lits.len(), stmt.k);
        let out = cascade_majority(&mut aig, &lits);
        sig.insert(stmt.name.clone(), out);
    }

    // Outputs are the last `num_outputs` defined signals, in definition
    // order, matching `name = Yk(...)`'s wiring-by-position convention.
    let defined: Vec<&str> = statements.iter().map(|s| s.name.as_str()).collect();
    if defined.len() < num_outputs {
        return Err(ParseError::MalformedInput {
            text: "fewer statements than declared outputs".to_string(),
        });
    }
    for name in &defined[defined.len() - num_outputs..] {
        let lit = resolve(&sig, name)?;
        aig.add_output(lit);
    }

    Ok(YigNetwork {
        aig,
        num_inputs,
        num_outputs,
    })
}
