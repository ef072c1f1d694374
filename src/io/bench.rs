//! BENCH (ISCAS) netlist reader (§6), grounded on the `other_examples`
//! quaigh `read_bench`: line-oriented `INPUT(name)`/`OUTPUT(name)` and
//! `name = OP(args...)` statements, `#` line comments, plus the `LUT
//! hex(args)`, `gnd`, `vdd` extensions §6 calls out explicitly. Builds
//! directly onto a `graph::aig::Aig` instead of the teacher's own `Network`
//! type, reusing this crate's structural hashing.

use std::collections::HashMap;

use crate::error::ParseError;
use crate::graph::aig::{Aig, Lit};
use crate::tt::TruthTable;

/// A parsed BENCH file: the AIG plus the original input/output signal
/// names, in declaration order (outputs are wired in that order, §6).
#[derive(Debug, Clone)]
pub struct BenchNetwork {
    pub aig: Aig,
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
}

struct Statement {
    name: String,
    op: String,
    args: Vec<String>,
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_statements(
    text: &str,
) -> Result<(Vec<String>, Vec<String>, Vec<Statement>), ParseError> {
    let mut input_names = Vec::new();
    let mut output_names = Vec::new();
    let mut statements = Vec::new();

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if !line.contains('=') {
            let (kw, rest) = line
                .split_once('(')
                .ok_or_else(|| ParseError::MalformedInput {
                    text: line.to_string(),
                })?;
            let name = rest.trim_end_matches(')').trim().to_string();
            match kw.trim().to_uppercase().as_str() {
                "INPUT" | "PINPUT" => input_names.push(name),
                "OUTPUT" | "POUTPUT" => output_names.push(name),
                other => {
                    return Err(ParseError::UnknownGateKind {
                        kind: other.to_string(),
                    })
                }
            }
            continue;
        }
        let (name, rhs) = line.split_once('=').unwrap();
        let name = name.trim().to_string();
        let rhs = rhs.trim();
        if let Some(open) = rhs.find('(') {
            let op = rhs[..open].trim().to_string();
            let args: Vec<String> = rhs[open + 1..]
                .trim_end_matches(')')
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            statements.push(Statement { name, op, args });
        } else {
            // Bare constant assignment: `x = gnd` / `x = vdd`.
            statements.push(Statement {
                name,
                op: rhs.to_string(),
                args: Vec::new(),
            });
        }
    }
    Ok((input_names, output_names, statements))
}

fn resolve(sig: &HashMap<String, Lit>, name: &str) -> Result<Lit, ParseError> {
    sig.get(name)
        .copied()
        .ok_or_else(|| ParseError::UndefinedSignal {
            name: name.to_string(),
        })
}

fn fold_nary(
    aig: &mut Aig,
    args: &[String],
    sig: &HashMap<String, Lit>,
    combine: impl Fn(&mut Aig, Lit, Lit) -> Lit,
) -> Result<Lit, ParseError> {
    let mut lits = args.iter().map(|a| resolve(sig, a));
    let first = lits.next().ok_or_else(|| ParseError::MalformedInput {
        text: "gate with no arguments".to_string(),
    })??;
    lits.try_fold(first, |acc, next| Ok(combine(aig, acc, next?)))
}

/// Expand a `LUT hex(args)` node into an AND/OR network over its minterms
/// (naive but correct, the same cube-per-minterm fallback `lut_synth.rs`
/// uses before EXORLINK minimization gets a chance to shrink it).
fn lut_to_aig(aig: &mut Aig, hex: &str, args: &[Lit]) -> Result<Lit, ParseError> {
    let nvars = args.len();
    let tt = TruthTable::from_hex(hex, nvars)?;
    let mut acc = aig.constant(false);
    for row in 0..tt.size() {
        if !tt.eval(row) {
            continue;
        }
        let mut term = aig.constant(true);
        for (i, &lit) in args.iter().enumerate() {
            let bit = (row >> i) & 1 == 1;
            let literal = if bit { lit } else { lit.not() };
            term = aig.and(term, literal);
        }
        acc = aig.or(acc, term);
    }
    Ok(acc)
}

fn build_gate(
    aig: &mut Aig,
    stmt: &Statement,
    sig: &HashMap<String, Lit>,
) -> Result<Lit, ParseError> {
    let op_upper = stmt.op.trim().to_uppercase();
    if let Some(hex) = op_upper.strip_prefix("LUT ").or_else(|| op_upper.strip_prefix("LUT")) {
        let hex = hex.trim().strip_prefix("0X").unwrap_or(hex.trim());
        let args: Result<Vec<Lit>, ParseError> =
            stmt.args.iter().map(|a| resolve(sig, a)).collect();
        return lut_to_aig(aig, hex, &args?);
    }
    match op_upper.as_str() {
        "AND" => fold_nary(aig, &stmt.args, sig, Aig::and),
        "NAND" => Ok(fold_nary(aig, &stmt.args, sig, Aig::and)?.not()),
        "OR" => fold_nary(aig, &stmt.args, sig, Aig::or),
        "NOR" => Ok(fold_nary(aig, &stmt.args, sig, Aig::or)?.not()),
        "XOR" => fold_nary(aig, &stmt.args, sig, Aig::xor),
        "XNOR" => Ok(fold_nary(aig, &stmt.args, sig, Aig::xor)?.not()),
        "NOT" | "INV" => Ok(resolve(sig, &stmt.args[0])?.not()),
        "BUF" | "BUFF" => resolve(sig, &stmt.args[0]),
        "GND" | "VSS" => Ok(aig.constant(false)),
        "VDD" => Ok(aig.constant(true)),
        other => Err(ParseError::UnknownGateKind {
            kind: other.to_string(),
        }),
    }
}

/// Parse a BENCH-format netlist into an [`Aig`].
pub fn read_bench(text: &str) -> Result<BenchNetwork, ParseError> {
    let (input_names, output_names, statements) = parse_statements(text)?;
    let mut aig = Aig::new(input_names.len());
    let mut sig: HashMap<String, Lit> = HashMap::new();
    for (i, name) in input_names.iter().enumerate() {
        sig.insert(name.clone(), aig.input(i));
    }
    sig.entry("gnd".to_string())
        .or_insert_with(|| aig.constant(false));
    sig.entry("vdd".to_string())
        .or_insert_with(|| aig.constant(true));

    for stmt in &statements {
        if stmt.args.is_empty() {
            let upper = stmt.op.trim().to_uppercase();
            let lit = match upper.as_str() {
                "GND" | "VSS" => aig.constant(false),
                "VDD" => aig.constant(true),
                _ => {
                    return Err(ParseError::UnknownGateKind {
                        kind: stmt.op.clone(),
                    })
                }
            };
            sig.insert(stmt.name.clone(), lit);
            continue;
        }
        let lit = build_gate(&mut aig, stmt, &sig)?;
        sig.insert(stmt.name.clone(), lit);
    }

    for name in &output_names {
        let lit = resolve(&sig, name)?;
        aig.add_output(lit);
    }

    Ok(BenchNetwork {
        aig,
        input_names,
        output_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
# .bench (ISCAS) file
INPUT(i0)
INPUT(i1)

OUTPUT(x0)
OUTPUT(x4)
OUTPUT(x6)

x0 = AND(i0, i1)
x1 = NAND(i0, i1)
x2 = OR(i0, i1)
x3 = NOR(i0, i1)
x4 = XOR(i0, i1)
x5 = BUF(i0)
x6 = NOT(i1)
x7 = gnd
x8 = vdd
";

    #[test]
    fn parses_inputs_and_outputs() {
        let net = read_bench(EXAMPLE).unwrap();
        assert_eq!(net.input_names, vec!["i0", "i1"]);
        assert_eq!(net.output_names, vec!["x0", "x4", "x6"]);
        assert_eq!(net.aig.outputs().len(), 3);
    }

    #[test]
    fn and_gate_matches_truth_table() {
        let net = read_bench(EXAMPLE).unwrap();
        let tt = net.aig.output_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).and(&TruthTable::var(2, 1)));
    }

    #[test]
    fn xor_gate_matches_truth_table() {
        let net = read_bench(EXAMPLE).unwrap();
        let tt = net.aig.output_truth_table(1);
        assert_eq!(tt, TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
    }

    #[test]
    fn not_gate_matches_truth_table() {
        let net = read_bench(EXAMPLE).unwrap();
        let tt = net.aig.output_truth_table(2);
        assert_eq!(tt, TruthTable::var(2, 1).not());
    }

    #[test]
    fn lut_node_matches_truth_table() {
        let text = "INPUT(a)\nINPUT(b)\nOUTPUT(x0)\nx0 = LUT 0x8(a, b)\n";
        let net = read_bench(text).unwrap();
        let tt = net.aig.output_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).and(&TruthTable::var(2, 1)));
    }

    #[test]
    fn undefined_signal_is_reported() {
        let text = "INPUT(a)\nOUTPUT(x0)\nx0 = BUF(b)\n";
        let err = read_bench(text).unwrap_err();
        assert!(matches!(err, ParseError::UndefinedSignal { .. }));
    }

    #[test]
    fn comments_are_ignored() {
        let text = "# comment\nINPUT(a) # trailing comment\nOUTPUT(a)\n";
        let net = read_bench(text).unwrap();
        assert_eq!(net.input_names, vec!["a"]);
    }
}
