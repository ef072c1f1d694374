//! Netlist writers (§6): SMT-LIB2 (equivalence-miter export), BENCH, and a
//! Verilog subset with an optional `MAJ` sub-module, all driven off a
//! `graph::aig::Aig`.

use std::collections::HashSet;
use std::io::Write;

use crate::graph::aig::{Aig, Lit};

fn node_name(node: u32) -> String {
    format!("n{}", node)
}

fn smt_expr(lit: Lit) -> String {
    if lit.inverted {
        format!("(not {})", node_name(lit.node))
    } else {
        node_name(lit.node)
    }
}

/// Write an SMT-LIB2 equivalence miter: one `declare-const` per node, one
/// defining `assert` per AND node (reading inverted fanins through `not`),
/// then `check-sat` on either the single output or a disjunction over all
/// outputs — the standard miter reading, where SAT means some output can
/// differ from the asserted value.
pub fn write_smtlib2<W: Write>(aig: &Aig, w: &mut W) -> std::io::Result<()> {
    for node in 0..aig.node_count() as u32 {
        writeln!(w, "(declare-const {} Bool)", node_name(node))?;
    }
    for node in (aig.input_count() as u32 + 1)..aig.node_count() as u32 {
        let fanins = aig.fanin_lits(node);
        if fanins.is_empty() {
            continue;
        }
        let terms: Vec<String> = fanins.into_iter().map(smt_expr).collect();
        writeln!(
            w,
            "(assert (= {} (and {})))",
            node_name(node),
            terms.join(" ")
        )?;
    }
    match aig.outputs() {
        [] => writeln!(w, "(assert false)")?,
        [single] => writeln!(w, "(assert {})", smt_expr(*single))?,
        many => {
            let disjuncts: Vec<String> = many.iter().map(|&l| smt_expr(l)).collect();
            writeln!(w, "(assert (or {}))", disjuncts.join(" "))?;
        }
    }
    writeln!(w, "(check-sat)")?;
    Ok(())
}

/// The BENCH signal name for a node: primary inputs keep their declared
/// `iN` name, internal AND nodes get `nN`, matching the `INPUT(iN)` lines
/// this writer emits.
fn bench_signal(aig: &Aig, node: u32) -> String {
    if node >= 1 && (node as usize) <= aig.input_count() {
        format!("i{}", node - 1)
    } else {
        node_name(node)
    }
}

fn bench_literal_name(aig: &Aig, lit: Lit) -> String {
    if lit.node == 0 {
        if lit.inverted {
            "vdd".to_string()
        } else {
            "gnd".to_string()
        }
    } else if lit.inverted {
        format!("not_{}", bench_signal(aig, lit.node))
    } else {
        bench_signal(aig, lit.node)
    }
}

/// Write a BENCH netlist. AIG AND nodes become `AND(...)` statements; any
/// inverted fanin or output literal gets its own `NOT` alias first, since
/// BENCH's `AND`/`OR`/etc. gates take plain signal names, not literals.
pub fn write_bench<W: Write>(aig: &Aig, w: &mut W) -> std::io::Result<()> {
    for i in 0..aig.input_count() {
        writeln!(w, "INPUT(i{})", i)?;
    }
    writeln!(w)?;
    for (j, _) in aig.outputs().iter().enumerate() {
        writeln!(w, "OUTPUT(o{})", j)?;
    }
    writeln!(w)?;

    let mut inverted_seen = HashSet::new();
    let mut referenced_inversions: Vec<u32> = Vec::new();
    for node in (aig.input_count() as u32 + 1)..aig.node_count() as u32 {
        for fanin in aig.fanin_lits(node) {
            if fanin.inverted && fanin.node != 0 && inverted_seen.insert(fanin.node) {
                referenced_inversions.push(fanin.node);
            }
        }
    }
    for &lit in aig.outputs() {
        if lit.inverted && lit.node != 0 && inverted_seen.insert(lit.node) {
            referenced_inversions.push(lit.node);
        }
    }
    for node in &referenced_inversions {
        writeln!(
            w,
            "not_{} = NOT({})",
            bench_signal(aig, *node),
            bench_signal(aig, *node)
        )?;
    }

    for node in (aig.input_count() as u32 + 1)..aig.node_count() as u32 {
        let fanins = aig.fanin_lits(node);
        if fanins.is_empty() {
            continue;
        }
        let args: Vec<String> = fanins
            .into_iter()
            .map(|l| bench_literal_name(aig, l))
            .collect();
        writeln!(w, "{} = AND({})", bench_signal(aig, node), args.join(", "))?;
    }
    for (j, &lit) in aig.outputs().iter().enumerate() {
        writeln!(w, "o{} = BUF({})", j, bench_literal_name(aig, lit))?;
    }
    Ok(())
}

fn verilog_expr(aig: &Aig, lit: Lit) -> String {
    let name = if lit.node == 0 {
        return if lit.inverted { "1".to_string() } else { "0".to_string() };
    } else if (lit.node as usize) <= aig.input_count() {
        format!("i{}", lit.node as usize - 1)
    } else {
        node_name(lit.node)
    };
    if lit.inverted {
        format!("~{}", name)
    } else {
        name
    }
}

/// Write a Verilog module. AND-nodes become `&` expressions; this writer
/// does not attempt to recover `MAJ` sub-structures (that recognition only
/// runs the other direction, on read), so the optional `MAJ` sub-module is
/// emitted only when the caller explicitly asks for it via
/// `with_maj_submodule`.
pub fn write_verilog<W: Write>(
    aig: &Aig,
    module_name: &str,
    with_maj_submodule: bool,
    w: &mut W,
) -> std::io::Result<()> {
    if with_maj_submodule {
        writeln!(w, "module MAJ(a, b, c, y);")?;
        writeln!(w, "input a, b, c;")?;
        writeln!(w, "output y;")?;
        writeln!(w, "assign y = (a&b)|(a&c)|(b&c);")?;
        writeln!(w, "endmodule")?;
        writeln!(w)?;
    }
    let inputs: Vec<String> = (0..aig.input_count()).map(|i| format!("i{}", i)).collect();
    let outputs: Vec<String> = (0..aig.outputs().len()).map(|j| format!("o{}", j)).collect();
    let ports: Vec<String> = inputs.iter().chain(outputs.iter()).cloned().collect();
    writeln!(w, "module {}({});", module_name, ports.join(", "))?;
    if !inputs.is_empty() {
        writeln!(w, "input {};", inputs.join(", "))?;
    }
    if !outputs.is_empty() {
        writeln!(w, "output {};", outputs.join(", "))?;
    }
    for node in (aig.input_count() as u32 + 1)..aig.node_count() as u32 {
        let fanins = aig.fanin_lits(node);
        if fanins.is_empty() {
            continue;
        }
        let terms: Vec<String> = fanins.into_iter().map(|l| verilog_expr(aig, l)).collect();
        writeln!(w, "wire {};", node_name(node))?;
        writeln!(w, "assign {} = {};", node_name(node), terms.join(" & "))?;
    }
    for (j, &lit) in aig.outputs().iter().enumerate() {
        writeln!(w, "assign o{} = {};", j, verilog_expr(aig, lit))?;
    }
    writeln!(w, "endmodule")?;
    Ok(())
}
