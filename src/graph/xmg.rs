//! Majority-inverter graphs extended with XOR nodes (XMGs): the target
//! representation for exact synthesis (§4.E) and ESOP-to-circuit mapping.
//!
//! Reuses [`super::aig::Lit`] as the edge type (a node index plus an
//! inversion bit) since the same structural-hashing discipline applies;
//! only the node alphabet differs (`Maj3`/`Xor2` instead of `And`).

use super::aig::Lit;
use crate::error::InvalidInput;
use crate::tt::TruthTable;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
enum XmgNode {
    Const0,
    Input,
    Maj3(Lit, Lit, Lit),
    Xor2(Lit, Lit),
}

/// A structurally-hashed majority/XOR graph.
#[derive(Debug, Clone)]
pub struct Xmg {
    nodes: Vec<XmgNode>,
    input_count: usize,
    outputs: Vec<Lit>,
    maj_cache: HashMap<(Lit, Lit, Lit), Lit>,
    xor_cache: HashMap<(Lit, Lit), Lit>,
}

impl Default for Xmg {
    fn default() -> Self {
        Xmg::new(0)
    }
}

impl Xmg {
    pub fn new(num_inputs: usize) -> Self {
        let mut nodes = Vec::with_capacity(num_inputs + 1);
        nodes.push(XmgNode::Const0);
        for _ in 0..num_inputs {
            nodes.push(XmgNode::Input);
        }
        Xmg {
            nodes,
            input_count: num_inputs,
            outputs: Vec::new(),
            maj_cache: HashMap::new(),
            xor_cache: HashMap::new(),
        }
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Structural fanins of `node` (empty for the constant and primary
    /// inputs), used by [`crate::cuts`]'s generic cut enumerator. A
    /// `Xor2` node's two fanins are exposed like any other gate's: the
    /// enumerator treats the XOR node itself as the indivisible block
    /// (§4.C "XOR-block collapsing"), since `Xmg` never decomposes an XOR
    /// into AND/OR sub-structure the way `Aig` does.
    pub fn fanins(&self, node: u32) -> Vec<u32> {
        match self.nodes[node as usize] {
            XmgNode::Const0 | XmgNode::Input => Vec::new(),
            XmgNode::Maj3(a, b, c) => vec![a.node, b.node, c.node],
            XmgNode::Xor2(a, b) => vec![a.node, b.node],
        }
    }

    pub fn constant(&self, value: bool) -> Lit {
        Lit::new(0, value)
    }

    pub fn input(&self, i: usize) -> Lit {
        assert!(i < self.input_count, "input index out of range");
        Lit::positive((i + 1) as u32)
    }

    pub fn add_output(&mut self, lit: Lit) {
        self.outputs.push(lit);
    }

    pub fn outputs(&self) -> &[Lit] {
        &self.outputs
    }

    fn sorted3(a: Lit, b: Lit, c: Lit) -> (Lit, Lit, Lit) {
        let mut v = [a, b, c];
        v.sort();
        (v[0], v[1], v[2])
    }

    /// Structurally-hashed majority-of-3, with the trivial simplifications
    /// a MAJ-inverter graph relies on to stay reduced:
    /// `maj(a,a,b)=a`, `maj(a,!a,b)=b`, `maj(0,a,b)=and(a,b)`,
    /// `maj(1,a,b)=or(a,b)`.
    pub fn maj3(&mut self, a: Lit, b: Lit, c: Lit) -> Lit {
        if a == b {
            return a;
        }
        if b == c {
            return b;
        }
        if a == c {
            return a;
        }
        if a.node == b.node && a.inverted != b.inverted {
            return c;
        }
        if b.node == c.node && b.inverted != c.inverted {
            return a;
        }
        if a.node == c.node && a.inverted != c.inverted {
            return b;
        }
        if a.node == 0 {
            return if a.inverted {
                self.or_from_maj(b, c)
            } else {
                self.and_from_maj(b, c)
            };
        }
        let key = Self::sorted3(a, b, c);
        if let Some(&hit) = self.maj_cache.get(&key) {
            return hit;
        }
        let id = Lit::positive(self.nodes.len() as u32);
        self.nodes.push(XmgNode::Maj3(key.0, key.1, key.2));
        self.maj_cache.insert(key, id);
        id
    }

    fn and_from_maj(&mut self, a: Lit, b: Lit) -> Lit {
        self.maj3(self.constant(false), a, b)
    }

    fn or_from_maj(&mut self, a: Lit, b: Lit) -> Lit {
        self.maj3(self.constant(true), a, b)
    }

    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        let zero = self.constant(false);
        self.maj3(zero, a, b)
    }

    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        let one = self.constant(true);
        self.maj3(one, a, b)
    }

    /// Structurally-hashed XOR-2 node.
    pub fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        if a.node == 0 {
            return if a.inverted { b.not() } else { b };
        }
        if b.node == 0 {
            return if b.inverted { a.not() } else { a };
        }
        if a.node == b.node {
            return self.constant(a.inverted != b.inverted);
        }
        // Normalise inversions onto the result: xor(!a,b) = !xor(a,b).
        let mut invert = false;
        let (mut pa, mut pb) = (a, b);
        if pa.inverted {
            pa = pa.not();
            invert = !invert;
        }
        if pb.inverted {
            pb = pb.not();
            invert = !invert;
        }
        let key = if pa <= pb { (pa, pb) } else { (pb, pa) };
        let id = if let Some(&hit) = self.xor_cache.get(&key) {
            hit
        } else {
            let id = Lit::positive(self.nodes.len() as u32);
            self.nodes.push(XmgNode::Xor2(key.0, key.1));
            self.xor_cache.insert(key, id);
            id
        };
        if invert {
            id.not()
        } else {
            id
        }
    }

    fn eval_node(&self, cache: &mut Vec<Option<bool>>, node: u32, inputs: &[bool]) -> bool {
        if let Some(v) = cache[node as usize] {
            return v;
        }
        let v = match self.nodes[node as usize] {
            XmgNode::Const0 => false,
            XmgNode::Input => inputs[node as usize - 1],
            XmgNode::Maj3(a, b, c) => {
                let va = self.eval_node(cache, a.node, inputs) ^ a.inverted;
                let vb = self.eval_node(cache, b.node, inputs) ^ b.inverted;
                let vc = self.eval_node(cache, c.node, inputs) ^ c.inverted;
                (va && vb) || (vb && vc) || (va && vc)
            }
            XmgNode::Xor2(a, b) => {
                let va = self.eval_node(cache, a.node, inputs) ^ a.inverted;
                let vb = self.eval_node(cache, b.node, inputs) ^ b.inverted;
                va ^ vb
            }
        };
        cache[node as usize] = Some(v);
        v
    }

    pub fn simulate(&self, inputs: &[bool]) -> Result<Vec<bool>, InvalidInput> {
        if inputs.len() != self.input_count {
            return Err(InvalidInput::DimensionMismatch {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }
        let mut cache = vec![None; self.nodes.len()];
        Ok(self
            .outputs
            .iter()
            .map(|lit| self.eval_node(&mut cache, lit.node, inputs) ^ lit.inverted)
            .collect())
    }

    pub fn output_truth_table(&self, out_index: usize) -> TruthTable {
        TruthTable::from_fn(self.input_count, |row| {
            let inputs: Vec<bool> = (0..self.input_count).map(|i| (row >> i) & 1 == 1).collect();
            let mut cache = vec![None; self.nodes.len()];
            let lit = self.outputs[out_index];
            self.eval_node(&mut cache, lit.node, &inputs) ^ lit.inverted
        })
    }

    /// Total gate count (MAJ3 + XOR2 nodes, excluding the constant and
    /// primary inputs) — the cost metric exact synthesis minimizes before
    /// switching to T-count (§9).
    pub fn gate_count(&self) -> usize {
        self.nodes.len() - self.input_count - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maj3_matches_majority_semantics() {
        let mut xmg = Xmg::new(3);
        let (x0, x1, x2) = (xmg.input(0), xmg.input(1), xmg.input(2));
        let maj = xmg.maj3(x0, x1, x2);
        xmg.add_output(maj);
        for row in 0..8usize {
            let bits = [row & 1 == 1, (row >> 1) & 1 == 1, (row >> 2) & 1 == 1];
            let ones = bits.iter().filter(|b| **b).count();
            let out = xmg.simulate(&bits).unwrap();
            assert_eq!(out[0], ones >= 2);
        }
    }

    #[test]
    fn xor_matches_semantics_with_inverted_operands() {
        let mut xmg = Xmg::new(2);
        let x0 = xmg.input(0);
        let x1 = xmg.input(1);
        let xor = xmg.xor(x0, x1);
        let xor_inv = xmg.xor(x0.not(), x1);
        xmg.add_output(xor);
        xmg.add_output(xor_inv);
        for a in [false, true] {
            for b in [false, true] {
                let out = xmg.simulate(&[a, b]).unwrap();
                assert_eq!(out[0], a ^ b);
                assert_eq!(out[1], !a ^ b);
            }
        }
    }

    #[test]
    fn maj_with_constant_reduces_to_and_or() {
        let mut xmg = Xmg::new(2);
        let x0 = xmg.input(0);
        let x1 = xmg.input(1);
        let and = xmg.and(x0, x1);
        let or = xmg.or(x0, x1);
        xmg.add_output(and);
        xmg.add_output(or);
        for a in [false, true] {
            for b in [false, true] {
                let out = xmg.simulate(&[a, b]).unwrap();
                assert_eq!(out[0], a && b);
                assert_eq!(out[1], a || b);
            }
        }
    }

    #[test]
    fn output_truth_table_matches_simulate() {
        let mut xmg = Xmg::new(3);
        let (x0, x1, x2) = (xmg.input(0), xmg.input(1), xmg.input(2));
        let maj = xmg.maj3(x0, x1, x2);
        xmg.add_output(maj);
        let tt = xmg.output_truth_table(0);
        let expected = TruthTable::var(3, 0)
            .and(&TruthTable::var(3, 1))
            .or(&TruthTable::var(3, 1).and(&TruthTable::var(3, 2)))
            .or(&TruthTable::var(3, 0).and(&TruthTable::var(3, 2)));
        assert_eq!(tt, expected);
    }
}
