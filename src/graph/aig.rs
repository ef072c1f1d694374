//! And-inverter graphs: the structural substrate `cuts`/`hashing` walk and
//! the representation `io::bench`/`io::verilog` read and write.
//!
//! Grounded the same way the teacher represents cubes/covers as compact
//! index-based structures (`src/cover/cubes.rs`) rather than pointer trees:
//! nodes live in one `Vec`, edges are `Lit`s (a node index plus an
//! inversion bit), and structural hashing on `and()` keeps the graph
//! reduced as it is built, mirroring `original_source/simulate_aig.cpp`'s
//! "build once, simulate many" usage pattern.

use crate::error::InvalidInput;
use crate::tt::TruthTable;
use std::collections::HashMap;

/// A reference to an AIG node with an inversion flag, the universal edge
/// type for AIGs (also reused by `cuts`/`hashing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    pub node: u32,
    pub inverted: bool,
}

impl Lit {
    pub fn new(node: u32, inverted: bool) -> Self {
        Lit { node, inverted }
    }

    pub fn positive(node: u32) -> Self {
        Lit::new(node, false)
    }

    pub fn not(self) -> Lit {
        Lit::new(self.node, !self.inverted)
    }
}

/// Node `0` is always the constant-false node; AIG construction never
/// exposes it directly, only through [`Aig::constant`].
#[derive(Debug, Clone, Copy)]
enum AigNode {
    Const0,
    Input,
    And(Lit, Lit),
}

/// A structurally-hashed and-inverter graph.
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: Vec<AigNode>,
    input_count: usize,
    outputs: Vec<Lit>,
    and_cache: HashMap<(Lit, Lit), Lit>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new(0)
    }
}

impl Aig {
    /// A fresh graph with `num_inputs` primary inputs and no outputs.
    pub fn new(num_inputs: usize) -> Self {
        let mut nodes = Vec::with_capacity(num_inputs + 1);
        nodes.push(AigNode::Const0);
        for _ in 0..num_inputs {
            nodes.push(AigNode::Input);
        }
        Aig {
            nodes,
            input_count: num_inputs,
            outputs: Vec::new(),
            and_cache: HashMap::new(),
        }
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Structural fanins of `node` (empty for the constant and primary
    /// inputs), used by [`crate::cuts`]'s generic cut enumerator.
    pub fn fanins(&self, node: u32) -> Vec<u32> {
        match self.nodes[node as usize] {
            AigNode::Const0 | AigNode::Input => Vec::new(),
            AigNode::And(a, b) => vec![a.node, b.node],
        }
    }

    /// Structural fanins of `node` as full (polarity-carrying) literals,
    /// used by the netlist writers to recover `&`/inverter structure that
    /// the node-only [`Aig::fanins`] discards.
    pub fn fanin_lits(&self, node: u32) -> Vec<Lit> {
        match self.nodes[node as usize] {
            AigNode::Const0 | AigNode::Input => Vec::new(),
            AigNode::And(a, b) => vec![a, b],
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

    /// Structurally-hashed AND with the standard trivial simplifications
    /// (`x & 0 = 0`, `x & 1 = x`, `x & x = x`, `x & !x = 0`).
    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        if a.node == 0 {
            return if a.inverted { b } else { self.constant(false) };
        }
        if b.node == 0 {
            return if b.inverted { a } else { self.constant(false) };
        }
        if a == b {
            return a;
        }
        if a.node == b.node && a.inverted != b.inverted {
            return self.constant(false);
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&hit) = self.and_cache.get(&key) {
            return hit;
        }
        let id = Lit::positive(self.nodes.len() as u32);
        self.nodes.push(AigNode::And(key.0, key.1));
        self.and_cache.insert(key, id);
        id
    }

    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        let n = self.and(a.not(), b.not());
        n.not()
    }

    pub fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        let na_b = self.and(a.not(), b);
        let a_nb = self.and(a, b.not());
        self.or(na_b, a_nb)
    }

    pub fn maj3(&mut self, a: Lit, b: Lit, c: Lit) -> Lit {
        let ab = self.and(a, b);
        let bc = self.and(b, c);
        let ac = self.and(a, c);
        let ab_or_bc = self.or(ab, bc);
        self.or(ab_or_bc, ac)
    }

    fn eval_node(&self, cache: &mut Vec<Option<bool>>, node: u32, inputs: &[bool]) -> bool {
        if let Some(v) = cache[node as usize] {
            return v;
        }
        let v = match self.nodes[node as usize] {
            AigNode::Const0 => false,
            AigNode::Input => inputs[node as usize - 1],
            AigNode::And(a, b) => {
                let va = self.eval_node(cache, a.node, inputs) ^ a.inverted;
                let vb = self.eval_node(cache, b.node, inputs) ^ b.inverted;
                va && vb
            }
        };
        cache[node as usize] = Some(v);
        v
    }

    /// Evaluate every output for one input assignment
    /// (`original_source/simulate_aig.cpp`'s core loop).
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

    /// Truth table of output `out_index`, over `self.input_count()`
    /// variables, by exhaustive simulation.
    pub fn output_truth_table(&self, out_index: usize) -> TruthTable {
        TruthTable::from_fn(self.input_count, |row| {
            let inputs: Vec<bool> = (0..self.input_count).map(|i| (row >> i) & 1 == 1).collect();
            let mut cache = vec![None; self.nodes.len()];
            let lit = self.outputs[out_index];
            self.eval_node(&mut cache, lit.node, &inputs) ^ lit.inverted
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_of_constant_false_is_constant_false() {
        let mut aig = Aig::new(1);
        let x0 = aig.input(0);
        let zero = aig.constant(false);
        assert_eq!(aig.and(x0, zero), zero);
    }

    #[test]
    fn and_is_structurally_hashed() {
        let mut aig = Aig::new(2);
        let x0 = aig.input(0);
        let x1 = aig.input(1);
        let a = aig.and(x0, x1);
        let b = aig.and(x1, x0);
        assert_eq!(a, b, "commuted AND should hit the same node");
    }

    #[test]
    fn and_of_complementary_literals_is_false() {
        let mut aig = Aig::new(1);
        let x0 = aig.input(0);
        assert_eq!(aig.and(x0, x0.not()), aig.constant(false));
    }

    #[test]
    fn simulate_matches_and_or_xor_semantics() {
        let mut aig = Aig::new(2);
        let x0 = aig.input(0);
        let x1 = aig.input(1);
        let and = aig.and(x0, x1);
        let or = aig.or(x0, x1);
        let xor = aig.xor(x0, x1);
        aig.add_output(and);
        aig.add_output(or);
        aig.add_output(xor);
        for a in [false, true] {
            for b in [false, true] {
                let out = aig.simulate(&[a, b]).unwrap();
                assert_eq!(out, vec![a && b, a || b, a ^ b]);
            }
        }
    }

    #[test]
    fn maj3_matches_majority_semantics() {
        let mut aig = Aig::new(3);
        let (x0, x1, x2) = (aig.input(0), aig.input(1), aig.input(2));
        let maj = aig.maj3(x0, x1, x2);
        aig.add_output(maj);
        for row in 0..8usize {
            let bits = [row & 1 == 1, (row >> 1) & 1 == 1, (row >> 2) & 1 == 1];
            let ones = bits.iter().filter(|b| **b).count();
            let out = aig.simulate(&bits).unwrap();
            assert_eq!(out[0], ones >= 2);
        }
    }

    #[test]
    fn simulate_rejects_wrong_input_width() {
        let aig = Aig::new(2);
        assert!(aig.simulate(&[true]).is_err());
    }

    #[test]
    fn output_truth_table_matches_simulate() {
        let mut aig = Aig::new(2);
        let x0 = aig.input(0);
        let x1 = aig.input(1);
        let xor = aig.xor(x0, x1);
        aig.add_output(xor);
        let tt = aig.output_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
    }
}
