//! Component D: NPN-canonical functional hashing.
//!
//! Two functions are NPN-equivalent if one can be turned into the other by
//! some combination of input Negation, input Permutation, and output
//! Negation. Canonicalizing to the lexicographically smallest hex encoding
//! in the NPN orbit gives a hash key that collapses every member of an
//! equivalence class to the same representative, the way the teacher's
//! `Cover` minimization collapses syntactically different but logically
//! identical cube sets (§4.D).

use crate::stats::Stats;
use crate::tt::TruthTable;
use std::collections::HashMap;

/// The transform that carries a function to its NPN-canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpnTransform {
    /// `input_perm[i]` is the canonical-form variable that input `i` maps
    /// onto.
    pub input_perm: Vec<usize>,
    /// Whether input `i` is negated before permutation.
    pub input_polarity: Vec<bool>,
    /// Whether the output is negated.
    pub output_polarity: bool,
}

/// The result of canonicalizing one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpnClass {
    pub canonical: TruthTable,
    pub transform: NpnTransform,
}

/// All permutations of `0..n`, via Heap's algorithm. Exhaustive NPN search
/// is `O(n! * 2^n)`; practical for the small cut/subcircuit widths (`n <=
/// 6`) this kernel canonicalizes (§6 "bounded per-call work").
fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut elems: Vec<usize> = (0..n).collect();
    let mut acc = Vec::new();
    fn heap(elems: &mut Vec<usize>, k: usize, acc: &mut Vec<Vec<usize>>) {
        if k == 1 {
            acc.push(elems.clone());
            return;
        }
        for i in 0..k {
            heap(elems, k - 1, acc);
            if k % 2 == 0 {
                elems.swap(i, k - 1);
            } else {
                elems.swap(0, k - 1);
            }
        }
    }
    heap(&mut elems, n, &mut acc);
    acc
}

fn apply_perm(tt: &TruthTable, perm: &[usize]) -> TruthTable {
    let n = tt.nvars();
    TruthTable::from_fn(n, |row| {
        let mut mapped = 0usize;
        for (i, &target) in perm.iter().enumerate() {
            if (row >> i) & 1 == 1 {
                mapped |= 1 << target;
            }
        }
        tt.eval(mapped)
    })
}

/// Canonicalize `tt` under the full NPN group by exhaustive search.
pub fn npn_canonical(tt: &TruthTable) -> NpnClass {
    let n = tt.nvars();
    let mut best: Option<(String, TruthTable, NpnTransform)> = None;
    for perm in permutations(n) {
        let permuted = apply_perm(tt, &perm);
        for polarity_mask in 0..(1usize << n) {
            let mut flipped = permuted.clone();
            for i in 0..n {
                if (polarity_mask >> i) & 1 == 1 {
                    flipped = flipped.flip(i);
                }
            }
            for &out_pol in &[false, true] {
                let candidate = if out_pol { flipped.not() } else { flipped.clone() };
                let hex = candidate.to_hex();
                let is_better = match &best {
                    None => true,
                    Some((best_hex, _, _)) => hex < *best_hex,
                };
                if is_better {
                    let polarity = (0..n).map(|i| (polarity_mask >> i) & 1 == 1).collect();
                    best = Some((
                        hex,
                        candidate,
                        NpnTransform {
                            input_perm: perm.clone(),
                            input_polarity: polarity,
                            output_polarity: out_pol,
                        },
                    ));
                }
            }
        }
    }
    let (_, canonical, transform) = best.expect("permutations(n) is always non-empty");
    NpnClass {
        canonical,
        transform,
    }
}

/// A hash-consing cache from NPN-canonical hex encodings to the first
/// function (and payload `T`) seen for that class, so repeated lookups of
/// structurally different but NPN-equivalent functions hit the same entry.
#[derive(Debug, Default)]
pub struct NpnCache<T> {
    table: HashMap<String, (TruthTable, T)>,
}

impl<T> NpnCache<T> {
    pub fn new() -> Self {
        NpnCache {
            table: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up `tt`'s NPN class; returns the cached payload if this class
    /// has been seen before, inserting `make()`'s result otherwise.
    pub fn get_or_insert_with(
        &mut self,
        tt: &TruthTable,
        stats: &mut Stats,
        make: impl FnOnce(&NpnClass) -> T,
    ) -> &T {
        let class = npn_canonical(tt);
        let key = class.canonical.to_hex();
        stats.cache_lookups += 1;
        if self.table.contains_key(&key) {
            stats.cache_hits += 1;
        } else {
            let payload = make(&class);
            self.table.insert(key.clone(), (class.canonical.clone(), payload));
        }
        &self.table[&key].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_count_matches_factorial() {
        assert_eq!(permutations(0).len(), 1);
        assert_eq!(permutations(3).len(), 6);
        assert_eq!(permutations(4).len(), 24);
    }

    #[test]
    fn and_and_or_are_npn_equivalent() {
        let and = TruthTable::var(2, 0).and(&TruthTable::var(2, 1));
        let or = TruthTable::var(2, 0).or(&TruthTable::var(2, 1));
        // or(a,b) = !and(!a,!b): two input flips plus an output flip.
        assert_eq!(npn_canonical(&and).canonical, npn_canonical(&or).canonical);
    }

    #[test]
    fn commuted_variable_order_hits_the_same_class() {
        let f = TruthTable::var(3, 0).and(&TruthTable::var(3, 1).not());
        let g = TruthTable::var(3, 1).and(&TruthTable::var(3, 0).not());
        assert_eq!(npn_canonical(&f).canonical, npn_canonical(&g).canonical);
    }

    #[test]
    fn distinct_functions_with_different_weight_are_not_equivalent() {
        let and = TruthTable::var(2, 0).and(&TruthTable::var(2, 1));
        let xor = TruthTable::var(2, 0).xor(&TruthTable::var(2, 1));
        assert_ne!(npn_canonical(&and).canonical, npn_canonical(&xor).canonical);
    }

    #[test]
    fn npn_cache_deduplicates_equivalent_functions() {
        let mut cache: NpnCache<u32> = NpnCache::new();
        let mut stats = Stats::default();
        let and = TruthTable::var(2, 0).and(&TruthTable::var(2, 1));
        let or = TruthTable::var(2, 0).or(&TruthTable::var(2, 1));
        let a = *cache.get_or_insert_with(&and, &mut stats, |_| 1);
        let b = *cache.get_or_insert_with(&or, &mut stats, |_| 2);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_lookups, 2);
    }
}
