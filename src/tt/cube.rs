//! Cube algebra: `(bits, mask)` product terms, `change`, distance, and the
//! EXORLINK reshape tables (§3, §4.A, §9).
//!
//! A variable is asserted positive iff `mask & bits`, negative iff
//! `mask & !bits`, and don't-care iff `!mask`. This mirrors the teacher's
//! `Cube` (`src/cover/cubes.rs`), but is a compact `(u64, u64)` pair instead
//! of an `Arc<[Option<bool>]>` slice, since EXORLINK needs cheap bitwise
//! reshapes over cubes with up to 64 variables.

use std::fmt;

/// A product term over up to 64 variables: `bits ⊆ mask` as bitsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    pub bits: u64,
    pub mask: u64,
    nvars: u32,
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cube(\"{}\")", self.to_pattern())
    }
}

impl Cube {
    /// The all-don't-care cube ("tautology cube") over `nvars` variables.
    pub fn tautology(nvars: u32) -> Self {
        Cube {
            bits: 0,
            mask: 0,
            nvars,
        }
    }

    pub fn new(bits: u64, mask: u64, nvars: u32) -> Self {
        debug_assert_eq!(bits & !mask, 0, "bits must be a subset of mask");
        Cube { bits, mask, nvars }
    }

    pub fn nvars(&self) -> u32 {
        self.nvars
    }

    /// Literal at position `i`: `Some(true)`, `Some(false)`, or `None`
    /// (don't-care).
    pub fn literal(&self, i: u32) -> Option<bool> {
        if (self.mask >> i) & 1 == 0 {
            None
        } else {
            Some((self.bits >> i) & 1 == 1)
        }
    }

    pub fn set_literal(&mut self, i: u32, value: Option<bool>) {
        match value {
            None => {
                self.mask &= !(1 << i);
                self.bits &= !(1 << i);
            }
            Some(v) => {
                self.mask |= 1 << i;
                if v {
                    self.bits |= 1 << i;
                } else {
                    self.bits &= !(1 << i);
                }
            }
        }
    }

    /// Number of non-don't-care literals.
    pub fn literal_count(&self) -> u32 {
        self.mask.count_ones()
    }

    /// `distance(c1, c2) = popcount((bits1^bits2) | (mask1^mask2))`.
    pub fn distance(&self, other: &Cube) -> u32 {
        ((self.bits ^ other.bits) | (self.mask ^ other.mask)).count_ones()
    }

    /// Does this cube's set of covered minterms contain `other`'s?
    pub fn contains(&self, other: &Cube) -> bool {
        // self contains other iff every position asserted in self agrees
        // with other and self's mask is a subset of other's mask... actually
        // containment of minterm-sets means: wherever self has a literal,
        // other must have the *same* literal (other is at least as
        // constrained everywhere self is).
        (self.mask & !other.mask) == 0 && (self.mask & (self.bits ^ other.bits)) == 0
    }

    /// Render using `0`/`1`/`-` notation, low variable first.
    pub fn to_pattern(&self) -> String {
        (0..self.nvars)
            .map(|i| match self.literal(i) {
                None => '-',
                Some(false) => '0',
                Some(true) => '1',
            })
            .collect()
    }

    /// Parse a PLA-style input pattern (`0`/`1`/`-`, one char per variable)
    /// into a `Cube`. Any other character is treated as don't-care, matching
    /// the teacher's whitespace-tolerant PLA reader.
    pub fn from_pattern(pattern: &str) -> Cube {
        let nvars = pattern.chars().count() as u32;
        let mut bits = 0u64;
        let mut mask = 0u64;
        for (i, ch) in pattern.chars().enumerate() {
            match ch {
                '1' => {
                    bits |= 1 << i;
                    mask |= 1 << i;
                }
                '0' => {
                    mask |= 1 << i;
                }
                _ => {}
            }
        }
        Cube { bits, mask, nvars }
    }

    /// The indicator function of this cube over `nvars` variables: `1` on
    /// exactly the rows that satisfy every asserted literal.
    pub fn indicator(&self, nvars: usize) -> super::TruthTable {
        super::TruthTable::from_fn(nvars, |row| {
            (0..nvars as u32).all(|i| match self.literal(i) {
                None => true,
                Some(v) => ((row >> i) & 1 == 1) == v,
            })
        })
    }

    /// `change(c1, c2, k)`: modify position `k` of `self` to converge toward
    /// `other`. Rules (§4.A):
    /// - don't-care position converges to `other`'s value at `k`.
    /// - opposing literal values become don't-care.
    /// - equal don't-cares (both positions don't-care) take `other`'s value.
    pub fn change(&self, other: &Cube, k: u32) -> Cube {
        let mut out = *self;
        let self_lit = self.literal(k);
        let other_lit = other.literal(k);
        let new_lit = match (self_lit, other_lit) {
            (None, x) => x,
            (Some(a), Some(b)) if a != b => None,
            (Some(_), None) => other_lit,
            (a, b) if a == b => b,
            _ => None,
        };
        out.set_literal(k, new_lit);
        out
    }
}

/// EXORLINK reshape groups (§9): for distance `d in {2,3,4}` there are
/// `{2,6,24}` reshape groups, each a flat `d*d` sequence of per-(output,
/// position) codes in `{0 = keep this, 1 = take from that, 2 = set to the
/// value neither cube has}`, consumed row-major (output index outer,
/// differing-position index inner, positions visited ascending) by
/// [`exorlink`]. Ported verbatim from
/// `original_source/exorcismq.cpp`'s `cube_groups`/`cube_group_count`/
/// `cube_group_offsets` static tables.
pub mod exorlink {
    /// Distance-2 groups: `2` groups of `2*2 = 4` codes.
    pub const GROUPS_D2: [[u8; 4]; 2] = [[2, 0, 1, 2], [0, 2, 2, 1]];

    /// Distance-3 groups: `6` groups of `3*3 = 9` codes.
    pub const GROUPS_D3: [[u8; 9]; 6] = [
        [2, 0, 0, 1, 2, 0, 1, 1, 2],
        [2, 0, 0, 1, 0, 2, 1, 2, 1],
        [0, 2, 0, 2, 1, 0, 1, 1, 2],
        [0, 2, 0, 0, 1, 2, 2, 1, 1],
        [0, 0, 2, 2, 0, 1, 1, 2, 1],
        [0, 0, 2, 0, 2, 1, 2, 1, 1],
    ];

    /// Distance-4 groups: `24` groups of `4*4 = 16` codes.
    pub const GROUPS_D4: [[u8; 16]; 24] = [
        [2, 0, 0, 0, 1, 2, 0, 0, 1, 1, 2, 0, 1, 1, 1, 2],
        [2, 0, 0, 0, 1, 2, 0, 0, 1, 1, 0, 2, 1, 1, 2, 1],
        [2, 0, 0, 0, 1, 0, 2, 0, 1, 2, 1, 0, 1, 1, 1, 2],
        [2, 0, 0, 0, 1, 0, 2, 0, 1, 0, 1, 2, 1, 2, 1, 1],
        [2, 0, 0, 0, 1, 0, 0, 2, 1, 2, 0, 1, 1, 1, 2, 1],
        [2, 0, 0, 0, 1, 0, 0, 2, 1, 0, 2, 1, 1, 2, 1, 1],
        [0, 2, 0, 0, 2, 1, 0, 0, 1, 1, 2, 0, 1, 1, 1, 2],
        [0, 2, 0, 0, 2, 1, 0, 0, 1, 1, 0, 2, 1, 1, 2, 1],
        [0, 2, 0, 0, 0, 1, 2, 0, 2, 1, 1, 0, 1, 1, 1, 2],
        [0, 2, 0, 0, 0, 1, 2, 0, 0, 1, 1, 2, 2, 1, 1, 1],
        [0, 2, 0, 0, 0, 1, 0, 2, 2, 1, 0, 1, 1, 1, 2, 1],
        [0, 2, 0, 0, 0, 1, 0, 2, 0, 1, 2, 1, 2, 1, 1, 1],
        [0, 0, 2, 0, 2, 0, 1, 0, 1, 2, 1, 0, 1, 1, 1, 2],
        [0, 0, 2, 0, 2, 0, 1, 0, 1, 0, 1, 2, 1, 2, 1, 1],
        [0, 0, 2, 0, 0, 2, 1, 0, 2, 1, 1, 0, 1, 1, 1, 2],
        [0, 0, 2, 0, 0, 2, 1, 0, 0, 1, 1, 2, 2, 1, 1, 1],
        [0, 0, 2, 0, 0, 0, 1, 2, 2, 0, 1, 1, 1, 2, 1, 1],
        [0, 0, 2, 0, 0, 0, 1, 2, 0, 2, 1, 1, 2, 1, 1, 1],
        [0, 0, 0, 2, 2, 0, 0, 1, 1, 2, 0, 1, 1, 1, 2, 1],
        [0, 0, 0, 2, 2, 0, 0, 1, 1, 0, 2, 1, 1, 2, 1, 1],
        [0, 0, 0, 2, 0, 2, 0, 1, 2, 1, 0, 1, 1, 1, 2, 1],
        [0, 0, 0, 2, 0, 2, 0, 1, 0, 1, 2, 1, 2, 1, 1, 1],
        [0, 0, 0, 2, 0, 0, 2, 1, 2, 0, 1, 1, 1, 2, 1, 1],
        [0, 0, 0, 2, 0, 0, 2, 1, 0, 2, 1, 1, 2, 1, 1, 1],
    ];

    /// Number of reshape groups for a given distance.
    pub fn group_count(d: u32) -> usize {
        match d {
            2 => GROUPS_D2.len(),
            3 => GROUPS_D3.len(),
            4 => GROUPS_D4.len(),
            _ => 0,
        }
    }

    /// The flat `d*d` code sequence for a given distance/group index.
    pub fn codes(d: u32, group: usize) -> &'static [u8] {
        match d {
            2 => &GROUPS_D2[group],
            3 => &GROUPS_D3[group],
            4 => &GROUPS_D4[group],
            _ => panic!("exorlink only supports d in {{2,3,4}}"),
        }
    }
}

/// Bitmask of the positions at which `c1` and `c2` disagree (either a
/// differing literal or a differing don't-care status) — the same
/// expression [`Cube::distance`] popcounts.
fn differing_mask(c1: &Cube, c2: &Cube) -> u64 {
    (c1.bits ^ c2.bits) | (c1.mask ^ c2.mask)
}

/// Reshape two cubes at distance `d` (`d` in `{2,3,4}`) using reshape
/// `group` (0-indexed into the relevant EXORLINK table), producing `d` new
/// cubes whose XOR equals `c1 XOR c2` (§4.A, §8 invariant 4). `pos` is the
/// bitmask of the `d` differing positions (as returned internally by
/// `differing_mask`; [`exorlink_auto`] computes it for callers who don't
/// already have it).
///
/// For each of the `d` output cubes, start from a copy of `c1` and visit the
/// `d` differing positions in ascending bit order, applying the group's
/// next code at each: `0` leaves the position as `c1`'s, `1` overwrites it
/// with `c2`'s literal there, and `2` overwrites it with the literal
/// *neither* cube has (`bits = !c1.bits & !c2.bits`, `mask = c1.mask ^
/// c2.mask`, i.e. the don't-care/opposite-polarity combination absent from
/// both inputs). Ported from `exorcismq_cube::exorlink` in
/// `original_source/exorcismq.cpp`.
pub fn exorlink(c1: &Cube, c2: &Cube, d: u32, pos: u64, group: usize) -> Vec<Cube> {
    debug_assert_eq!(pos.count_ones(), d, "pos must have exactly d bits set");
    let nvars = c1.nvars();
    let codes = exorlink::codes(d, group);
    let other_bits = !c1.bits & !c2.bits;
    let other_mask = c1.mask ^ c2.mask;

    let mut code_iter = codes.iter();
    let mut out = Vec::with_capacity(d as usize);
    for _ in 0..d {
        let mut tbits = c1.bits;
        let mut tmask = c1.mask;
        let mut tpos = pos;
        for _ in 0..d {
            let p = tpos & tpos.wrapping_neg();
            tpos &= tpos.wrapping_sub(1);
            match *code_iter.next().expect("d*d codes per group") {
                0 => {}
                1 => {
                    tbits ^= (c2.bits & p) ^ (tbits & p);
                    tmask ^= (c2.mask & p) ^ (tmask & p);
                }
                2 => {
                    tbits ^= (other_bits & p) ^ (tbits & p);
                    tmask ^= (other_mask & p) ^ (tmask & p);
                }
                code => panic!("invalid exorlink code {code}"),
            }
        }
        out.push(Cube::new(tbits, tmask, nvars));
    }
    out
}

/// Compute the differing-position bitmask between two cubes and run
/// [`exorlink`] for the given group.
pub fn exorlink_auto(c1: &Cube, c2: &Cube, group: usize) -> Option<Vec<Cube>> {
    let pos = differing_mask(c1, c2);
    let d = pos.count_ones();
    if !(2..=4).contains(&d) {
        return None;
    }
    Some(exorlink(c1, c2, d, pos, group))
}

/// T-gate cost of a cube with `c` literals on `n` variables (§9).
pub fn tcount(c: u32, n: u32) -> u32 {
    match c {
        0 | 1 => 0,
        2 => 7,
        3 => 22,
        4 => {
            if n >= 7 {
                28
            } else {
                52
            }
        }
        _ => {
            if (n as f64 / 2.0).ceil() as u32 >= c {
                12 * (c - 2) + 4
            } else {
                24 * (c - 3) + 8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_zero_means_equal() {
        let c = Cube::new(0b101, 0b111, 3);
        assert_eq!(c.distance(&c), 0);
    }

    #[test]
    fn distance_one_cubes_absorb() {
        let c1 = Cube::new(0b001, 0b011, 3); // "1-0"-ish pattern depending on bit order
        let c2 = Cube::new(0b011, 0b011, 3);
        assert_eq!(c1.distance(&c2), 1);
        let merged = c1.change(&c2, 1);
        assert_eq!(merged.distance(&c2), 0.max(0)); // merged should now equal or don't-care at pos 1
        assert_eq!(merged.literal(1), None);
    }

    #[test]
    fn tcount_table_matches_spec_constants() {
        assert_eq!(tcount(0, 5), 0);
        assert_eq!(tcount(1, 5), 0);
        assert_eq!(tcount(2, 5), 7);
        assert_eq!(tcount(3, 5), 22);
        assert_eq!(tcount(4, 7), 28);
        assert_eq!(tcount(4, 6), 52);
    }

    #[test]
    fn exorlink_distance2_group_count() {
        assert_eq!(exorlink::group_count(2), 2);
        assert_eq!(exorlink::group_count(3), 6);
        assert_eq!(exorlink::group_count(4), 24);
    }

    #[test]
    fn exorlink_preserves_xor_function_d2() {
        // c1 = "1-", c2 = "-1" over 2 vars differ at both positions.
        let c1 = Cube::new(0b01, 0b01, 2);
        let c2 = Cube::new(0b10, 0b10, 2);
        let pos = differing_mask(&c1, &c2);
        assert_eq!(pos.count_ones(), 2);
        for group in 0..exorlink::group_count(2) {
            let reshaped = exorlink(&c1, &c2, 2, pos, group);
            assert_eq!(reshaped.len(), 2);
            // Evaluate functional equivalence by brute force over all rows.
            assert_xor_equivalent(&[c1, c2], &reshaped, 2);
        }
    }

    #[test]
    fn exorlink_handles_dont_care_differing_positions() {
        // "-11" and "11-" over 3 vars (var0 low bit .. var2 high bit):
        // c1: var0=-, var1=1, var2=1 ; c2: var0=1, var1=1, var2=-
        let mut c1 = Cube::tautology(3);
        c1.set_literal(0, None);
        c1.set_literal(1, Some(true));
        c1.set_literal(2, Some(true));
        let mut c2 = Cube::tautology(3);
        c2.set_literal(0, Some(true));
        c2.set_literal(1, Some(true));
        c2.set_literal(2, None);

        let pos = differing_mask(&c1, &c2);
        assert_eq!(pos, 0b101);
        for group in 0..exorlink::group_count(2) {
            let reshaped = exorlink(&c1, &c2, 2, pos, group);
            assert_eq!(reshaped.len(), 2);
            assert_xor_equivalent(&[c1, c2], &reshaped, 3);
        }
    }

    #[test]
    fn exorlink_auto_matches_manual_group() {
        let c1 = Cube::new(0b001, 0b011, 3);
        let c2 = Cube::new(0b110, 0b110, 3);
        let pos = differing_mask(&c1, &c2);
        let d = pos.count_ones();
        let manual = exorlink(&c1, &c2, d, pos, 0);
        let auto = exorlink_auto(&c1, &c2, 0).unwrap();
        assert_eq!(manual, auto);
    }

    fn cube_covers(c: &Cube, row: u32, nvars: u32) -> bool {
        for i in 0..nvars {
            if let Some(v) = c.literal(i) {
                if v != ((row >> i) & 1 == 1) {
                    return false;
                }
            }
        }
        true
    }

    fn xor_of_cubes(cubes: &[Cube], row: u32, nvars: u32) -> bool {
        cubes
            .iter()
            .filter(|c| cube_covers(c, row, nvars))
            .count()
            % 2
            == 1
    }

    fn assert_xor_equivalent(before: &[Cube], after: &[Cube], nvars: u32) {
        for row in 0..(1u32 << nvars) {
            assert_eq!(
                xor_of_cubes(before, row, nvars),
                xor_of_cubes(after, row, nvars),
                "row {} mismatched",
                row
            );
        }
    }
}
