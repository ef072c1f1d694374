//! # xmg-synth
//!
//! Exact and heuristic logic synthesis for majority-XOR graphs (XMGs) and
//! reversible circuits:
//!
//! - **[`tt`]** — fixed-width truth tables and cubes (component A)
//! - **[`bdd`]** — reduced ordered binary decision diagrams (component B)
//! - **[`graph`]** — and-inverter graphs and majority-XOR graphs, the
//!   structural substrate [`cuts`] and [`exact_xmg`] build on
//! - **[`cuts`]** — k-feasible structural cut enumeration (component C)
//! - **[`hashing`]** — NPN-canonical functional hashing (component D)
//! - **[`exact_xmg`]** — exact XMG synthesis via iterative deepening over a
//!   SAT backend (component E)
//! - **[`sat`]** — the incremental CNF SAT solver [`exact_xmg`] and [`tbs`]
//!   drive
//! - **[`esop`]** — ESOP covers and EXORLINK minimization (component F)
//! - **[`reversible`]** — the reversible-circuit data model shared by the
//!   LUT, transformation-based, and LNN passes
//! - **[`lut_synth`]** — LUT-based reversible synthesis (component G)
//! - **[`tbs`]** — symbolic transformation-based synthesis (component H)
//! - **[`lnn`]** — linear nearest-neighbor window/global reordering
//!   (component I)
//! - **[`io`]** — BENCH/PLA/Verilog/YIG readers and SMT-LIB2/BENCH/Verilog
//!   writers
//! - **[`error`]** — the shared error taxonomy every module above returns
//! - **[`stats`]** — progress reporting and run statistics
//!
//! ## Example
//!
//! ```
//! use xmg_synth::tt::TruthTable;
//! use xmg_synth::exact_xmg::{self, ExactSynthConfig};
//! use xmg_synth::stats::Stats;
//!
//! // 3-variable majority.
//! let target = TruthTable::from_hex("e8", 3).unwrap();
//! let mut stats = Stats::default();
//! let result = exact_xmg::synthesize(&target, &ExactSynthConfig::default(), &mut stats);
//! assert!(result.is_ok());
//! ```

pub mod bdd;
pub mod cuts;
pub mod error;
pub mod esop;
pub mod exact_xmg;
pub mod graph;
pub mod hashing;
pub mod io;
pub mod lnn;
pub mod lut_synth;
pub mod reversible;
pub mod sat;
pub mod stats;
pub mod tbs;
pub mod tt;
