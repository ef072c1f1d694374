//! Error taxonomy for the synthesis core
//!
//! Each error *source* gets its own plain enum with hand-written `Display`/`Error`
//! impls (no `thiserror`), mirroring §7 of the specification:
//!
//! - [`ParseError`] — malformed netlist/expression/PLA input
//! - [`BudgetExhaustion`] — an exact or bounded search ran out of budget
//! - [`InfeasibleMapping`] — the LUT-based pipeline could not synthesize within
//!   the ancilla budget and ESOP fallback was disabled
//! - [`InvalidInput`] — well-formed but semantically invalid arguments
//! - [`Internal`] — an assertion failure in the core (indicates a bug)
//!
//! [`SynthError`] composes all of the above the way the teacher's
//! `MinimizationError` composed `InstanceError`/`CubeError`/`io::Error`.

use std::fmt;
use std::io;

/// Malformed input to a parser (hex truth table, PLA, BENCH, Verilog subset, YIG,
/// or cube/cover text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `from_hex` encountered a non-hex-digit character.
    MalformedInput {
        /// Offending text.
        text: String,
    },
    /// An SOP specification mixed on-set and off-set rows inconsistently.
    InconsistentPolarity {
        /// The row that conflicted with previously seen rows.
        row: String,
    },
    /// A required header/directive is missing (e.g. PLA `.i`/`.o`).
    MissingHeader {
        /// Name of the missing directive.
        directive: String,
    },
    /// An opcode/gate kind is not recognised.
    UnknownGateKind {
        /// The unrecognised token.
        kind: String,
    },
    /// A signal name is referenced but never defined, even after topological
    /// resolution of forward references.
    UndefinedSignal {
        /// The undefined signal name.
        name: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedInput { text } => {
                write!(f, "malformed input: {:?}", text)
            }
            ParseError::InconsistentPolarity { row } => {
                write!(f, "row mixes on-set and off-set polarity: {:?}", row)
            }
            ParseError::MissingHeader { directive } => {
                write!(f, "missing required directive: {}", directive)
            }
            ParseError::UnknownGateKind { kind } => {
                write!(f, "unknown gate kind: {:?}", kind)
            }
            ParseError::UndefinedSignal { name } => {
                write!(f, "undefined signal: {:?}", name)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// A bounded search (exact XMG synthesis, SAT-based gate selection) exhausted
/// its budget before finding a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetExhaustion {
    /// The exact-synthesis iterative-deepening loop reached `max_depth`
    /// without a SAT result at any gate count.
    MaxDepthReached {
        /// Greatest gate count attempted.
        last_attempted: usize,
    },
    /// The SAT/SMT backend returned UNKNOWN because of a solver timeout.
    SolverTimeout {
        /// Gate count (or search parameter) in effect when the timeout fired.
        last_attempted: usize,
        /// Configured timeout, in seconds.
        timeout_secs: u64,
    },
}

impl BudgetExhaustion {
    /// The last attempted budget value, regardless of which variant fired.
    pub fn last_attempted(&self) -> usize {
        match self {
            BudgetExhaustion::MaxDepthReached { last_attempted } => *last_attempted,
            BudgetExhaustion::SolverTimeout { last_attempted, .. } => *last_attempted,
        }
    }
}

impl fmt::Display for BudgetExhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetExhaustion::MaxDepthReached { last_attempted } => write!(
                f,
                "no circuit found within budget (last attempted gate count: {})",
                last_attempted
            ),
            BudgetExhaustion::SolverTimeout {
                last_attempted,
                timeout_secs,
            } => write!(
                f,
                "solver timed out after {}s at gate count {}",
                timeout_secs, last_attempted
            ),
        }
    }
}

impl std::error::Error for BudgetExhaustion {}

/// The LUT-based reversible pipeline could not synthesize a LUT within the
/// available ancilla budget and ESOP fallback was disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleMapping {
    /// Width of the LUT that could not be mapped.
    pub lut_width: usize,
    /// Ancilla lines available at the time of failure.
    pub ancilla_budget: usize,
}

impl fmt::Display for InfeasibleMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot synthesize a {}-input LUT within an ancilla budget of {} lines",
            self.lut_width, self.ancilla_budget
        )
    }
}

impl std::error::Error for InfeasibleMapping {}

/// Well-formed but semantically invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// Cube width mismatch across an ESOP cover.
    CubeWidthMismatch { expected: usize, actual: usize },
    /// A gate operated on more than one non-constant control where only one
    /// is supported.
    MultipleNonConstantControls,
    /// A pass that requires MAJ/XOR-only nodes was given an unsupported gate
    /// tag.
    UnsupportedGateTag { tag: String },
    /// A circuit/cube/cover dimension did not match what the caller declared.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::CubeWidthMismatch { expected, actual } => write!(
                f,
                "cube width mismatch: expected {}, got {}",
                expected, actual
            ),
            InvalidInput::MultipleNonConstantControls => {
                write!(f, "gate has more than one non-constant control")
            }
            InvalidInput::UnsupportedGateTag { tag } => {
                write!(f, "unsupported gate tag: {:?}", tag)
            }
            InvalidInput::DimensionMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: expected {}, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// An assertion failure inside the core. Always indicates a bug, never bad
/// input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Internal {
    pub message: String,
}

impl fmt::Display for Internal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal error (this is a bug): {}", self.message)
    }
}

impl std::error::Error for Internal {}

/// Top-level error composing every source-level error this crate can produce.
///
/// Propagation policy (§7): `ParseError`/`InvalidInput` are reported to the
/// caller without mutating any store; `BudgetExhaustion` is non-fatal and is
/// expected to be paired with a well-formed empty result; `InfeasibleMapping`
/// should be handled by falling back to ESOP-only synthesis before it is ever
/// escalated into a `SynthError`.
#[derive(Debug)]
pub enum SynthError {
    Parse(ParseError),
    Budget(BudgetExhaustion),
    Infeasible(InfeasibleMapping),
    Invalid(InvalidInput),
    Internal(Internal),
    Io(io::Error),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Parse(e) => write!(f, "parse error: {}", e),
            SynthError::Budget(e) => write!(f, "budget exhausted: {}", e),
            SynthError::Infeasible(e) => write!(f, "infeasible mapping: {}", e),
            SynthError::Invalid(e) => write!(f, "invalid input: {}", e),
            SynthError::Internal(e) => write!(f, "{}", e),
            SynthError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Parse(e) => Some(e),
            SynthError::Budget(e) => Some(e),
            SynthError::Infeasible(e) => Some(e),
            SynthError::Invalid(e) => Some(e),
            SynthError::Internal(e) => Some(e),
            SynthError::Io(e) => Some(e),
        }
    }
}

impl From<ParseError> for SynthError {
    fn from(err: ParseError) -> Self {
        SynthError::Parse(err)
    }
}

impl From<BudgetExhaustion> for SynthError {
    fn from(err: BudgetExhaustion) -> Self {
        SynthError::Budget(err)
    }
}

impl From<InfeasibleMapping> for SynthError {
    fn from(err: InfeasibleMapping) -> Self {
        SynthError::Infeasible(err)
    }
}

impl From<InvalidInput> for SynthError {
    fn from(err: InvalidInput) -> Self {
        SynthError::Invalid(err)
    }
}

impl From<Internal> for SynthError {
    fn from(err: Internal) -> Self {
        SynthError::Internal(err)
    }
}

impl From<io::Error> for SynthError {
    fn from(err: io::Error) -> Self {
        SynthError::Io(err)
    }
}
