use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::error::ErrorCode;
use crate::fault::ListFault;
use crate::list::Element;
use crate::operation::{Outcome, ReturnShape, Value};

// ── Divergence diagnostics ────────────────────────────────────────────────────

/// Which container a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Reference,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

/// A detected disagreement between reference and candidate.
///
/// The first four variants are harness precondition problems
/// ([`is_harness_fault`](Self::is_harness_fault)); the rest are findings
/// about the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum Divergence {
    #[error("sizes have become desynced (reference is {reference}, candidate is {candidate})")]
    SizeDesync { reference: usize, candidate: usize },

    #[error("seeding left both containers empty; either size() or add() is broken")]
    EmptySeeding,

    #[error("no argument generator for parameter kind `{kind}`")]
    UnsupportedParameter { kind: String },

    #[error(
        "operation declared {expected:?} results but returned {reference:?} and {candidate:?}"
    )]
    ShapeMismatch {
        expected: ReturnShape,
        reference: ReturnShape,
        candidate: ReturnShape,
    },

    #[error("returned different values. reference: {reference}; candidate: {candidate}")]
    ValueMismatch { reference: String, candidate: String },

    #[error(
        "returned different arrays: first difference at {position} \
         (reference length {reference_len}, candidate length {candidate_len})"
    )]
    ArrayMismatch {
        position: usize,
        reference_len: usize,
        candidate_len: usize,
    },

    #[error(
        "sequences contained differing values at position {position}: \
         reference {reference}, candidate {candidate}"
    )]
    SequenceValueMismatch {
        position: usize,
        reference: Element,
        candidate: Element,
    },

    #[error("sequences were different lengths: {shorter} ended after {position} elements")]
    SequenceLengthMismatch { position: usize, shorter: Side },

    #[error("reference raised `{reference}` but candidate {}", describe_candidate(.candidate))]
    FaultMismatch {
        reference: ListFault,
        candidate: Option<ListFault>,
    },

    #[error("candidate raised `{0}` where reference succeeded")]
    CandidateFault(ListFault),

    #[error("reference container failed: {0}")]
    ReferenceFault(ListFault),

    #[error(
        "reference is not equal to candidate after the call: first difference at {position} \
         (reference length {reference_len}, candidate length {candidate_len})"
    )]
    StateMismatch {
        position: usize,
        reference_len: usize,
        candidate_len: usize,
    },
}

#[allow(clippy::ref_option)]
fn describe_candidate(candidate: &Option<ListFault>) -> String {
    match candidate {
        Some(fault) => format!("raised `{fault}`"),
        None => "succeeded".to_string(),
    }
}

impl Divergence {
    /// Whether this reports a broken harness precondition rather than a
    /// value or state finding.
    #[must_use]
    pub const fn is_harness_fault(&self) -> bool {
        matches!(
            self,
            Self::SizeDesync { .. }
                | Self::EmptySeeding
                | Self::UnsupportedParameter { .. }
                | Self::ShapeMismatch { .. }
        )
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SizeDesync { .. } => ErrorCode::SizeDesync,
            Self::EmptySeeding => ErrorCode::EmptySeeding,
            Self::UnsupportedParameter { .. } => ErrorCode::UnsupportedParameter,
            Self::ShapeMismatch { .. } => ErrorCode::ShapeMismatch,
            Self::ValueMismatch { .. } => ErrorCode::ValueMismatch,
            Self::ArrayMismatch { .. } => ErrorCode::ArrayMismatch,
            Self::SequenceValueMismatch { .. } | Self::SequenceLengthMismatch { .. } => {
                ErrorCode::SequenceMismatch
            }
            Self::FaultMismatch { .. } => ErrorCode::FaultMismatch,
            Self::CandidateFault(_) => ErrorCode::CandidateFault,
            Self::ReferenceFault(_) => ErrorCode::ReferenceFault,
            Self::StateMismatch { .. } => ErrorCode::StateMismatch,
        }
    }
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Decides whether two invocations of the same operation were equivalent.
///
/// # Policy
///
/// - Faults are equivalent when their [`FaultKind`](crate::FaultKind)s match;
///   messages are ignored.
/// - `Value` results: absence must match, then equality.
/// - `Array` results: element-wise equality.
/// - `Sequence` results: consumed pairwise; values and lengths must match.
/// - `Opaque` results: never compared.
pub struct EquivalenceOracle;

impl EquivalenceOracle {
    #[must_use]
    pub fn same_fault(reference: &ListFault, candidate: &ListFault) -> bool {
        reference.kind() == candidate.kind()
    }

    /// Compare two outcomes under the operation's declared shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`Divergence`] found.
    pub fn compare(
        shape: ReturnShape,
        reference: Outcome<'_>,
        candidate: Outcome<'_>,
    ) -> Result<(), Divergence> {
        match (shape, reference, candidate) {
            (ReturnShape::Opaque, _, _) => Ok(()),
            (ReturnShape::Sequence, Outcome::Sequence(a), Outcome::Sequence(b)) => {
                Self::compare_sequences(a, b)
            }
            (ReturnShape::Array, Outcome::Array(a), Outcome::Array(b)) => {
                Self::compare_arrays(&a, &b)
            }
            (ReturnShape::Value, Outcome::Value(a), Outcome::Value(b)) => {
                Self::compare_values(&a, &b)
            }
            (ReturnShape::Void, Outcome::Void, Outcome::Void) => Ok(()),
            (expected, reference, candidate) => Err(Divergence::ShapeMismatch {
                expected,
                reference: reference.shape(),
                candidate: candidate.shape(),
            }),
        }
    }

    /// Consume two sequences in lock-step.
    ///
    /// # Errors
    ///
    /// First value mismatch, or a length mismatch naming the shorter side.
    pub fn compare_sequences(
        mut reference: impl Iterator<Item = Element>,
        mut candidate: impl Iterator<Item = Element>,
    ) -> Result<(), Divergence> {
        let mut position = 0;
        loop {
            match (reference.next(), candidate.next()) {
                (Some(a), Some(b)) if a == b => position += 1,
                (Some(a), Some(b)) => {
                    return Err(Divergence::SequenceValueMismatch {
                        position,
                        reference: a,
                        candidate: b,
                    });
                }
                (None, None) => return Ok(()),
                (Some(_), None) => {
                    return Err(Divergence::SequenceLengthMismatch {
                        position,
                        shorter: Side::Candidate,
                    });
                }
                (None, Some(_)) => {
                    return Err(Divergence::SequenceLengthMismatch {
                        position,
                        shorter: Side::Reference,
                    });
                }
            }
        }
    }

    /// # Errors
    ///
    /// [`Divergence::ArrayMismatch`] at the first differing slot.
    pub fn compare_arrays(
        reference: &[Option<Element>],
        candidate: &[Option<Element>],
    ) -> Result<(), Divergence> {
        match first_difference(reference, candidate) {
            None => Ok(()),
            Some(position) => Err(Divergence::ArrayMismatch {
                position,
                reference_len: reference.len(),
                candidate_len: candidate.len(),
            }),
        }
    }

    /// # Errors
    ///
    /// [`Divergence::ValueMismatch`], or `ArrayMismatch` for element lists.
    pub fn compare_values(reference: &Value, candidate: &Value) -> Result<(), Divergence> {
        if reference.is_absent() || candidate.is_absent() {
            return if reference.is_absent() && candidate.is_absent() {
                Ok(())
            } else {
                Err(value_mismatch(reference, candidate))
            };
        }

        match (reference, candidate) {
            (Value::Elements(a), Value::Elements(b)) => match first_difference(a, b) {
                None => Ok(()),
                Some(position) => Err(Divergence::ArrayMismatch {
                    position,
                    reference_len: a.len(),
                    candidate_len: b.len(),
                }),
            },
            (a, b) if a == b => Ok(()),
            (a, b) => Err(value_mismatch(a, b)),
        }
    }

    /// Post-call structural equality of the full contents, in order.
    ///
    /// # Errors
    ///
    /// [`Divergence::StateMismatch`] at the first differing position.
    pub fn structural(reference: &[Element], candidate: &[Element]) -> Result<(), Divergence> {
        match first_difference(reference, candidate) {
            None => Ok(()),
            Some(position) => Err(Divergence::StateMismatch {
                position,
                reference_len: reference.len(),
                candidate_len: candidate.len(),
            }),
        }
    }
}

fn value_mismatch(reference: &Value, candidate: &Value) -> Divergence {
    Divergence::ValueMismatch {
        reference: reference.to_string(),
        candidate: candidate.to_string(),
    }
}

/// Index of the first differing element, or the shorter length when one
/// slice is a prefix of the other.
fn first_difference<T: PartialEq>(a: &[T], b: &[T]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then_some(a.len().min(b.len())))
}
