use std::fmt;

use thiserror::Error;

/// Machine-readable codes for every finding and misuse the harness reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SizeDesync,
    EmptySeeding,
    UnsupportedParameter,
    ShapeMismatch,
    ValueMismatch,
    ArrayMismatch,
    SequenceMismatch,
    FaultMismatch,
    CandidateFault,
    ReferenceFault,
    StateMismatch,
    FailedWithoutSupplier,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SizeDesync => "E1001",
            Self::EmptySeeding => "E1002",
            Self::UnsupportedParameter => "E1003",
            Self::ShapeMismatch => "E1004",
            Self::ValueMismatch => "E2001",
            Self::ArrayMismatch => "E2002",
            Self::SequenceMismatch => "E2003",
            Self::FaultMismatch => "E2004",
            Self::CandidateFault => "E2005",
            Self::ReferenceFault => "E2006",
            Self::StateMismatch => "E2007",
            Self::FailedWithoutSupplier => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SizeDesync => "Container sizes desynced",
            Self::EmptySeeding => "Seeding produced empty containers",
            Self::UnsupportedParameter => "Unsupported parameter kind",
            Self::ShapeMismatch => "Result shape differs from declaration",
            Self::ValueMismatch => "Returned values differ",
            Self::ArrayMismatch => "Returned arrays differ",
            Self::SequenceMismatch => "Returned sequences differ",
            Self::FaultMismatch => "Fault kinds differ",
            Self::CandidateFault => "Candidate faulted",
            Self::ReferenceFault => "Reference container faulted",
            Self::StateMismatch => "Post-call contents differ",
            Self::FailedWithoutSupplier => "Failed session cannot be re-run",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::SizeDesync => Some("Check the candidate's size accounting on add/remove paths."),
            Self::EmptySeeding => Some("Check that add() stores elements and size() reports them."),
            Self::UnsupportedParameter => {
                Some("Teach the argument synthesizer the new kind or drop the registry row.")
            }
            Self::ShapeMismatch => Some("Fix the registry row so its shape matches its thunk."),
            Self::FailedWithoutSupplier => {
                Some("Construct the session with a candidate supplier to allow re-runs.")
            }
            Self::ValueMismatch
            | Self::ArrayMismatch
            | Self::SequenceMismatch
            | Self::FaultMismatch
            | Self::CandidateFault
            | Self::ReferenceFault
            | Self::StateMismatch => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Caller misuse of a [`Session`](crate::Session).
///
/// This is the only condition raised to the caller instead of being
/// captured in a [`RunReport`](crate::RunReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session failed on seed {seed} and has no candidate supplier to rebuild from")]
    FailedWithoutSupplier { seed: u64 },
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::FailedWithoutSupplier { .. } => ErrorCode::FailedWithoutSupplier,
        }
    }
}
