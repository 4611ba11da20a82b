//! Failures raised by list containers.
//!
//! A [`ListFault`] is the Rust rendering of a thrown failure: containers
//! return it from fallible operations, and the harness converts panics into
//! [`ListFault::Panicked`] so that a crashing candidate is reported instead of
//! tearing down the run.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure raised by a container operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ListFault {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("no such element")]
    NoSuchElement,
    #[error("illegal state: {0}")]
    IllegalState(String),
    #[error("container panicked: {0}")]
    Panicked(String),
}

/// Fault category, compared by the oracle when both sides fail.
///
/// Messages never take part in equivalence, only the kind does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    IndexOutOfBounds,
    IllegalArgument,
    Unsupported,
    NoSuchElement,
    IllegalState,
    Panicked,
}

impl FaultKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IndexOutOfBounds => "IndexOutOfBounds",
            Self::IllegalArgument => "IllegalArgument",
            Self::Unsupported => "Unsupported",
            Self::NoSuchElement => "NoSuchElement",
            Self::IllegalState => "IllegalState",
            Self::Panicked => "Panicked",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ListFault {
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::IndexOutOfBounds { .. } => FaultKind::IndexOutOfBounds,
            Self::IllegalArgument(_) => FaultKind::IllegalArgument,
            Self::Unsupported(_) => FaultKind::Unsupported,
            Self::NoSuchElement => FaultKind::NoSuchElement,
            Self::IllegalState(_) => FaultKind::IllegalState,
            Self::Panicked(_) => FaultKind::Panicked,
        }
    }

    /// Bounds check shared by the shipped containers.
    ///
    /// # Errors
    ///
    /// Returns [`ListFault::IndexOutOfBounds`] when `index >= len`.
    pub const fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, len })
        }
    }

    /// Like [`check_index`](Self::check_index) but admits `index == len`
    /// (insertion positions).
    ///
    /// # Errors
    ///
    /// Returns [`ListFault::IndexOutOfBounds`] when `index > len`.
    pub const fn check_position(index: usize, len: usize) -> Result<(), Self> {
        if index <= len {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, len })
        }
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked(message)
    }
}

/// Run a container call, converting a panic into [`ListFault::Panicked`].
///
/// # Errors
///
/// Returns the call's own fault, or `Panicked` if it unwound.
pub fn guarded<T>(call: impl FnOnce() -> Result<T, ListFault>) -> Result<T, ListFault> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(ListFault::from_panic(payload.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_ignores_message() {
        let a = ListFault::IllegalArgument("from > to".into());
        let b = ListFault::IllegalArgument("something else".into());
        assert_eq!(a.kind(), b.kind());
        assert_ne!(a, b);
    }

    #[test]
    fn index_checks() {
        assert!(ListFault::check_index(2, 3).is_ok());
        assert_eq!(
            ListFault::check_index(3, 3),
            Err(ListFault::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert!(ListFault::check_position(3, 3).is_ok());
        assert!(ListFault::check_position(4, 3).is_err());
    }

    #[test]
    fn guarded_passes_results_through() {
        assert_eq!(guarded(|| Ok::<_, ListFault>(5)), Ok(5));
        assert_eq!(
            guarded(|| Err::<u8, _>(ListFault::NoSuchElement)),
            Err(ListFault::NoSuchElement)
        );
    }

    #[test]
    fn guarded_converts_panics() {
        let result: Result<(), ListFault> = guarded(|| panic!("boom"));
        assert_eq!(result, Err(ListFault::Panicked("boom".into())));

        let owned: Result<(), ListFault> = guarded(|| panic!("{} {}", "owned", 7));
        assert_eq!(owned, Err(ListFault::Panicked("owned 7".into())));
    }

    #[test]
    fn display_is_readable() {
        let fault = ListFault::IndexOutOfBounds { index: 9, len: 4 };
        assert_eq!(fault.to_string(), "index 9 out of bounds for length 4");
        assert_eq!(FaultKind::NoSuchElement.to_string(), "NoSuchElement");
    }
}
