//! Dual-invocation engine.
//!
//! Runs one operation with one set of arguments against both containers,
//! judges the results with [`EquivalenceOracle`], then checks that both
//! containers still hold the same contents.

use serde::Serialize;

use crate::fault::{ListFault, guarded};
use crate::list::{Element, ListContract};
use crate::operation::{Arg, Operation, Outcome, ReturnShape};
use crate::oracle::{Divergence, EquivalenceOracle};

/// Result of one engine step.
///
/// Both checks always run; `divergence` carries the value finding when
/// there is one, otherwise the structural one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepVerdict {
    /// The operation was called; false when a precondition stopped the step.
    pub invoked: bool,
    /// Return values (or fault kinds) were equivalent.
    pub returned_same: bool,
    /// Contents were structurally equal after the call.
    pub state_same: bool,
    pub divergence: Option<Divergence>,
    /// Structural finding recorded alongside a value divergence.
    pub state_divergence: Option<Divergence>,
}

impl StepVerdict {
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.returned_same && self.state_same
    }

    /// Verdict for a step that failed before the operation ran.
    #[must_use]
    pub const fn precondition(divergence: Divergence) -> Self {
        Self {
            invoked: false,
            returned_same: false,
            state_same: false,
            divergence: Some(divergence),
            state_divergence: None,
        }
    }
}

/// Invoke `operation` with `args` on both containers and judge the step.
pub fn invoke(
    operation: &Operation,
    args: &[Arg],
    reference: &mut dyn ListContract,
    candidate: &mut dyn ListContract,
) -> StepVerdict {
    let values = compare_results(operation, args, reference, candidate);
    let state = compare_state(reference, candidate);

    let returned_same = values.is_ok();
    let state_same = state.is_ok();
    match (values, state) {
        (Ok(()), Ok(())) => StepVerdict {
            invoked: true,
            returned_same,
            state_same,
            divergence: None,
            state_divergence: None,
        },
        (Ok(()), Err(state)) => StepVerdict {
            invoked: true,
            returned_same,
            state_same,
            divergence: Some(state),
            state_divergence: None,
        },
        (Err(value), state) => StepVerdict {
            invoked: true,
            returned_same,
            state_same,
            divergence: Some(value),
            state_divergence: state.err(),
        },
    }
}

fn call<'a>(
    operation: &Operation,
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    guarded(|| (operation.thunk)(list, args))
}

fn compare_results(
    operation: &Operation,
    args: &[Arg],
    reference: &mut dyn ListContract,
    candidate: &mut dyn ListContract,
) -> Result<(), Divergence> {
    let expected = call(operation, reference, args);
    let actual = call(operation, candidate, args);

    match (expected, actual) {
        (Ok(expected), Ok(actual)) => compare_outcomes(operation.shape, expected, actual),
        (Err(expected), Err(actual)) if EquivalenceOracle::same_fault(&expected, &actual) => {
            Ok(())
        }
        (Err(expected), actual) => Err(Divergence::FaultMismatch {
            reference: expected,
            candidate: actual.err(),
        }),
        (Ok(_), Err(actual)) => Err(Divergence::CandidateFault(actual)),
    }
}

/// Sequences are consumed here, so container code still runs; a fault is
/// charged to the side whose iterator raised it.
fn compare_outcomes(
    shape: ReturnShape,
    expected: Outcome<'_>,
    actual: Outcome<'_>,
) -> Result<(), Divergence> {
    match (expected, actual) {
        (Outcome::Sequence(reference), Outcome::Sequence(candidate))
            if shape == ReturnShape::Sequence =>
        {
            let mut reference = GuardedIter::new(reference);
            let mut candidate = GuardedIter::new(candidate);
            let verdict = EquivalenceOracle::compare_sequences(&mut reference, &mut candidate);
            if let Some(fault) = reference.fault {
                return Err(Divergence::ReferenceFault(fault));
            }
            if let Some(fault) = candidate.fault {
                return Err(Divergence::CandidateFault(fault));
            }
            verdict
        }
        (expected, actual) => EquivalenceOracle::compare(shape, expected, actual),
    }
}

/// Iterator that stops at the first panic and keeps it as a fault.
struct GuardedIter<'a> {
    inner: Box<dyn Iterator<Item = Element> + 'a>,
    fault: Option<ListFault>,
}

impl<'a> GuardedIter<'a> {
    fn new(inner: Box<dyn Iterator<Item = Element> + 'a>) -> Self {
        Self { inner, fault: None }
    }
}

impl Iterator for GuardedIter<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.fault.is_some() {
            return None;
        }
        let inner = &mut self.inner;
        match guarded(|| Ok(inner.next())) {
            Ok(next) => next,
            Err(fault) => {
                self.fault = Some(fault);
                None
            }
        }
    }
}

fn snapshot(list: &dyn ListContract) -> Result<Vec<Element>, ListFault> {
    guarded(|| Ok(list.iter().collect()))
}

fn compare_state(
    reference: &dyn ListContract,
    candidate: &dyn ListContract,
) -> Result<(), Divergence> {
    let expected = snapshot(reference).map_err(Divergence::ReferenceFault)?;
    let actual = snapshot(candidate).map_err(Divergence::CandidateFault)?;
    EquivalenceOracle::structural(&expected, &actual)
}
