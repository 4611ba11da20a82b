//! Progress events emitted by a [`Session`](crate::Session).
//!
//! The core never prints; presentation layers implement [`RunObserver`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::engine::StepVerdict;
use crate::operation::OperationId;
use crate::session::RunReport;

/// Receives progress callbacks during a run. Every method defaults to a no-op.
pub trait RunObserver {
    fn run_started(&mut self, _seed: u64) {}

    fn step_started(&mut self, _operation: OperationId) {}

    fn step_finished(&mut self, _operation: OperationId, _verdict: &StepVerdict) {}

    fn run_finished(&mut self, _report: &RunReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// A recorded progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        seed: u64,
    },
    StepStarted {
        operation: OperationId,
    },
    StepFinished {
        operation: OperationId,
        returned_same: bool,
        state_same: bool,
    },
    RunFinished {
        seed: u64,
        succeeded: bool,
    },
}

/// Shared, cloneable event recorder.
///
/// Hand one clone to the session and keep another to inspect afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<RunEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.borrow().clone()
    }

    /// Names of the operations that finished, in order.
    #[must_use]
    pub fn finished_operations(&self) -> Vec<&'static str> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RunEvent::StepFinished { operation, .. } => Some(operation.name),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: RunEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl RunObserver for EventLog {
    fn run_started(&mut self, seed: u64) {
        self.push(RunEvent::RunStarted { seed });
    }

    fn step_started(&mut self, operation: OperationId) {
        self.push(RunEvent::StepStarted { operation });
    }

    fn step_finished(&mut self, operation: OperationId, verdict: &StepVerdict) {
        self.push(RunEvent::StepFinished {
            operation,
            returned_same: verdict.returned_same,
            state_same: verdict.state_same,
        });
    }

    fn run_finished(&mut self, report: &RunReport) {
        self.push(RunEvent::RunFinished {
            seed: report.seed,
            succeeded: report.succeeded(),
        });
    }
}
