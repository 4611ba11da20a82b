//! Session controller.
//!
//! A [`Session`] owns the reference and candidate containers, seeds them
//! identically, and walks the operation registry in declared order, stopping
//! at the first divergence.
//!
//! States: `Fresh -> Running -> {Succeeded, Failed}`. A failed session can
//! only run again when it was built with a candidate supplier; the rerun
//! rebuilds both containers from scratch.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::abort::AbortNotice;
use crate::config::HarnessConfig;
use crate::containers::VecList;
use crate::engine::{self, StepVerdict};
use crate::error::SessionError;
use crate::fault::guarded;
use crate::list::{Element, ListContract};
use crate::observer::{NoopObserver, RunObserver};
use crate::operation::{LIST_OPERATIONS, Operation, OperationId};
use crate::oracle::Divergence;
use crate::rng::{DeterministicRng, random_seed};
use crate::synth::synthesize_all;

/// Zero-argument container factory.
pub type Supplier = Box<dyn FnMut() -> Box<dyn ListContract>>;

/// Lifecycle of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Fresh,
    Running,
    Succeeded,
    Failed,
}

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Stable `E####` code of `divergence`.
    pub code: &'static str,
    /// One-line summary of `code`.
    pub summary: &'static str,
    /// Where to look first, for codes with a known culprit.
    pub hint: Option<&'static str>,
    pub divergence: Divergence,
    /// Broken harness precondition rather than a value or state finding.
    pub harness_fault: bool,
    pub returned_same: bool,
    pub state_same: bool,
    /// Structural finding recorded alongside a value divergence.
    pub state_divergence: Option<Divergence>,
}

impl Diagnostic {
    fn from_verdict(verdict: StepVerdict) -> Option<Self> {
        let divergence = verdict.divergence?;
        let code = divergence.code();
        Some(Self {
            code: code.code(),
            summary: code.message(),
            hint: code.hint(),
            harness_fault: divergence.is_harness_fault(),
            divergence,
            returned_same: verdict.returned_same,
            state_same: verdict.state_same,
            state_divergence: verdict.state_divergence,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.harness_fault {
            write!(f, "[{}] harness precondition violated: {}", self.code, self.divergence)?;
        } else {
            write!(f, "[{}] {}", self.code, self.divergence)?;
        }
        if let Some(state) = &self.state_divergence {
            write!(f, "; additionally {state}")?;
        }
        Ok(())
    }
}

/// Snapshot of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub seed: u64,
    /// Final reference contents.
    pub reference: Vec<Element>,
    /// Final candidate contents.
    pub candidate: Vec<Element>,
    /// Number of operations attempted, including the failing one.
    pub steps: usize,
    pub failed_on: Option<OperationId>,
    pub diagnostic: Option<Diagnostic>,
}

impl RunReport {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Differential test session over one reference/candidate pair.
pub struct Session {
    reference: Box<dyn ListContract>,
    reference_supplier: Supplier,
    candidate: Box<dyn ListContract>,
    supplier: Option<Supplier>,
    operations: &'static [Operation],
    config: HarnessConfig,
    observer: Box<dyn RunObserver>,
    rng: DeterministicRng,
    seed: u64,
    state: SessionState,
}

impl Session {
    /// Session over a ready-made candidate. A failed run cannot be repeated.
    #[must_use]
    pub fn new(candidate: impl ListContract + 'static) -> Self {
        Self::build(Box::new(candidate), None)
    }

    /// Session over candidates produced by `factory`, rebuilt after failures.
    #[must_use]
    pub fn with_supplier<L, F>(mut factory: F) -> Self
    where
        L: ListContract + 'static,
        F: FnMut() -> L + 'static,
    {
        let candidate = Box::new(factory());
        let supplier: Supplier =
            Box::new(move || -> Box<dyn ListContract> { Box::new(factory()) });
        Self::build(candidate, Some(supplier))
    }

    fn build(candidate: Box<dyn ListContract>, supplier: Option<Supplier>) -> Self {
        let mut reference_supplier: Supplier =
            Box::new(|| -> Box<dyn ListContract> { Box::new(VecList::new()) });
        Self {
            reference: reference_supplier(),
            reference_supplier,
            candidate,
            supplier,
            operations: LIST_OPERATIONS,
            config: HarnessConfig::default(),
            observer: Box::new(NoopObserver),
            rng: DeterministicRng::new(0),
            seed: 0,
            state: SessionState::Fresh,
        }
    }

    /// Substitute the trusted reference container.
    #[must_use]
    pub fn with_reference_supplier<L, F>(mut self, mut factory: F) -> Self
    where
        L: ListContract + 'static,
        F: FnMut() -> L + 'static,
    {
        self.reference = Box::new(factory());
        self.reference_supplier =
            Box::new(move || -> Box<dyn ListContract> { Box::new(factory()) });
        self
    }

    /// Substitute the operation registry.
    #[must_use]
    pub fn with_operations(mut self, operations: &'static [Operation]) -> Self {
        self.operations = operations;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl RunObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    #[must_use]
    pub const fn has_failed(&self) -> bool {
        matches!(self.state, SessionState::Failed)
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Seed of the current or most recent run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every operation with a freshly drawn seed.
    ///
    /// # Errors
    ///
    /// See [`run_tests_with_seed`](Self::run_tests_with_seed).
    pub fn run_tests(&mut self) -> Result<RunReport, SessionError> {
        self.run_tests_with_seed(random_seed())
    }

    /// Run every operation, deriving all content and arguments from `seed`.
    ///
    /// Divergences are reported in the returned [`RunReport`].
    ///
    /// # Errors
    ///
    /// [`SessionError::FailedWithoutSupplier`] when the session already failed
    /// and has no supplier to rebuild the candidate from.
    pub fn run_tests_with_seed(&mut self, seed: u64) -> Result<RunReport, SessionError> {
        if self.has_failed() {
            self.rebuild()?;
        }

        self.seed = seed;
        self.rng = DeterministicRng::new(seed);
        self.state = SessionState::Running;
        let _notice = AbortNotice::install(seed);

        info!(seed, operations = self.operations.len(), "starting run");
        self.observer.run_started(seed);

        let mut steps = 0;
        let mut failure = None;
        for operation in self.operations {
            steps += 1;
            let id = operation.id();
            self.observer.step_started(id);
            let verdict = self.step(operation);
            self.observer.step_finished(id, &verdict);
            if !verdict.ok() {
                failure = Some((id, verdict));
                break;
            }
        }

        let (failed_on, diagnostic) = match failure {
            Some((id, verdict)) => (Some(id), Diagnostic::from_verdict(verdict)),
            None => (None, None),
        };

        let report = RunReport {
            seed,
            reference: contents(self.reference.as_ref()),
            candidate: contents(self.candidate.as_ref()),
            steps,
            failed_on,
            diagnostic,
        };

        match (&report.failed_on, &report.diagnostic) {
            (Some(id), Some(diagnostic)) => {
                warn!(seed, operation = %id, code = diagnostic.code, "run diverged: {diagnostic}");
                self.state = SessionState::Failed;
            }
            (Some(id), None) => {
                warn!(seed, operation = %id, "step failed without a diagnostic");
                self.state = SessionState::Failed;
            }
            _ => {
                info!(seed, steps, "run succeeded");
                self.state = SessionState::Succeeded;
            }
        }

        self.observer.run_finished(&report);
        Ok(report)
    }

    fn rebuild(&mut self) -> Result<(), SessionError> {
        let Some(supplier) = self.supplier.as_mut() else {
            return Err(SessionError::FailedWithoutSupplier { seed: self.seed });
        };
        self.candidate = supplier();
        self.reference = (self.reference_supplier)();
        self.state = SessionState::Fresh;
        debug!(seed = self.seed, "rebuilt containers after failed run");
        Ok(())
    }

    fn step(&mut self, operation: &Operation) -> StepVerdict {
        match self.prepare() {
            Ok(size) => match synthesize_all(operation.params, size, &mut self.rng, &self.config)
            {
                Ok(args) => {
                    debug!(operation = %operation.id(), size, "invoking");
                    engine::invoke(
                        operation,
                        &args,
                        self.reference.as_mut(),
                        self.candidate.as_mut(),
                    )
                }
                Err(divergence) => StepVerdict::precondition(divergence),
            },
            Err(divergence) => StepVerdict::precondition(divergence),
        }
    }

    /// Seed empty containers, then check size parity and non-emptiness.
    fn prepare(&mut self) -> Result<usize, Divergence> {
        let (mut reference, mut candidate) = self.sizes()?;
        if reference == 0 && candidate == 0 {
            self.seed_contents()?;
            (reference, candidate) = self.sizes()?;
        }
        if reference != candidate {
            return Err(Divergence::SizeDesync {
                reference,
                candidate,
            });
        }
        if reference == 0 {
            return Err(Divergence::EmptySeeding);
        }
        Ok(reference)
    }

    fn sizes(&self) -> Result<(usize, usize), Divergence> {
        let reference =
            guarded(|| Ok(self.reference.size())).map_err(Divergence::ReferenceFault)?;
        let candidate =
            guarded(|| Ok(self.candidate.size())).map_err(Divergence::CandidateFault)?;
        Ok((reference, candidate))
    }

    fn seed_contents(&mut self) -> Result<(), Divergence> {
        let len = 1 + self.rng.next_index(self.config.max_initial_len);
        let values: Vec<Element> = (0..len).map(|_| self.rng.next_i32()).collect();
        debug!(len, "seeding containers");

        let reference = self.reference.as_mut();
        guarded(|| {
            for value in &values {
                reference.add(*value);
            }
            Ok(())
        })
        .map_err(Divergence::ReferenceFault)?;

        let candidate = self.candidate.as_mut();
        guarded(|| {
            for value in &values {
                candidate.add(*value);
            }
            Ok(())
        })
        .map_err(Divergence::CandidateFault)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("seed", &self.seed)
            .field("state", &self.state)
            .field("operations", &self.operations.len())
            .field("rebuildable", &self.supplier.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn contents(list: &dyn ListContract) -> Vec<Element> {
    guarded(|| Ok(list.iter().collect())).unwrap_or_else(|fault| {
        warn!(%fault, "could not read final contents");
        Vec::new()
    })
}
