//! listdiff-core library.
//!
//! Differential testing of list containers: a candidate [`ListContract`]
//! implementation is driven through every registered operation alongside a
//! trusted reference, with randomized but seed-reproducible arguments, and
//! any disagreement in results, fault kinds, or post-call contents is
//! reported as a [`Divergence`].
//!
//! ```no_run
//! use listdiff_core::{ArrayList, Session};
//!
//! let mut session = Session::with_supplier(ArrayList::new);
//! let report = session.run_tests_with_seed(42)?;
//! assert!(report.succeeded());
//! # Ok::<(), listdiff_core::SessionError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` types for library errors, `anyhow::Result` for
//!   config loading and campaigns.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod abort;
pub mod campaign;
pub mod config;
pub mod containers;
pub mod engine;
pub mod error;
pub mod fault;
pub mod list;
pub mod observer;
pub mod operation;
pub mod oracle;
pub mod rng;
pub mod session;
pub mod synth;

pub use campaign::{CampaignReport, SeedFailure, run_campaign, seed_range};
pub use config::{HarnessConfig, load_config};
pub use containers::{ArrayList, VecList};
pub use engine::{StepVerdict, invoke};
pub use error::{ErrorCode, SessionError};
pub use fault::{FaultKind, ListFault};
pub use list::{Cursor, Element, ListContract};
pub use observer::{EventLog, RunEvent, RunObserver};
pub use operation::{
    Arg, LIST_OPERATIONS, Operation, OperationId, Outcome, ParamKind, ReturnShape, Value,
    find_operation,
};
pub use oracle::{Divergence, EquivalenceOracle};
pub use rng::DeterministicRng;
pub use session::{Diagnostic, RunReport, Session, SessionState};
