//! Abrupt-termination notice.
//!
//! [`AbortNotice`] publishes the seed of the run in progress for as long as
//! the run lasts. Two paths report it when a run does not conclude normally:
//!
//! - dropping the guard while the thread unwinds prints `Aborting test <seed>`;
//! - an interrupt handler (installed by the binary, running on its own thread)
//!   calls [`announce_interrupt`], which prints the same line for the seed
//!   that is active at that moment.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Process-wide slot holding the seed of the run in progress.
#[derive(Debug)]
struct SeedSlot {
    seed: Mutex<Option<u64>>,
}

impl SeedSlot {
    const fn new() -> Self {
        Self {
            seed: Mutex::new(None),
        }
    }

    fn get(&self) -> Option<u64> {
        *self.seed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, seed: Option<u64>) -> Option<u64> {
        let mut slot = self.seed.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, seed)
    }

    fn announce(&self, out: &mut dyn Write) -> Option<u64> {
        let seed = self.get()?;
        tracing::warn!(seed, "run interrupted");
        // Best effort; the process is on its way out.
        let _ = writeln!(out, "Aborting test {seed}");
        let _ = out.flush();
        Some(seed)
    }
}

static ACTIVE: SeedSlot = SeedSlot::new();

/// Scoped registration of the seed of the run in progress.
#[derive(Debug)]
#[must_use = "the notice is removed when the guard is dropped"]
pub struct AbortNotice {
    slot: &'static SeedSlot,
    seed: u64,
    previous: Option<u64>,
}

impl AbortNotice {
    pub fn install(seed: u64) -> Self {
        Self::install_in(&ACTIVE, seed)
    }

    fn install_in(slot: &'static SeedSlot, seed: u64) -> Self {
        let previous = slot.replace(Some(seed));
        Self {
            slot,
            seed,
            previous,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Drop for AbortNotice {
    fn drop(&mut self) {
        self.slot.replace(self.previous);
        if std::thread::panicking() {
            tracing::warn!(seed = self.seed, "run aborted");
            // Never panic while already unwinding.
            let _ = writeln!(std::io::stderr(), "Aborting test {}", self.seed);
        }
    }
}

/// Seed of the run in progress, if any.
#[must_use]
pub fn active_seed() -> Option<u64> {
    ACTIVE.get()
}

/// Write `Aborting test <seed>` to `out` when a run is in progress.
///
/// Meant for interrupt handlers. Returns the announced seed.
pub fn announce_interrupt(out: &mut dyn Write) -> Option<u64> {
    ACTIVE.announce(out)
}
