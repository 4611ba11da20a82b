//! Campaign runner for multi-seed sessions.
//!
//! Executes one run per seed on the same session, collecting pass/fail
//! results and identifying the first failing seed for replay.

use std::ops::RangeInclusive;

use anyhow::{Result, anyhow, bail};
use serde::Serialize;
use tracing::info;

use crate::operation::OperationId;
use crate::session::Session;

/// Failure details for a single seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedFailure {
    /// The seed that failed.
    pub seed: u64,
    /// Operation that diverged.
    pub operation: Option<OperationId>,
    /// Stable `E####` code of the divergence.
    pub code: Option<&'static str>,
    /// One-line summary of the code.
    pub summary: Option<&'static str>,
    /// Where to look first, when the code has a known culprit.
    pub hint: Option<&'static str>,
    /// Human-readable diagnostic.
    pub detail: String,
}

/// Aggregate report produced by a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignReport {
    /// Total seeds executed.
    pub seeds_run: usize,
    /// Seeds whose run succeeded.
    pub seeds_passed: usize,
    /// First seed that failed (for replay with `--seed`).
    pub first_failure: Option<u64>,
    /// All seed failures with diagnostic details.
    pub failures: Vec<SeedFailure>,
}

impl CampaignReport {
    /// True if every seed passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// `runs` consecutive seeds starting at `first`, clamped at `u64::MAX`.
///
/// Zero runs yields an empty range.
#[must_use]
pub const fn seed_range(first: u64, runs: u64) -> RangeInclusive<u64> {
    match runs.checked_sub(1) {
        Some(extra) => RangeInclusive::new(first, first.saturating_add(extra)),
        None => RangeInclusive::new(1, 0),
    }
}

/// Run `session` once per seed in `seeds`.
///
/// Stops after the first failing seed when the session's config asks for it.
///
/// # Errors
///
/// Returns an error if the range is empty, or if a failed session has to be
/// re-run but was built without a candidate supplier.
pub fn run_campaign(
    session: &mut Session,
    seeds: RangeInclusive<u64>,
) -> Result<CampaignReport> {
    if seeds.is_empty() {
        bail!("seed range must not be empty");
    }
    let stop_on_failure = session.config().stop_on_failure;

    let mut seeds_run = 0_usize;
    let mut seeds_passed = 0_usize;
    let mut first_failure: Option<u64> = None;
    let mut failures = Vec::new();

    for seed in seeds {
        seeds_run += 1;
        let report = session.run_tests_with_seed(seed).map_err(|err| {
            let code = err.code();
            let context = match code.hint() {
                Some(hint) => format!("[{code}] {}: seed {seed} ({hint})", code.message()),
                None => format!("[{code}] {}: seed {seed}", code.message()),
            };
            anyhow!(err).context(context)
        })?;

        if report.succeeded() {
            seeds_passed += 1;
            continue;
        }

        if first_failure.is_none() {
            first_failure = Some(seed);
        }
        failures.push(SeedFailure {
            seed,
            operation: report.failed_on,
            code: report.diagnostic.as_ref().map(|d| d.code),
            summary: report.diagnostic.as_ref().map(|d| d.summary),
            hint: report.diagnostic.as_ref().and_then(|d| d.hint),
            detail: report
                .diagnostic
                .as_ref()
                .map_or_else(|| "step failed".to_string(), ToString::to_string),
        });
        if stop_on_failure {
            break;
        }
    }

    info!(seeds_run, seeds_passed, failures = failures.len(), "campaign finished");
    Ok(CampaignReport {
        seeds_run,
        seeds_passed,
        first_failure,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::containers::{ArrayList, VecList};
    use crate::fault::ListFault;
    use crate::list::{Element, ListContract};

    fn small(stop_on_failure: bool) -> HarnessConfig {
        HarnessConfig {
            max_initial_len: 32,
            max_array_len: 48,
            runs: 4,
            stop_on_failure,
        }
    }

    /// Reports one element too many whenever it is non-empty.
    #[derive(Default)]
    struct Inflated(VecList);

    impl ListContract for Inflated {
        fn size(&self) -> usize {
            let len = self.0.size();
            if len == 0 { 0 } else { len + 1 }
        }
        fn contains(&self, value: Element) -> bool {
            self.0.contains(value)
        }
        fn iter(&self) -> Box<dyn Iterator<Item = Element> + '_> {
            self.0.iter()
        }
        fn to_array(&self) -> Vec<Element> {
            self.0.to_array()
        }
        fn to_array_into(&self, dest: Vec<Option<Element>>) -> Vec<Option<Element>> {
            self.0.to_array_into(dest)
        }
        fn add(&mut self, value: Element) -> bool {
            self.0.add(value)
        }
        fn remove_element(&mut self, value: Element) -> bool {
            self.0.remove_element(value)
        }
        fn add_all(&mut self, other: &[Element]) -> bool {
            self.0.add_all(other)
        }
        fn add_all_at(&mut self, index: usize, other: &[Element]) -> Result<bool, ListFault> {
            self.0.add_all_at(index, other)
        }
        fn remove_all(&mut self, other: &[Element]) -> bool {
            self.0.remove_all(other)
        }
        fn retain_all(&mut self, other: &[Element]) -> bool {
            self.0.retain_all(other)
        }
        fn clear(&mut self) {
            self.0.clear();
        }
        fn get(&self, index: usize) -> Result<Element, ListFault> {
            self.0.get(index)
        }
        fn set(&mut self, index: usize, value: Element) -> Result<Element, ListFault> {
            self.0.set(index, value)
        }
        fn insert(&mut self, index: usize, value: Element) -> Result<(), ListFault> {
            self.0.insert(index, value)
        }
        fn remove_at(&mut self, index: usize) -> Result<Element, ListFault> {
            self.0.remove_at(index)
        }
        fn index_of(&self, value: Element) -> Option<usize> {
            self.0.index_of(value)
        }
        fn last_index_of(&self, value: Element) -> Option<usize> {
            self.0.last_index_of(value)
        }
        fn sub_list(&self, from: usize, to: usize) -> Result<Vec<Element>, ListFault> {
            self.0.sub_list(from, to)
        }
    }

    #[test]
    fn seed_range_is_inclusive_and_clamped() {
        assert_eq!(seed_range(5, 3), 5..=7);
        assert_eq!(seed_range(u64::MAX, 1), u64::MAX..=u64::MAX);
        assert_eq!(seed_range(u64::MAX - 1, 3).count(), 2);
        assert!(seed_range(9, 0).is_empty());
    }

    #[test]
    fn empty_range_rejected() {
        let mut session = Session::new(ArrayList::new());
        assert!(run_campaign(&mut session, seed_range(3, 0)).is_err());
    }

    #[test]
    fn max_seed_is_runnable() {
        let mut session = Session::new(ArrayList::new()).with_config(small(true));
        let report = run_campaign(&mut session, seed_range(u64::MAX, 1)).expect("campaign");
        assert_eq!(report.seeds_run, 1);
        assert!(report.all_passed(), "{report:?}");

        let report =
            run_campaign(&mut session, seed_range(u64::MAX - 2, 5)).expect("campaign");
        assert_eq!(report.seeds_run, 3);
    }

    #[test]
    fn all_seeds_pass_with_correct_candidate() {
        let mut session = Session::new(ArrayList::new()).with_config(small(true));
        let report = run_campaign(&mut session, seed_range(100, 4)).expect("campaign");
        assert!(report.all_passed(), "{report:?}");
        assert_eq!(report.seeds_run, 4);
        assert_eq!(report.seeds_passed, 4);
        assert_eq!(report.first_failure, None);
    }

    #[test]
    fn stops_at_first_failure() {
        let mut session = Session::with_supplier(Inflated::default).with_config(small(true));
        let report = run_campaign(&mut session, seed_range(0, 4)).expect("campaign");
        assert_eq!(report.seeds_run, 1);
        assert_eq!(report.first_failure, Some(0));
        assert_eq!(report.failures[0].code, Some("E1001"));
        assert_eq!(report.failures[0].summary, Some("Container sizes desynced"));
        assert!(
            report.failures[0]
                .hint
                .is_some_and(|hint| hint.contains("size accounting"))
        );
        assert_eq!(report.failures[0].operation.map(|op| op.name), Some("size"));
    }

    #[test]
    fn keeps_going_with_supplier() {
        let mut session = Session::with_supplier(Inflated::default).with_config(small(false));
        let report = run_campaign(&mut session, seed_range(0, 4)).expect("campaign");
        assert_eq!(report.seeds_run, 4);
        assert_eq!(report.failures.len(), 4);
        assert_eq!(report.seeds_passed, 0);
    }

    #[test]
    fn keeps_going_without_supplier_is_misuse() {
        let mut session = Session::new(Inflated::default()).with_config(small(false));
        let err = run_campaign(&mut session, seed_range(0, 2)).expect_err("misuse");
        let text = format!("{err:#}");
        assert!(text.contains("no candidate supplier"), "{text}");
        assert!(text.starts_with("[E3001] Failed session cannot be re-run: seed 1"), "{text}");
        assert!(text.contains("candidate supplier to allow re-runs"), "{text}");
    }
}
