//! Per-operation progress lines.
//!
//! `size()..ok`, one line per operation. A failing line is followed by which
//! of the two checks failed and the diagnostic detail.

use std::io::{self, Write};

use crossterm::style::Stylize;
use listdiff_core::{OperationId, RunObserver, RunReport, StepVerdict};

/// Writes progress to stdout; colors only in pretty mode.
pub struct ConsoleObserver {
    color: bool,
}

impl ConsoleObserver {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn tag(&self, ok: bool) -> String {
        match (ok, self.color) {
            (true, true) => "ok".green().to_string(),
            (false, true) => "fail".red().bold().to_string(),
            (true, false) => "ok".to_string(),
            (false, false) => "fail".to_string(),
        }
    }
}

/// Lines printed after a step finishes.
pub fn step_lines(verdict: &StepVerdict, tag: &str) -> Vec<String> {
    let mut lines = vec![tag.to_string()];
    if !verdict.ok() {
        if verdict.invoked {
            lines.push(format!(
                "returned same: {}, post-values same: {}",
                verdict.returned_same, verdict.state_same
            ));
        } else {
            lines.push("precondition failed before the call".to_string());
        }
        if let Some(divergence) = &verdict.divergence {
            lines.push(format!("  {divergence}"));
        }
        if let Some(state) = &verdict.state_divergence {
            lines.push(format!("  {state}"));
        }
    }
    lines
}

/// Lines printed when a run ends; empty for a passing run.
pub fn failure_lines(report: &RunReport) -> Vec<String> {
    let Some(diagnostic) = &report.diagnostic else {
        return Vec::new();
    };
    let mut lines = vec![
        format!("Failed with seed {}", report.seed),
        format!("  [{}] {}", diagnostic.code, diagnostic.summary),
    ];
    if let Some(hint) = diagnostic.hint {
        lines.push(format!("  hint: {hint}"));
    }
    lines
}

impl RunObserver for ConsoleObserver {
    fn run_started(&mut self, seed: u64) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "Seed: {seed}");
    }

    fn step_started(&mut self, operation: OperationId) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{operation}..");
        let _ = out.flush();
    }

    fn step_finished(&mut self, _operation: OperationId, verdict: &StepVerdict) {
        let mut out = io::stdout().lock();
        for line in step_lines(verdict, &self.tag(verdict.ok())) {
            let _ = writeln!(out, "{line}");
        }
    }

    fn run_finished(&mut self, report: &RunReport) {
        let mut out = io::stdout().lock();
        for line in failure_lines(report) {
            let _ = writeln!(out, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listdiff_core::{Diagnostic, Divergence};

    fn report(divergence: Option<Divergence>) -> RunReport {
        RunReport {
            seed: 19,
            reference: vec![1, 2],
            candidate: vec![1],
            steps: 1,
            failed_on: None,
            diagnostic: divergence.map(|divergence| {
                let code = divergence.code();
                Diagnostic {
                    code: code.code(),
                    summary: code.message(),
                    hint: code.hint(),
                    harness_fault: divergence.is_harness_fault(),
                    divergence,
                    returned_same: false,
                    state_same: false,
                    state_divergence: None,
                }
            }),
        }
    }

    #[test]
    fn passing_step_is_one_line() {
        let verdict = StepVerdict {
            invoked: true,
            returned_same: true,
            state_same: true,
            divergence: None,
            state_divergence: None,
        };
        assert_eq!(step_lines(&verdict, "ok"), vec!["ok".to_string()]);
    }

    #[test]
    fn failing_step_names_both_checks() {
        let verdict = StepVerdict {
            invoked: true,
            returned_same: true,
            state_same: false,
            divergence: Some(Divergence::StateMismatch {
                position: 2,
                reference_len: 3,
                candidate_len: 4,
            }),
            state_divergence: None,
        };
        let lines = step_lines(&verdict, "fail");
        assert_eq!(lines[0], "fail");
        assert_eq!(lines[1], "returned same: true, post-values same: false");
        assert!(lines[2].contains("first difference at 2"));
    }

    #[test]
    fn precondition_step_is_not_reported_as_a_comparison() {
        let verdict = StepVerdict {
            invoked: false,
            returned_same: false,
            state_same: false,
            divergence: Some(Divergence::SizeDesync {
                reference: 2,
                candidate: 1,
            }),
            state_divergence: None,
        };
        let lines = step_lines(&verdict, "fail");
        assert_eq!(lines[1], "precondition failed before the call");
        assert!(lines.iter().all(|line| !line.contains("returned same")));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn failure_summary_carries_code_and_hint() {
        let lines = failure_lines(&report(Some(Divergence::SizeDesync {
            reference: 2,
            candidate: 1,
        })));
        assert_eq!(lines[0], "Failed with seed 19");
        assert_eq!(lines[1], "  [E1001] Container sizes desynced");
        assert!(lines[2].starts_with("  hint: "));
        assert!(lines[2].contains("size accounting"));
    }

    #[test]
    fn failure_without_hint_has_no_hint_line() {
        let lines = failure_lines(&report(Some(Divergence::StateMismatch {
            position: 0,
            reference_len: 2,
            candidate_len: 1,
        })));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  [E2007] Post-call contents differ");
    }

    #[test]
    fn passing_run_prints_nothing() {
        assert!(failure_lines(&report(None)).is_empty());
    }

    #[test]
    fn plain_tags_have_no_escapes() {
        let console = ConsoleObserver::new(false);
        assert_eq!(console.tag(true), "ok");
        assert_eq!(console.tag(false), "fail");
    }
}
