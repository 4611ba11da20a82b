//! `listdiff run`: run the candidate against the reference over one or more
//! seeds.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use listdiff_core::abort;
use listdiff_core::rng::random_seed;
use listdiff_core::{
    ArrayList, HarnessConfig, SeedFailure, Session, VecList, load_config, run_campaign,
    seed_range,
};
use serde::Serialize;

use crate::console::ConsoleObserver;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Candidate implementations shipped with the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// `Vec`-backed list (same as the reference).
    Vec,
    /// Hand-rolled growable array.
    Array,
}

/// Arguments for `listdiff run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Seed of the first run; drawn at random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of consecutive seeds to run.
    #[arg(long)]
    pub runs: Option<u64>,

    /// Candidate implementation to test.
    #[arg(long, value_enum, default_value_t = CandidateKind::Array)]
    pub candidate: CandidateKind,

    /// Config file (defaults to the per-user config if present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upper bound on the length of seeded content.
    #[arg(long)]
    pub max_initial_len: Option<usize>,

    /// Keep running further seeds after a failure.
    #[arg(long)]
    pub keep_going: bool,
}

/// JSON output for `listdiff run`.
#[derive(Debug, Serialize)]
struct RunOutput {
    candidate: CandidateKind,
    first_seed: u64,
    seeds_requested: u64,
    seeds_run: usize,
    seeds_passed: usize,
    seeds_failed: usize,
    first_failure: Option<u64>,
    all_passed: bool,
    failures: Vec<SeedFailure>,
}

fn effective_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    if let Some(len) = args.max_initial_len {
        config.max_initial_len = len;
    }
    if args.keep_going {
        config.stop_on_failure = false;
    }
    config.validate()?;
    Ok(config)
}

fn build_session(candidate: CandidateKind, config: HarnessConfig) -> Session {
    match candidate {
        CandidateKind::Vec => Session::with_supplier(VecList::new),
        CandidateKind::Array => Session::with_supplier(ArrayList::new),
    }
    .with_config(config)
}

/// Print the abort notice for the active seed on Ctrl-C, then exit 130.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        abort::announce_interrupt(&mut io::stderr());
        process::exit(130);
    })
    .context("failed to install interrupt handler")
}

/// Number of seeds `seed_range(first_seed, runs)` actually covers.
const fn seeds_covered(first_seed: u64, runs: u64) -> u64 {
    let room = u64::MAX - first_seed;
    if runs == 0 {
        0
    } else if runs - 1 > room {
        room + 1
    } else {
        runs
    }
}

fn failure_row(failure: &SeedFailure) -> String {
    let operation = failure
        .operation
        .map_or_else(|| "-".to_string(), |op| op.to_string());
    let mut row = format!(
        "failure seed={} operation={} code={}",
        failure.seed,
        operation,
        failure.code.unwrap_or("-")
    );
    if let Some(hint) = failure.hint {
        row.push_str(&format!(" hint={hint:?}"));
    }
    row
}

/// Execute `listdiff run`. Returns whether every seed passed.
///
/// # Errors
///
/// Returns an error if the config is invalid or output cannot be written.
pub fn run_run(args: &RunArgs, output: OutputMode, quiet: bool) -> Result<bool> {
    let config = effective_config(args)?;
    let first_seed = args.seed.unwrap_or_else(random_seed);
    let seeds_requested = config.runs;
    let seeds_available = seeds_covered(first_seed, seeds_requested);
    if seeds_available < seeds_requested {
        tracing::warn!(
            first_seed,
            requested = seeds_requested,
            available = seeds_available,
            "seed range clamped at u64::MAX"
        );
    }
    let seeds = seed_range(first_seed, seeds_requested);

    let mut session = build_session(args.candidate, config);
    if !quiet && !output.is_json() {
        session = session.with_observer(ConsoleObserver::new(output.is_pretty()));
    }

    install_interrupt_handler()?;
    let report = run_campaign(&mut session, seeds)?;

    let out = RunOutput {
        candidate: args.candidate,
        first_seed,
        seeds_requested,
        seeds_run: report.seeds_run,
        seeds_passed: report.seeds_passed,
        seeds_failed: report.failures.len(),
        first_failure: report.first_failure,
        all_passed: report.all_passed(),
        failures: report.failures,
    };

    render_mode(
        output,
        &out,
        |out, w| {
            writeln!(
                w,
                "results first_seed={} seeds_run={} passed={} failed={} all_passed={}",
                out.first_seed, out.seeds_run, out.seeds_passed, out.seeds_failed, out.all_passed
            )?;
            for failure in &out.failures {
                writeln!(w, "{}", failure_row(failure))?;
            }
            Ok(())
        },
        |out, w| {
            writeln!(w)?;
            pretty_section(w, "listdiff")?;
            pretty_kv(w, "Candidate", format!("{:?}", out.candidate))?;
            pretty_kv(w, "First seed", out.first_seed.to_string())?;
            pretty_kv(
                w,
                "Results",
                format!("{} passed / {} failed", out.seeds_passed, out.seeds_failed),
            )?;
            for failure in &out.failures {
                pretty_kv(w, "Failure", failure.detail.as_str())?;
                if let Some(summary) = failure.summary {
                    pretty_kv(w, "Summary", summary)?;
                }
                if let Some(hint) = failure.hint {
                    pretty_kv(w, "Hint", hint)?;
                }
            }
            if let Some(seed) = out.first_failure {
                pretty_kv(w, "Replay", format!("listdiff run --seed {seed}"))?;
            }
            Ok(())
        },
    )?;

    Ok(out.all_passed)
}
