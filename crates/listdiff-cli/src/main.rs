#![forbid(unsafe_code)]

mod cmd;
mod console;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::io::{self, Write};
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "listdiff: differential tester for list containers",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress per-operation progress lines.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the candidate against the reference",
        long_about = "Seed a reference and a candidate list identically, then drive both through\n\
                      every registered operation with randomized arguments, stopping at the\n\
                      first divergence.",
        after_help = "EXAMPLES:\n    # One run with a random seed\n    listdiff run\n\n\
                      # Replay a seed\n    listdiff run --seed 42\n\n\
                      # Ten consecutive seeds, machine-readable\n    listdiff run --seed 0 --runs 10 --json"
    )]
    Run(cmd::run::RunArgs),

    #[command(about = "List the operations a run exercises")]
    Operations,

    #[command(about = "Generate shell completions")]
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Write the completion script for `shell` to `out`.
fn write_completions(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), "listdiff", out);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LISTDIFF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "listdiff=debug,info"
        } else {
            "listdiff=info,warn"
        })
    });

    let format = env::var("LISTDIFF_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries reports.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    match cli.command {
        Commands::Run(ref args) => {
            let passed = cmd::run::run_run(args, output, cli.quiet)?;
            // Exit code 1 on any divergence for CI integration
            if !passed {
                process::exit(1);
            }
        }
        Commands::Operations => cmd::operations::run_operations(output)?,
        Commands::Completions { shell } => write_completions(shell, &mut io::stdout().lock()),
    }

    Ok(())
}
