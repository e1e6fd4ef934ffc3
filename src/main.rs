//! bnb-color - exact graph coloring by parallel branch-and-bound
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use bnb_color::config::{CliArgs, RunConfig};
use bnb_color::error::{InstanceOutcome, SolverError};
use bnb_color::graph::parse_col_file;
use bnb_color::progress::{print_header, print_summary, ProgressReporter};
use bnb_color::report::{ResultRecord, ResultSink, SqliteSink};
use bnb_color::solver::Coordinator;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    // Setup signal handler: finish the current instance's drain, then stop
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let mut sink = match &config.output_path {
        Some(path) => Some(SqliteSink::open(path).context("Failed to open results database")?),
        None => None,
    };

    let coordinator = Coordinator::new(config.solver).with_interrupt(Arc::clone(&interrupt));
    let mut outcomes = Vec::with_capacity(config.instances.len());

    info!(
        instances = config.instances.len(),
        workers = config.solver.workers,
        time_limit_secs = config.solver.time_limit.as_secs(),
        "Starting run"
    );

    for path in &config.instances {
        let name = instance_name(path);

        let graph = match parse_col_file(path) {
            Ok(graph) => Arc::new(graph),
            Err(e) => {
                warn!(instance = %name, error = %e, "Skipping malformed instance");
                outcomes.push(InstanceOutcome::Skipped {
                    instance: name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if config.show_progress {
            print_header(&name, graph.len(), graph.edge_count(), config.solver.workers);
        }

        let progress = config.show_progress.then(ProgressReporter::new);
        if let Some(ref p) = progress {
            p.set_status("Computing root bounds...");
        }

        let outcome = coordinator
            .solve_with_progress(Arc::clone(&graph), |update| {
                if let Some(ref p) = progress {
                    p.update(update);
                }
            })
            .with_context(|| format!("Solve failed on {}", name))?;

        if let Some(ref p) = progress {
            p.finish_and_clear();
        }

        let record = ResultRecord::from_outcome(
            name.as_str(),
            &graph,
            &outcome,
            config.solver.workers,
            config.solver.time_limit.as_secs_f64(),
        );
        if !record.valid {
            error!(instance = %name, "Reported coloring is not proper");
        }
        print_summary(&name, &outcome, record.valid);

        if let Some(sink) = sink.as_mut() {
            sink.report(&record).context("Failed to record result")?;
        }

        outcomes.push(if outcome.proven_optimal {
            InstanceOutcome::Solved {
                instance: name,
                colors: outcome.best_upper_bound,
            }
        } else {
            InstanceOutcome::TimedOut {
                instance: name,
                colors: outcome.best_upper_bound,
            }
        });

        if interrupt.load(Ordering::SeqCst) {
            break;
        }
    }

    let solved = outcomes.iter().filter(|o| o.is_proven()).count();
    let skipped: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(o, InstanceOutcome::Skipped { .. }))
        .map(InstanceOutcome::instance)
        .collect();
    let unproven: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(o, InstanceOutcome::TimedOut { .. }))
        .map(InstanceOutcome::instance)
        .collect();
    if !skipped.is_empty() {
        warn!(instances = ?skipped, "Skipped malformed instances");
    }
    if !unproven.is_empty() {
        info!(instances = ?unproven, "Instances without an optimality proof");
    }
    info!(
        instances = outcomes.len(),
        solved,
        skipped = skipped.len(),
        "Run complete"
    );

    if interrupt.load(Ordering::SeqCst) {
        return Err(SolverError::Interrupted.into());
    }

    Ok(())
}

fn instance_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("bnb_color=debug,warn")
    } else {
        EnvFilter::new("bnb_color=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
