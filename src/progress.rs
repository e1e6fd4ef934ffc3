//! Progress reporting for the solver
//!
//! Provides real-time progress display using indicatif progress bars.

use crate::solver::{SolveOutcome, SolveProgress};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays search status
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &SolveProgress) {
        let msg = format!(
            "Best: {} | Root LB: {} | Queue: {} | In flight: {} | Batches: {} ({:.0}/s) | \
             Pruned: {}",
            progress.best_upper_bound,
            progress.root_lower_bound,
            format_number(progress.queue_len as u64),
            progress.in_flight,
            format_number(progress.dispatched),
            progress.batches_per_second(),
            format_number(progress.pruned),
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of one solve
pub fn print_summary(instance: &str, outcome: &SolveOutcome, valid: bool) {
    let secs = outcome.elapsed.as_secs_f64();

    println!();
    if outcome.proven_optimal {
        println!("{} {}", style("Solved").green().bold(), instance);
    } else {
        println!("{} {}", style("TIMED OUT").yellow().bold(), instance);
    }
    println!("{}", style("─".repeat(50)).dim());

    let label = if outcome.proven_optimal {
        "Chromatic number:"
    } else {
        "Best coloring:"
    };
    println!("  {} {}", style(label).bold(), outcome.best_upper_bound);
    println!(
        "  {} [{}, {}]",
        style("Root bounds:").bold(),
        outcome.root_lower_bound,
        outcome.root_upper_bound
    );
    println!(
        "  {} {} expanded, {} pruned, {} batches",
        style("Nodes:").bold(),
        format_number(outcome.stats.nodes_expanded),
        format_number(outcome.stats.nodes_pruned),
        format_number(outcome.stats.batches)
    );
    println!("  {} {:.3}s", style("Duration:").bold(), secs);
    if valid {
        println!("  {} yes", style("Valid coloring:").bold());
    } else {
        println!("  {} NO", style("Valid coloring:").red().bold());
    }
    println!();
}

/// Print a header at the start of a solve
pub fn print_header(instance: &str, vertices: usize, edges: usize, workers: usize) {
    println!();
    println!(
        "{} {}",
        style("bnb-color").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Instance:").bold(), instance);
    println!(
        "  {} {} vertices, {} edges",
        style("Graph:").bold(),
        format_number(vertices as u64),
        format_number(edges as u64)
    );
    println!("  {} {}", style("Workers:").bold(), workers);
    println!();
}
