//! Configuration types for bnb-color
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Solver tuning knobs with library defaults
//! - Runtime configuration with validation and instance enumeration

use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Batch size limits
const MIN_BATCH_SIZE: usize = 1;
const MAX_BATCH_SIZE: usize = 1024;

/// Default nodes per dispatch batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default overall time budget per instance
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10_000);

/// Default bound on a single queue wait
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Exact graph coloring by parallel branch-and-bound
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bnb-color",
    version,
    about = "Exact graph coloring by parallel branch-and-bound",
    long_about = "Computes the chromatic number of DIMACS graph instances.\n\n\
                  A coordinator thread per worker pulls batches of search nodes from a shared\n\
                  queue, prunes them against the best known coloring and hands the survivors\n\
                  to its worker for expansion. Each instance stops when optimality is proven\n\
                  or its time budget runs out.",
    after_help = "EXAMPLES:\n    \
        bnb-color instances/myciel3.col\n    \
        bnb-color instances/ -w 8 -t 600\n    \
        bnb-color instances/ --exclude myciel --exclude 'le450_.*' -o runs.db\n    \
        bnb-color queen5_5.col --no-output -v"
)]
pub struct CliArgs {
    /// DIMACS instance files, or directories of instances
    #[arg(value_name = "INSTANCE", required = true)]
    pub instances: Vec<PathBuf>,

    /// Number of worker threads (one coordinator thread is paired with each)
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Time budget per instance, in seconds
    #[arg(short = 't', long, default_value = "10000", value_name = "SECS")]
    pub time_limit: u64,

    /// Maximum nodes per dispatch batch
    #[arg(short = 'b', long, default_value = "5", value_name = "NUM")]
    pub batch_size: usize,

    /// Upper bound on a single queue wait, in milliseconds
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub poll_ms: u64,

    /// Skip instances whose file name matches pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Results database file
    #[arg(short, long, default_value = "results.db", value_name = "FILE")]
    pub output: PathBuf,

    /// Do not record results
    #[arg(long)]
    pub no_output: bool,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    // One core is left to the coordinator side
    num_cpus::get().saturating_sub(1).max(1)
}

/// Solver tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of workers (and paired dispatch threads)
    pub workers: usize,

    /// Maximum nodes per dispatch batch
    pub batch_size: usize,

    /// Overall time budget
    pub time_limit: Duration,

    /// Upper bound on a single queue wait
    pub poll_interval: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: DEFAULT_BATCH_SIZE,
            time_limit: DEFAULT_TIME_LIMIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SolverConfig {
    /// Check the knobs are within range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.workers,
                max: MAX_WORKERS,
            });
        }

        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidBatchSize {
                size: self.batch_size,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        if self.time_limit.is_zero() {
            return Err(ConfigError::InvalidTimeLimit);
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidPollInterval);
        }

        Ok(())
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Solver knobs
    pub solver: SolverConfig,

    /// Instance files, smallest first
    pub instances: Vec<PathBuf>,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Results database path (None disables recording)
    pub output_path: Option<PathBuf>,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let solver = SolverConfig {
            workers: args.workers,
            batch_size: args.batch_size,
            time_limit: Duration::from_secs(args.time_limit),
            poll_interval: Duration::from_millis(args.poll_ms),
        };
        solver.validate()?;

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Validate output path
        let output_path = if args.no_output {
            None
        } else {
            if let Some(parent) = args.output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::InvalidOutputPath {
                        path: args.output.clone(),
                        reason: format!("Parent directory '{}' does not exist", parent.display()),
                    });
                }
            }
            Some(args.output)
        };

        let mut config = Self {
            solver,
            instances: Vec::new(),
            exclude_patterns,
            output_path,
            show_progress: !args.quiet,
            verbose: args.verbose,
        };
        config.instances = config.enumerate_instances(&args.instances)?;

        if config.instances.is_empty() {
            return Err(ConfigError::NoInstances);
        }

        Ok(config)
    }

    /// Check if an instance should be skipped
    pub fn is_excluded(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        self.exclude_patterns.iter().any(|re| re.is_match(&name))
    }

    /// Expand directories to their files, drop excluded names and sort by
    /// file size ascending
    pub fn enumerate_instances(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
        let mut found: Vec<(u64, PathBuf)> = Vec::new();

        for path in paths {
            let meta = fs::metadata(path).map_err(|e| ConfigError::InvalidInstancePath {
                path: path.clone(),
                reason: e.to_string(),
            })?;

            if meta.is_dir() {
                let entries = fs::read_dir(path).map_err(|e| ConfigError::InvalidInstancePath {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                for entry in entries.flatten() {
                    let Ok(meta) = entry.metadata() else { continue };
                    if meta.is_file() {
                        found.push((meta.len(), entry.path()));
                    }
                }
            } else {
                found.push((meta.len(), path.clone()));
            }
        }

        found.retain(|(_, p)| !self.is_excluded(p));
        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        found.dedup_by(|a, b| a.1 == b.1);

        Ok(found.into_iter().map(|(_, p)| p).collect())
    }
}
