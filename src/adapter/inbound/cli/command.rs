//! Command-line interface definitions.
//!
//! Defines the CLI structure for the tradelane binary using `clap`: routing
//! queries over the static universe and a cache warm-up against the live API.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SideFilter;

/// Market data cache and jump routing for the trade hubs
#[derive(Parser, Debug)]
#[command(name = "tradelane")]
#[command(version)]
pub struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List systems reachable within a jump budget
    Reach(ReachArgs),

    /// Shortest jump count between two systems
    Route(RouteArgs),

    /// Load order books for regions and report their freshness
    Warm(WarmArgs),
}

/// Arguments for `tradelane reach`.
#[derive(Args, Debug)]
pub struct ReachArgs {
    /// Origin system id
    pub origin: u64,

    /// Maximum number of jumps
    #[arg(short, long, default_value_t = 5)]
    pub jumps: u32,

    /// Skip systems below this security status (0 disables the filter)
    #[arg(long, default_value_t = 0.0)]
    pub min_security: f64,
}

/// Arguments for `tradelane route`.
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Origin system id
    pub from: u64,

    /// Destination system id
    pub to: u64,

    /// Avoid systems below this security status (0 disables the filter)
    #[arg(long, default_value_t = 0.0)]
    pub min_security: f64,
}

/// Arguments for `tradelane warm`.
#[derive(Args, Debug)]
pub struct WarmArgs {
    /// Region ids to load
    #[arg(required = true)]
    pub regions: Vec<u32>,

    /// Order book side [buy, sell, all]
    #[arg(long, default_value = "all")]
    pub side: SideFilter,

    /// Item type ids whose trade history should be prefetched
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<u32>,
}
