//! Command-line interface (spec.md §6).

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "geoflood", about = "Gossiping location-tracking server herd")]
pub struct Args {
    /// Name of the server to run; must be a member of the configured
    /// topology (embedded default, or the one given by `--topology`).
    pub server_name: String,

    /// Path to a JSON topology document overriding the embedded default
    /// (SPEC_FULL.md §3).
    #[arg(long)]
    pub topology: Option<PathBuf>,

    /// Directory log files are written under, overriding each server's
    /// configured log path's parent.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
