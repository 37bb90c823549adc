//! Clap derive structures for the `peerstat` CLI.
//!
//! Running without a subcommand produces the peer report. Any report input
//! not given as a flag is asked for interactively.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// peerstat -- per-peer traffic totals for a monitored device, as CSV
#[derive(Debug, Parser)]
#[command(
    name = "peerstat",
    version,
    about = "Export per-peer traffic totals for a monitored device to CSV",
    long_about = "Queries the appliance's metrics/total endpoint for one device over a\n\
        lookback window, totals packets and bytes per peer, and writes\n\
        device_<id>_peer_details.csv.\n\n\
        Lookback days, key file, and device id are prompted for unless given as flags.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Report Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Days of lookback (skips the prompt)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Key file holding the appliance hostname and API key (skips the prompt)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub key_file: Option<String>,

    /// Numeric device id (skips the prompt)
    #[arg(long, short = 'i', value_name = "ID")]
    pub device_id: Option<String>,

    /// How peers are keyed in the report
    #[arg(long, short = 'g', value_name = "MODE")]
    pub group_by: Option<GroupBy>,

    /// How repeated values for the same peer and metric combine
    #[arg(long, short = 'm', value_name = "POLICY")]
    pub merge: Option<Merge>,

    /// Directory the CSV is written to
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', conflicts_with = "ca_cert")]
    pub insecure: bool,

    /// Verify the appliance certificate against this CA (PEM)
    #[arg(long, value_name = "FILE")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Also print the aggregated table to stdout
    #[arg(long)]
    pub preview: bool,
}

impl ReportArgs {
    /// Whether any report option was given on the command line.
    pub fn is_set(&self) -> bool {
        self.days.is_some()
            || self.key_file.is_some()
            || self.device_id.is_some()
            || self.group_by.is_some()
            || self.merge.is_some()
            || self.output_dir.is_some()
            || self.insecure
            || self.ca_cert.is_some()
            || self.timeout.is_some()
            || self.preview
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupBy {
    /// One row per peer address
    Peer,
    /// One row per peer address and protocol
    PeerProtocol,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Merge {
    /// Last value seen wins
    Overwrite,
    /// Values are added together
    Sum,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
