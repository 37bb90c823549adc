mod cli;
mod commands;
mod error;
mod output;
mod prompt;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = parse_cli();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Parse arguments; report options only apply when no subcommand is given.
fn parse_cli() -> Cli {
    let cli = Cli::parse();
    if cli.command.is_some() && cli.report.is_set() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "report options cannot be combined with a subcommand",
            )
            .exit();
    }
    cli
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs stay on stderr; stdout carries the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(peerstat_config::config_path);

    match cli.command {
        // Shell completions generation
        Some(Command::Completions(args)) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "peerstat", &mut std::io::stdout());
            Ok(())
        }

        Some(Command::Config(args)) => {
            let config = peerstat_config::load_config_from(&config_path)?;
            commands::config_cmd::handle(&args.command, &config_path, &config)
        }

        None => {
            let config = peerstat_config::load_config_from(&config_path)?;
            tracing::debug!(path = %config_path.display(), "configuration loaded");
            commands::report::handle(&cli.report, &config.defaults).await
        }
    }
}
