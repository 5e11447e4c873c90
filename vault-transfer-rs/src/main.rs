//! vault-transfer CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vault_transfer::cli::args::{Cli, Commands};
use vault_transfer::cli::output::Output;
use vault_transfer::cli::transfer;
use vault_transfer::config::Config;
use vault_transfer::error::TransferError;
use vault_transfer::vault::Vault;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<i32, TransferError> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut settings = config.transfer.clone();
    cli.settings.apply(&mut settings);

    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let vault = Vault::new(vault_path)?;
    tracing::debug!("source vault: {}", vault.root.display());

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Note(args) => transfer::note(&vault, &settings, args, &output),
        Commands::Folder(args) => transfer::folder(&vault, &settings, args, &output),
        Commands::Link(args) => transfer::link(&vault, &settings, args, &output),
    }
}
