//! Coin ledger CLI entry point.
//!
//! Parsing and command logic live in `coin_ledger::cli`; this binary only
//! installs logging, loads settings, and maps the outcome to an exit code.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use coin_ledger::LedgerSettings;
use coin_ledger::cli::{Cli, CliError, run};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    match load_settings().and_then(|settings| run(cli, &settings, &mut io::stdout().lock())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_settings() -> Result<LedgerSettings, CliError> {
    // Flags belong to clap; settings come from the environment and config files.
    LedgerSettings::load_from_iter([OsString::from("coin-ledger")]).map_err(|err| {
        CliError::Config {
            message: err.to_string(),
        }
    })
}
