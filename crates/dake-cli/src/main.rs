// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! dake - Project Environment Shell CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_init;
mod cmd_shell;
mod cmd_show;

use cmd_init::CmdInit;
use cmd_shell::CmdShell;
use cmd_show::CmdShow;

#[derive(Parser)]
#[clap(
    name = "dake",
    about = "Enter a project's Nix environment from anywhere in its tree",
    version,
    long_about = "Find the nearest shell.nix, ask nix-shell for its PATH, and start your shell with it"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    /// Read configuration from FILE instead of the default location
    #[clap(long, global = true, env = "DAKE_CONFIG")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Option<Command>,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Enter an interactive shell in the project environment (default)
    Shell(CmdShell),

    /// Display the resolved environment without entering it
    Show(CmdShow),

    /// Create a starter shell.nix file
    Init(CmdInit),
}

impl Opt {
    async fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "dake");

        let settings = match &self.config {
            Some(path) => dake::Settings::load_from(Some(path.as_path()), true)?,
            None => dake::Settings::load()?,
        };

        // Dispatch to command
        match self.cmd {
            Some(Command::Shell(mut cmd)) => cmd.run(settings).await,
            Some(Command::Show(mut cmd)) => cmd.run(settings).await,
            Some(Command::Init(mut cmd)) => cmd.run(settings).await,
            None => CmdShell::default().run(settings).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run().await?;
    std::process::exit(code);
}
