// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `dake shell` command.

use clap::Args;
use miette::Result;
use std::path::PathBuf;

/// Enter an interactive shell in the project environment
#[derive(Debug, Args)]
pub struct CmdShell {
    /// Start discovery from DIR
    #[clap(short = 'C', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Shell to use instead of $SHELL
    #[clap(long)]
    shell: Option<PathBuf>,
}

impl Default for CmdShell {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            shell: None,
        }
    }
}

impl CmdShell {
    pub async fn run(&mut self, mut settings: dake::Settings) -> Result<i32> {
        if let Some(shell) = self.shell.take() {
            settings.shell = Some(shell);
        }

        let status = dake::enter_project(&self.dir, &settings).await?;

        // A shell killed by a signal has no exit code
        Ok(status.code().unwrap_or(1))
    }
}
