// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Environment providers and the subprocess seam they run through.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;

use crate::ResolvedContext;

mod nix;

#[cfg(test)]
#[path = "./provider_test.rs"]
mod provider_test;

pub use nix::NixProvider;

/// A source of resolved contexts, selected by the marker file it owns.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Filename whose presence in the directory tree selects this provider.
    fn marker_name(&self) -> &str;

    /// Materialize the environment defined by `marker`.
    async fn resolve(&self, marker: &Path) -> crate::Result<ResolvedContext>;
}

/// Exit code and captured stdout of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// None when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands on behalf of a provider.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> crate::Result<CommandOutput>;
}

/// Runs commands as child processes with stdin closed, stdout captured,
/// and stderr passed through to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> crate::Result<CommandOutput> {
        let resolved = which::which(program).map_err(|_| crate::Error::ProviderNotFound {
            program: program.to_string(),
        })?;

        tracing::debug!(program = %resolved.display(), ?args, cwd = %cwd.display(), "running provider");

        let output = tokio::process::Command::new(&resolved)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|error| crate::Error::ProviderSpawn {
                program: program.to_string(),
                error,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
        })
    }
}
