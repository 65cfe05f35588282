// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Launching an interactive shell with a resolved context applied.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use crate::ResolvedContext;

#[cfg(test)]
#[path = "./shell_test.rs"]
mod shell_test;

/// Complete set of variables handed to the spawned shell.
pub type Environment = BTreeMap<OsString, OsString>;

/// Enters the user's interactive shell with context paths prepended to
/// PATH.
///
/// The launcher works from a snapshot of the environment and never
/// modifies the current process's own variables.
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher {
    shell: Option<PathBuf>,
    base_env: Vec<(OsString, OsString)>,
}

impl ShellLauncher {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self::from_env(std::env::vars_os())
    }

    pub fn from_env<I: IntoIterator<Item = (OsString, OsString)>>(vars: I) -> Self {
        Self {
            shell: None,
            base_env: vars.into_iter().collect(),
        }
    }

    /// Use `shell` instead of $SHELL.
    pub fn with_shell<S: AsRef<Path>>(mut self, shell: S) -> Self {
        self.shell = Some(shell.as_ref().to_path_buf());
        self
    }

    fn var(&self, name: &str) -> Option<&OsStr> {
        self.base_env
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_os_str())
    }

    /// The shell to launch.
    pub fn shell(&self) -> crate::Result<PathBuf> {
        if let Some(shell) = &self.shell {
            return Ok(shell.clone());
        }
        match self.var(crate::SHELL_VAR) {
            Some(shell) if !shell.is_empty() => Ok(PathBuf::from(shell)),
            _ => Err(crate::Error::MissingShell),
        }
    }

    /// Build the shell's environment: the snapshot with PATH replaced by the
    /// context paths followed by the original PATH.
    pub fn build_environment(&self, context: &ResolvedContext) -> crate::Result<Environment> {
        let mut env: Environment = self.base_env.iter().cloned().collect();

        let mut path = std::env::join_paths(&context.paths)?;
        if let Some(original) = self.var(crate::PATH_VAR).filter(|p| !p.is_empty()) {
            if !path.is_empty() {
                path.push(PATH_SEPARATOR);
            }
            path.push(original);
        }

        env.insert(OsString::from(crate::PATH_VAR), path);
        Ok(env)
    }

    /// Run the shell interactively and wait for it to exit.
    pub async fn enter(&self, context: &ResolvedContext) -> crate::Result<ExitStatus> {
        // Fail before spawning anything
        let shell = self.shell()?;
        let env = self.build_environment(context)?;

        tracing::debug!(shell = %shell.display(), "spawning interactive shell");

        let mut child = tokio::process::Command::new(&shell)
            .arg("-i")
            .env_clear()
            .envs(&env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|error| crate::Error::ShellSpawn {
                shell: shell.clone(),
                error,
            })?;

        let status = child.wait().await?;
        if !status.success() {
            tracing::debug!(code = ?status.code(), "shell exited unsuccessfully");
        }
        Ok(status)
    }
}

#[cfg(unix)]
const PATH_SEPARATOR: &str = ":";
#[cfg(windows)]
const PATH_SEPARATOR: &str = ";";
