// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Nix reference provider backed by `nix-shell`.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexSet;

use super::{CommandRunner, ContextProvider, TokioCommandRunner};
use crate::{Fingerprint, ResolvedContext};

#[cfg(test)]
#[path = "./nix_test.rs"]
mod nix_test;

/// Shell command evaluated inside the Nix environment to report its PATH.
const PRINT_PATH_COMMAND: &str = "printenv PATH";

/// Resolves contexts from a `shell.nix` by asking `nix-shell` for the
/// PATH of the environment it builds.
#[derive(Debug, Clone)]
pub struct NixProvider<R = TokioCommandRunner> {
    program: String,
    marker_name: String,
    runner: R,
}

impl NixProvider {
    pub fn new() -> Self {
        Self::with_runner(TokioCommandRunner)
    }
}

impl Default for NixProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> NixProvider<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            program: crate::NIX_SHELL_PROGRAM.to_string(),
            marker_name: crate::SHELL_NIX_FILENAME.to_string(),
            runner,
        }
    }

    /// Use a different provisioning command (e.g. a wrapper script).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Look for a different definition filename.
    pub fn marker(mut self, marker_name: impl Into<String>) -> Self {
        self.marker_name = marker_name.into();
        self
    }

    /// Resolve `marker`, excluding entries already present in `inherited`.
    pub async fn resolve_with_search_path(
        &self,
        marker: &Path,
        inherited: Option<&OsStr>,
    ) -> crate::Result<ResolvedContext> {
        let existing: HashSet<PathBuf> = inherited
            .map(|path| std::env::split_paths(path).collect())
            .unwrap_or_default();

        let fingerprint = Fingerprint::of_file(marker).await?;

        let Some(file_name) = marker.file_name() else {
            return Err(crate::Error::ReadFailed {
                path: marker.to_path_buf(),
                error: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
            });
        };
        let cwd = match marker.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let args = vec![
            file_name.to_string_lossy().into_owned(),
            "--run".to_string(),
            PRINT_PATH_COMMAND.to_string(),
        ];

        let output = self.runner.run(&self.program, &args, cwd).await?;
        if !output.success() {
            return Err(crate::Error::ProviderInvocation {
                program: self.program.clone(),
                code: output.code,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| crate::Error::ProviderOutput {
            program: self.program.clone(),
            reason: format!("output is not valid UTF-8: {e}"),
        })?;

        let paths = accept_entries(stdout.trim(), &existing);
        tracing::debug!(
            marker = %marker.display(),
            fingerprint = fingerprint.short(),
            added = paths.len(),
            "resolved nix context"
        );

        Ok(ResolvedContext {
            marker: marker.to_path_buf(),
            paths,
            fingerprint,
        })
    }
}

#[async_trait]
impl<R: CommandRunner> ContextProvider for NixProvider<R> {
    fn name(&self) -> &str {
        "nix"
    }

    fn marker_name(&self) -> &str {
        &self.marker_name
    }

    async fn resolve(&self, marker: &Path) -> crate::Result<ResolvedContext> {
        let inherited: Option<OsString> = std::env::var_os(crate::PATH_VAR);
        self.resolve_with_search_path(marker, inherited.as_deref())
            .await
    }
}

/// Split provider output into new search path entries, in order.
///
/// Entries already on the inherited path, repeats, and anything that is not
/// an absolute path are dropped.
fn accept_entries(output: &str, existing: &HashSet<PathBuf>) -> Vec<PathBuf> {
    // split_paths("") yields a single empty entry
    if output.is_empty() {
        return Vec::new();
    }

    let mut accepted = IndexSet::new();
    for entry in std::env::split_paths(output) {
        if existing.contains(&entry) {
            continue;
        }
        if entry.as_os_str().is_empty() || !entry.is_absolute() {
            tracing::debug!(entry = %entry.display(), "dropping invalid search path entry");
            continue;
        }
        accepted.insert(entry);
    }
    accepted.into_iter().collect()
}
