// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a project's context and hand-off to the shell.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use serde::Serialize;

use crate::provider::{ContextProvider, NixProvider};
use crate::{Fingerprint, Settings, ShellLauncher, Store};

#[cfg(test)]
#[path = "./context_test.rs"]
mod context_test;

/// Search path additions produced by a provider for one definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContext {
    /// Definition file the context was resolved from.
    pub marker: PathBuf,

    /// Entries to place ahead of the inherited PATH (in order, no repeats,
    /// none already on the inherited PATH).
    pub paths: Vec<PathBuf>,

    /// Fingerprint of the definition file, used as a cache key.
    pub fingerprint: Fingerprint,
}

impl ResolvedContext {
    /// Check if the context adds anything to the search path.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Build the provider list from settings, in priority order.
pub fn default_providers(settings: &Settings) -> Vec<Box<dyn ContextProvider>> {
    let nix: Box<dyn ContextProvider> = Box::new(
        NixProvider::new()
            .program(settings.provider.clone())
            .marker(settings.marker.clone()),
    );
    vec![nix]
}

/// Find the environment definition for `root` and resolve it.
///
/// Providers are tried in order; the first one whose marker exists in
/// `root` or any of its ancestors resolves the context.
pub async fn resolve_project<P: AsRef<Path>>(
    root: P,
    providers: &[Box<dyn ContextProvider>],
) -> crate::Result<ResolvedContext> {
    let root = crate::resolve_start_path(root);
    if !root.is_dir() {
        return Err(crate::Error::InvalidProjectRoot(root));
    }

    for provider in providers {
        let Some(marker) = crate::locate(&root, provider.marker_name())? else {
            tracing::debug!(provider = provider.name(), "no definition found");
            continue;
        };

        tracing::info!(provider = provider.name(), marker = %marker.display(), "resolving context");
        return provider.resolve(&marker).await;
    }

    Err(crate::Error::NoMarkerFound {
        start: root,
        markers: providers
            .iter()
            .map(|p| p.marker_name().to_string())
            .collect(),
    })
}

/// Resolve the context for `root` and run an interactive shell in it.
///
/// Returns the shell's exit status once it terminates.
pub async fn enter_project<P: AsRef<Path>>(
    root: P,
    settings: &Settings,
) -> crate::Result<ExitStatus> {
    let providers = default_providers(settings);
    let context = resolve_project(root, &providers).await?;

    // The cache is not consulted yet, so a broken store only warrants a warning
    let store = Store::new(settings.store_dir());
    if let Err(err) = store.initialize().await {
        tracing::warn!("context store unavailable: {err}");
    }

    let mut launcher = ShellLauncher::from_process();
    if let Some(shell) = &settings.shell {
        launcher = launcher.with_shell(shell);
    }

    tracing::info!(added = context.paths.len(), "entering shell");
    launcher.enter(&context).await
}
