// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Directory-backed storage for resolved contexts.
//!
//! A [`Store`] checks its backing directory exactly once, no matter how
//! many callers ask for it or how many of them arrive while the check is
//! still running. Every caller observes the same [`StoreInitResult`].

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tokio::sync::OnceCell;

#[cfg(test)]
#[path = "./store_test.rs"]
mod store_test;

/// Outcome of initializing a [`Store`].
pub type StoreInitResult = std::result::Result<(), StoreInitError>;

/// Reasons a store's backing directory cannot be used.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum StoreInitError {
    /// The backing path could not be inspected
    #[error("Failed to inspect store directory: {message}")]
    #[diagnostic(code(dake::store::io_error))]
    Io { message: String },

    /// Something other than a directory occupies the backing path
    #[error("Store path exists but is not a directory: {path:?}")]
    #[diagnostic(
        code(dake::store::not_a_directory),
        help("Remove the file or point 'store_dir' somewhere else")
    )]
    NotADirectory { path: PathBuf },
}

/// What currently occupies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    Directory,
    /// A file, device, or anything else that is not a directory.
    Occupied,
}

/// Inspects the backing path of a store.
pub trait DirectoryProbe: Send + Sync {
    fn probe(&self, path: &Path) -> std::io::Result<PathKind>;
}

/// Probes the real filesystem, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DirectoryProbe for FsProbe {
    fn probe(&self, path: &Path) -> std::io::Result<PathKind> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(PathKind::Directory),
            Ok(_) => Ok(PathKind::Occupied),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PathKind::Missing),
            Err(err) => Err(err),
        }
    }
}

/// Lazily initialized store rooted at a directory.
#[derive(Debug)]
pub struct Store<P = FsProbe> {
    directory: PathBuf,
    probe: P,
    initialized: OnceCell<StoreInitResult>,
}

impl Store {
    pub fn new<D: Into<PathBuf>>(directory: D) -> Self {
        Self::with_probe(directory, FsProbe)
    }
}

impl<P: DirectoryProbe> Store<P> {
    pub fn with_probe<D: Into<PathBuf>>(directory: D, probe: P) -> Self {
        Self {
            directory: directory.into(),
            probe,
            initialized: OnceCell::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// True once an initialization has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    /// Check the backing directory, at most once per store.
    ///
    /// Concurrent callers wait for the first caller's check; later callers
    /// get the memoized result. A missing directory is fine: the store only
    /// rejects a path that is occupied by something else.
    pub async fn initialize(&self) -> StoreInitResult {
        self.initialized
            .get_or_init(|| async { self.check() })
            .await
            .clone()
    }

    fn check(&self) -> StoreInitResult {
        tracing::debug!(directory = %self.directory.display(), "store initialize");

        match self.probe.probe(&self.directory) {
            Ok(PathKind::Missing | PathKind::Directory) => Ok(()),
            Ok(PathKind::Occupied) => Err(StoreInitError::NotADirectory {
                path: self.directory.clone(),
            }),
            Err(err) => Err(StoreInitError::Io {
                message: err.to_string(),
            }),
        }
    }
}
