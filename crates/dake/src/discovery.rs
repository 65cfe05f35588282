// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Discovery of environment definition files in a directory tree.

use std::path::{Component, Path, PathBuf};

#[cfg(test)]
#[path = "./discovery_test.rs"]
mod discovery_test;

/// Search `start` and each of its ancestors for a file named `marker_name`.
///
/// This supports monorepo layouts where a single definition at the project
/// root is shared by every subproject below it. The search stops at the
/// first match, or returns `None` once the filesystem root has been checked.
pub fn locate<P: AsRef<Path>>(start: P, marker_name: &str) -> crate::Result<Option<PathBuf>> {
    let start = normalize(start.as_ref());
    let mut current = Some(start.as_path());

    while let Some(dir) = current {
        let candidate = dir.join(marker_name);
        let exists = candidate
            .try_exists()
            .map_err(|error| crate::Error::ReadFailed {
                path: candidate.clone(),
                error,
            })?;

        if exists {
            tracing::debug!(marker = %candidate.display(), "found environment definition");
            return Ok(Some(candidate));
        }

        // Path::parent is None at the root, which ends the walk
        current = dir.parent();
    }

    Ok(None)
}

/// Resolve starting path, preferring $PWD to preserve symlinks.
pub fn resolve_start_path<P: AsRef<Path>>(start_path: P) -> PathBuf {
    let start_path = start_path.as_ref();
    if start_path.is_absolute() {
        return normalize(start_path);
    }

    let base = match std::env::var_os("PWD") {
        Some(pwd) if Path::new(&pwd).is_absolute() => PathBuf::from(pwd),
        _ => std::env::current_dir().unwrap_or_default(),
    };

    normalize(&base.join(start_path))
}

/// Lexically drop `.` and resolve `..` components.
///
/// Unlike canonicalization this leaves symlinks in place, so a walk from a
/// symlinked directory still visits the parents the user sees.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }
    normalized
}
