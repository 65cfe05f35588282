// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Content fingerprints for environment definition files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest as ShaDigest, Sha512};

#[cfg(test)]
#[path = "./fingerprint_test.rs"]
mod fingerprint_test;

/// Hex encoded SHA-512 digest of a definition file's raw bytes.
///
/// Fingerprints are stable across runs for unchanged content and are meant
/// to key cached contexts in a [`crate::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of the hex encoded digest.
    pub const HEX_LEN: usize = 128;

    /// Fingerprint an in-memory buffer.
    pub fn of_bytes(content: &[u8]) -> Self {
        Self(format!("{:x}", Sha512::digest(content)))
    }

    /// Fingerprint the file at `path`, read as raw bytes.
    pub async fn of_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|error| crate::Error::ReadFailed {
                path: path.to_path_buf(),
                error,
            })?;
        Ok(Self::of_bytes(&content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
