// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! User configuration for dake.
//!
//! Values are layered from built-in defaults, an optional YAML config file,
//! and `DAKE_*` environment variables (highest priority).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./settings_test.rs"]
mod settings_test;

/// Prefix for environment variable overrides (`DAKE_MARKER`, ...).
pub const ENV_PREFIX: &str = "DAKE";

/// Default config file location, relative to the user config dir.
const CONFIG_FILE: &str = "dake/config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Environment definition filename to search for.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Provisioning command run to materialize the environment.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Interactive shell to launch instead of $SHELL.
    #[serde(default)]
    pub shell: Option<PathBuf>,

    /// Directory backing the context store.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

fn default_marker() -> String {
    crate::SHELL_NIX_FILENAME.to_string()
}

fn default_provider() -> String {
    crate::NIX_SHELL_PROGRAM.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            provider: default_provider(),
            shell: None,
            store_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from the default config file location and environment.
    pub fn load() -> crate::Result<Self> {
        let path = dirs::config_dir().map(|dir| dir.join(CONFIG_FILE));
        Self::load_from(path.as_deref(), false)
    }

    /// Load settings from `path` and the environment.
    ///
    /// A missing file is an error only when `required` is set.
    pub fn load_from(path: Option<&Path>, required: bool) -> crate::Result<Self> {
        Self::load_with_env(path, required, None)
    }

    /// Like [`Self::load_from`], reading `DAKE_*` overrides from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        required: bool,
        env: Option<config::Map<String, String>>,
    ) -> crate::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), required, "loading config file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(required),
            );
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Directory backing the context store.
    pub fn store_dir(&self) -> PathBuf {
        match &self.store_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("dake"),
        }
    }
}
