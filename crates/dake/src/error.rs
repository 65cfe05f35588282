// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for dake operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with dake Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or entering an environment.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Project root is missing or not a directory
    #[error("Project root is not a directory: {0:?}")]
    #[diagnostic(
        code(dake::invalid_project_root),
        help("Pass an existing directory with -C, or run dake from inside the project")
    )]
    InvalidProjectRoot(PathBuf),

    /// No environment definition in the directory tree
    #[error("No {} found in {start:?} or any parent directory", .markers.join(" or "))]
    #[diagnostic(
        code(dake::no_marker_found),
        help("Create one with 'dake init' at the root of your project")
    )]
    NoMarkerFound { start: PathBuf, markers: Vec<String> },

    /// Failed to read or stat a file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(dake::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Provisioning command is not on PATH
    #[error("Provisioning command '{program}' was not found on PATH")]
    #[diagnostic(
        code(dake::provider_not_found),
        help("Install Nix or set 'provider' in the dake configuration")
    )]
    ProviderNotFound { program: String },

    /// Provisioning command could not be started
    #[error("Failed to run provisioning command '{program}'")]
    #[diagnostic(code(dake::provider_spawn))]
    ProviderSpawn {
        program: String,
        #[source]
        error: std::io::Error,
    },

    /// Provisioning command exited unsuccessfully
    #[error("Provisioning command '{program}' failed with {}", exit_description(.code))]
    #[diagnostic(
        code(dake::provider_invocation),
        help("Run '{program}' in the project directory to see the full error")
    )]
    ProviderInvocation { program: String, code: Option<i32> },

    /// Provisioning command produced unusable output
    #[error("Provisioning command '{program}' produced unusable output: {reason}")]
    #[diagnostic(code(dake::provider_output))]
    ProviderOutput { program: String, reason: String },

    /// No interactive shell configured
    #[error("SHELL environment variable not set")]
    #[diagnostic(
        code(dake::missing_shell),
        help("Set SHELL or pass --shell to choose the interactive shell")
    )]
    MissingShell,

    /// A search path entry cannot be joined into PATH
    #[error("Cannot build PATH from resolved entries: {0}")]
    #[diagnostic(code(dake::invalid_search_path))]
    InvalidSearchPath(#[from] std::env::JoinPathsError),

    /// Interactive shell could not be started
    #[error("Failed to start shell {shell:?}")]
    #[diagnostic(code(dake::shell_spawn))]
    ShellSpawn {
        shell: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("Invalid dake configuration")]
    #[diagnostic(
        code(dake::config),
        help("Check the config file and any DAKE_* environment variables")
    )]
    Config(#[from] config::ConfigError),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(dake::io_error))]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}
