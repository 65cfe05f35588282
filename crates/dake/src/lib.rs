// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! dake - Project Environment Shells
//!
//! This crate provides the core library for entering a project's development
//! environment from anywhere inside its directory tree.
//!
//! # Overview
//!
//! Starting from a project directory, dake walks up the tree looking for an
//! environment definition (`shell.nix` by default), asks the provisioning
//! tool (`nix-shell`) which search-path entries that environment adds, and
//! launches the user's interactive shell with those entries placed ahead of
//! the inherited `PATH`.
//!
//! ```text
//! root/
//!   ├── shell.nix         <- found from any subdirectory
//!   ├── app/
//!   └── web/
//! ```
//!
//! Each resolved context carries a fingerprint of the definition file so
//! that resolved contexts can later be cached in a [`Store`].

pub mod context;
pub mod discovery;
pub mod error;
pub mod fingerprint;
pub mod provider;
pub mod settings;
pub mod shell;
pub mod store;

pub use context::{ResolvedContext, default_providers, enter_project, resolve_project};
pub use discovery::{locate, resolve_start_path};
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use provider::{CommandOutput, CommandRunner, ContextProvider, NixProvider, TokioCommandRunner};
pub use settings::Settings;
pub use shell::{Environment, ShellLauncher};
pub use store::{DirectoryProbe, FsProbe, PathKind, Store, StoreInitError, StoreInitResult};

/// Well-known filename for Nix environment definitions.
pub const SHELL_NIX_FILENAME: &str = "shell.nix";

/// Default provisioning command used by the Nix provider.
pub const NIX_SHELL_PROGRAM: &str = "nix-shell";

/// Environment variable holding the executable search path.
pub const PATH_VAR: &str = "PATH";

/// Environment variable naming the user's interactive shell.
pub const SHELL_VAR: &str = "SHELL";
