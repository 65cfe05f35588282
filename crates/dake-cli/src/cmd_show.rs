// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `dake show` command.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use colored::Colorize;
use miette::Result;
use serde::Serialize;

#[cfg(test)]
#[path = "./cmd_show_test.rs"]
mod cmd_show_test;

/// Display the resolved environment without entering it
#[derive(Debug, Args)]
pub struct CmdShow {
    /// Start discovery from DIR
    #[clap(short = 'C', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Yaml,
}

/// Serializable summary printed by `--format yaml`.
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    context: &'a dake::ResolvedContext,
    store: StoreStatus,
}

#[derive(Debug, Serialize)]
struct StoreStatus {
    directory: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CmdShow {
    pub async fn run(&mut self, settings: dake::Settings) -> Result<i32> {
        let providers = dake::default_providers(&settings);
        let context = dake::resolve_project(&self.dir, &providers).await?;

        let store = dake::Store::new(settings.store_dir());
        let store_status = StoreStatus {
            directory: store.directory().to_path_buf(),
            error: store.initialize().await.err().map(|e| e.to_string()),
        };

        if self.format == Format::Yaml {
            let output = ShowOutput {
                context: &context,
                store: store_status,
            };
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| miette::miette!("Failed to render output: {e}"))?;
            print!("{yaml}");
        } else {
            self.show_table(&context, &store_status);
        }

        Ok(0)
    }

    fn show_table(&self, context: &dake::ResolvedContext, store: &StoreStatus) {
        println!("{}", "Environment:".bold());
        println!();
        println!("  definition:  {}", context.marker.display().to_string().cyan());
        println!("  fingerprint: {}", context.fingerprint.short().yellow());
        println!();

        println!("{}", "Added To PATH:".bold());
        println!();
        if context.is_empty() {
            println!("  {}", "(nothing new)".dimmed());
        } else {
            for (i, path) in context.paths.iter().enumerate() {
                println!("  {}. {}", i + 1, path.display().to_string().green());
            }
        }
        println!();
        println!("Total: {} path(s)", context.paths.len());

        println!();
        println!("{}", "Context Store:".bold());
        println!();
        match &store.error {
            None => println!("  {}", store.directory.display()),
            Some(err) => println!("  {} {}", store.directory.display(), err.red()),
        }
    }
}
