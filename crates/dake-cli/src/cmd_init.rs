// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `dake init` command.

use clap::Args;
use miette::Result;
use std::path::PathBuf;

#[cfg(test)]
#[path = "./cmd_init_test.rs"]
mod cmd_init_test;

/// Create a starter shell.nix file
#[derive(Debug, Args)]
pub struct CmdInit {
    /// Directory to create file in
    #[clap(default_value = ".")]
    path: PathBuf,

    /// Add a nixpkgs package to the environment
    #[clap(long = "package", short = 'p')]
    packages: Vec<String>,

    /// Overwrite an existing file
    #[clap(long)]
    force: bool,
}

impl CmdInit {
    pub async fn run(&mut self, settings: dake::Settings) -> Result<i32> {
        let marker_path = self.write_marker(&settings.marker)?;

        println!("Created {} at {:?}", settings.marker, marker_path);
        println!();
        println!("Next steps:");
        println!("  1. Add the packages your project needs to buildInputs");
        println!("  2. Run 'dake show' to preview the environment");
        println!("  3. Run 'dake' to enter it");

        Ok(0)
    }

    fn write_marker(&self, marker_name: &str) -> Result<PathBuf> {
        let marker_path = self.path.join(marker_name);

        if marker_path.exists() && !self.force {
            return Err(miette::miette!(
                help = "Pass --force to replace it",
                "{marker_name} already exists at {:?}",
                marker_path
            ));
        }

        std::fs::write(&marker_path, self.generate_template())
            .map_err(|e| miette::miette!("Failed to write {}: {}", marker_path.display(), e))?;

        Ok(marker_path)
    }

    fn generate_template(&self) -> String {
        let packages = if self.packages.is_empty() {
            "    # git\n    # jq\n".to_string()
        } else {
            self.packages
                .iter()
                .map(|p| format!("    {p}\n"))
                .collect::<String>()
        };

        format!(
            "# Development environment for this project.\n\
            # Enter it from anywhere in the tree with 'dake'.\n\
            {{ pkgs ? import <nixpkgs> {{ }} }}:\n\
            \n\
            pkgs.mkShell {{\n  \
              buildInputs = with pkgs; [\n\
            {packages}  \
              ];\n\
            }}\n"
        )
    }
}
