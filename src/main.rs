// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! modbox CLI - resolver diagnostics over a project graph snapshot

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modbox::{module_path, resolve, Directory, Externals, Module, VERSION};
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::path::PathBuf;

/// Project graph snapshot as the project store serializes it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProjectFile {
    modules: Vec<Module>,
    directories: Vec<Directory>,
    #[allow(dead_code)]
    externals: Externals,
}

#[derive(Parser)]
#[command(
    name = "modbox",
    about = "Resolver diagnostics for the modbox module runtime",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Project graph snapshot (JSON)
    #[arg(short, long, default_value = "project.json")]
    project: PathBuf,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a require path against the virtual tree
    Resolve {
        /// The path as a module would require it (./App, ../utils/fmt)
        path: String,

        /// Shortid of the directory to anchor the search at
        #[arg(long)]
        from: Option<String>,
    },

    /// Print the virtual path of a module id
    Path {
        /// Module id to look up
        id: String,
    },

    /// Print the whole virtual tree
    Tree,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("modbox=trace")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("modbox=warn")
            .init();
    }

    let raw = std::fs::read_to_string(&cli.project)
        .with_context(|| format!("failed to read {}", cli.project.display()))?;
    let project: ProjectFile =
        serde_json::from_str(&raw).context("failed to parse project snapshot")?;

    match cli.command {
        Command::Resolve { path, from } => {
            match resolve(&path, &project.modules, &project.directories, from.as_deref()) {
                Ok(module) => {
                    let virtual_path = module_path(&project.modules, &project.directories, &module.id)
                        .unwrap_or_else(|| module.title.clone());
                    println!(
                        "{} {} ({})",
                        "resolved".green().bold(),
                        virtual_path.cyan(),
                        module.id.dimmed()
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }
        Command::Path { id } => match module_path(&project.modules, &project.directories, &id) {
            Some(virtual_path) => println!("{virtual_path}"),
            None => {
                eprintln!("{}: no module with id '{}'", "Error".red().bold(), id.cyan());
                std::process::exit(1);
            }
        },
        Command::Tree => print_tree(&project, None, 0),
    }

    Ok(())
}

/// Print directories first, then modules, the way file pickers do.
fn print_tree(project: &ProjectFile, parent: Option<&str>, indent: usize) {
    let pad = "  ".repeat(indent);
    for dir in project
        .directories
        .iter()
        .filter(|d| normalize(d.directory_shortid.as_deref()) == parent)
    {
        println!("{pad}{}/", dir.title.blue().bold());
        print_tree(project, Some(&dir.shortid), indent + 1);
    }
    for module in project
        .modules
        .iter()
        .filter(|m| normalize(m.directory_shortid.as_deref()) == parent)
    {
        println!("{pad}{}", module.title);
    }
}

fn normalize(shortid: Option<&str>) -> Option<&str> {
    shortid.filter(|s| !s.is_empty())
}
