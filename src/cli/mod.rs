//! CLI module - Command-line interface for Oniscenary
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{CategoryFilter, ViewMode};
use crate::domain::{Category, Status};

/// Oniscenary - personal catalog of anime, movies and manga
#[derive(Parser)]
#[command(name = "oniscenary")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a remote `/api/data` endpoint as the store (e.g. http://localhost:3000)
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Keep the catalog in memory only; nothing is read from or written to disk
    #[arg(long, global = true, conflicts_with = "remote")]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    #[command(alias = "web")]
    Serve,

    /// Show one page of the catalog
    #[command(alias = "ls", alias = "l")]
    List {
        /// Case-insensitive title search
        #[arg(long, short, default_value = "")]
        search: String,
        /// Anime, Movie, Manga or All
        #[arg(long, short, default_value = "All")]
        category: CategoryFilter,
        /// Genre filter (movies only)
        #[arg(long, short, default_value = "All")]
        genre: String,
        /// all, ranking or history
        #[arg(long, short, default_value = "all")]
        mode: ViewMode,
        /// 1-based page number
        #[arg(long, short, default_value = "1")]
        page: usize,
    },

    /// Show the number of records per category
    Counts,

    /// Add a record to the catalog
    #[command(alias = "a")]
    Add {
        /// Record title
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long, default_value = "Anime")]
        category: Category,
        #[arg(long, default_value = "PlanToWatch")]
        status: Status,
        /// Score between 0 and 10
        #[arg(long)]
        rating: Option<f64>,
        /// Comma-separated genres
        #[arg(long)]
        genres: Option<String>,
        /// Manual rank; lower shows first in the default view
        #[arg(long)]
        rank: Option<u32>,
        /// Playback URL
        #[arg(long)]
        url: Option<String>,
        /// Poster image URL
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a record by id
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Record id
        id: String,
    },

    /// Import records from an exported JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Replace the catalog instead of merging into it
        #[arg(long)]
        replace: bool,
    },

    /// Export the catalog to a JSON file
    Export {
        /// Destination path
        file: PathBuf,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_flag_is_global() {
        let cli = Cli::try_parse_from(["oniscenary", "counts", "--ephemeral"]).unwrap();
        assert!(cli.ephemeral);
        assert!(matches!(cli.command, Some(Commands::Counts)));
    }

    #[test]
    fn ephemeral_conflicts_with_remote() {
        let result = Cli::try_parse_from([
            "oniscenary",
            "--ephemeral",
            "--remote",
            "http://localhost:3000",
            "counts",
        ]);
        assert!(result.is_err());
    }
}
