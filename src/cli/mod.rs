//! Command-line interface for castgraph.

mod commands;

use clap::{Parser, Subcommand};

/// castgraph - TV series cast/crew graph explorer
/// Tracks series, crawls their people via TMDB, and draws the shared-people
/// graph.
#[derive(Parser)]
#[command(name = "castgraph")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Store the TMDB API bearer credential
    Auth {
        /// TMDB API read access token
        token: String,
    },

    /// Search TMDB for series without tracking anything
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Track a series and crawl its cast, crew, and related series
    #[command(alias = "a")]
    Add {
        /// Series id, or a search query to pick from
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Untrack a series (its stored records are kept)
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Series id to untrack
        id: String,
    },

    /// List tracked series
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show stored details about a series
    #[command(alias = "i")]
    Info {
        /// Series id
        id: String,
    },

    /// Show people appearing across multiple tracked series
    Shared,

    /// Render the tracked graph as an interactive force layout
    #[command(alias = "g")]
    Graph {
        /// Print the nodes/links document instead of opening a window
        #[arg(long)]
        json: bool,
    },
}

pub use commands::*;
