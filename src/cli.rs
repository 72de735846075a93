// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "sitewalker",
    version = "0.1.0",
    about = "A CLI tool to concurrently crawl a page graph and report fetch outcomes",
    long_about = "sitewalker walks a page graph from a seed URL, fetching each page at most once \
                  and following links concurrently up to a depth limit. At the end it reports, \
                  per page, whether the fetch succeeded or why it failed."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (demo, graph)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the built-in sample site
    ///
    /// Example: sitewalker demo --max-depth 3
    Demo {
        /// Maximum crawl depth (default: 4)
        ///
        /// Depth 1 = just the seed page
        /// Depth 2 = seed page + everything it links to
        /// etc. Depth 0 fetches nothing at all.
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Crawl a page graph described by a JSON file
    ///
    /// The file maps page ids to bodies and outbound links:
    ///   { "pages": { "a": { "body": "Page A", "links": ["b"] }, ... } }
    ///
    /// Example: sitewalker graph site.json --seed a --max-depth 2
    Graph {
        /// Path to the JSON graph file
        graph_file: PathBuf,

        /// Page id to start crawling from
        #[arg(long)]
        seed: String,

        /// Maximum crawl depth (default: 4)
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
