// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the page source (built-in sample site, or a JSON graph file)
// 3. Run the crawl and collect the per-page report
// 4. Print the report and exit with proper code (0 = all fetched,
//    1 = failures in the report, 2 = error)
//
// Rust concepts used:
// - async/await: The crawl fans out into concurrent tasks
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
// The crawler core itself lives in the library (src/lib.rs)
mod cli;           // src/cli.rs - command-line parsing

// Import items we need from our modules
use std::sync::Arc;

use cli::{Cli, Commands};
use clap::Parser;  // Parser trait enables the parse() method

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

use sitewalker::crawl::{self, PageReport, PageStatus};
use sitewalker::fetch::SiteDataset;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = everything fetched
//   Ok(1) = at least one page failed to fetch
//   Err = unexpected error (bad graph file, etc.)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::Demo { max_depth, json } => {
            // The sample site always starts at its root page
            let site = SiteDataset::sample();
            handle_crawl(site, "https://example.org/", max_depth, json).await
        }
        Commands::Graph {
            graph_file,
            seed,
            max_depth,
            json,
        } => {
            let site = SiteDataset::load(&graph_file)?;
            handle_crawl(site, &seed, max_depth, json).await
        }
    }
}

// Runs a crawl over the given site and prints the report
//
// Parameters:
//   site: the in-memory page graph acting as the fetch capability
//   seed: page id to start from
//   max_depth: how many link hops to explore
//   json: whether to output JSON format
async fn handle_crawl(site: SiteDataset, seed: &str, max_depth: usize, json: bool) -> Result<i32> {
    println!("🔍 Crawling from seed: {}", seed);
    println!("📊 Max crawl depth: {}\n", max_depth);

    let reports = crawl::crawl(seed, max_depth, Arc::new(site)).await;

    println!("\n📄 Visited {} page(s)\n", reports.len());

    // Print results and determine exit code
    print_results(&reports, json)?;

    // Count how many pages failed to fetch
    let failed_count = reports.iter().filter(|r| !r.is_fetched()).count();

    if failed_count > 0 {
        Ok(1)  // Exit code 1 = failures in the report
    } else {
        Ok(0)  // Exit code 0 = all good
    }
}

// Prints the report either as a table or JSON
fn print_results(reports: &[PageReport], json: bool) -> Result<()> {
    if json {
        // Serialize the report to JSON and print
        let json_output = serde_json::to_string_pretty(reports)?;
        println!("{}", json_output);
    } else {
        // Print human-readable table
        print_table(reports);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(reports: &[PageReport]) {
    // Print table header
    println!("{:<60} {:<15} {:<30}", "URL", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(105));

    // Print each result
    for report in reports {
        let status_display = format_status(&report.status);
        let message = match &report.status {
            PageStatus::Fetched => String::new(),
            PageStatus::Failed { cause } => cause.clone(),
        };

        // Truncate URL if too long for display
        let url_display = if report.url.len() > 57 {
            format!("{}...", &report.url[..57])
        } else {
            report.url.clone()
        };

        println!("{:<60} {:<15} {:<30}", url_display, status_display, message);
    }

    println!();

    // Print summary
    let fetched_count = reports.iter().filter(|r| r.is_fetched()).count();
    let failed_count = reports.len() - fetched_count;

    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", fetched_count);
    println!("   ❌ Failed: {}", failed_count);
    println!("   📋 Total: {}", reports.len());
}

// Formats the status enum as a display string
fn format_status(status: &PageStatus) -> String {
    match status {
        PageStatus::Fetched => "✅ FETCHED".to_string(),
        PageStatus::Failed { .. } => "❌ FAILED".to_string(),
    }
}
