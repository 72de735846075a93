// src/fetch/dataset.rs
// =============================================================================
// This module implements an in-memory page graph that acts as a Fetcher.
//
// A SiteDataset is just a map from page id to (body, links). Fetching a page
// looks it up in the map; ids that aren't in the map fail with NotFound,
// which is how dangling links show up as failures in the report.
//
// Two ways to build one:
// - SiteDataset::sample() - a small built-in site for the `demo` subcommand
// - SiteDataset::load() - read a JSON graph file, so you can crawl any
//   synthetic graph from the command line
//
// Rust concepts:
// - HashMap: Key-value storage with O(1) lookup
// - serde derive: JSON (de)serialization generated from the struct shape
// - Builder-style methods: with_page() returns self for chaining
// =============================================================================

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FetchError, FetchedPage, Fetcher};

// One page in the dataset: its body text and outbound links
//
// #[serde(default)] on links means a page with no "links" key in the JSON
// file is simply a leaf page, instead of a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    /// The page content
    pub body: String,
    /// Page ids this page links to
    #[serde(default)]
    pub links: Vec<String>,
    /// If set, fetching this page fails with this cause instead of
    /// returning the body - lets graph files script failures other than
    /// dangling links (a flaky server, a permission error, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,
}

// A whole in-memory site: page id -> page data
//
// The JSON file format mirrors this struct directly:
//
//   {
//     "pages": {
//       "https://example.org/": { "body": "Home", "links": ["..."] }
//     }
//   }
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteDataset {
    pub pages: HashMap<String, PageData>,
}

impl SiteDataset {
    // Creates an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    // Adds a page and returns self, so datasets can be built by chaining:
    //
    //   SiteDataset::new()
    //       .with_page("a", "Page A", &["b", "c"])
    //       .with_page("b", "Page B", &[])
    pub fn with_page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            PageData {
                body: body.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
                fail: None,
            },
        );
        self
    }

    // Adds a page whose fetch always fails with the given cause
    pub fn with_failing_page(mut self, url: &str, cause: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            PageData {
                body: String::new(),
                links: Vec::new(),
                fail: Some(cause.to_string()),
            },
        );
        self
    }

    // Parses a dataset from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid graph JSON")
    }

    // Reads a dataset from a JSON graph file
    //
    // Used by the `graph` subcommand. Both the read and the parse get
    // context attached, so the error message names the file that failed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read graph file: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Could not parse graph file: {}", path.display()))
    }

    // The built-in demo site used by the `demo` subcommand.
    //
    // Small on purpose, but shaped to exercise everything interesting:
    // - /docs/ and /cli/ both link back to the root (a cycle)
    // - /docs/config/ is reachable from two different pages (deduplication)
    // - /cli/plugins/ is linked but doesn't exist (a failing fetch)
    pub fn sample() -> Self {
        Self::new()
            .with_page(
                "https://example.org/",
                "Example - Home",
                &["https://example.org/docs/", "https://example.org/cli/"],
            )
            .with_page(
                "https://example.org/docs/",
                "Documentation",
                &[
                    "https://example.org/",
                    "https://example.org/cli/",
                    "https://example.org/docs/config/",
                    "https://example.org/docs/api/",
                ],
            )
            .with_page(
                "https://example.org/cli/",
                "Command Line Tools",
                &[
                    "https://example.org/",
                    "https://example.org/docs/config/",
                    "https://example.org/cli/plugins/",
                ],
            )
            .with_page(
                "https://example.org/docs/config/",
                "Configuration Reference",
                &["https://example.org/", "https://example.org/docs/"],
            )
            .with_page(
                "https://example.org/docs/api/",
                "API Reference",
                &["https://example.org/", "https://example.org/docs/"],
            )
    }
}

// This is what makes a dataset usable as the crawler's fetch capability
#[async_trait]
impl Fetcher for SiteDataset {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match self.pages.get(url) {
            Some(page) => match &page.fail {
                Some(cause) => Err(FetchError::Other(cause.clone())),
                None => Ok(FetchedPage {
                    body: page.body.clone(),
                    links: page.links.clone(),
                }),
            },
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}
