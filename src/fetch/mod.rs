// src/fetch/mod.rs
// =============================================================================
// This module defines the fetch capability - how the crawler gets pages.
//
// The crawler itself never talks to the outside world directly. Instead it is
// handed something that implements the Fetcher trait, and all it knows is:
// "give me a page id, I give you back a body and outbound links, or an error".
//
// Why a trait instead of a concrete fetcher?
// - The crawler stays decoupled from where pages actually come from
// - Tests can inject tiny synthetic graphs and failure cases
// - The demo dataset and a JSON graph file both plug in the same way
//
// Rust concepts:
// - Traits: Interfaces that types can implement
// - Trait objects (dyn Fetcher): Runtime polymorphism, so the crawler
//   doesn't need to be generic over every fetcher type
// - async-trait: Async functions in traits need a helper crate (for now)
// =============================================================================

mod dataset;

// Re-export the dataset fetcher so callers write `fetch::SiteDataset`
pub use dataset::{PageData, SiteDataset};

use async_trait::async_trait;
use thiserror::Error;

// A successfully fetched page: its body text plus every outbound link found
// on it. The links are page ids in their own right - the crawler will try
// to fetch each of them at the next depth level.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The page content (only used for progress output, never stored)
    pub body: String,
    /// Outbound page ids, in the order the page lists them
    pub links: Vec<String>,
}

// Why a page could not be fetched
//
// thiserror generates the Display impl from the #[error(...)] attributes,
// so the cause string that ends up in the final report comes from here.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The fetcher has no page under this id
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure, with a human-readable cause
    #[error("{0}")]
    Other(String),
}

// The fetch capability the crawler depends on.
//
// Contract (what the crawler guarantees and expects):
// - fetch() is called at most once per page id during a crawl
// - fetch() may be called concurrently for *different* page ids,
//   so implementations must be Send + Sync
// - a failed fetch is a normal outcome, not a crash - the crawler records
//   the cause and simply stops exploring that branch
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page under `url`, returning its body and outbound links.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Rust traits can't (yet) contain plain async fns if you also want
//      trait objects (dyn Fetcher)
//    - The async-trait macro rewrites the async fn into one returning a
//      boxed future, which works fine with dyn
//
// 2. What does Send + Sync mean here?
//    - Send: the value can move to another thread
//    - Sync: the value can be shared (&T) between threads
//    - The crawler spawns tasks that all hold a reference to the fetcher,
//      so the compiler requires both
//
// 3. Why does NotFound carry the url?
//    - The error message becomes the failure cause in the final report
//    - "not found: https://example.org/missing/" tells you exactly which
//      link was dangling
// -----------------------------------------------------------------------------
