// src/crawl/registry.rs
// =============================================================================
// This module implements the visited registry - the one piece of state that
// all concurrent crawl branches share.
//
// The registry answers two questions:
// 1. "Has anyone started on this page yet?" (claim - deduplication)
// 2. "How did fetching this page go?" (record/get/snapshot - reporting)
//
// Claiming is the critical operation. Many branches can discover the same
// page at the same time, and exactly one of them may fetch it. claim() does
// an atomic insert-if-absent under the mutex: the first caller gets true and
// proceeds to fetch, every other caller gets false and skips. Recording the
// outcome is a separate, later write by whoever won the claim.
//
// Rust concepts:
// - Mutex: Mutual exclusion around the shared map
// - HashMap entry API: Check-and-insert as a single operation
// - Enums with data: A slot is either in-flight or done-with-outcome
// =============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

// How fetching a page turned out
//
// Serializes with an internal "status" tag, so JSON reports read naturally:
//   { "url": "...", "status": "fetched" }
//   { "url": "...", "status": "failed", "cause": "not found: ..." }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// The page was fetched successfully
    Fetched,
    /// The fetch failed, with the cause
    Failed { cause: String },
}

// One line of the final report: a page and how its fetch went
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// The page id that was fetched (or attempted)
    pub url: String,
    #[serde(flatten)]
    pub status: PageStatus,
}

impl PageReport {
    /// True if this page was fetched without error
    pub fn is_fetched(&self) -> bool {
        matches!(self.status, PageStatus::Fetched)
    }
}

// A slot in the registry. A page is claimed the moment a branch decides to
// fetch it, and only gets an outcome once that fetch finishes. In-flight
// entries exist so a second branch can't sneak in between the claim and the
// record.
#[derive(Debug, Clone)]
enum Slot {
    InFlight,
    Done(PageStatus),
}

// The shared visited-page store.
//
// One mutex guards the whole map. Every operation is a single map access
// with no I/O under the lock, so contention stays negligible even with many
// branches running. The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    pages: Mutex<HashMap<String, Slot>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Atomically claims a page for fetching.
    //
    // Returns true if the caller is the first to claim this id and should go
    // ahead and fetch it. Returns false if some branch already claimed or
    // finished it - the caller must skip the fetch entirely.
    pub fn claim(&self, url: &str) -> bool {
        let mut pages = self.pages.lock().unwrap();
        match pages.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Slot::InFlight);
                true
            }
        }
    }

    // Records the fetch outcome for a claimed page.
    //
    // Last write wins, but in practice the branch that won the claim is the
    // only writer for its id.
    pub fn record(&self, url: &str, status: PageStatus) {
        let mut pages = self.pages.lock().unwrap();
        pages.insert(url.to_string(), Slot::Done(status));
    }

    // Looks up the recorded outcome for a page.
    //
    // A page that is claimed but still being fetched reads as None - only
    // finished outcomes are observable.
    pub fn get(&self, url: &str) -> Option<PageStatus> {
        let pages = self.pages.lock().unwrap();
        match pages.get(url) {
            Some(Slot::Done(status)) => Some(status.clone()),
            _ => None,
        }
    }

    // Returns every recorded outcome, sorted by page id.
    //
    // Meant to be called after the crawl has fully joined, at which point no
    // in-flight slots remain. Map iteration order is arbitrary, so we sort
    // to keep reports stable run to run.
    pub fn snapshot(&self) -> Vec<PageReport> {
        let pages = self.pages.lock().unwrap();
        let mut reports: Vec<PageReport> = pages
            .iter()
            .filter_map(|(url, slot)| match slot {
                Slot::Done(status) => Some(PageReport {
                    url: url.clone(),
                    status: status.clone(),
                }),
                Slot::InFlight => None,
            })
            .collect();
        reports.sort_by(|a, b| a.url.cmp(&b.url));
        reports
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Mutex and not RwLock?
//    - Almost every operation here writes (claim inserts, record inserts)
//    - A RwLock only pays off when reads vastly outnumber writes
//
// 2. Why is .lock().unwrap() okay here?
//    - lock() only fails if another thread panicked while holding the lock
//      (a "poisoned" mutex)
//    - At that point the crawl is already broken, so propagating the panic
//      is the right move
//
// 3. What is the entry API?
//    - pages.entry(key) gives you a view that is either Occupied or Vacant
//    - Checking and inserting through it is one operation under the lock,
//      which is exactly the atomicity claim() needs
//    - A contains_key() check followed by a separate insert() would open a
//      window between the two calls
//
// 4. Why does Slot exist instead of storing PageStatus directly?
//    - Between "we decided to fetch this" and "the fetch finished" the page
//      must already count as taken, or a concurrent branch would fetch it a
//      second time
//    - InFlight is that in-between state
// -----------------------------------------------------------------------------
