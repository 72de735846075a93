// src/crawl/explorer.rs
// =============================================================================
// This module implements the crawl itself: a depth-bounded, concurrent,
// recursive walk over the page graph.
//
// How it works, per page:
// 1. Out of depth? Stop - this branch is done
// 2. Try to claim the page in the registry; if another branch already has
//    it, stop - someone else fetched it (or is fetching it right now)
// 3. Fetch the page and record the outcome
// 4. On failure: stop - the failure stays local to this branch
// 5. On success: spawn one task per outbound link and wait for ALL of them
//    to finish before returning (the join barrier)
//
// Because every branch waits for its children, the top-level call returns
// only once the entire reachable subgraph (within the depth bound) has been
// visited. That's what makes the final report complete.
//
// Rust concepts:
// - tokio::spawn: Lightweight concurrent tasks, one per discovered link
// - join_all: Wait for a whole batch of tasks (our join barrier)
// - BoxFuture: An async fn can't directly call itself; boxing the returned
//   future breaks the infinitely-sized type the compiler would otherwise see
// - Arc: Shared ownership of the fetcher and registry across tasks
// =============================================================================

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};

use crate::fetch::Fetcher;

use super::registry::{PageReport, PageStatus, VisitedRegistry};

// Crawls the page graph reachable from `seed`, to at most `max_depth` hops,
// fetching each page at most once.
//
// Parameters:
//   seed: the page id to start from
//   max_depth: how many link hops to explore; 0 means don't even fetch the seed
//   fetcher: the capability used to fetch pages
//
// Returns: one PageReport per page attempted, sorted by page id.
//
// Fetch failures are recorded, not propagated - a dangling link shows up as
// a failed entry in the report while the rest of the crawl continues.
pub async fn crawl(seed: &str, max_depth: usize, fetcher: Arc<dyn Fetcher>) -> Vec<PageReport> {
    let registry = Arc::new(VisitedRegistry::new());

    explore(seed.to_string(), max_depth, fetcher, Arc::clone(&registry)).await;

    // Every branch has joined by now, so the snapshot is the full result
    registry.snapshot()
}

// Explores one page and, recursively, everything it links to.
//
// Returns a boxed future instead of being an async fn because it calls
// itself: the recursion happens through tokio::spawn, which needs an owned
// 'static future for each child task.
fn explore(
    url: String,
    depth: usize,
    fetcher: Arc<dyn Fetcher>,
    registry: Arc<VisitedRegistry>,
) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        // Depth exhausted - normal termination, not an error
        if depth == 0 {
            return;
        }

        // Lost the claim - some other branch owns this page
        if !registry.claim(&url) {
            return;
        }

        println!("  Crawling [depth {}]: {}", depth, url);

        match fetcher.fetch(&url).await {
            Ok(page) => {
                // Record before recursing, so the outcome is visible to any
                // branch that discovers this page while children are running
                registry.record(&url, PageStatus::Fetched);
                println!("  Found: {} ({:?})", url, page.body);

                // Fan out: one task per outbound link
                let children: Vec<_> = page
                    .links
                    .into_iter()
                    .map(|link| {
                        tokio::spawn(explore(
                            link,
                            depth - 1,
                            Arc::clone(&fetcher),
                            Arc::clone(&registry),
                        ))
                    })
                    .collect();

                // Join barrier: this branch is not done until every child is.
                // A JoinError only happens if a child panicked.
                for joined in join_all(children).await {
                    if let Err(e) = joined {
                        eprintln!("  Warning: crawl task failed: {}", e);
                    }
                }
            }
            Err(e) => {
                // Failure terminates this branch only; siblings keep going
                registry.record(
                    &url,
                    PageStatus::Failed {
                        cause: e.to_string(),
                    },
                );
                eprintln!("  Warning: Failed to fetch {}: {}", url, e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchedPage, SiteDataset};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Wraps a dataset and counts how many times each page gets fetched, so
    // tests can assert the at-most-once contract
    struct CountingFetcher {
        inner: SiteDataset,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl CountingFetcher {
        fn new(inner: SiteDataset) -> Self {
            Self {
                inner,
                calls: Mutex::new(HashMap::new()),
            }
        }

        fn calls_for(&self, url: &str) -> usize {
            *self.calls.lock().unwrap().get(url).unwrap_or(&0)
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_insert(0) += 1;
            self.inner.fetch(url).await
        }
    }

    // The graph from the classic exercise: a and c are reachable over
    // multiple paths, and a <-> b form a cycle
    fn cyclic_site() -> SiteDataset {
        SiteDataset::new()
            .with_page("a", "ok", &["b", "c"])
            .with_page("b", "ok", &["a", "c"])
            .with_page("c", "ok", &[])
    }

    #[tokio::test]
    async fn test_crawl_deduplicates_shared_pages() {
        let fetcher = Arc::new(CountingFetcher::new(cyclic_site()));
        let reports = crawl("a", 4, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        let urls: Vec<&str> = reports.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
        assert!(reports.iter().all(|r| r.is_fetched()));

        // Multiple parents, exactly one fetch each
        for url in ["a", "b", "c"] {
            assert_eq!(fetcher.calls_for(url), 1, "page {} fetched more than once", url);
        }
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let fetcher = Arc::new(CountingFetcher::new(cyclic_site()));
        let reports = crawl("a", 0, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        assert!(reports.is_empty());
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_depth_bound_limits_hops() {
        // A straight chain: d is 3 hops from the seed
        let site = SiteDataset::new()
            .with_page("a", "ok", &["b"])
            .with_page("b", "ok", &["c"])
            .with_page("c", "ok", &["d"])
            .with_page("d", "ok", &[]);

        let reports = crawl("a", 2, Arc::new(site)).await;
        let urls: Vec<&str> = reports.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failing_seed_reports_single_failure() {
        let reports = crawl("x", 2, Arc::new(SiteDataset::new())).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].url, "x");
        assert_eq!(
            reports[0].status,
            PageStatus::Failed {
                cause: "not found: x".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_branch() {
        // "broken" doesn't exist; its siblings (and their children) must
        // still be crawled
        let site = SiteDataset::new()
            .with_page("root", "ok", &["broken", "left", "right"])
            .with_page("left", "ok", &["left/leaf"])
            .with_page("left/leaf", "ok", &[])
            .with_page("right", "ok", &[]);

        let reports = crawl("root", 4, Arc::new(site)).await;

        let fetched: Vec<&str> = reports
            .iter()
            .filter(|r| r.is_fetched())
            .map(|r| r.url.as_str())
            .collect();
        assert_eq!(fetched, vec!["left", "left/leaf", "right", "root"]);

        let failed: Vec<&str> = reports
            .iter()
            .filter(|r| !r.is_fetched())
            .map(|r| r.url.as_str())
            .collect();
        assert_eq!(failed, vec!["broken"]);
    }

    #[tokio::test]
    async fn test_dense_graph_fetches_each_page_once() {
        // Every page links to every other page; without atomic claiming
        // this is exactly the graph that provokes duplicate fetches
        let pages = ["p0", "p1", "p2", "p3", "p4", "p5"];
        let mut site = SiteDataset::new();
        for page in pages {
            let links: Vec<&str> = pages.iter().copied().filter(|p| *p != page).collect();
            site = site.with_page(page, "ok", &links);
        }

        let fetcher = Arc::new(CountingFetcher::new(site));
        let reports = crawl("p0", 6, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        assert_eq!(reports.len(), pages.len());
        for page in pages {
            assert_eq!(fetcher.calls_for(page), 1, "page {} fetched more than once", page);
        }
    }

    #[tokio::test]
    async fn test_outcomes_are_stable_after_crawl_completes() {
        let registry = Arc::new(VisitedRegistry::new());
        let fetcher: Arc<dyn Fetcher> = Arc::new(cyclic_site());

        explore("a".to_string(), 4, fetcher, Arc::clone(&registry)).await;

        // Nothing mutates the registry once the crawl has joined
        let first = registry.get("a");
        let second = registry.get("a");
        assert_eq!(first, Some(PageStatus::Fetched));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_crawl_of_sample_site_reports_one_failure() {
        let reports = crawl("https://example.org/", 4, Arc::new(SiteDataset::sample())).await;

        // 5 real pages plus the dangling /cli/plugins/ link
        assert_eq!(reports.len(), 6);
        assert_eq!(reports.iter().filter(|r| !r.is_fetched()).count(), 1);
    }
}
