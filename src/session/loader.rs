//! Sequential background enrichment
//!
//! Auxiliary per-item data arrives one page at a time: page N+1 is
//! requested only after page N resolves, and every resolved page hands
//! the host the full collection revealed so far to replace its previous
//! partial render. An eventually-consistent incremental reveal, not a
//! transactional batch update.

use anyhow::Result;
use async_trait::async_trait;

/// Source of paginated auxiliary data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher<T: Send + 'static>: Send {
    /// Fetch one zero-based page; `None` means there are no further pages
    async fn fetch_page(&mut self, page: u32) -> Result<Option<Vec<T>>>;
}

/// Drain a fetcher strictly sequentially.
///
/// `on_page` is invoked after every resolved page with the collection
/// accumulated so far. Stops on the first `None` or empty page; a fetch
/// error aborts the reveal and propagates, leaving already-revealed pages
/// with the host.
pub async fn load_all<T, F, P>(fetcher: &mut F, mut on_page: P) -> Result<Vec<T>>
where
    T: Clone + Send + 'static,
    F: PageFetcher<T> + ?Sized,
    P: FnMut(&[T]) + Send,
{
    let mut items: Vec<T> = Vec::new();
    let mut page = 0;
    while let Some(batch) = fetcher.fetch_page(page).await? {
        if batch.is_empty() {
            break;
        }
        items.extend(batch);
        on_page(&items);
        page += 1;
    }
    tracing::debug!(pages = page, items = items.len(), "enrichment complete");
    Ok(items)
}
