//! Walking every page of one season partition.

use std::future::Future;

use anisync_anilist::{AniListClient, FetchError, MediaItem, Page, PageRequest, SeasonQuery};

/// Anything that can serve season pages. Implemented by [`AniListClient`];
/// tests substitute a scripted source.
pub trait PageSource {
    fn fetch_page(
        &self,
        query: &SeasonQuery,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page, FetchError>>;
}

impl PageSource for AniListClient {
    fn fetch_page(
        &self,
        query: &SeasonQuery,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page, FetchError>> {
        self.fetch_season_page(query, request)
    }
}

/// Pages collected for one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionResult {
    pub query: SeasonQuery,
    /// Successfully fetched pages, in page order.
    pub pages: Vec<Page>,
    /// Requests issued, including the failed one if any.
    pub requests: u32,
    pub failed_pages: u32,
}

impl PartitionResult {
    fn new(query: SeasonQuery) -> Self {
        Self {
            query,
            pages: Vec::new(),
            requests: 0,
            failed_pages: 0,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &MediaItem> {
        self.pages.iter().flat_map(|p| p.media.iter())
    }

    pub fn into_records(self) -> impl Iterator<Item = MediaItem> {
        self.pages.into_iter().flat_map(|p| p.media)
    }
}

/// Fetch pages 1, 2, ... of a partition until a page reports it is the last.
///
/// A failed fetch counts as an empty page (`lastPage` 0), so it ends the walk
/// and whatever was collected so far is returned. Nothing is retried.
pub async fn walk_partition<S: PageSource>(
    source: &S,
    query: &SeasonQuery,
    per_page: u32,
) -> PartitionResult {
    let mut result = PartitionResult::new(*query);
    let mut page_no = 1;

    loop {
        let request = PageRequest {
            page: page_no,
            per_page,
        };
        result.requests += 1;

        let page = match source.fetch_page(query, request).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Failed to fetch {} page {}: {}", query, page_no, e);
                result.failed_pages += 1;
                break;
            }
        };

        // A server echoing a stale currentPage must not keep the walk alive.
        let done = page.is_last() || page_no >= page.page_info.last_page;
        result.pages.push(page);
        if done {
            break;
        }
        page_no += 1;
    }

    result
}
