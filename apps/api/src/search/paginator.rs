use serde::Serialize;
use url::Url;

use super::errors::SearchError;
use crate::domain::repositories::PageRequest;

/// Results per search page
pub const PAGE_SIZE: usize = 10;

/// One page of results with links to its neighbours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
    pub total_count: i64,
}

/// Search response body, with or without page metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResponse<T> {
    Paginated(Page<T>),
    Unpaginated { results: Vec<T>, total_count: i64 },
}

impl<T> SearchResponse<T> {
    pub fn total_count(&self) -> i64 {
        match self {
            SearchResponse::Paginated(page) => page.total_count,
            SearchResponse::Unpaginated { total_count, .. } => *total_count,
        }
    }

    pub fn results(&self) -> &[T] {
        match self {
            SearchResponse::Paginated(page) => &page.results,
            SearchResponse::Unpaginated { results, .. } => results,
        }
    }

    /// Converts the results, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchResponse<U> {
        match self {
            SearchResponse::Paginated(page) => SearchResponse::Paginated(Page {
                count: page.count,
                next: page.next,
                previous: page.previous,
                results: page.results.into_iter().map(f).collect(),
                total_count: page.total_count,
            }),
            SearchResponse::Unpaginated {
                results,
                total_count,
            } => SearchResponse::Unpaginated {
                results: results.into_iter().map(f).collect(),
                total_count,
            },
        }
    }
}

/// Page-number pagination over a counted result set
///
/// Links are absolute and derived from the request URL, so every other
/// query parameter survives the page change.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    request_url: Url,
}

impl Paginator {
    pub fn new(page_size: usize, request_url: Url) -> Self {
        Self {
            page_size: page_size.max(1),
            request_url,
        }
    }

    fn page_count(&self, total: i64) -> usize {
        let total = total.max(0) as usize;
        (total + self.page_size - 1) / self.page_size
    }

    /// Window for `page`, rejecting pages past the end
    ///
    /// Page 1 of an empty result is a valid, empty page.
    pub fn window(&self, page: usize, total: i64) -> Result<PageRequest, SearchError> {
        let last = self.page_count(total).max(1);
        if page == 0 || page > last {
            return Err(SearchError::InvalidParameters("Invalid page.".to_string()));
        }

        Ok(PageRequest::for_page(self.page_size, page))
    }

    /// Wraps the results fetched for `page`
    pub fn page<T>(&self, page: usize, total: i64, results: Vec<T>) -> Page<T> {
        let next = (page < self.page_count(total)).then(|| self.link(page + 1));
        let previous = (page > 1).then(|| self.link(page - 1));

        Page {
            count: total,
            next,
            previous,
            results,
            total_count: total,
        }
    }

    fn link(&self, page: usize) -> String {
        let mut url = self.request_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() && page == 1 {
            url.set_query(None);
            return url.to_string();
        }

        {
            let mut query = url.query_pairs_mut();
            query.clear().extend_pairs(&kept);
            if page > 1 {
                query.append_pair("page", &page.to_string());
            }
        }

        url.to_string()
    }
}
