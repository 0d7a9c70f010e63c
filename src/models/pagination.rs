//! Pagination, page-link and paged-response primitives shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters.
///
/// Construction never fails: an oversized page size is silently clamped to
/// [`Self::MAX_PAGE_SIZE`], non-positive values are clamped to 1, and a
/// missing page number defaults to 1. A page number past the last page is
/// not an error; it simply yields an empty page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Maximum items per page.
    pub const MAX_PAGE_SIZE: i64 = 20;

    /// Default items per page.
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    pub fn limit(&self) -> i64 {
        self.page_size
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(1, Self::MAX_PAGE_SIZE)
    }

    pub fn current_page(&self) -> i64 {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        // Saturating: an absurd page number must yield an empty page, not an
        // overflow or a negative OFFSET.
        (self.current_page() - 1).saturating_mul(self.limit())
    }
}

/// One page of an ordered, filtered collection plus the metadata needed to
/// page through it. Built once per request and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl<T> PagedResult<T> {
    /// `total_count` is the size of the filtered collection before slicing;
    /// `items` is the slice at offset `(current_page - 1) * page_size`.
    pub fn new(items: Vec<T>, total_count: i64, page: &PageQuery) -> Self {
        let page_size = page.limit();
        // Ceiling division; zero pages for an empty collection.
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            items,
            total_count,
            page_size,
            current_page: page.current_page(),
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Project the items while keeping the page metadata intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Filter criteria that can be reproduced on a page link.
///
/// Implementations must return pairs in a stable order so that identical
/// filters always render identical locators.
pub trait LinkFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Which page a generated locator should address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Previous,
    Current,
    Next,
}

/// Build the locator for a page of a filtered collection.
///
/// Pure function of its inputs: filter fields and page size are carried over
/// verbatim, only the page number differs between the previous/current/next
/// variants. Callers must consult [`PagedResult::has_previous`] /
/// [`PagedResult::has_next`] before asking for the adjacent variants.
pub fn page_link<F: LinkFilters>(
    base_path: &str,
    filters: &F,
    page: &PageQuery,
    target: PageTarget,
) -> String {
    let page_number = match target {
        PageTarget::Previous => page.current_page() - 1,
        PageTarget::Current => page.current_page(),
        PageTarget::Next => page.current_page().saturating_add(1),
    };

    // Filter values are percent-encoded so the locator re-parses to the
    // exact same filtered view.
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in filters.query_pairs() {
        query.append_pair(key, &value);
    }
    query.append_pair("pageNumber", &page_number.to_string());
    query.append_pair("pageSize", &page.limit().to_string());

    format!("{base_path}?{}", query.finish())
}

/// Pagination metadata exposed to API clients alongside a page of items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<String>,
}

impl PaginationMeta {
    pub fn new<T, F: LinkFilters>(
        result: &PagedResult<T>,
        base_path: &str,
        filters: &F,
        page: &PageQuery,
    ) -> Self {
        let previous_page_link = result
            .has_previous()
            .then(|| page_link(base_path, filters, page, PageTarget::Previous));
        let next_page_link = result
            .has_next()
            .then(|| page_link(base_path, filters, page, PageTarget::Next));

        Self {
            total_count: result.total_count,
            page_size: result.page_size,
            current_page: result.current_page,
            total_pages: result.total_pages,
            previous_page_link,
            next_page_link,
        }
    }
}

/// Body of a paged list endpoint: the items plus navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PagedResponse<T> {
    pub fn new<F: LinkFilters>(
        result: PagedResult<T>,
        base_path: &str,
        filters: &F,
        page: &PageQuery,
    ) -> Self {
        let pagination = PaginationMeta::new(&result, base_path, filters, page);
        Self {
            items: result.items,
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFilters {
        search_query: Option<String>,
        genre: Option<String>,
    }

    impl LinkFilters for TestFilters {
        fn query_pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs = Vec::new();
            if let Some(ref q) = self.search_query {
                pairs.push(("searchQuery", q.clone()));
            }
            if let Some(ref g) = self.genre {
                pairs.push(("genre", g.clone()));
            }
            pairs
        }
    }

    fn query(page_number: i64, page_size: i64) -> PageQuery {
        PageQuery {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    #[test]
    fn page_query_defaults() {
        let p = PageQuery::default();
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn page_query_clamps_oversized_page_size() {
        for size in [21, 100, i64::MAX] {
            let p = query(1, size);
            assert_eq!(p.limit(), 20);
        }
    }

    #[test]
    fn page_query_clamps_non_positive_values() {
        let p = PageQuery {
            page_number: Some(0),
            page_size: Some(-5),
        };
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_is_page_number_minus_one_times_page_size() {
        assert_eq!(query(2, 10).offset(), 10);
        assert_eq!(query(3, 7).offset(), 14);
        assert_eq!(query(1, 20).offset(), 0);
    }

    #[test]
    fn offset_saturates_for_huge_page_numbers() {
        let p = query(i64::MAX, 10);
        assert_eq!(p.offset(), i64::MAX);
        assert!(p.offset() >= 0);
    }

    #[test]
    fn paged_result_middle_page() {
        // 25 items, page 2 of size 10 -> items [10, 20), three pages total.
        let items: Vec<i64> = (10..20).collect();
        let result = PagedResult::new(items, 25, &query(2, 10));
        assert_eq!(result.total_pages, 3);
        assert!(result.has_previous());
        assert!(result.has_next());
        assert_eq!(result.items.len(), 10);
    }

    #[test]
    fn paged_result_empty_collection() {
        let result = PagedResult::<i64>::new(vec![], 0, &query(1, 10));
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_previous());
        assert!(!result.has_next());
        assert!(result.items.is_empty());
    }

    #[test]
    fn paged_result_exact_multiple() {
        let result = PagedResult::<i64>::new(vec![], 30, &query(3, 10));
        assert_eq!(result.total_pages, 3);
        assert!(result.has_previous());
        assert!(!result.has_next());
    }

    #[test]
    fn paged_result_page_beyond_end_is_empty_not_an_error() {
        let result = PagedResult::<i64>::new(vec![], 5, &query(9, 10));
        assert_eq!(result.total_pages, 1);
        assert!(result.items.is_empty());
        assert!(!result.has_next());
    }

    #[test]
    fn paged_result_map_keeps_metadata() {
        let result = PagedResult::new(vec![1, 2, 3], 3, &query(1, 10));
        let mapped = result.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1", "2", "3"]);
        assert_eq!(mapped.total_count, 3);
        assert_eq!(mapped.total_pages, 1);
    }

    #[test]
    fn page_link_varies_only_page_number() {
        let filters = TestFilters {
            search_query: Some("king".into()),
            genre: Some("Horror".into()),
        };
        let page = query(2, 10);

        let prev = page_link("/api/v1/authors", &filters, &page, PageTarget::Previous);
        let next = page_link("/api/v1/authors", &filters, &page, PageTarget::Next);

        assert_eq!(
            prev,
            "/api/v1/authors?searchQuery=king&genre=Horror&pageNumber=1&pageSize=10"
        );
        assert_eq!(
            next,
            "/api/v1/authors?searchQuery=king&genre=Horror&pageNumber=3&pageSize=10"
        );
    }

    #[test]
    fn page_link_is_deterministic() {
        let filters = TestFilters {
            search_query: None,
            genre: Some("Fantasy".into()),
        };
        let page = query(4, 5);
        let a = page_link("/api/v1/authors", &filters, &page, PageTarget::Next);
        let b = page_link("/api/v1/authors", &filters, &page, PageTarget::Next);
        assert_eq!(a, b);
    }

    #[test]
    fn page_link_omits_absent_filters() {
        let filters = TestFilters {
            search_query: None,
            genre: None,
        };
        let link = page_link("/api/v1/authors", &filters, &query(1, 10), PageTarget::Current);
        assert_eq!(link, "/api/v1/authors?pageNumber=1&pageSize=10");
    }

    #[test]
    fn page_link_encodes_reserved_characters_in_filter_values() {
        let filters = TestFilters {
            search_query: Some("a&b c".into()),
            genre: Some("sci=fi #1".into()),
        };
        let link = page_link("/api/v1/authors", &filters, &query(1, 10), PageTarget::Current);
        assert_eq!(
            link,
            "/api/v1/authors?searchQuery=a%26b+c&genre=sci%3Dfi+%231&pageNumber=1&pageSize=10"
        );

        // The locator re-parses to the exact same filter values.
        let parsed: Vec<(String, String)> =
            form_urlencoded::parse(link.split('?').nth(1).unwrap().as_bytes())
                .into_owned()
                .collect();
        assert_eq!(parsed[0], ("searchQuery".into(), "a&b c".into()));
        assert_eq!(parsed[1], ("genre".into(), "sci=fi #1".into()));
    }

    #[test]
    fn pagination_meta_suppresses_inapplicable_links() {
        let filters = TestFilters {
            search_query: None,
            genre: None,
        };

        // First page of three: no previous link.
        let page = query(1, 10);
        let first = PagedResult::<i64>::new(vec![], 25, &page);
        let meta = PaginationMeta::new(&first, "/api/v1/authors", &filters, &page);
        assert!(meta.previous_page_link.is_none());
        assert!(meta.next_page_link.is_some());

        // Last page of three: no next link.
        let page = query(3, 10);
        let last = PagedResult::<i64>::new(vec![], 25, &page);
        let meta = PaginationMeta::new(&last, "/api/v1/authors", &filters, &page);
        assert!(meta.previous_page_link.is_some());
        assert!(meta.next_page_link.is_none());

        // Empty collection: neither link.
        let page = query(1, 10);
        let empty = PagedResult::<i64>::new(vec![], 0, &page);
        let meta = PaginationMeta::new(&empty, "/api/v1/authors", &filters, &page);
        assert!(meta.previous_page_link.is_none());
        assert!(meta.next_page_link.is_none());
    }

    #[test]
    fn paged_response_serializes_links_only_when_present() {
        let filters = TestFilters {
            search_query: None,
            genre: None,
        };
        let page = query(1, 10);
        let result = PagedResult::new(vec![1, 2], 2, &page);
        let body = PagedResponse::new(result, "/api/v1/authors", &filters, &page);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["pagination"]["totalCount"], 2);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert!(json["pagination"].get("previousPageLink").is_none());
        assert!(json["pagination"].get("nextPageLink").is_none());
    }
}
