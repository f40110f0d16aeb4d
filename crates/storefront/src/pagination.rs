//! Cursor pagination for product listings.
//!
//! Listing pages accept `?cursor=X` to load the page after `X`, and
//! `?direction=previous&cursor=X` to load the page before it.

use serde::Deserialize;

use crate::shopify::PageInfo;

/// Query parameters carried by "Load previous" / "Load more" links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub direction: Option<String>,
    pub cursor: Option<String>,
}

impl PaginationQuery {
    fn is_previous(&self) -> bool {
        self.direction.as_deref() == Some("previous")
    }
}

/// Connection arguments sent to the Storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaginationVariables {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl PaginationVariables {
    /// The first `page_size` items.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            first: Some(i64::from(page_size)),
            last: None,
            start_cursor: None,
            end_cursor: None,
        }
    }

    /// Build connection arguments from the request's query string.
    #[must_use]
    pub fn from_query(query: &PaginationQuery, page_size: u32) -> Self {
        let cursor = query.cursor.clone().filter(|c| !c.is_empty());
        if query.is_previous() {
            Self {
                first: None,
                last: Some(i64::from(page_size)),
                start_cursor: cursor,
                end_cursor: None,
            }
        } else {
            Self {
                end_cursor: cursor,
                ..Self::first(page_size)
            }
        }
    }
}

/// Hrefs for the links around a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PaginationLinks {
    /// Links relative to `base_path`, present only when the adjacent page exists.
    #[must_use]
    pub fn new(base_path: &str, page_info: &PageInfo) -> Self {
        let previous = page_info
            .start_cursor
            .as_deref()
            .filter(|_| page_info.has_previous_page)
            .map(|cursor| {
                format!(
                    "{base_path}?direction=previous&cursor={}",
                    urlencoding::encode(cursor)
                )
            });
        let next = page_info
            .end_cursor
            .as_deref()
            .filter(|_| page_info.has_next_page)
            .map(|cursor| format!("{base_path}?cursor={}", urlencoding::encode(cursor)));

        Self { previous, next }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_first_page() {
        let vars = PaginationVariables::from_query(&PaginationQuery::default(), 8);
        assert_eq!(vars, PaginationVariables::first(8));
    }

    #[test]
    fn test_forward_cursor() {
        let query = PaginationQuery {
            direction: Some("next".to_string()),
            cursor: Some("eyJsYXN0".to_string()),
        };
        let vars = PaginationVariables::from_query(&query, 8);
        assert_eq!(vars.first, Some(8));
        assert_eq!(vars.end_cursor.as_deref(), Some("eyJsYXN0"));
        assert!(vars.last.is_none());
    }

    #[test]
    fn test_previous_direction() {
        let query = PaginationQuery {
            direction: Some("previous".to_string()),
            cursor: Some("abc".to_string()),
        };
        let vars = PaginationVariables::from_query(&query, 8);
        assert_eq!(vars.last, Some(8));
        assert_eq!(vars.start_cursor.as_deref(), Some("abc"));
        assert!(vars.first.is_none());
        assert!(vars.end_cursor.is_none());
    }

    #[test]
    fn test_links_follow_page_info() {
        let page_info = PageInfo {
            has_previous_page: true,
            has_next_page: false,
            start_cursor: Some("a+b".to_string()),
            end_cursor: Some("z".to_string()),
        };
        let links = PaginationLinks::new("/en-ca/collections/all", &page_info);
        assert_eq!(
            links.previous.as_deref(),
            Some("/en-ca/collections/all?direction=previous&cursor=a%2Bb")
        );
        assert!(links.next.is_none());
    }
}
