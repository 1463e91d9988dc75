use serde::Deserialize;

use crate::error::AppError;

/// Upper bound on `page_length`.
pub const MAX_PAGE_LENGTH: u64 = 100;

/// `GET /games` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListGamesQuery {
    pub page: Option<u64>,
    pub page_length: Option<u64>,
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub length: u64,
}

impl ListGamesQuery {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` or `page_length` is zero.
    pub fn into_page(self, default_length: u64) -> Result<Page, AppError> {
        let number = self.page.unwrap_or(1);
        let length = self.page_length.unwrap_or(default_length);

        if number == 0 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if length == 0 {
            return Err(AppError::Validation(
                "page_length must be at least 1".to_string(),
            ));
        }

        Ok(Page {
            number,
            length: length.min(MAX_PAGE_LENGTH),
        })
    }
}

impl Page {
    /// Rows to skip; `None` when the multiplication overflows.
    #[must_use]
    pub const fn offset(self) -> Option<u64> {
        (self.number - 1).checked_mul(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = ListGamesQuery::default().into_page(10).ok();
        assert_eq!(page, Some(Page { number: 1, length: 10 }));
        assert_eq!(page.and_then(Page::offset), Some(0));
    }

    #[test]
    fn test_offset() {
        let page = Page { number: 5, length: 3 };
        assert_eq!(page.offset(), Some(12));
    }

    #[test]
    fn test_zero_is_rejected() {
        let query = ListGamesQuery {
            page: Some(0),
            page_length: None,
        };
        assert!(query.into_page(10).is_err());

        let query = ListGamesQuery {
            page: None,
            page_length: Some(0),
        };
        assert!(query.into_page(10).is_err());
    }

    #[test]
    fn test_length_is_capped() {
        let query = ListGamesQuery {
            page: Some(2),
            page_length: Some(5000),
        };
        assert_eq!(query.into_page(10).map(|p| p.length).ok(), Some(MAX_PAGE_LENGTH));
    }
}
