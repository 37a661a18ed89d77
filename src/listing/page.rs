use serde::Serialize;

use crate::config;
use crate::error::ApiError;

/// Validated offset/limit pair. Construction fails before any query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    skip: i64,
    limit: i64,
}

impl PageParams {
    /// Apply defaults and bounds: skip >= 0, 1 <= limit <= max.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, ApiError> {
        let bounds = &config::config().listing;
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(bounds.default_limit);

        if skip < 0 {
            return Err(ApiError::bad_request("Skip must be greater than or equal to 0"));
        }
        if limit < 1 || limit > bounds.max_limit {
            return Err(ApiError::bad_request(format!(
                "Limit must be between 1 and {}",
                bounds.max_limit
            )));
        }

        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn current_page(&self) -> i64 {
        self.skip / self.limit + 1
    }

    pub fn total_pages(&self, total_records: i64) -> i64 {
        (total_records + self.limit - 1) / self.limit
    }
}

/// The uniform list-response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub total_records: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn assemble(data: Vec<T>, total_records: i64, params: &PageParams) -> Self {
        Self {
            data,
            total_records,
            current_page: params.current_page(),
            total_pages: params.total_pages(total_records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let p = PageParams::new(None, None).unwrap();
        assert_eq!(p.skip(), 0);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(PageParams::new(Some(-1), None).is_err());
        assert!(PageParams::new(None, Some(0)).is_err());
        assert!(PageParams::new(None, Some(101)).is_err());
        assert!(PageParams::new(Some(0), Some(100)).is_ok());
    }

    #[test]
    fn page_arithmetic() {
        let p = PageParams::new(Some(20), Some(10)).unwrap();
        assert_eq!(p.current_page(), 3);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);

        // skip that lands mid-page still reports floor(skip/limit)+1
        let p = PageParams::new(Some(5), Some(10)).unwrap();
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn skip_beyond_total_keeps_correct_totals() {
        let p = PageParams::new(Some(1000), Some(10)).unwrap();
        let page: Page<i32> = Page::assemble(vec![], 42, &p);
        assert_eq!(page.current_page, 101);
        assert_eq!(page.total_pages, 5);
        assert!(page.data.is_empty());
    }
}
