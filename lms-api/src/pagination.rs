/// Page-number pagination
///
/// `?page=N` (1-based, default 1) selects a page of `pagination.page_size`
/// items. Responses carry the page items and the total count:
///
/// ```json
/// { "items": [ ... ], "count": 42 }
/// ```

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// `(limit, offset)` for a page of `page_size` items
    pub fn limit_offset(&self, page_size: u32) -> (i64, i64) {
        let limit = i64::from(page_size);
        (limit, (self.page() - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
}
