use serde::Serialize;

/// Normalized list envelope shared by upstream fetches and inbound answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub result: Vec<T>,
}

impl<T> PagedResult<T> {
    /// Empty result echoing the requested page.
    pub fn empty(page: u64, per_page: u64) -> Self {
        Self {
            total: 0,
            page,
            per_page,
            result: Vec::new(),
        }
    }
}

/// `ceil(total / per_page)`, 0 when `per_page` is 0.
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}
