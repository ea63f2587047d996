use serde::Serialize;

use super::parse_int;

/// Hard ceiling on page size so a single request never scans the whole table.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest row offset handed to the record store. Postgres binds `OFFSET` as a signed bigint.
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Resolved page position: `skip = (page - 1) * limit` capped at [`MAX_SKIP`], `take = limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
    pub take: u64,
}

/// Resolve raw `page` / `limit` values.
///
/// `page` below 1 or non-numeric becomes 1. `limit` that is non-numeric or zero
/// becomes `default_limit`; the result is then clamped to `1..=MAX_PAGE_SIZE`.
pub fn build_pagination(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> PageWindow {
    let page = page
        .and_then(parse_int)
        .and_then(|p| u64::try_from(p).ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);

    let limit = limit
        .and_then(parse_int)
        .filter(|l| *l != 0)
        .unwrap_or_else(|| i64::try_from(default_limit).unwrap_or(i64::MAX))
        .clamp(1, MAX_PAGE_SIZE as i64) as u64;

    PageWindow {
        page,
        limit,
        skip: (page - 1).saturating_mul(limit).min(MAX_SKIP),
        take: limit,
    }
}

/// Navigation metadata returned alongside every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl PaginationMeta {
    /// The requested page lies past the last page of a non-empty result.
    pub fn is_past_last_page(&self) -> bool {
        self.total_items > 0 && self.current_page > self.total_pages
    }
}

/// Derive pagination metadata from a total count.
///
/// An empty result has zero pages and neither a next nor a previous page,
/// whatever `current_page` was requested.
pub fn calculate_pagination(total_items: u64, current_page: u64, per_page: u64) -> PaginationMeta {
    let total_pages = total_items.div_ceil(per_page.max(1));
    let has_next_page = current_page < total_pages;
    let has_prev_page = total_items > 0 && current_page > 1;

    PaginationMeta {
        total_items,
        total_pages,
        current_page,
        per_page,
        has_next_page,
        has_prev_page,
        next_page: has_next_page.then(|| current_page + 1),
        prev_page: has_prev_page.then(|| current_page - 1),
    }
}
