//! Query engine shared by every catalog list endpoint.
//!
//! Raw query-string parameters go in, a [`QueryDescriptor`] comes out. Everything
//! here is a pure function of its inputs: malformed values fall back to defaults
//! or are dropped, nothing in this module returns an error or panics.

mod compose;
mod condition;
mod filter;
mod pagination;
mod search;
mod sort;

use std::collections::HashMap;

pub use compose::{QueryDescriptor, compose_query};
pub use condition::Where;
pub use filter::{FilterKind, build_filters};
pub use pagination::{
    MAX_PAGE_SIZE, MAX_SKIP, PageWindow, PaginationMeta, build_pagination,
    calculate_pagination,
};
pub use search::build_search;
pub use sort::{IDENTITY_FIELD, OrderBy, SortDirection, build_sorting};

/// Query-string parameters exactly as received.
pub type RawParams = HashMap<String, String>;

/// Per-entity description of what a list endpoint lets callers search, sort and filter on.
///
/// Field names are the public (camelCase) API names; the record store maps them to columns.
#[derive(Debug, Clone, Copy)]
pub struct QueryConfig {
    /// Fields matched by `search`, in the order the OR-clause lists them.
    pub search_fields: &'static [&'static str],
    /// Fields accepted by `sortBy`. Must contain [`IDENTITY_FIELD`].
    pub sort_fields: &'static [&'static str],
    /// Filterable fields, evaluated in declaration order.
    pub filters: &'static [(&'static str, FilterKind)],
    pub default_page_size: u64,
}

/// Lenient integer parse: leading whitespace, an optional sign, then as many
/// digits as are present. `"12abc"` is 12, `"abc"` is `None`. Saturates instead
/// of overflowing.
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest.as_bytes()[..digits].iter().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::parse_int;

    #[test]
    fn parses_leading_digits_only() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  7"), Some(7));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int("-5"), Some(-5));
        assert_eq!(parse_int("+8"), Some(8));
    }

    #[test]
    fn rejects_input_without_digits() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int(" - 3"), None);
    }

    #[test]
    fn saturates_on_overflow() {
        assert_eq!(parse_int("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int("-99999999999999999999999"), Some(-i64::MAX));
    }
}
