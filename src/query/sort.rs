/// Field every entity can be ordered by; also the fallback ordering.
pub const IDENTITY_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"desc"` in any case is descending, anything else ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Single-field ordering. `field` always comes from the entity's allow-list,
/// never from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            field: IDENTITY_FIELD,
            direction: SortDirection::Asc,
        }
    }
}

/// Resolve `sortBy` / `sortOrder` against the allowed fields.
pub fn build_sorting(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
    allowed: &'static [&'static str],
) -> OrderBy {
    match sort_by.and_then(|wanted| allowed.iter().copied().find(|field| *field == wanted)) {
        Some(field) => OrderBy {
            field,
            direction: SortDirection::parse(sort_order),
        },
        None => OrderBy::default(),
    }
}
