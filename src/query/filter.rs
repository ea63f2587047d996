use super::{RawParams, Where, parse_int};

/// How a filterable query parameter is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Integer equality, e.g. `authorId=7`.
    Number,
    /// Substring containment, e.g. `title=potter`.
    Substring,
    /// Inclusive `min,max` range where either side may be blank, e.g. `publishedYear=1990,`.
    Range,
}

/// One conjunct per configured filter that is present and parses.
///
/// Only keys listed in `allowed` are looked at, in that order. Values that do not
/// parse are dropped.
pub fn build_filters(params: &RawParams, allowed: &'static [(&'static str, FilterKind)]) -> Vec<Where> {
    allowed
        .iter()
        .filter_map(|&(field, kind)| {
            let raw = params.get(field).map(String::as_str).filter(|v| !v.is_empty())?;
            filter_condition(field, kind, raw)
        })
        .collect()
}

fn filter_condition(field: &'static str, kind: FilterKind, raw: &str) -> Option<Where> {
    match kind {
        FilterKind::Number => parse_int(raw).map(|value| Where::Equals { field, value }),
        FilterKind::Substring => Some(Where::Contains {
            field,
            value: raw.to_owned(),
        }),
        FilterKind::Range => {
            let (gte, lte) = parse_range(raw)?;
            Some(Where::Range { field, gte, lte })
        }
    }
}

// A value without a comma is not a range. Sides beyond the second are ignored.
fn parse_range(raw: &str) -> Option<(Option<i64>, Option<i64>)> {
    if !raw.contains(',') {
        return None;
    }

    let mut sides = raw.split(',').map(str::trim);
    let gte = sides.next().and_then(parse_int);
    let lte = sides.next().and_then(parse_int);

    (gte.is_some() || lte.is_some()).then_some((gte, lte))
}
