/// A composable record predicate, independent of any storage engine.
///
/// An absent condition is expressed as `Option::<Where>::None` by callers, never
/// as an empty `And`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Where {
    /// `field = value`
    Equals { field: &'static str, value: i64 },
    /// Case-sensitive substring match; `value` is literal text, not a pattern.
    Contains { field: &'static str, value: String },
    /// Inclusive numeric range. At least one bound is always set.
    Range {
        field: &'static str,
        gte: Option<i64>,
        lte: Option<i64>,
    },
    And(Vec<Where>),
    Or(Vec<Where>),
}
