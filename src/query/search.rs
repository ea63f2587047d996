use super::Where;

/// OR of substring matches of the trimmed term over `fields`.
///
/// Returns `None` for a blank term or when no fields are searchable.
pub fn build_search(term: Option<&str>, fields: &'static [&'static str]) -> Option<Where> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    if fields.is_empty() {
        return None;
    }

    Some(Where::Or(
        fields
            .iter()
            .map(|&field| Where::Contains {
                field,
                value: term.to_owned(),
            })
            .collect(),
    ))
}
