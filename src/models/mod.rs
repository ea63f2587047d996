pub mod authors;
pub mod books;
pub mod publishers;
pub mod users;

use sea_orm::EntityTrait;
use serde::Serialize;

use crate::query::QueryConfig;

/// An entity that can be listed through the generic query engine.
///
/// Each implementor declares which public fields are searchable, sortable and
/// filterable, and how those names map onto its columns.
pub trait CatalogEntity: EntityTrait {
    /// Plural name used in log lines and response messages, e.g. `"books"`.
    const NAME: &'static str;
    const QUERY: QueryConfig;

    /// Column behind a public field name, if any.
    fn column(field: &str) -> Option<Self::Column>;
}

/// `{id, name}` projection used when embedding a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
}
