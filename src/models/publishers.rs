use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::books::{BookBrief, BookTitle};
use super::{CatalogEntity, Summary};
use crate::query::{FilterKind, QueryConfig};

/// SeaORM entity for the `publishers` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publishers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::books::Entity")]
    Books,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CatalogEntity for Entity {
    const NAME: &'static str = "publishers";
    const QUERY: QueryConfig = QueryConfig {
        search_fields: &["name", "address"],
        sort_fields: &["id", "name", "createdAt"],
        filters: &[
            ("name", FilterKind::Substring),
            ("address", FilterKind::Substring),
        ],
        default_page_size: 10,
    };

    fn column(field: &str) -> Option<Column> {
        match field {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "address" => Some(Column::Address),
            "createdAt" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}

impl From<&Model> for Summary {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
        }
    }
}

/// `{id, name, address}` embedded in a book's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublisherRef {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}

impl From<Model> for PublisherRef {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
        }
    }
}

// ── DTOs ──

/// Body of `POST /publishers` and `PATCH /publishers/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublisherInput {
    #[validate(length(min = 3, max = 100, message = "Publisher name must be 3 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherListItem {
    #[serde(flatten)]
    pub publisher: Model,
    pub books: Vec<BookTitle>,
    pub book_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherWithCount {
    #[serde(flatten)]
    pub publisher: Model,
    pub book_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherDetail {
    #[serde(flatten)]
    pub publisher: Model,
    pub books: Vec<BookBrief>,
    pub book_count: u64,
}
