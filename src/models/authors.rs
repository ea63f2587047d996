use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::books::{BookBrief, BookTitle};
use super::{CatalogEntity, Summary};
use crate::query::{FilterKind, QueryConfig};

/// SeaORM entity for the `authors` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authors")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
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
    const NAME: &'static str = "authors";
    const QUERY: QueryConfig = QueryConfig {
        search_fields: &["name", "bio"],
        sort_fields: &["id", "name", "createdAt"],
        filters: &[("name", FilterKind::Substring)],
        default_page_size: 10,
    };

    fn column(field: &str) -> Option<Column> {
        match field {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "bio" => Some(Column::Bio),
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

/// `{id, name, bio}` embedded in a book's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRef {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
}

impl From<Model> for AuthorRef {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            bio: m.bio,
        }
    }
}

// ── DTOs ──

/// Body of `POST /authors` and `PATCH /authors/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthorInput {
    #[validate(length(min = 3, max = 100, message = "Author name must be 3 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,
}

/// List item: the author, its book titles and their count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorListItem {
    #[serde(flatten)]
    pub author: Model,
    pub books: Vec<BookTitle>,
    pub book_count: u64,
}

/// Create/update result: the author plus how many books reference it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorWithCount {
    #[serde(flatten)]
    pub author: Model,
    pub book_count: u64,
}

/// Detail view: the author and the titles attributed to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: Model,
    pub books: Vec<BookBrief>,
    pub book_count: u64,
}
