use chrono::Datelike;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::authors::AuthorRef;
use super::publishers::PublisherRef;
use super::{CatalogEntity, Summary};
use crate::query::{FilterKind, QueryConfig};

/// Oldest publication year accepted on create/update.
pub const MIN_PUBLISHED_YEAR: i32 = 1800;

/// SeaORM entity for the `books` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub published_year: i32,
    pub author_id: i32,
    pub publisher_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::authors::Entity",
        from = "Column::AuthorId",
        to = "super::authors::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::publishers::Entity",
        from = "Column::PublisherId",
        to = "super::publishers::Column::Id"
    )]
    Publisher,
}

impl Related<super::authors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::publishers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CatalogEntity for Entity {
    const NAME: &'static str = "books";
    const QUERY: QueryConfig = QueryConfig {
        search_fields: &["title", "description"],
        sort_fields: &["id", "title", "publishedYear", "createdAt"],
        filters: &[
            ("authorId", FilterKind::Number),
            ("publisherId", FilterKind::Number),
            ("publishedYear", FilterKind::Range),
            ("title", FilterKind::Substring),
        ],
        default_page_size: 10,
    };

    fn column(field: &str) -> Option<Column> {
        match field {
            "id" => Some(Column::Id),
            "title" => Some(Column::Title),
            "description" => Some(Column::Description),
            "publishedYear" => Some(Column::PublishedYear),
            "authorId" => Some(Column::AuthorId),
            "publisherId" => Some(Column::PublisherId),
            "createdAt" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}

// ── DTOs ──

/// Body of `POST /books` and `PATCH /books/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_not_in_future", skip_on_field_errors = false))]
pub struct BookInput {
    #[validate(length(min = 3, max = 100, message = "Title must be 3 to 100 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1800, message = "Published year must be 1800 or later"))]
    pub published_year: i32,
    #[validate(range(min = 1, message = "Author ID is invalid"))]
    pub author_id: i32,
    #[validate(range(min = 1, message = "Publisher ID is invalid"))]
    pub publisher_id: i32,
}

// Struct-level errors carry the offending field name as their code.
fn validate_not_in_future(input: &BookInput) -> Result<(), ValidationError> {
    let current_year = chrono::Utc::now().year();
    if input.published_year > current_year {
        let mut err = ValidationError::new("publishedYear");
        err.message = Some(format!("Published year cannot be later than {current_year}").into());
        return Err(err);
    }
    Ok(())
}

/// List item: the book with its author and publisher embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithRelations {
    #[serde(flatten)]
    pub book: Model,
    pub author: Option<Summary>,
    pub publisher: Option<Summary>,
}

/// Detail view: the book with its full author and publisher.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Model,
    pub author: Option<AuthorRef>,
    pub publisher: Option<PublisherRef>,
}

/// `{id, title, publishedYear}` embedded in author and publisher list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTitle {
    pub id: i32,
    pub title: String,
    pub published_year: i32,
}

impl From<Model> for BookTitle {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            published_year: m.published_year,
        }
    }
}

/// Compact form used inside author and publisher detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBrief {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub published_year: i32,
}

impl From<Model> for BookBrief {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            published_year: m.published_year,
        }
    }
}
