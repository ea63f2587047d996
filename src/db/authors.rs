use sea_orm::*;

use crate::models::authors::{self, AuthorInput};

/// Insert a new author.
pub async fn insert_author(
    db: &DatabaseConnection,
    input: AuthorInput,
) -> Result<authors::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_author = authors::ActiveModel {
        name: Set(input.name),
        bio: Set(input.bio),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_author.insert(db).await
}

/// Fetch a single author by ID.
pub async fn get_author_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<authors::Model>, DbErr> {
    authors::Entity::find_by_id(id).one(db).await
}

/// Whether another author (other than `except`) already uses `name`.
pub async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = authors::Entity::find().filter(authors::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(authors::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Replace the editable fields of an existing author.
pub async fn update_author(
    db: &DatabaseConnection,
    id: i32,
    input: AuthorInput,
) -> Result<authors::Model, DbErr> {
    let author = authors::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Author not found".to_string()))?;

    let mut active: authors::ActiveModel = author.into();
    active.name = Set(input.name);
    active.bio = Set(input.bio);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete an author by ID.
pub async fn delete_author(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    authors::Entity::delete_by_id(id).exec(db).await
}
