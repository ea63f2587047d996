use sea_orm::*;

use crate::models::publishers::{self, PublisherInput};

/// Insert a new publisher.
pub async fn insert_publisher(
    db: &DatabaseConnection,
    input: PublisherInput,
) -> Result<publishers::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_publisher = publishers::ActiveModel {
        name: Set(input.name),
        address: Set(input.address),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_publisher.insert(db).await
}

/// Fetch a single publisher by ID.
pub async fn get_publisher_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<publishers::Model>, DbErr> {
    publishers::Entity::find_by_id(id).one(db).await
}

/// Whether another publisher (other than `except`) already uses `name`.
pub async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = publishers::Entity::find().filter(publishers::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(publishers::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Replace the editable fields of an existing publisher.
pub async fn update_publisher(
    db: &DatabaseConnection,
    id: i32,
    input: PublisherInput,
) -> Result<publishers::Model, DbErr> {
    let publisher = publishers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Publisher not found".to_string()))?;

    let mut active: publishers::ActiveModel = publisher.into();
    active.name = Set(input.name);
    active.address = Set(input.address);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a publisher by ID.
pub async fn delete_publisher(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    publishers::Entity::delete_by_id(id).exec(db).await
}
