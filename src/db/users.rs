use sea_orm::*;

use crate::models::users::{self, CreateUser};

/// Fetch a user by email (login).
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// What [`ensure_user`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    /// A user with this email is already present.
    AlreadyExists,
    /// The username belongs to a user with a different email; nothing was written.
    UsernameTaken,
}

/// Insert the user unless one with the same email already exists.
pub async fn ensure_user(db: &DatabaseConnection, input: CreateUser) -> Result<SeedOutcome, DbErr> {
    if get_user_by_email(db, &input.email).await?.is_some() {
        return Ok(SeedOutcome::AlreadyExists);
    }

    let username_owner = users::Entity::find()
        .filter(users::Column::Username.eq(input.username.as_str()))
        .one(db)
        .await?;
    if username_owner.is_some() {
        return Ok(SeedOutcome::UsernameTaken);
    }

    let new_user = users::ActiveModel {
        username: Set(input.username),
        email: Set(input.email),
        password_hash: Set(input.password_hash),
        role: Set(input.role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_user.insert(db).await?;
    Ok(SeedOutcome::Created)
}
