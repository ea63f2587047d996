use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::books::{self as book_db, Owner};
use crate::db::publishers as publisher_db;
use crate::error::ApiError;
use crate::handlers::{fetch_list, parse_id};
use crate::models::books::BookBrief;
use crate::models::publishers::{
    self, PublisherDetail, PublisherInput, PublisherListItem, PublisherWithCount,
};
use crate::query::RawParams;
use crate::response;

/// GET /publishers — paginated list; each item carries its book titles and count.
/// Query params: ?page=1&limit=10&search=&sortBy=name&sortOrder=asc&name=&address=
pub async fn get_publishers(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<RawParams>,
) -> Result<HttpResponse, ApiError> {
    let (records, pagination) =
        fetch_list::<publishers::Entity>(db.get_ref(), &query, user.user_id()).await?;

    let ids = records.iter().map(|p| p.id).collect();
    let mut titles = book_db::titles_by(db.get_ref(), Owner::Publisher, ids).await?;

    let data: Vec<PublisherListItem> = records
        .into_iter()
        .map(|publisher| {
            let books = titles.remove(&publisher.id).unwrap_or_default();
            PublisherListItem {
                book_count: books.len() as u64,
                books,
                publisher,
            }
        })
        .collect();

    Ok(response::paginated(
        format!("Found {} publishers", pagination.total_items),
        data,
        pagination,
    ))
}

/// GET /publishers/{id} — the publisher with its books.
pub async fn get_publisher(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "publisher")?;
    let publisher = publisher_db::get_publisher_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Publisher not found".to_string()))?;

    let books: Vec<BookBrief> = book_db::get_books_by(db.get_ref(), Owner::Publisher, id)
        .await?
        .into_iter()
        .map(BookBrief::from)
        .collect();

    tracing::info!(publisher_id = id, user_id = user.user_id(), "Publisher retrieved");

    Ok(response::ok(
        "Publisher retrieved successfully",
        PublisherDetail {
            publisher,
            book_count: books.len() as u64,
            books,
        },
    ))
}

/// POST /publishers — names are unique.
pub async fn create_publisher(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<PublisherInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    if publisher_db::name_taken(db.get_ref(), &input.name, None).await? {
        return Err(ApiError::Conflict("Publisher with this name already exists".to_string()));
    }

    let publisher = publisher_db::insert_publisher(db.get_ref(), input).await?;
    tracing::info!(publisher_id = publisher.id, name = %publisher.name, user_id = user.user_id(), "Publisher created");

    Ok(response::created(
        "Publisher created successfully",
        PublisherWithCount {
            publisher,
            book_count: 0,
        },
    ))
}

/// PATCH /publishers/{id}
pub async fn update_publisher(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
    body: web::Json<PublisherInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "publisher")?;
    let input = body.into_inner();
    input.validate()?;

    let existing = publisher_db::get_publisher_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Publisher not found".to_string()))?;

    if input.name != existing.name && publisher_db::name_taken(db.get_ref(), &input.name, Some(id)).await? {
        return Err(ApiError::Conflict("Publisher with this name already exists".to_string()));
    }

    let publisher = publisher_db::update_publisher(db.get_ref(), id, input).await?;
    let counts = book_db::count_books_by(db.get_ref(), Owner::Publisher, vec![id]).await?;
    tracing::info!(publisher_id = id, name = %publisher.name, user_id = user.user_id(), "Publisher updated");

    Ok(response::ok(
        "Publisher updated successfully",
        PublisherWithCount {
            publisher,
            book_count: counts.get(&id).copied().unwrap_or(0),
        },
    ))
}

/// DELETE /publishers/{id} — refused while books still reference the publisher.
pub async fn delete_publisher(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "publisher")?;
    let publisher = publisher_db::get_publisher_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Publisher not found".to_string()))?;

    let counts = book_db::count_books_by(db.get_ref(), Owner::Publisher, vec![id]).await?;
    let book_count = counts.get(&id).copied().unwrap_or(0);
    if book_count > 0 {
        return Err(ApiError::BadRequest(format!(
            "Cannot delete publisher. Publisher has {book_count} book(s) associated."
        )));
    }

    publisher_db::delete_publisher(db.get_ref(), id).await?;
    tracing::info!(publisher_id = id, name = %publisher.name, user_id = user.user_id(), "Publisher deleted");

    Ok(response::ok("Publisher deleted successfully", ()))
}
