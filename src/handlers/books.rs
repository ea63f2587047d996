use actix_web::{HttpResponse, web};
use futures_util::future::try_join;
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{authors as author_db, books as book_db, publishers as publisher_db};
use crate::error::ApiError;
use crate::handlers::{fetch_list, parse_id};
use crate::models::books::{self, BookInput};
use crate::query::RawParams;
use crate::response;

/// GET /books — paginated, searchable, filterable, sortable list.
/// Query params: ?page=1&limit=10&search=&sortBy=title&sortOrder=desc&authorId=&publisherId=&publishedYear=min,max&title=
pub async fn get_books(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<RawParams>,
) -> Result<HttpResponse, ApiError> {
    let (records, pagination) = fetch_list::<books::Entity>(db.get_ref(), &query, user.user_id()).await?;
    let data = book_db::with_relations(db.get_ref(), records).await?;

    Ok(response::paginated(
        format!("Found {} books", pagination.total_items),
        data,
        pagination,
    ))
}

/// GET /books/{id} — a single book with its full author and publisher.
pub async fn get_book(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "book")?;
    let book = book_db::get_book_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    let data = book_db::with_details(db.get_ref(), book).await?;
    tracing::info!(book_id = id, user_id = user.user_id(), "Book retrieved");

    Ok(response::ok("Book retrieved successfully", data))
}

/// POST /books — create a book; the author and publisher must exist.
pub async fn create_book(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<BookInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;
    ensure_references(db.get_ref(), &input).await?;

    let book = book_db::insert_book(db.get_ref(), input).await?;
    tracing::info!(book_id = book.id, title = %book.title, user_id = user.user_id(), "Book created");

    let data = book_db::with_relations(db.get_ref(), vec![book]).await?;
    Ok(response::created("Book created successfully", data.into_iter().next()))
}

/// PATCH /books/{id} — replace a book's fields.
pub async fn update_book(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
    body: web::Json<BookInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "book")?;
    let input = body.into_inner();
    input.validate()?;

    if book_db::get_book_by_id(db.get_ref(), id).await?.is_none() {
        return Err(ApiError::NotFound("Book not found".to_string()));
    }
    ensure_references(db.get_ref(), &input).await?;

    let book = book_db::update_book(db.get_ref(), id, input).await?;
    tracing::info!(book_id = id, title = %book.title, user_id = user.user_id(), "Book updated");

    let data = book_db::with_relations(db.get_ref(), vec![book]).await?;
    Ok(response::ok("Book updated successfully", data.into_iter().next()))
}

/// DELETE /books/{id}
pub async fn delete_book(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "book")?;
    let book = book_db::get_book_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    book_db::delete_book(db.get_ref(), id).await?;
    tracing::info!(book_id = id, title = %book.title, user_id = user.user_id(), "Book deleted");

    Ok(response::ok("Book deleted successfully", ()))
}

async fn ensure_references(db: &DatabaseConnection, input: &BookInput) -> Result<(), ApiError> {
    let (author, publisher) = try_join(
        author_db::get_author_by_id(db, input.author_id),
        publisher_db::get_publisher_by_id(db, input.publisher_id),
    )
    .await?;

    if author.is_none() {
        return Err(ApiError::NotFound("Author not found".to_string()));
    }
    if publisher.is_none() {
        return Err(ApiError::NotFound("Publisher not found".to_string()));
    }
    Ok(())
}
