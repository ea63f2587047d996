use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::authors as author_db;
use crate::db::books::{self as book_db, Owner};
use crate::error::ApiError;
use crate::handlers::{fetch_list, parse_id};
use crate::models::authors::{
    self, AuthorDetail, AuthorInput, AuthorListItem, AuthorWithCount,
};
use crate::models::books::BookBrief;
use crate::query::RawParams;
use crate::response;

/// GET /authors — paginated list; each item carries its book titles and count.
/// Query params: ?page=1&limit=10&search=&sortBy=name&sortOrder=asc&name=
pub async fn get_authors(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<RawParams>,
) -> Result<HttpResponse, ApiError> {
    let (records, pagination) =
        fetch_list::<authors::Entity>(db.get_ref(), &query, user.user_id()).await?;

    let ids = records.iter().map(|a| a.id).collect();
    let mut titles = book_db::titles_by(db.get_ref(), Owner::Author, ids).await?;

    let data: Vec<AuthorListItem> = records
        .into_iter()
        .map(|author| {
            let books = titles.remove(&author.id).unwrap_or_default();
            AuthorListItem {
                book_count: books.len() as u64,
                books,
                author,
            }
        })
        .collect();

    Ok(response::paginated(
        format!("Found {} authors", pagination.total_items),
        data,
        pagination,
    ))
}

/// GET /authors/{id} — the author with its books.
pub async fn get_author(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "author")?;
    let author = author_db::get_author_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Author not found".to_string()))?;

    let books: Vec<BookBrief> = book_db::get_books_by(db.get_ref(), Owner::Author, id)
        .await?
        .into_iter()
        .map(BookBrief::from)
        .collect();

    tracing::info!(author_id = id, user_id = user.user_id(), "Author retrieved");

    Ok(response::ok(
        "Author retrieved successfully",
        AuthorDetail {
            author,
            book_count: books.len() as u64,
            books,
        },
    ))
}

/// POST /authors — names are unique.
pub async fn create_author(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<AuthorInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    if author_db::name_taken(db.get_ref(), &input.name, None).await? {
        return Err(ApiError::Conflict("Author with this name already exists".to_string()));
    }

    let author = author_db::insert_author(db.get_ref(), input).await?;
    tracing::info!(author_id = author.id, name = %author.name, user_id = user.user_id(), "Author created");

    Ok(response::created(
        "Author created successfully",
        AuthorWithCount {
            author,
            book_count: 0,
        },
    ))
}

/// PATCH /authors/{id}
pub async fn update_author(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
    body: web::Json<AuthorInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "author")?;
    let input = body.into_inner();
    input.validate()?;

    let existing = author_db::get_author_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Author not found".to_string()))?;

    if input.name != existing.name && author_db::name_taken(db.get_ref(), &input.name, Some(id)).await? {
        return Err(ApiError::Conflict("Author with this name already exists".to_string()));
    }

    let author = author_db::update_author(db.get_ref(), id, input).await?;
    let counts = book_db::count_books_by(db.get_ref(), Owner::Author, vec![id]).await?;
    tracing::info!(author_id = id, name = %author.name, user_id = user.user_id(), "Author updated");

    Ok(response::ok(
        "Author updated successfully",
        AuthorWithCount {
            author,
            book_count: counts.get(&id).copied().unwrap_or(0),
        },
    ))
}

/// DELETE /authors/{id} — refused while books still reference the author.
pub async fn delete_author(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path, "author")?;
    let author = author_db::get_author_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Author not found".to_string()))?;

    let counts = book_db::count_books_by(db.get_ref(), Owner::Author, vec![id]).await?;
    let book_count = counts.get(&id).copied().unwrap_or(0);
    if book_count > 0 {
        return Err(ApiError::BadRequest(format!(
            "Cannot delete author. Author has {book_count} book(s) associated."
        )));
    }

    author_db::delete_author(db.get_ref(), id).await?;
    tracing::info!(author_id = id, name = %author.name, user_id = user.user_id(), "Author deleted");

    Ok(response::ok("Author deleted successfully", ()))
}
