pub mod auth;
pub mod authors;
pub mod books;
pub mod publishers;

use actix_web::middleware::from_fn;
use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::time::Instant;

use crate::db;
use crate::error::ApiError;
use crate::models::CatalogEntity;
use crate::query::{PaginationMeta, QueryDescriptor, RawParams, calculate_pagination, compose_query};
use crate::rate_limit::{api_rate_limit, auth_rate_limit};
use crate::response;

/// When the server started, for the health endpoint.
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));

    // ── Auth routes (login is public, the rest need the session cookie) ──
    cfg.service(
        web::scope("/auth")
            .wrap(from_fn(auth_rate_limit))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me)),
    );

    // ── Catalog routes (all protected, require a valid session) ──
    cfg.service(
        web::scope("/books")
            .wrap(from_fn(api_rate_limit))
            .route("", web::get().to(books::get_books))
            .route("", web::post().to(books::create_book))
            .route("/{id}", web::get().to(books::get_book))
            .route("/{id}", web::patch().to(books::update_book))
            .route("/{id}", web::delete().to(books::delete_book)),
    );
    cfg.service(
        web::scope("/authors")
            .wrap(from_fn(api_rate_limit))
            .route("", web::get().to(authors::get_authors))
            .route("", web::post().to(authors::create_author))
            .route("/{id}", web::get().to(authors::get_author))
            .route("/{id}", web::patch().to(authors::update_author))
            .route("/{id}", web::delete().to(authors::delete_author)),
    );
    cfg.service(
        web::scope("/publishers")
            .wrap(from_fn(api_rate_limit))
            .route("", web::get().to(publishers::get_publishers))
            .route("", web::post().to(publishers::create_publisher))
            .route("/{id}", web::get().to(publishers::get_publisher))
            .route("/{id}", web::patch().to(publishers::update_publisher))
            .route("/{id}", web::delete().to(publishers::delete_publisher)),
    );
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    uptime_seconds: u64,
}

/// GET /health — liveness probe.
pub async fn health(started: web::Data<StartedAt>) -> HttpResponse {
    response::ok(
        "Server is healthy",
        Health {
            uptime_seconds: started.0.elapsed().as_secs(),
        },
    )
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!(
        "Route {} {} not found",
        req.method(),
        req.path()
    )))
}

/// Parse a numeric path ID; `label` names the entity in the error message.
pub fn parse_id(raw: &str, label: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {label} ID")))
}

/// Shared list flow: compose the query, run it, derive pagination metadata.
///
/// A page past the end of a non-empty result is reported as not found.
pub async fn fetch_list<E>(
    db: &DatabaseConnection,
    params: &RawParams,
    user_id: i32,
) -> Result<(Vec<E::Model>, PaginationMeta), ApiError>
where
    E: CatalogEntity,
    E::Model: Send + Sync + 'static,
{
    let query: QueryDescriptor = compose_query(params, &E::QUERY);
    tracing::info!(
        entity = E::NAME,
        page = query.page,
        limit = query.limit,
        search = params.get("search").map(String::as_str),
        condition = ?query.condition,
        sort_field = query.order_by.field,
        sort_direction = query.order_by.direction.as_str(),
        user_id,
        "List query"
    );

    let (records, total_items) = db::find_page::<E>(db, &query).await?;
    let pagination = calculate_pagination(total_items, query.page, query.limit);

    if pagination.is_past_last_page() {
        return Err(ApiError::NotFound("This page does not exist".to_string()));
    }

    Ok((records, pagination))
}
