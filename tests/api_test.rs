//! HTTP-surface tests that need no database: health, the JSON 404 fallback,
//! error envelope rendering, and the SQL a list descriptor turns into.
//!
//! Run with: `cargo test --test api_test`
use std::time::Instant;

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, ResponseError, web};
use sea_orm::{DbBackend, DbErr, QueryTrait};
use serde_json::Value;
use validator::Validate;

use books_backend::db::{escape_like, filtered_select, ordered_page};
use books_backend::error::ApiError;
use books_backend::handlers::{StartedAt, health, not_found, parse_id};
use books_backend::models::{CatalogEntity, authors, books};
use books_backend::query::{RawParams, compose_query};
use books_backend::response::FieldError;

fn params(pairs: &[(&str, &str)]) -> RawParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn error_json(err: ApiError) -> (StatusCode, Value) {
    let resp = err.error_response();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body()).await.expect("readable body");
    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}

// ── Endpoints ──

#[actix_web::test]
async fn test_health_reports_uptime() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(StartedAt(Instant::now())))
            .route("/health", web::get().to(health)),
    )
    .await;

    let req = actix_web::test::TestRequest::get().uri("/health").to_request();
    let body: Value = actix_web::test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is healthy");
    assert!(body["data"]["uptimeSeconds"].is_u64());
    assert!(body["timestamp"].is_string());
    assert!(body.get("pagination").is_none());
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(StartedAt(Instant::now())))
            .route("/health", web::get().to(health))
            .default_service(web::to(not_found)),
    )
    .await;

    let req = actix_web::test::TestRequest::delete().uri("/nope/here").to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route DELETE /nope/here not found");
    assert!(body.get("errors").is_none());
}

#[test]
fn test_parse_id() {
    assert_eq!(parse_id("12", "book").unwrap(), 12);
    assert_eq!(parse_id(" 7 ", "book").unwrap(), 7);

    let err = parse_id("abc", "book").unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Invalid book ID");
    assert!(parse_id("", "author").is_err());
}

// ── Error envelope ──

#[actix_web::test]
async fn test_client_errors_keep_their_message() {
    let cases = [
        (ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
        (ApiError::Unauthorized("who?".into()), StatusCode::UNAUTHORIZED),
        (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
        (ApiError::Conflict("taken".into()), StatusCode::CONFLICT),
        (ApiError::TooManyRequests("slow".into()), StatusCode::TOO_MANY_REQUESTS),
    ];
    for (err, expected) in cases {
        let message = err.to_string();
        let (status, body) = error_json(err).await;
        assert_eq!(status, expected);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message.as_str());
    }
}

#[actix_web::test]
async fn test_internal_details_are_hidden() {
    let (status, body) = error_json(ApiError::Internal("secret stack".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal Server Error");

    let (status, body) =
        error_json(ApiError::Database(DbErr::Custom("relation \"x\" missing".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Database operation failed");
}

#[actix_web::test]
async fn test_missing_record_maps_to_404() {
    let (status, body) = error_json(DbErr::RecordNotFound("books".into()).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Record not found");
}

#[actix_web::test]
async fn test_validation_errors_are_listed_per_field() {
    let input: books::BookInput = serde_json::from_value(serde_json::json!({
        "title": "ab",
        "publishedYear": 3000,
        "authorId": 0,
        "publisherId": 1,
    }))
    .unwrap();

    let err: ApiError = input.validate().unwrap_err().into();
    let ApiError::Validation(fields) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(names, vec!["authorId", "publishedYear", "title"]);
    assert!(fields[1].message.starts_with("Published year cannot be later than"));

    let (status, body) = error_json(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][2]["field"], "title");
    assert_eq!(body["errors"][2]["message"], "Title must be 3 to 100 characters");
}

#[test]
fn test_valid_book_input_passes() {
    let input: books::BookInput = serde_json::from_value(serde_json::json!({
        "title": "Dune",
        "description": null,
        "publishedYear": 1965,
        "authorId": 1,
        "publisherId": 2,
    }))
    .unwrap();
    assert!(input.validate().is_ok());
}

#[test]
fn test_field_error_shape() {
    let json = serde_json::to_value(FieldError {
        field: "name".into(),
        message: "Name is required".into(),
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({"field": "name", "message": "Name is required"}));
}

// ── Descriptor to SQL ──

fn book_sql(pairs: &[(&str, &str)]) -> String {
    let query = compose_query(&params(pairs), &books::Entity::QUERY);
    let select = filtered_select::<books::Entity>(&query).unwrap();
    ordered_page::<books::Entity>(select, &query)
        .unwrap()
        .build(DbBackend::Postgres)
        .sql
}

#[test]
fn test_huge_page_binds_a_signed_offset() {
    for page in ["99999999999999999999", "1000000000000000000"] {
        let query = compose_query(&params(&[("page", page)]), &books::Entity::QUERY);
        let select = filtered_select::<books::Entity>(&query).unwrap();
        let statement = ordered_page::<books::Entity>(select, &query)
            .unwrap()
            .build(DbBackend::Postgres);

        let values = statement.values.expect("bound values").0;
        assert!(!values.is_empty());
        for value in values {
            if let sea_orm::Value::BigUnsigned(Some(n)) = value {
                assert!(n <= i64::MAX as u64, "page {page} bound {n}");
            }
        }
    }
}

#[test]
fn test_unconstrained_list_sql() {
    let sql = book_sql(&[]);
    assert!(sql.starts_with("SELECT"), "{sql}");
    assert!(!sql.contains("WHERE"), "{sql}");
    assert!(sql.contains(r#"ORDER BY "books"."id" ASC"#), "{sql}");
    assert!(sql.contains("LIMIT"), "{sql}");
    assert!(sql.contains("OFFSET"), "{sql}");
}

#[test]
fn test_search_and_filter_sql() {
    let sql = book_sql(&[
        ("search", "potter"),
        ("authorId", "3"),
        ("publishedYear", "1990,2000"),
        ("sortBy", "title"),
        ("sortOrder", "desc"),
    ]);

    assert!(sql.contains("WHERE"), "{sql}");
    assert!(sql.contains(r#""books"."title" LIKE"#), "{sql}");
    assert!(sql.contains(r#""books"."description" LIKE"#), "{sql}");
    assert!(sql.contains(" OR "), "{sql}");
    assert!(sql.contains(r#""books"."author_id" ="#), "{sql}");
    assert!(sql.contains(r#""books"."published_year" >="#), "{sql}");
    assert!(sql.contains(r#""books"."published_year" <="#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "books"."title" DESC"#), "{sql}");
}

#[test]
fn test_count_query_has_no_paging() {
    let query = compose_query(&params(&[("title", "war")]), &books::Entity::QUERY);
    let sql = filtered_select::<books::Entity>(&query)
        .unwrap()
        .build(DbBackend::Postgres)
        .sql;
    assert!(sql.contains(r#""books"."title" LIKE"#), "{sql}");
    assert!(!sql.contains("LIMIT"), "{sql}");
    assert!(!sql.contains("ORDER BY"), "{sql}");
}

#[test]
fn test_author_sort_maps_to_column() {
    let query = compose_query(
        &params(&[("sortBy", "createdAt"), ("sortOrder", "DESC")]),
        &authors::Entity::QUERY,
    );
    let select = filtered_select::<authors::Entity>(&query).unwrap();
    let sql = ordered_page::<authors::Entity>(select, &query)
        .unwrap()
        .build(DbBackend::Postgres)
        .sql;
    assert!(sql.contains(r#"ORDER BY "authors"."created_at" DESC"#), "{sql}");
}

#[test]
fn test_like_wildcards_are_escaped() {
    assert_eq!(escape_like("plain"), "plain");
    assert_eq!(escape_like("50%"), "50\\%");
    assert_eq!(escape_like("a_b"), "a\\_b");
    assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
}
