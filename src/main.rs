use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders, from_fn};
use actix_web::{App, HttpServer, web};
use books_backend::auth::middleware::JwtSecret;
use books_backend::auth::password::hash_password;
use books_backend::config::{AdminSeed, AppConfig};
use books_backend::db::users::{self as user_db, SeedOutcome};
use books_backend::error::ApiError;
use books_backend::handlers::{self, StartedAt};
use books_backend::models::users::{CreateUser, Roles};
use books_backend::rate_limit::{self, RateLimiter};
use books_backend::{create_pool, logging};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::time::{Duration, Instant};

const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;
const RATE_LIMIT_SWEEP: Duration = Duration::from_secs(5 * 60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    logging::init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        std::io::Error::other(e)
    })?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
    tracing::info!("Connected to database, migrations applied");

    if let Some(admin) = &config.admin {
        seed_admin(&db, admin).await?;
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(production = config.production, "Server running at http://{bind_addr}");

    let db_data = web::Data::new(db);
    let jwt_secret = web::Data::new(JwtSecret(config.jwt_secret.clone()));
    let started = web::Data::new(StartedAt(Instant::now()));

    let limiter = RateLimiter::new();
    let sweeper = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP);
        loop {
            interval.tick().await;
            sweeper.cleanup().await;
        }
    });
    let limiter = web::Data::new(limiter);
    let frontend_url = config.frontend_url.clone();
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .supports_credentials()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::COOKIE,
            ])
            .max_age(3600);

        let security_headers = DefaultHeaders::new()
            .add(("X-Content-Type-Options", "nosniff"))
            .add(("X-Frame-Options", "DENY"))
            .add(("Referrer-Policy", "no-referrer"));

        let json_config = web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

        App::new()
            .wrap(from_fn(rate_limit::general_rate_limit))
            .wrap(Compress::default())
            .wrap(cors)
            .wrap(security_headers)
            .wrap(from_fn(logging::log_requests))
            .app_data(json_config)
            .app_data(db_data.clone())
            .app_data(jwt_secret.clone())
            .app_data(started.clone())
            .app_data(config_data.clone())
            .app_data(limiter.clone())
            .configure(handlers::init_routes)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&bind_addr)?
    .run()
    .await
}

/// Make sure the configured administrator account exists.
async fn seed_admin(db: &DatabaseConnection, admin: &AdminSeed) -> std::io::Result<()> {
    let password_hash = hash_password(&admin.password)
        .map_err(|e| std::io::Error::other(format!("Failed to hash admin password: {e}")))?;

    let outcome = user_db::ensure_user(
        db,
        CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Roles::Admin,
        },
    )
    .await
    .map_err(std::io::Error::other)?;

    match outcome {
        SeedOutcome::Created => tracing::info!(email = %admin.email, "Admin user created"),
        SeedOutcome::AlreadyExists => {}
        SeedOutcome::UsernameTaken => tracing::warn!(
            email = %admin.email,
            username = %admin.username,
            "Admin user not created: username already taken, set ADMIN_USERNAME"
        ),
    }
    Ok(())
}
