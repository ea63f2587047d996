pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod query;
pub mod rate_limit;
pub mod response;

pub use db::create_pool;
