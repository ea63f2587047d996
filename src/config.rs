use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials for the administrator account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    /// `ADMIN_USERNAME`, or the local part of the email.
    pub username: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    /// Allowed CORS origin.
    pub frontend_url: String,
    /// Production mode marks session cookies `Secure`.
    pub production: bool,
    pub token_ttl_hours: i64,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => {
                let username = get("ADMIN_USERNAME").unwrap_or_else(|| local_part(&email));
                Some(AdminSeed {
                    email,
                    password,
                    username,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            port: parse_or("APP_PORT", get("APP_PORT"), 5000)?,
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            production: get("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production")),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", get("TOKEN_TTL_HOURS"), 24)?,
            admin,
        })
    }
}

fn local_part(email: &str) -> String {
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "admin".to_string(),
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/books"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert!(!config.production);
        assert!(config.admin.is_none());
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("APP_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "APP_PORT", .. }));
    }

    #[test]
    fn reads_production_and_admin() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("APP_ENV", "Production"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "admin123"),
        ]))
        .unwrap();
        assert!(config.production);
        let admin = config.admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.username, "admin");
    }

    #[test]
    fn admin_username_can_be_set() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("ADMIN_EMAIL", "ops@example.com"),
            ("ADMIN_PASSWORD", "admin123"),
            ("ADMIN_USERNAME", "catalog-admin"),
        ]))
        .unwrap();
        assert_eq!(config.admin.unwrap().username, "catalog-admin");
    }
}
