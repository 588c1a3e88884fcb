//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use scribe_infra::{DatabaseConfig, GenerationConfig, JwtConfig, RateLimitConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub generation: GenerationConfig,
    /// `None` disables rate limiting on the AI routes.
    pub rate_limit: Option<RateLimitConfig>,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or(db_defaults.url),
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(db_defaults.max_connections),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(db_defaults.min_connections),
            auto_migrate: flag("DB_AUTO_MIGRATE", db_defaults.auto_migrate),
            ..db_defaults
        };

        let rate_limit = flag("RATE_LIMIT_ENABLED", true).then(RateLimitConfig::from_env);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8000),
            database,
            jwt: JwtConfig::from_env(),
            generation: GenerationConfig::from_env(),
            rate_limit,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into())),
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}

/// Comma-separated origins; a `*` anywhere in the list allows every origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        Vec::new()
    } else {
        origins
    }
}
