//! Application configuration loaded from environment variables.

use std::env;

use quire_core::BlogConfig;
use quire_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations before serving.
    pub run_migrations: bool,
    pub blog: BlogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let defaults = BlogConfig::default();
        let blog = BlogConfig {
            public_blog_path: env::var("PUBLIC_BLOG_PATH").unwrap_or(defaults.public_blog_path),
            posts_per_page: parse_var("POSTS_PER_PAGE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            blog,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
