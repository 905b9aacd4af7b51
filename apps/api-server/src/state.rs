//! Application state - shared across all handlers.

use std::sync::Arc;

use serde::Serialize;

use quire_core::ports::{BlogPostRepository, SiteRepository};
use quire_core::{BlogConfig, BlogService};
use quire_infra::database::{DatabaseConfig, InMemoryBlogPostRepository, InMemorySiteRepository};

#[cfg(feature = "postgres")]
use quire_infra::database::{DatabaseConnections, PostgresBlogPostRepository, PostgresSiteRepository};

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Postgres,
    Memory,
}

struct Repositories {
    posts: Arc<dyn BlogPostRepository>,
    sites: Arc<dyn SiteRepository>,
    storage: Storage,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(
        db_config: Option<&DatabaseConfig>,
        run_migrations: bool,
        blog_config: BlogConfig,
    ) -> Self {
        let repos = repositories(db_config, run_migrations).await;
        tracing::info!(storage = ?repos.storage, "Application state initialized");
        Self::with_repositories(repos, blog_config)
    }

    fn with_repositories(repos: Repositories, blog_config: BlogConfig) -> Self {
        Self {
            blog: Arc::new(BlogService::new(repos.posts, repos.sites, blog_config)),
            storage: repos.storage,
        }
    }

    /// State backed by the in-memory store.
    #[cfg(test)]
    pub fn in_memory(blog_config: BlogConfig) -> Self {
        Self::with_repositories(in_memory_repositories(), blog_config)
    }
}

fn in_memory_repositories() -> Repositories {
    Repositories {
        posts: Arc::new(InMemoryBlogPostRepository::new()),
        sites: Arc::new(InMemorySiteRepository::new()),
        storage: Storage::Memory,
    }
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>, run_migrations: bool) -> Repositories {
    use migration::{Migrator, MigratorTrait};

    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    let connections = match DatabaseConnections::init(config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return in_memory_repositories();
        }
    };

    if run_migrations {
        if let Err(e) = Migrator::up(&connections.main, None).await {
            tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
            return in_memory_repositories();
        }
        tracing::info!("Database migrations applied");
    }

    Repositories {
        posts: Arc::new(PostgresBlogPostRepository::new(connections.main.clone())),
        sites: Arc::new(PostgresSiteRepository::new(connections.main)),
        storage: Storage::Postgres,
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>, _run_migrations: bool) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}
