//! # Quire Infrastructure
//!
//! Concrete implementations of the ports defined in `quire-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod database;

// Re-exports - In-Memory
pub use database::{InMemoryBlogPostRepository, InMemorySiteRepository};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresBlogPostRepository, PostgresSiteRepository};
