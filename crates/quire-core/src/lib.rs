//! # Quire Core
//!
//! The domain layer of Quire: blog posts, the sites that own them, and the
//! before-save pipeline that derives slugs and publication partitions.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::BlogConfig;
pub use error::{DomainError, RepoError, ValidationError, ValidationErrors};
pub use service::{BlogPostChanges, BlogService, NewBlogPost};
