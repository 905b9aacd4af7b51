//! Domain-level error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Partition;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique index rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Attributes of a blog post that the validator can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Slug,
    Year,
    Month,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Slug => "slug",
            Field::Year => "year",
            Field::Month => "month",
        };
        f.write_str(name)
    }
}

/// The `(site, year, month)` key inside which slugs must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlugScope {
    pub site_id: Uuid,
    pub year: i32,
    pub month: u32,
}

impl SlugScope {
    pub fn new(site_id: Uuid, partition: Partition) -> Self {
        Self {
            site_id,
            year: partition.year,
            month: partition.month,
        }
    }
}

impl fmt::Display for SlugScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site {} {}/{}", self.site_id, self.year, self.month)
    }
}

/// A single failed check from a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{0} can't be blank")]
    MissingRequiredField(Field),

    #[error("{0} is invalid")]
    InvalidFormat(Field),

    #[error("slug '{slug}' has already been taken in {scope}")]
    UniquenessViolation { scope: SlugScope, slug: String },
}

/// Every failure collected during one validation pass, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Human-readable messages, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
