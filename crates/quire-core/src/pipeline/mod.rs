//! The before-save derivation pipeline and its building blocks.
//!
//! Each stage is usable on its own; [`PostValidator`] runs them in order:
//! slug, publication date, required fields, slug format, uniqueness.

pub mod publication;
pub mod slug;
pub mod uniqueness;
pub mod url;
pub mod validator;

pub use publication::{DerivedPublication, resolve_publication};
pub use slug::{is_valid_slug, normalize};
pub use uniqueness::UniquenessChecker;
pub use url::build_url;
pub use validator::{
    DerivedAttributes, PostValidator, ValidationReport, ValidationState, derive_attributes,
};
