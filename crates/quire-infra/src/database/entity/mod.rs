//! SeaORM entities.

pub mod blog_post;
pub mod site;
