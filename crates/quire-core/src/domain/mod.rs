//! Domain entities - the core business objects.

mod blog_post;
mod site;

pub use blog_post::{BlogPost, Partition, PostAttachments, PostRecord};
pub use site::{Site, SiteUrl};
