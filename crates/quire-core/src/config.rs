//! Blog-level configuration, passed explicitly to whatever needs it.

use serde::{Deserialize, Serialize};

/// Settings shared by every site's blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Path segment under which posts are published, e.g. `blog`.
    pub public_blog_path: String,
    /// Page size used when listing posts.
    pub posts_per_page: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            public_blog_path: "blog".to_string(),
            posts_per_page: 10,
        }
    }
}

impl BlogConfig {
    pub fn new(public_blog_path: impl Into<String>) -> Self {
        Self {
            public_blog_path: public_blog_path.into(),
            ..Self::default()
        }
    }
}
