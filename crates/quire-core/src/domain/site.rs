use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::url::squeeze_slashes;

/// Anything that can report its own base URL.
pub trait SiteUrl {
    /// Absolute base URL, or only the path part when `relative` is set.
    fn url(&self, relative: bool) -> String;
}

/// Site entity - the tenant that owns a collection of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub identifier: String,
    pub hostname: String,
    pub path: Option<String>,
    pub scheme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// Create a site served over https at the host root.
    pub fn new(identifier: impl Into<String>, hostname: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            hostname: hostname.into(),
            path: None,
            scheme: "https".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Mount path of the site, e.g. `/en`. Empty for a site at the host root.
    fn mount_path(&self) -> String {
        let path = self.path.as_deref().unwrap_or_default();
        let squeezed = squeeze_slashes(&format!("/{path}"));
        squeezed.trim_end_matches('/').to_string()
    }
}

impl SiteUrl for Site {
    fn url(&self, relative: bool) -> String {
        let path = self.mount_path();
        if relative {
            path
        } else {
            format!("{}://{}{}", self.scheme, self.hostname, path)
        }
    }
}
