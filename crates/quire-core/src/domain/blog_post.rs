use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::BlogConfig;
use crate::domain::SiteUrl;
use crate::pipeline::url::build_url;

/// The `(year, month)` pair a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub year: i32,
    pub month: u32,
}

impl Partition {
    /// Build a partition, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

/// References to collaborators attached to a post.
///
/// The blog core never interprets these; category taxonomy, fragment storage
/// and revision tracking live behind their own services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAttachments {
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    pub fragment_set_id: Option<Uuid>,
    pub revision_stream_id: Option<Uuid>,
}

/// Post entity - a blog post filed under a site and a publication month.
///
/// `year` and `month` have no setters: they are derived from `published_at`
/// on every validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub slug: String,
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub attachments: PostAttachments,
    partition: Option<Partition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column-for-column image of a stored post, used to rebuild the entity.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub slug: String,
    pub published_at: DateTime<Utc>,
    pub partition: Option<Partition>,
    pub is_published: bool,
    pub attachments: PostAttachments,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create an unvalidated post owned by `site_id`.
    pub fn new(site_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            site_id,
            title: title.into(),
            slug: String::new(),
            published_at: None,
            is_published: false,
            attachments: PostAttachments::default(),
            partition: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Rebuild a post from storage. The stored partition is trusted as is.
    pub fn rehydrate(record: PostRecord) -> Self {
        Self {
            id: record.id,
            site_id: record.site_id,
            title: record.title,
            slug: record.slug,
            published_at: Some(record.published_at),
            is_published: record.is_published,
            attachments: record.attachments,
            partition: record.partition,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn partition(&self) -> Option<Partition> {
        self.partition
    }

    pub fn year(&self) -> Option<i32> {
        self.partition.map(|p| p.year)
    }

    pub fn month(&self) -> Option<u32> {
        self.partition.map(|p| p.month)
    }

    pub(crate) fn set_partition(&mut self, partition: Partition) {
        self.partition = Some(partition);
    }

    /// Public URL of the post, or `None` before the partition is derived.
    pub fn url(&self, site: &dyn SiteUrl, config: &BlogConfig, relative: bool) -> Option<String> {
        let partition = self.partition?;
        Some(build_url(
            site,
            config,
            partition.year,
            partition.month,
            &self.slug,
            relative,
        ))
    }
}
