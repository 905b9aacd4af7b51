use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, Partition, Site};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Site repository.
#[async_trait]
pub trait SiteRepository: BaseRepository<Site, Uuid> {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Site>, RepoError>;
}

/// Query scopes for listing a site's posts. All set scopes must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Only posts flagged as published.
    pub published_only: bool,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl PostFilter {
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }

    pub fn for_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn for_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Restrict to one page of `per_page` posts; pages start at 1.
    pub fn page(mut self, page: u64, per_page: u64) -> Self {
        self.limit = Some(per_page);
        self.offset = page.saturating_sub(1).saturating_mul(per_page);
        self
    }

    /// Whether `post` falls inside the scopes, ignoring pagination.
    pub fn matches(&self, post: &BlogPost) -> bool {
        (!self.published_only || post.is_published)
            && self.year.is_none_or(|year| post.year() == Some(year))
            && self.month.is_none_or(|month| post.month() == Some(month))
    }
}

/// Blog post repository.
#[async_trait]
pub trait BlogPostRepository: BaseRepository<BlogPost, Uuid> {
    /// Find a post of `site_id` in `partition` with `slug`, other than `excluding`.
    async fn find_one_in_scope(
        &self,
        site_id: Uuid,
        partition: Partition,
        slug: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<BlogPost>, RepoError>;

    /// Posts of `site_id` matching `filter`, newest publication first.
    async fn list(&self, site_id: Uuid, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError>;
}
