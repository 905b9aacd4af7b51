//! In-memory repositories - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quire_core::domain::{BlogPost, Partition, Site};
use quire_core::error::RepoError;
use quire_core::ports::{BaseRepository, BlogPostRepository, PostFilter, SiteRepository};

/// Composite key every stored post must hold uniquely.
type ScopeKey = (Uuid, Partition, String);

fn scope_key(post: &BlogPost) -> Result<ScopeKey, RepoError> {
    let partition = post
        .partition()
        .ok_or_else(|| RepoError::Constraint("post has no year/month".to_string()))?;
    Ok((post.site_id, partition, post.slug.clone()))
}

#[derive(Default)]
struct PostTable {
    rows: HashMap<Uuid, BlogPost>,
    /// Unique index on `(site_id, year, month, slug)`.
    scope_index: HashMap<ScopeKey, Uuid>,
}

impl PostTable {
    /// Store `post`, holding the write lock for the check and the write so
    /// concurrent writers cannot both claim a key.
    fn put(&mut self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let key = scope_key(&post)?;
        if let Some(owner) = self.scope_index.get(&key) {
            if *owner != post.id {
                return Err(RepoError::UniqueViolation(format!(
                    "blog_posts (site_id, year, month, slug) = ({}, {}, {}, {})",
                    key.0, key.1.year, key.1.month, key.2
                )));
            }
        }

        if let Some(previous) = self.rows.get(&post.id) {
            if let Ok(old_key) = scope_key(previous) {
                self.scope_index.remove(&old_key);
            }
        }
        self.scope_index.insert(key, post.id);
        self.rows.insert(post.id, post.clone());
        Ok(post)
    }
}

/// In-memory blog post store.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryBlogPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryBlogPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for InMemoryBlogPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(&post.id) {
            return Err(RepoError::UniqueViolation(format!(
                "blog_posts primary key {}",
                post.id
            )));
        }
        table.put(post)
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        table.put(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        let removed = table.rows.remove(&id).ok_or(RepoError::NotFound)?;
        if let Ok(key) = scope_key(&removed) {
            table.scope_index.remove(&key);
        }
        Ok(())
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepository {
    async fn find_one_in_scope(
        &self,
        site_id: Uuid,
        partition: Partition,
        slug: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<BlogPost>, RepoError> {
        let table = self.table.read().await;
        let key = (site_id, partition, slug.to_string());
        Ok(table
            .scope_index
            .get(&key)
            .filter(|id| Some(**id) != excluding)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn list(&self, site_id: Uuid, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError> {
        let table = self.table.read().await;
        let mut posts: Vec<BlogPost> = table
            .rows
            .values()
            .filter(|post| post.site_id == site_id && filter.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(posts
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect())
    }
}

/// In-memory site store.
#[derive(Default)]
pub struct InMemorySiteRepository {
    store: RwLock<HashMap<Uuid, Site>>,
}

impl InMemorySiteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Site, Uuid> for InMemorySiteRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Site>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, site: Site) -> Result<Site, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|s| s.identifier == site.identifier) {
            return Err(RepoError::UniqueViolation(format!(
                "sites identifier {}",
                site.identifier
            )));
        }
        store.insert(site.id, site.clone());
        Ok(site)
    }

    async fn update(&self, site: Site) -> Result<Site, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&site.id) {
            Some(existing) => {
                *existing = site.clone();
                Ok(site)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Site>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|s| s.identifier == identifier).cloned())
    }
}
