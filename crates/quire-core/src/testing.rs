//! Minimal in-process repositories for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, Partition, Site};
use crate::error::RepoError;
use crate::ports::{BaseRepository, BlogPostRepository, PostFilter, SiteRepository};

#[derive(Default)]
pub struct MemoryPosts {
    rows: Mutex<HashMap<Uuid, BlogPost>>,
    /// Make the scope lookup miss, as if a concurrent writer committed
    /// between the pre-check and the insert. Writes still enforce the key.
    pub stale_reads: bool,
}

impl MemoryPosts {
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    fn key_taken(rows: &HashMap<Uuid, BlogPost>, post: &BlogPost) -> bool {
        rows.values().any(|other| {
            other.id != post.id
                && other.site_id == post.site_id
                && other.partition() == post.partition()
                && other.slug == post.slug
        })
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for MemoryPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::key_taken(&rows, &post) {
            return Err(RepoError::UniqueViolation("blog_posts scope".to_string()));
        }
        rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if Self::key_taken(&rows, &post) {
            return Err(RepoError::UniqueViolation("blog_posts scope".to_string()));
        }
        rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl BlogPostRepository for MemoryPosts {
    async fn find_one_in_scope(
        &self,
        site_id: Uuid,
        partition: Partition,
        slug: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<BlogPost>, RepoError> {
        if self.stale_reads {
            return Ok(None);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|post| {
                post.site_id == site_id
                    && post.partition() == Some(partition)
                    && post.slug == slug
                    && Some(post.id) != excluding
            })
            .cloned())
    }

    async fn list(&self, site_id: Uuid, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError> {
        let rows = self.rows.lock().unwrap();
        let mut posts: Vec<BlogPost> = rows
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

#[derive(Default)]
pub struct MemorySites {
    rows: Mutex<HashMap<Uuid, Site>>,
}

#[async_trait]
impl BaseRepository<Site, Uuid> for MemorySites {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Site>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, site: Site) -> Result<Site, RepoError> {
        self.rows.lock().unwrap().insert(site.id, site.clone());
        Ok(site)
    }

    async fn update(&self, site: Site) -> Result<Site, RepoError> {
        self.rows.lock().unwrap().insert(site.id, site.clone());
        Ok(site)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SiteRepository for MemorySites {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Site>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|s| s.identifier == identifier).cloned())
    }
}
