//! Slug uniqueness pre-check within a `(site, year, month)` scope.
//!
//! This is a fast path for reporting a friendly error. Two concurrent saves
//! can both pass it; the storage layer's unique index on
//! `(site_id, year, month, slug)` is what actually guarantees uniqueness.

use uuid::Uuid;

use crate::domain::Partition;
use crate::error::RepoError;
use crate::ports::BlogPostRepository;

pub struct UniquenessChecker<'a> {
    posts: &'a dyn BlogPostRepository,
}

impl<'a> UniquenessChecker<'a> {
    pub fn new(posts: &'a dyn BlogPostRepository) -> Self {
        Self { posts }
    }

    /// Whether another post already uses `slug` in the scope.
    pub async fn exists_collision(
        &self,
        site_id: Uuid,
        partition: Partition,
        slug: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let found = self
            .posts
            .find_one_in_scope(site_id, partition, slug, excluding)
            .await?;

        if let Some(other) = &found {
            tracing::debug!(
                %site_id,
                year = partition.year,
                month = partition.month,
                slug,
                conflicting_post = %other.id,
                "Slug already taken in scope"
            );
        }

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlogPost;
    use crate::ports::BaseRepository;
    use crate::testing::MemoryPosts;
    use chrono::{TimeZone, Utc};

    async fn stored_post(posts: &MemoryPosts, site_id: Uuid, slug: &str) -> BlogPost {
        let mut post = BlogPost::new(site_id, "Stored")
            .with_slug(slug)
            .with_published_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        post.set_partition(Partition::new(2024, 3).unwrap());
        posts.insert(post).await.unwrap()
    }

    #[tokio::test]
    async fn test_collision_in_same_scope() {
        let posts = MemoryPosts::default();
        let site_id = Uuid::new_v4();
        stored_post(&posts, site_id, "hello").await;

        let checker = UniquenessChecker::new(&posts);
        let march = Partition::new(2024, 3).unwrap();

        assert!(checker.exists_collision(site_id, march, "hello", None).await.unwrap());
        assert!(!checker.exists_collision(site_id, march, "other", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_no_collision_across_scopes() {
        let posts = MemoryPosts::default();
        let site_id = Uuid::new_v4();
        stored_post(&posts, site_id, "hello").await;

        let checker = UniquenessChecker::new(&posts);
        let april = Partition::new(2024, 4).unwrap();
        let march = Partition::new(2024, 3).unwrap();

        assert!(!checker.exists_collision(site_id, april, "hello", None).await.unwrap());
        assert!(
            !checker
                .exists_collision(Uuid::new_v4(), march, "hello", None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_own_id_is_excluded() {
        let posts = MemoryPosts::default();
        let site_id = Uuid::new_v4();
        let stored = stored_post(&posts, site_id, "hello").await;

        let checker = UniquenessChecker::new(&posts);
        let march = Partition::new(2024, 3).unwrap();

        assert!(
            !checker
                .exists_collision(site_id, march, "hello", Some(stored.id))
                .await
                .unwrap()
        );
    }
}
