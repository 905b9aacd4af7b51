//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use quire_core::domain::{BlogPost, Partition, Site};
use quire_core::error::RepoError;
use quire_core::ports::{BlogPostRepository, PostFilter, SiteRepository};

use super::entity::blog_post::{self, Entity as BlogPostEntity};
use super::entity::site::{self, Entity as SiteEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL site repository.
pub type PostgresSiteRepository = PostgresBaseRepository<SiteEntity>;

/// PostgreSQL blog post repository.
pub type PostgresBlogPostRepository = PostgresBaseRepository<BlogPostEntity>;

#[async_trait]
impl SiteRepository for PostgresSiteRepository {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Site>, RepoError> {
        let result = SiteEntity::find()
            .filter(site::Column::Identifier.eq(identifier))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl BlogPostRepository for PostgresBlogPostRepository {
    async fn find_one_in_scope(
        &self,
        site_id: Uuid,
        partition: Partition,
        slug: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<BlogPost>, RepoError> {
        tracing::debug!(%site_id, year = partition.year, month = partition.month, slug, "Checking slug scope");

        let mut query = BlogPostEntity::find()
            .filter(blog_post::Column::SiteId.eq(site_id))
            .filter(blog_post::Column::Year.eq(partition.year))
            .filter(blog_post::Column::Month.eq(partition.month as i32))
            .filter(blog_post::Column::Slug.eq(slug));
        if let Some(id) = excluding {
            query = query.filter(blog_post::Column::Id.ne(id));
        }

        let result = query.one(&self.db).await.map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, site_id: Uuid, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError> {
        let mut query = BlogPostEntity::find().filter(blog_post::Column::SiteId.eq(site_id));
        if filter.published_only {
            query = query.filter(blog_post::Column::IsPublished.eq(true));
        }
        if let Some(year) = filter.year {
            query = query.filter(blog_post::Column::Year.eq(year));
        }
        if let Some(month) = filter.month {
            query = query.filter(blog_post::Column::Month.eq(month as i32));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        if filter.offset > 0 {
            query = query.offset(filter.offset);
        }

        let result = query
            .order_by_desc(blog_post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
