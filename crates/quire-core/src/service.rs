//! Application service: the save path around the validation pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::BlogConfig;
use crate::domain::{BlogPost, PostAttachments, Site};
use crate::error::{DomainError, RepoError, SlugScope, ValidationError, ValidationErrors};
use crate::pipeline::PostValidator;
use crate::ports::{BlogPostRepository, PostFilter, SiteRepository};

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewBlogPost {
    pub site_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub attachments: PostAttachments,
}

/// Partial update of a post. `None` leaves the attribute alone.
#[derive(Debug, Clone, Default)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    /// An empty string clears the slug so it is regenerated from the title.
    pub slug: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub attachments: Option<PostAttachments>,
}

impl BlogPostChanges {
    fn apply(self, post: &mut BlogPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(published_at) = self.published_at {
            post.published_at = Some(published_at);
        }
        if let Some(is_published) = self.is_published {
            post.is_published = is_published;
        }
        if let Some(attachments) = self.attachments {
            post.attachments = attachments;
        }
    }
}

/// Blog operations over the site and post repositories.
pub struct BlogService {
    posts: Arc<dyn BlogPostRepository>,
    sites: Arc<dyn SiteRepository>,
    config: BlogConfig,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn BlogPostRepository>,
        sites: Arc<dyn SiteRepository>,
        config: BlogConfig,
    ) -> Self {
        Self {
            posts,
            sites,
            config,
        }
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    pub async fn create_site(&self, site: Site) -> Result<Site, DomainError> {
        let site = self.sites.insert(site).await?;
        tracing::info!(site_id = %site.id, identifier = %site.identifier, "Site created");
        Ok(site)
    }

    pub async fn get_site(&self, id: Uuid) -> Result<Site, DomainError> {
        self.sites
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Site",
                id,
            })
    }

    /// Validate and insert a new post.
    pub async fn create_post(&self, input: NewBlogPost) -> Result<BlogPost, DomainError> {
        self.get_site(input.site_id).await?;

        let mut post = BlogPost::new(input.site_id, input.title);
        post.slug = input.slug.unwrap_or_default();
        post.published_at = input.published_at;
        post.is_published = input.is_published;
        post.attachments = input.attachments;

        self.validate(&mut post).await?;

        let saved = self
            .posts
            .insert(post.clone())
            .await
            .map_err(|e| map_unique_violation(e, &post))?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");
        Ok(saved)
    }

    /// Apply `changes` to a stored post, re-validate and persist it.
    pub async fn update_post(
        &self,
        id: Uuid,
        changes: BlogPostChanges,
    ) -> Result<BlogPost, DomainError> {
        let mut post = self.get_post(id).await?;
        changes.apply(&mut post);
        post.updated_at = Utc::now();

        self.validate(&mut post).await?;

        let saved = self
            .posts
            .update(post.clone())
            .await
            .map_err(|e| map_unique_violation(e, &post))?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post updated");
        Ok(saved)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<BlogPost, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "BlogPost",
                id,
            })
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "BlogPost",
                id,
            },
            other => other.into(),
        })?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn list_posts(
        &self,
        site_id: Uuid,
        filter: &PostFilter,
    ) -> Result<Vec<BlogPost>, DomainError> {
        Ok(self.posts.list(site_id, filter).await?)
    }

    /// Public URL of `post`, resolved against its owning site.
    pub async fn post_url(&self, post: &BlogPost, relative: bool) -> Result<String, DomainError> {
        let site = self.get_site(post.site_id).await?;
        post.url(&site, &self.config, relative).ok_or_else(|| {
            DomainError::Internal(format!("post {} has no partition", post.id))
        })
    }

    async fn validate(&self, post: &mut BlogPost) -> Result<(), DomainError> {
        let report = PostValidator::new(self.posts.as_ref())
            .validate(post)
            .await?;
        report.into_result().map_err(|errors| {
            tracing::warn!(post_id = %post.id, %errors, "Post rejected by validation");
            DomainError::Validation(errors)
        })
    }
}

/// A unique index firing after the pre-check passed means a concurrent
/// writer won; report it the same way as the pre-check would have.
fn map_unique_violation(err: RepoError, post: &BlogPost) -> DomainError {
    match (err, post.partition()) {
        (RepoError::UniqueViolation(detail), Some(partition)) => {
            tracing::warn!(post_id = %post.id, %detail, "Unique index rejected post");
            DomainError::Validation(ValidationErrors::from(
                ValidationError::UniquenessViolation {
                    scope: SlugScope::new(post.site_id, partition),
                    slug: post.slug.clone(),
                },
            ))
        }
        (err, _) => {
            tracing::error!(post_id = %post.id, error = %err, "Failed to persist post");
            err.into()
        }
    }
}
