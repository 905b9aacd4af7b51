//! Save-time validation of blog posts.
//!
//! A pass derives the post's attributes first and only then checks them, so
//! the uniqueness query always sees the final slug and partition.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{BlogPost, Partition};
use crate::error::{Field, RepoError, SlugScope, ValidationError, ValidationErrors};
use crate::pipeline::publication::resolve_publication;
use crate::pipeline::slug::{is_valid_slug, normalize};
use crate::pipeline::uniqueness::UniquenessChecker;
use crate::ports::BlogPostRepository;

/// Where a save attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    /// Constructed or edited, not yet checked.
    Draft,
    Validating,
    Valid,
    /// Terminal for this attempt; the post must not be persisted.
    Invalid,
}

/// Attribute values produced by the derivation step of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAttributes {
    pub slug: String,
    pub published_at: DateTime<Utc>,
    pub partition: Partition,
}

impl DerivedAttributes {
    fn apply(self, post: &mut BlogPost) {
        post.slug = self.slug;
        post.published_at = Some(self.published_at);
        post.set_partition(self.partition);
    }
}

/// Derive slug, publication time and partition for `post`.
///
/// A non-blank slug is kept as is; only a blank one is generated from the
/// title. The partition is always recomputed.
pub fn derive_attributes(post: &BlogPost, now: DateTime<Utc>) -> DerivedAttributes {
    let slug = if post.slug.trim().is_empty() {
        normalize(&post.title)
    } else {
        post.slug.clone()
    };
    let publication = resolve_publication(post.published_at, now);

    DerivedAttributes {
        slug,
        published_at: publication.published_at,
        partition: publication.partition,
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub state: ValidationState,
    pub errors: ValidationErrors,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.state == ValidationState::Valid
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Runs the derivation step and every check, collecting all failures.
pub struct PostValidator<'a> {
    uniqueness: UniquenessChecker<'a>,
}

impl<'a> PostValidator<'a> {
    pub fn new(posts: &'a dyn BlogPostRepository) -> Self {
        Self {
            uniqueness: UniquenessChecker::new(posts),
        }
    }

    /// Validate `post` against the current time.
    pub async fn validate(&self, post: &mut BlogPost) -> Result<ValidationReport, RepoError> {
        self.validate_at(post, Utc::now()).await
    }

    /// Validate `post`, using `now` as the default publication time.
    ///
    /// Mutates `post` with its derived attributes whatever the outcome. A
    /// storage failure during the uniqueness query aborts the pass.
    pub async fn validate_at(
        &self,
        post: &mut BlogPost,
        now: DateTime<Utc>,
    ) -> Result<ValidationReport, RepoError> {
        let mut state = ValidationState::Draft;
        transition(&mut state, ValidationState::Validating, post);

        derive_attributes(post, now).apply(post);

        let mut errors = ValidationErrors::new();
        check_required(post, &mut errors);
        check_slug_format(post, &mut errors);
        self.check_uniqueness(post, &mut errors).await?;

        let outcome = if errors.is_empty() {
            ValidationState::Valid
        } else {
            ValidationState::Invalid
        };
        transition(&mut state, outcome, post);

        Ok(ValidationReport { state, errors })
    }

    async fn check_uniqueness(
        &self,
        post: &BlogPost,
        errors: &mut ValidationErrors,
    ) -> Result<(), RepoError> {
        let Some(partition) = post.partition() else {
            return Ok(());
        };
        if post.slug.trim().is_empty() {
            return Ok(());
        }

        let taken = self
            .uniqueness
            .exists_collision(post.site_id, partition, &post.slug, Some(post.id))
            .await?;
        if taken {
            errors.push(ValidationError::UniquenessViolation {
                scope: SlugScope::new(post.site_id, partition),
                slug: post.slug.clone(),
            });
        }
        Ok(())
    }
}

fn transition(state: &mut ValidationState, next: ValidationState, post: &BlogPost) {
    tracing::debug!(post_id = %post.id, from = ?*state, to = ?next, "Validation state change");
    *state = next;
}

fn check_required(post: &BlogPost, errors: &mut ValidationErrors) {
    if post.title.trim().is_empty() {
        errors.push(ValidationError::MissingRequiredField(Field::Title));
    }
    if post.slug.trim().is_empty() {
        errors.push(ValidationError::MissingRequiredField(Field::Slug));
    }
    if post.year().is_none() {
        errors.push(ValidationError::MissingRequiredField(Field::Year));
    }
    if post.month().is_none() {
        errors.push(ValidationError::MissingRequiredField(Field::Month));
    }
}

// A blank slug is already reported as missing.
fn check_slug_format(post: &BlogPost, errors: &mut ValidationErrors) {
    if !post.slug.trim().is_empty() && !is_valid_slug(&post.slug) {
        errors.push(ValidationError::InvalidFormat(Field::Slug));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::BaseRepository;
    use crate::testing::MemoryPosts;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn march_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_valid_post_derives_everything() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "Hello World!");

        let report = validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(report.state, ValidationState::Valid);
        assert!(report.errors.is_empty());
        assert_eq!(post.slug, "Hello-World");
        assert_eq!(post.published_at, Some(march_2024()));
        assert_eq!(post.year(), Some(2024));
        assert_eq!(post.month(), Some(3));
    }

    #[tokio::test]
    async fn test_default_published_at_uses_current_time() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "Now");

        let before = Utc::now();
        validator.validate(&mut post).await.unwrap();
        let after = Utc::now();

        let published_at = post.published_at.unwrap();
        assert!(before <= published_at && published_at <= after);
        assert_eq!(post.partition(), Some(Partition::of(&published_at)));
    }

    #[tokio::test]
    async fn test_published_at_is_not_reset_on_later_passes() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "Once");

        validator.validate_at(&mut post, march_2024()).await.unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        validator.validate_at(&mut post, later).await.unwrap();

        assert_eq!(post.published_at, Some(march_2024()));
        assert_eq!(post.year(), Some(2024));
    }

    #[tokio::test]
    async fn test_empty_title_reports_title_and_slug() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "");

        let report = validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(report.state, ValidationState::Invalid);
        assert_eq!(report.errors.len(), 2);
        assert!(
            report
                .errors
                .contains(&ValidationError::MissingRequiredField(Field::Title))
        );
        assert!(
            report
                .errors
                .contains(&ValidationError::MissingRequiredField(Field::Slug))
        );
    }

    #[tokio::test]
    async fn test_title_without_slug_characters_is_missing_slug() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "?!");

        let report = validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(
            report.into_result(),
            Err(ValidationErrors::from(ValidationError::MissingRequiredField(
                Field::Slug
            )))
        );
    }

    #[tokio::test]
    async fn test_explicit_slug_is_kept_and_format_checked() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "Fine Title").with_slug("not valid!");

        let report = validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(post.slug, "not valid!");
        assert_eq!(
            report.errors,
            ValidationErrors::from(ValidationError::InvalidFormat(Field::Slug))
        );
    }

    #[tokio::test]
    async fn test_slug_survives_title_change() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "First Title");

        validator.validate_at(&mut post, march_2024()).await.unwrap();
        post.title = "Second Title".to_string();
        validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(post.slug, "First-Title");
    }

    #[tokio::test]
    async fn test_explicit_slug_survives_title_change() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "A").with_slug("fixed");

        let first = validator.validate_at(&mut post, march_2024()).await.unwrap();
        assert!(first.is_valid());
        assert_eq!(post.slug, "fixed");

        post.title = "B".to_string();
        let second = validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert!(second.is_valid());
        assert_eq!(post.title, "B");
        assert_eq!(post.slug, "fixed");
    }

    #[tokio::test]
    async fn test_changed_published_at_moves_partition() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);
        let mut post = BlogPost::new(Uuid::new_v4(), "Moving");

        validator.validate_at(&mut post, march_2024()).await.unwrap();
        post.published_at = Some(Utc.with_ymd_and_hms(2023, 7, 4, 0, 0, 0).unwrap());
        validator.validate_at(&mut post, march_2024()).await.unwrap();

        assert_eq!(post.year(), Some(2023));
        assert_eq!(post.month(), Some(7));
        assert_eq!(post.slug, "Moving");
    }

    #[tokio::test]
    async fn test_duplicate_slug_in_scope_is_rejected() {
        let posts = MemoryPosts::default();
        let site_id = Uuid::new_v4();
        let validator = PostValidator::new(&posts);

        let mut first = BlogPost::new(site_id, "Same Title");
        validator.validate_at(&mut first, march_2024()).await.unwrap();
        posts.insert(first).await.unwrap();

        let mut second = BlogPost::new(site_id, "Same  Title!");
        let later_in_march = Utc.with_ymd_and_hms(2024, 3, 28, 0, 0, 0).unwrap();
        let report = validator.validate_at(&mut second, later_in_march).await.unwrap();

        assert_eq!(report.state, ValidationState::Invalid);
        assert_eq!(
            report.errors,
            ValidationErrors::from(ValidationError::UniquenessViolation {
                scope: SlugScope::new(site_id, Partition::new(2024, 3).unwrap()),
                slug: "Same-Title".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_same_slug_in_other_month_is_fine() {
        let posts = MemoryPosts::default();
        let site_id = Uuid::new_v4();
        let validator = PostValidator::new(&posts);

        let mut first = BlogPost::new(site_id, "Same Title");
        validator.validate_at(&mut first, march_2024()).await.unwrap();
        posts.insert(first).await.unwrap();

        let mut second = BlogPost::new(site_id, "Same Title");
        let april = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let report = validator.validate_at(&mut second, april).await.unwrap();

        assert!(report.is_valid());
    }

    #[tokio::test]
    async fn test_revalidating_stored_post_does_not_collide_with_itself() {
        let posts = MemoryPosts::default();
        let validator = PostValidator::new(&posts);

        let mut post = BlogPost::new(Uuid::new_v4(), "Mine");
        validator.validate_at(&mut post, march_2024()).await.unwrap();
        let mut stored = posts.insert(post).await.unwrap();

        let report = validator.validate_at(&mut stored, march_2024()).await.unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_blank_slug_is_regenerated() {
        let post = BlogPost::new(Uuid::new_v4(), "Title Here").with_slug("   ");
        let derived = derive_attributes(&post, march_2024());
        assert_eq!(derived.slug, "Title-Here");
    }
}
