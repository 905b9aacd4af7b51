//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    pub identifier: String,
    pub hostname: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
}

/// A site's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteResponse {
    pub id: Uuid,
    pub identifier: String,
    pub hostname: String,
    pub path: Option<String>,
    pub url: String,
}

/// Opaque collaborator references carried by a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentsDto {
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub fragment_set_id: Option<Uuid>,
    #[serde(default)]
    pub revision_stream_id: Option<Uuid>,
}

/// Request to create a post. Slug and publication time are derived when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub attachments: Option<AttachmentsDto>,
}

/// Partial update of a post; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub attachments: Option<AttachmentsDto>,
}

/// Query string for listing posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub page: Option<u64>,
}

/// Query string selecting absolute or relative URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlQuery {
    #[serde(default)]
    pub relative: bool,
}

/// A post as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub slug: String,
    pub year: i32,
    pub month: u32,
    pub published_at: DateTime<Utc>,
    pub is_published: bool,
    pub attachments: AttachmentsDto,
    pub url: String,
}

/// One page of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub per_page: u64,
}
