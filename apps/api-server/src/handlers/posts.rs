//! Blog post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quire_core::domain::{BlogPost, PostAttachments, Site};
use quire_core::ports::PostFilter;
use quire_core::{BlogConfig, BlogPostChanges, NewBlogPost};
use quire_shared::dto::{
    AttachmentsDto, CreatePostRequest, ListPostsQuery, PostListResponse, PostResponse,
    UpdatePostRequest, UrlQuery,
};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// Highest page a listing may request.
const MAX_PAGE: u64 = 10_000;

fn attachments_from_dto(dto: AttachmentsDto) -> PostAttachments {
    PostAttachments {
        category_ids: dto.category_ids,
        fragment_set_id: dto.fragment_set_id,
        revision_stream_id: dto.revision_stream_id,
    }
}

fn attachments_to_dto(attachments: PostAttachments) -> AttachmentsDto {
    AttachmentsDto {
        category_ids: attachments.category_ids,
        fragment_set_id: attachments.fragment_set_id,
        revision_stream_id: attachments.revision_stream_id,
    }
}

/// Build the API view of a stored post, URL included.
fn post_response(
    post: BlogPost,
    site: &Site,
    config: &BlogConfig,
    relative: bool,
) -> AppResult<PostResponse> {
    let (Some(partition), Some(published_at)) = (post.partition(), post.published_at) else {
        return Err(AppError::Internal(format!(
            "stored post {} has no publication date",
            post.id
        )));
    };
    let url = post
        .url(site, config, relative)
        .ok_or_else(|| AppError::Internal(format!("post {} has no URL", post.id)))?;

    Ok(PostResponse {
        id: post.id,
        site_id: post.site_id,
        title: post.title,
        slug: post.slug,
        year: partition.year,
        month: partition.month,
        published_at,
        is_published: post.is_published,
        attachments: attachments_to_dto(post.attachments),
        url,
    })
}

/// POST /api/sites/{site_id}/posts
pub async fn create_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreatePostRequest>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let site_id = path.into_inner();
    let req = body.into_inner();

    let post = state
        .blog
        .create_post(NewBlogPost {
            site_id,
            title: req.title,
            slug: req.slug,
            published_at: req.published_at,
            is_published: req.is_published,
            attachments: req.attachments.map(attachments_from_dto).unwrap_or_default(),
        })
        .await?;
    tracing::debug!(request_id = %request_id.as_str(), post_id = %post.id, "Created post");

    let site = state.blog.get_site(site_id).await?;
    let response = post_response(post, &site, state.blog.config(), false)?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/sites/{site_id}/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let site_id = path.into_inner();
    let query = query.into_inner();

    if query.month.is_some_and(|m| !(1..=12).contains(&m)) {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }

    let page = query.page.unwrap_or(1).max(1);
    if page > MAX_PAGE {
        return Err(AppError::BadRequest(format!(
            "page must be at most {MAX_PAGE}"
        )));
    }

    let site = state.blog.get_site(site_id).await?;
    let config = state.blog.config();

    let mut filter = PostFilter {
        published_only: query.published.unwrap_or(false),
        year: query.year,
        month: query.month,
        ..PostFilter::default()
    };
    filter = filter.page(page, config.posts_per_page);

    let posts = state
        .blog
        .list_posts(site_id, &filter)
        .await?
        .into_iter()
        .map(|post| post_response(post, &site, config, false))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        page,
        per_page: config.posts_per_page,
    }))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<UrlQuery>,
) -> AppResult<HttpResponse> {
    let post = state.blog.get_post(path.into_inner()).await?;
    let site = state.blog.get_site(post.site_id).await?;

    let response = post_response(post, &site, state.blog.config(), query.relative)?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .blog
        .update_post(
            path.into_inner(),
            BlogPostChanges {
                title: req.title,
                slug: req.slug,
                published_at: req.published_at,
                is_published: req.is_published,
                attachments: req.attachments.map(attachments_from_dto),
            },
        )
        .await?;
    tracing::debug!(request_id = %request_id.as_str(), post_id = %post.id, "Updated post");

    let site = state.blog.get_site(post.site_id).await?;
    let response = post_response(post, &site, state.blog.config(), false)?;
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.blog.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
