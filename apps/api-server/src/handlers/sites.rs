//! Site handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quire_core::domain::{Site, SiteUrl};
use quire_shared::dto::{CreateSiteRequest, SiteResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn site_response(site: Site) -> SiteResponse {
    SiteResponse {
        url: site.url(false),
        id: site.id,
        identifier: site.identifier,
        hostname: site.hostname,
        path: site.path,
    }
}

/// POST /api/sites
pub async fn create_site(
    state: web::Data<AppState>,
    body: web::Json<CreateSiteRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.identifier.trim().is_empty() || req.hostname.trim().is_empty() {
        return Err(AppError::BadRequest(
            "identifier and hostname are required".to_string(),
        ));
    }

    let mut site = Site::new(req.identifier, req.hostname);
    site.path = req.path;
    if let Some(scheme) = req.scheme {
        site.scheme = scheme;
    }

    let site = state.blog.create_site(site).await?;
    Ok(HttpResponse::Created().json(site_response(site)))
}

/// GET /api/sites/{site_id}
pub async fn get_site(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let site = state.blog.get_site(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(site_response(site)))
}
