//! Liveness probe.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::{AppState, Storage};

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    storage: Storage,
    blog_path: String,
    timestamp: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
        blog_path: state.blog.config().public_blog_path.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use quire_core::BlogConfig;

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    #[actix_web::test]
    async fn test_health_reports_storage() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory(BlogConfig::new("news"))))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["blog_path"], "news");
    }
}
