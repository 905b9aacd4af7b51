//! HTTP handlers and route configuration.

mod health;
mod posts;
mod sites;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/sites")
                    .route("", web::post().to(sites::create_site))
                    .route("/{site_id}", web::get().to(sites::get_site))
                    .route("/{site_id}/posts", web::post().to(posts::create_post))
                    .route("/{site_id}/posts", web::get().to(posts::list_posts)),
            )
            .service(
                web::scope("/posts")
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            ),
    );
}
