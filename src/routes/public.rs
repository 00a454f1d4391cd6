use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Public Router Module
///
/// Endpoints open to every visitor. Reads go through the restricted database role, so
/// only published content is ever visible here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers; never touches the database.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Landing page: hero, featured projects, services and featured testimonials.
        .route("/", get(handlers::get_home))
        .route("/about", get(handlers::get_about))
        // GET|POST /contact
        // The page and its form action share the path.
        .route(
            "/contact",
            get(handlers::get_contact).post(handlers::submit_contact),
        )
        .route("/services", get(handlers::get_services))
        .route("/services/{slug}", get(handlers::get_service_detail))
        .route("/projects", get(handlers::get_projects))
        .route("/projects/{slug}", get(handlers::get_project_detail))
        .route("/blog", get(handlers::get_blog))
        // GET /blog/{slug}
        // Unpublished posts are indistinguishable from missing ones.
        .route("/blog/{slug}", get(handlers::get_post_detail))
        .route("/faq", get(handlers::get_faq))
        .route(
            "/feedback",
            get(handlers::get_feedback).post(handlers::submit_feedback),
        )
}
