use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Admin Router Module
///
/// Read access to stored form submissions. Nested under `/admin`, which the gate
/// reserves for signed-in users. Reads use the service-role pool because the public
/// role may insert submissions but never read them back.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/submissions/contact
        // Most recent contact messages, newest first.
        .route(
            "/submissions/contact",
            get(handlers::get_contact_submissions),
        )
        // GET /admin/submissions/feedback
        .route(
            "/submissions/feedback",
            get(handlers::get_feedback_submissions),
        )
}
