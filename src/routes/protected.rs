use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Protected Router Module
///
/// Routes under `/protected`. The gate redirects anonymous visitors to
/// `/sign-in?redirect_to=...` before these handlers run; the `AuthUser` extractor in
/// each handler is the second line, answering 401 if the gate was ever bypassed.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /protected
        // The signed-in user's id and email.
        .route("/", get(handlers::get_protected))
        // GET|POST /protected/reset-password
        // Landing page of the recovery email, and the action that sets the new password.
        .route(
            "/reset-password",
            get(handlers::get_reset_password).post(handlers::reset_password),
        )
}
