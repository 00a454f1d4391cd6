use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Auth Router Module
///
/// Session entry and exit points. Every POST answers with a 303 redirect carrying an
/// `error` or `success` message for the page to show.
///
/// `/sign-in` and `/sign-up` are only for anonymous visitors. `/forgot-password` stays
/// open to everyone, and `/sign-out` works with or without a session.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sign-in",
            get(handlers::get_sign_in).post(handlers::sign_in),
        )
        .route(
            "/sign-up",
            get(handlers::get_sign_up).post(handlers::sign_up),
        )
        .route(
            "/forgot-password",
            get(handlers::get_forgot_password).post(handlers::forgot_password),
        )
        // POST /sign-out
        // Clears the session cookies even when the provider call fails.
        .route("/sign-out", post(handlers::sign_out))
}
