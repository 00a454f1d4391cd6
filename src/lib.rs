use axum::{
    extract::FromRef,
    http::HeaderName,
    Router,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod repository;
pub mod validation;
pub mod views;

// Routers grouped by the auth state they expect.
pub mod routes;
use routes::{admin, auth as auth_routes, protected, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use identity::{GoTrueClient, IdentityState, MockIdentityProvider};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` and browsable
/// through the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_home, handlers::get_about, handlers::get_contact,
        handlers::get_services, handlers::get_service_detail, handlers::get_projects,
        handlers::get_project_detail, handlers::get_blog, handlers::get_post_detail,
        handlers::get_faq, handlers::get_feedback, handlers::submit_contact,
        handlers::submit_feedback, handlers::get_sign_in, handlers::get_sign_up,
        handlers::get_forgot_password, handlers::sign_in, handlers::sign_up,
        handlers::forgot_password, handlers::sign_out, handlers::get_protected,
        handlers::get_reset_password, handlers::reset_password,
        handlers::get_contact_submissions, handlers::get_feedback_submissions
    ),
    components(
        schemas(
            views::PageResponse, views::PageMeta, views::PageBody, views::NotFoundView,
            views::ServiceDetailView, views::ProjectDetailView, views::PostDetailView,
            navigation::PageNavigation, models::NavLinkInfo,
            models::ContactForm, models::FeedbackForm, models::SignInForm, models::SignUpForm,
            models::ForgotPasswordForm, models::ResetPasswordForm,
            models::ActionResult, models::AuthPageView, models::UserProfile,
            models::ContactSubmission, models::FeedbackSubmission,
        )
    ),
    tags(
        (name = "folio-site", description = "Portfolio site content, forms and sessions")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply cloneable container for the services every request needs.
#[derive(Clone)]
pub struct AppState {
    /// Content reads (restricted role) and submission writes (service role).
    pub repo: RepositoryState,
    /// Hosted auth provider: sign-in, refresh, recovery, sign-out.
    pub identity: IdentityState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route, wraps the result in the auth gate, then adds the
/// observability and CORS layers.
///
/// The gate is a `.layer` on the merged router rather than a `route_layer` per group,
/// so the fallback runs behind it too: an unmatched `/admin/...` path is redirected to
/// sign-in instead of revealing a 404.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(auth_routes::auth_routes())
        .nest("/protected", protected::protected_routes())
        .nest("/admin", admin::admin_routes())
        .fallback(handlers::not_found)
        // 3. Auth Gate: one decision point for every path, fallback included.
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_gate))
        .with_state(state);

    // 4. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis)
                        )
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`, tagged with the request id so every log line of one request
/// can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        path = %request.uri().path(),
        req_id = %request_id,
    )
}
