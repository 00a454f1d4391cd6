use crate::{
    AppState,
    auth::{
        AuthUser, PROTECTED_PATH, SIGN_IN_PATH, clear_session_cookies, safe_redirect_target,
        set_session_cookies,
    },
    error::SubmissionError,
    identity::IdentityError,
    models::{
        ActionResult, AuthPageView, ContactForm, ContactSubmission, FeedbackForm,
        FeedbackSubmission, ForgotPasswordForm, ResetPasswordForm, SignInForm, SignUpForm,
        UserProfile,
    },
    pages,
    validation::{self, first_message},
    views::{NotFoundView, PageResponse, PostDetailView, ProjectDetailView, ServiceDetailView},
};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

const SIGN_UP_PATH: &str = "/sign-up";
const FORGOT_PASSWORD_PATH: &str = "/forgot-password";
const RESET_PASSWORD_PATH: &str = "/protected/reset-password";

const CONTACT_SUCCESS: &str = "Thanks for reaching out! We'll get back to you soon.";
const FEEDBACK_SUCCESS: &str = "Thank you for your feedback!";
const VALIDATION_FAILED: &str = "Please correct the highlighted fields.";
const POLICY_REJECTED: &str = "Your submission was not accepted. Please try again later.";
const GENERIC_FAILURE: &str = "Something went wrong while sending your message. Please try again later.";
const PROVIDER_UNAVAILABLE: &str = "The sign-in service is unavailable. Please try again shortly.";

/// Admin listings show this many of the most recent submissions.
const SUBMISSION_LIST_LIMIT: i64 = 100;

// --- Query Structs ---

/// FlashQuery
///
/// Query parameters a form action redirects back with.
#[derive(Deserialize, utoipa::IntoParams, Default)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub redirect_to: Option<String>,
}

// --- Response Helpers ---

/// CMS pages answer 404 when the record is missing, but still with a full body.
fn page_reply(page: PageResponse) -> (StatusCode, Json<PageResponse>) {
    let status = if page.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(page))
}

fn detail_reply<T>(view: Option<T>, what: &str) -> Result<Json<T>, (StatusCode, Json<NotFoundView>)> {
    view.map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(NotFoundView {
                title: format!("{what} not found"),
                message: format!("We couldn't find that {}.", what.to_lowercase()),
            }),
        )
    })
}

/// Redirect back to `path` with a single flash message in the query string.
fn flash(path: &str, kind: &str, message: &str) -> Redirect {
    Redirect::to(&format!(
        "{}?{}={}",
        path,
        kind,
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    ))
}

/// Failed sign-in: back to the form with the error, keeping a safe destination.
fn sign_in_error(message: &str, redirect_to: &str) -> Redirect {
    let mut location = format!(
        "{}?error={}",
        SIGN_IN_PATH,
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    );
    if let Some(target) = safe_redirect_target(redirect_to) {
        location.push_str("&redirect_to=");
        location.extend(utf8_percent_encode(target, NON_ALPHANUMERIC));
    }
    Redirect::to(&location)
}

fn action_ok(message: &str) -> (StatusCode, Json<ActionResult>) {
    (
        StatusCode::OK,
        Json(ActionResult {
            success: true,
            message: message.to_string(),
            errors: Default::default(),
        }),
    )
}

/// submission_failure
///
/// Maps a failed submission to its user-facing answer. Only a row-level policy
/// rejection is told apart from other database failures.
fn submission_failure(error: SubmissionError) -> (StatusCode, Json<ActionResult>) {
    let (status, message, errors) = match error {
        SubmissionError::Validation(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, VALIDATION_FAILED, errors)
        }
        SubmissionError::PolicyRejected => {
            tracing::warn!("submission rejected by row-level security policy");
            (StatusCode::FORBIDDEN, POLICY_REJECTED, Default::default())
        }
        SubmissionError::Database(e) => {
            tracing::error!("submission insert failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE, Default::default())
        }
    };

    (
        status,
        Json(ActionResult {
            success: false,
            message: message.to_string(),
            errors,
        }),
    )
}

/// The provider's own message for refusals, a generic one when it is unreachable.
fn identity_message(error: IdentityError) -> String {
    match error {
        IdentityError::Rejected { message, .. } => message,
        IdentityError::Transport(reason) => {
            tracing::error!("auth provider call failed: {}", reason);
            PROVIDER_UNAVAILABLE.to_string()
        }
    }
}

// --- Page Handlers ---

/// get_home
///
/// [Public Route] Landing page with featured work, services and testimonials.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_home(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_home(state.repo.as_ref()).await)
}

/// get_about
#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_about(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_about(state.repo.as_ref()).await)
}

/// get_contact
#[utoipa::path(
    get,
    path = "/contact",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_contact(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_contact(state.repo.as_ref()).await)
}

/// get_services
#[utoipa::path(
    get,
    path = "/services",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_services(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_services(state.repo.as_ref()).await)
}

/// get_service_detail
///
/// [Public Route] One service with the UX problems it solves.
#[utoipa::path(
    get,
    path = "/services/{slug}",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Found", body = ServiceDetailView),
        (status = 404, description = "Unknown service", body = NotFoundView)
    )
)]
pub async fn get_service_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ServiceDetailView>, (StatusCode, Json<NotFoundView>)> {
    detail_reply(pages::compose_service_detail(state.repo.as_ref(), &slug).await, "Service")
}

/// get_projects
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_projects(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_projects(state.repo.as_ref()).await)
}

/// get_project_detail
#[utoipa::path(
    get,
    path = "/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Found", body = ProjectDetailView),
        (status = 404, description = "Unknown project", body = NotFoundView)
    )
)]
pub async fn get_project_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectDetailView>, (StatusCode, Json<NotFoundView>)> {
    detail_reply(pages::compose_project_detail(state.repo.as_ref(), &slug).await, "Project")
}

/// get_blog
#[utoipa::path(
    get,
    path = "/blog",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_blog(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_blog(state.repo.as_ref()).await)
}

/// get_post_detail
///
/// [Public Route] A published post. Drafts answer 404 like unknown slugs.
#[utoipa::path(
    get,
    path = "/blog/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Found", body = PostDetailView),
        (status = 404, description = "Unknown or unpublished post", body = NotFoundView)
    )
)]
pub async fn get_post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetailView>, (StatusCode, Json<NotFoundView>)> {
    detail_reply(pages::compose_post_detail(state.repo.as_ref(), &slug).await, "Post")
}

/// get_faq
#[utoipa::path(
    get,
    path = "/faq",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_faq(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_faq(state.repo.as_ref()).await)
}

/// get_feedback
#[utoipa::path(
    get,
    path = "/feedback",
    responses(
        (status = 200, description = "Composed page", body = PageResponse),
        (status = 404, description = "Page not published", body = PageResponse)
    )
)]
pub async fn get_feedback(State(state): State<AppState>) -> (StatusCode, Json<PageResponse>) {
    page_reply(pages::compose_feedback(state.repo.as_ref()).await)
}

// --- Form Action Handlers ---

/// submit_contact
///
/// [Public Route] Validates the contact form and stores it with a single insert.
/// Invalid input never reaches the database.
#[utoipa::path(
    post,
    path = "/contact",
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Stored", body = ActionResult),
        (status = 422, description = "Field errors", body = ActionResult),
        (status = 403, description = "Rejected by access policy", body = ActionResult),
        (status = 500, description = "Storage failure", body = ActionResult)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> (StatusCode, Json<ActionResult>) {
    let submission = match validation::validate_contact(&form) {
        Ok(submission) => submission,
        Err(errors) => return submission_failure(SubmissionError::Validation(errors)),
    };

    match state.repo.insert_contact_submission(submission).await {
        Ok(()) => {
            tracing::info!("contact submission stored");
            action_ok(CONTACT_SUCCESS)
        }
        Err(e) => submission_failure(e),
    }
}

/// submit_feedback
///
/// [Public Route] Validates and stores site feedback. Skipped ratings are stored as
/// absent rather than zero.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body(content = FeedbackForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Stored", body = ActionResult),
        (status = 422, description = "Field errors", body = ActionResult),
        (status = 403, description = "Rejected by access policy", body = ActionResult),
        (status = 500, description = "Storage failure", body = ActionResult)
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> (StatusCode, Json<ActionResult>) {
    let submission = match validation::validate_feedback(&form) {
        Ok(submission) => submission,
        Err(errors) => return submission_failure(SubmissionError::Validation(errors)),
    };

    match state.repo.insert_feedback_submission(submission).await {
        Ok(()) => {
            tracing::info!("feedback submission stored");
            action_ok(FEEDBACK_SUCCESS)
        }
        Err(e) => submission_failure(e),
    }
}

// --- Auth Pages & Actions ---

fn auth_page(page: &str, query: FlashQuery) -> Json<AuthPageView> {
    Json(AuthPageView {
        page: page.to_string(),
        error: query.error,
        success: query.success,
        redirect_to: query
            .redirect_to
            .as_deref()
            .and_then(safe_redirect_target)
            .map(str::to_string),
    })
}

/// get_sign_in
///
/// [Auth Route] Sign-in page state. Signed-in visitors never get here: the gate
/// redirects them to the protected area.
#[utoipa::path(
    get,
    path = "/sign-in",
    params(FlashQuery),
    responses((status = 200, description = "Sign-in page", body = AuthPageView))
)]
pub async fn get_sign_in(Query(query): Query<FlashQuery>) -> Json<AuthPageView> {
    auth_page("sign-in", query)
}

/// get_sign_up
#[utoipa::path(
    get,
    path = "/sign-up",
    params(FlashQuery),
    responses((status = 200, description = "Sign-up page", body = AuthPageView))
)]
pub async fn get_sign_up(Query(query): Query<FlashQuery>) -> Json<AuthPageView> {
    auth_page("sign-up", query)
}

/// get_forgot_password
#[utoipa::path(
    get,
    path = "/forgot-password",
    params(FlashQuery),
    responses((status = 200, description = "Forgot-password page", body = AuthPageView))
)]
pub async fn get_forgot_password(Query(query): Query<FlashQuery>) -> Json<AuthPageView> {
    auth_page("forgot-password", query)
}

/// sign_in
///
/// [Auth Route] Password sign-in. On success the token pair is written to the session
/// cookies and the visitor continues to the page they originally asked for.
#[utoipa::path(
    post,
    path = "/sign-in",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Redirect to destination, or back with an error"))
)]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    if let Err(errors) = validation::validate_sign_in(&form) {
        return sign_in_error(&first_message(&errors), &form.redirect_to).into_response();
    }

    match state
        .identity
        .sign_in_with_password(form.email.trim(), &form.password)
        .await
    {
        Ok(session) => {
            let jar = set_session_cookies(jar, &session, state.config.secure_cookies());
            let destination = safe_redirect_target(&form.redirect_to).unwrap_or(PROTECTED_PATH);
            tracing::info!("user signed in");
            (jar, Redirect::to(destination)).into_response()
        }
        Err(e) => sign_in_error(&identity_message(e), &form.redirect_to).into_response(),
    }
}

/// sign_up
///
/// [Auth Route] Registers a user. The confirmation email links back to the sign-in page.
#[utoipa::path(
    post,
    path = "/sign-up",
    request_body(content = SignUpForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Redirect back with a success or error message"))
)]
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Redirect {
    if let Err(errors) = validation::validate_sign_up(&form) {
        return flash(SIGN_UP_PATH, "error", &first_message(&errors));
    }

    let confirm_url = format!("{}{}", state.config.site_url.trim_end_matches('/'), SIGN_IN_PATH);
    match state
        .identity
        .sign_up(form.email.trim(), &form.password, &confirm_url)
        .await
    {
        Ok(()) => flash(
            SIGN_UP_PATH,
            "success",
            "Thanks for signing up! Please check your email for a verification link.",
        ),
        Err(e) => flash(SIGN_UP_PATH, "error", &identity_message(e)),
    }
}

/// forgot_password
///
/// [Public Route] Sends a recovery email whose link lands on the reset-password page.
#[utoipa::path(
    post,
    path = "/forgot-password",
    request_body(content = ForgotPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Redirect back with a success or error message"))
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Redirect {
    let email = form.email.trim();
    if !validation::is_valid_email(email) {
        return flash(FORGOT_PASSWORD_PATH, "error", "Please enter a valid email address");
    }

    let reset_url = format!(
        "{}{}",
        state.config.site_url.trim_end_matches('/'),
        RESET_PASSWORD_PATH
    );
    match state.identity.reset_password_for_email(email, &reset_url).await {
        Ok(()) => flash(
            FORGOT_PASSWORD_PATH,
            "success",
            "Check your email for a link to reset your password.",
        ),
        Err(e) => flash(FORGOT_PASSWORD_PATH, "error", &identity_message(e)),
    }
}

/// sign_out
///
/// [Public Route] Ends the session. The provider call is best effort: the cookies are
/// cleared whatever it answers.
#[utoipa::path(
    post,
    path = "/sign-out",
    responses((status = 303, description = "Redirect to sign-in"))
)]
pub async fn sign_out(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    jar: CookieJar,
) -> Response {
    if let Some(user) = user {
        if let Err(e) = state.identity.sign_out(&user.access_token).await {
            tracing::warn!("provider sign-out failed, clearing cookies anyway: {}", e);
        }
    }
    (clear_session_cookies(jar), Redirect::to(SIGN_IN_PATH)).into_response()
}

// --- Protected Handlers ---

/// get_protected
///
/// [Protected Route] The signed-in user's identity.
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 303, description = "No session, redirected to sign-in")
    )
)]
pub async fn get_protected(user: AuthUser) -> Json<UserProfile> {
    Json(UserProfile {
        id: user.id,
        email: user.email,
    })
}

/// get_reset_password
#[utoipa::path(
    get,
    path = "/protected/reset-password",
    params(FlashQuery),
    responses((status = 200, description = "Reset-password page", body = AuthPageView))
)]
pub async fn get_reset_password(
    _user: AuthUser,
    Query(query): Query<FlashQuery>,
) -> Json<AuthPageView> {
    auth_page("reset-password", query)
}

/// reset_password
///
/// [Protected Route] Sets a new password for the signed-in user.
#[utoipa::path(
    post,
    path = "/protected/reset-password",
    request_body(content = ResetPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Redirect back with a success or error message"))
)]
pub async fn reset_password(
    user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Redirect {
    if let Err(errors) = validation::validate_reset_password(&form) {
        return flash(RESET_PASSWORD_PATH, "error", &first_message(&errors));
    }

    match state
        .identity
        .update_password(&user.access_token, &form.password)
        .await
    {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "password updated");
            flash(RESET_PASSWORD_PATH, "success", "Password updated")
        }
        Err(e) => flash(RESET_PASSWORD_PATH, "error", &identity_message(e)),
    }
}

// --- Admin Handlers ---

/// get_contact_submissions
///
/// [Admin Route] Most recent contact submissions, read with the service role.
#[utoipa::path(
    get,
    path = "/admin/submissions/contact",
    responses((status = 200, description = "Recent submissions", body = [ContactSubmission]))
)]
pub async fn get_contact_submissions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<ContactSubmission>> {
    Json(state.repo.get_contact_submissions(SUBMISSION_LIST_LIMIT).await)
}

/// get_feedback_submissions
#[utoipa::path(
    get,
    path = "/admin/submissions/feedback",
    responses((status = 200, description = "Recent submissions", body = [FeedbackSubmission]))
)]
pub async fn get_feedback_submissions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<FeedbackSubmission>> {
    Json(state.repo.get_feedback_submissions(SUBMISSION_LIST_LIMIT).await)
}

/// not_found
///
/// Router fallback for paths no route claims. Runs behind the gate like every route,
/// so an anonymous `/admin/...` request is redirected before it can see this.
pub async fn not_found() -> (StatusCode, Json<NotFoundView>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundView {
            title: pages::defaults::NOT_FOUND_TITLE.to_string(),
            message: pages::defaults::NOT_FOUND_MESSAGE.to_string(),
        }),
    )
}
