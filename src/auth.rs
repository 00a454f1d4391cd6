use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    config::AppConfig,
    identity::{AuthSession, IdentityError, IdentityProvider},
};

/// Cookie carrying the short-lived access token (a signed JWT).
pub const ACCESS_COOKIE: &str = "sb-access-token";
/// Cookie carrying the refresh token used to rotate an expired access token.
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Audience the auth provider stamps on tokens issued to signed-in users.
const TOKEN_AUDIENCE: &str = "authenticated";

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const PROTECTED_PATH: &str = "/protected";

/// Claims
///
/// The subset of the provider's access-token payload this service relies on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's id in the auth provider.
    pub sub: Uuid,
    /// Expiration Time (exp): the token is refused after this timestamp.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// AuthUser
///
/// The in-process form of a valid session: who the user is, plus the access token the
/// protected actions forward to the auth provider. The gate places it in the request
/// extensions; handlers take it as an extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl AuthUser {
    fn from_claims(claims: Claims, access_token: &str) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            access_token: access_token.to_string(),
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Reads the session the gate resolved for this request. Rejects with 401 when there
/// is none, which only happens on routes the gate does not protect.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Lets handlers that serve both audiences take `Option<AuthUser>`.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}

// --- Tokens ---

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid(String),
}

/// verify_access_token
///
/// Checks signature, expiry and audience locally; no network round trip.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.set_audience(&[TOKEN_AUDIENCE]);

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid(e.to_string())),
        },
    }
}

/// Signs claims the way the provider does (HS256 with the project's JWT secret).
pub fn sign_access_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// --- Session Cookies ---

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .permanent()
        .build()
}

/// Stages both session cookies for a freshly issued token pair.
pub fn set_session_cookies(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, session.access_token.clone(), secure))
        .add(session_cookie(REFRESH_COOKIE, session.refresh_token.clone(), secure))
}

/// Stages removal of both session cookies.
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

/// resolve_session
///
/// Turns the request's cookies into an optional [`AuthUser`] and returns the jar with
/// any cookie changes staged (rotated tokens, or removal of dead ones).
///
/// A valid access token is accepted locally. An expired or missing one is exchanged
/// through the refresh token, which is the only call to the provider. Every failure
/// resolves to "no session": the caller must treat the request as anonymous.
pub async fn resolve_session(
    jar: CookieJar,
    config: &AppConfig,
    identity: &dyn IdentityProvider,
) -> (Option<AuthUser>, CookieJar) {
    let access_token = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let refresh_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    if let Some(token) = access_token.as_deref() {
        match verify_access_token(token, &config.jwt_secret) {
            Ok(claims) => return (Some(AuthUser::from_claims(claims, token)), jar),
            Err(TokenError::Expired) => {
                tracing::debug!("access token expired, attempting refresh");
            }
            Err(TokenError::Invalid(reason)) => {
                tracing::warn!("discarding session with invalid access token: {}", reason);
                return (None, clear_session_cookies(jar));
            }
        }
    }

    let Some(refresh_token) = refresh_token else {
        return (None, jar);
    };

    match identity.refresh_session(&refresh_token).await {
        Ok(session) => match verify_access_token(&session.access_token, &config.jwt_secret) {
            Ok(claims) => {
                let user = AuthUser::from_claims(claims, &session.access_token);
                tracing::debug!(user_id = %user.id, "session refreshed");
                (Some(user), set_session_cookies(jar, &session, config.secure_cookies()))
            }
            Err(e) => {
                tracing::error!("refreshed access token failed verification: {:?}", e);
                (None, jar)
            }
        },
        Err(IdentityError::Rejected { message, .. }) => {
            tracing::info!("refresh token rejected, clearing session: {}", message);
            (None, clear_session_cookies(jar))
        }
        Err(e) => {
            tracing::error!("session check failed, treating request as anonymous: {}", e);
            (None, jar)
        }
    }
}

// --- Gate Rules ---

/// AccessRule
///
/// The auth state a path family requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Only signed-in users; anonymous requests go to the sign-in page.
    RequireSession,
    /// Only anonymous users; signed-in requests go to the protected area.
    RequireAnonymous,
}

/// Path prefix → required auth state. First match wins; unlisted paths are public.
pub const ACCESS_RULES: &[(&str, AccessRule)] = &[
    ("/protected", AccessRule::RequireSession),
    ("/admin", AccessRule::RequireSession),
    ("/sign-in", AccessRule::RequireAnonymous),
    ("/sign-up", AccessRule::RequireAnonymous),
];

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`, not `/administrator`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn rule_for(path: &str) -> Option<AccessRule> {
    ACCESS_RULES
        .iter()
        .find(|(prefix, _)| matches_prefix(path, prefix))
        .map(|(_, rule)| *rule)
}

/// GateDecision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Send the visitor to sign in, remembering where they were going.
    RedirectToSignIn { redirect_to: String },
    RedirectToProtected,
}

/// decide
///
/// Pure decision step of the gate. `target` is the path and query the visitor asked
/// for; it is preserved as the post-sign-in destination.
pub fn decide(path: &str, target: &str, authenticated: bool) -> GateDecision {
    match (rule_for(path), authenticated) {
        (Some(AccessRule::RequireSession), false) => GateDecision::RedirectToSignIn {
            redirect_to: target.to_string(),
        },
        (Some(AccessRule::RequireAnonymous), true) => GateDecision::RedirectToProtected,
        _ => GateDecision::Allow,
    }
}

/// Builds `/sign-in?redirect_to=<target>`.
pub fn sign_in_location(target: &str) -> String {
    format!(
        "{}?redirect_to={}",
        SIGN_IN_PATH,
        utf8_percent_encode(target, NON_ALPHANUMERIC)
    )
}

/// Accepts only site-relative destinations, so a crafted `redirect_to` cannot bounce
/// a freshly signed-in user to another origin.
pub fn safe_redirect_target(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let is_relative = raw.starts_with('/') && !raw.starts_with("//") && !raw.contains('\\');
    is_relative.then_some(raw)
}

/// True when the response already writes one of the session cookies.
fn sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split_once('=').map(|(name, _)| name.trim()))
        .any(|name| name == ACCESS_COOKIE || name == REFRESH_COOKIE)
}

/// auth_gate
///
/// The single request-time gate, applied once around the whole router.
///
/// Session refresh runs before the decision so that redirect responses carry the
/// rotated cookies too; otherwise a refreshed visitor would loop back to sign-in.
///
/// A handler that writes the session cookies itself (sign-in, sign-out) owns them for
/// that response, and the gate's staged refresh or removal is dropped.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let (user, jar) = resolve_session(jar, &state.config, state.identity.as_ref()).await;

    let path = request.uri().path().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let response = match decide(&path, &target, user.is_some()) {
        GateDecision::Allow => {
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        GateDecision::RedirectToSignIn { redirect_to } => {
            tracing::info!(path = %path, "no session for protected path, redirecting to sign-in");
            Redirect::to(&sign_in_location(&redirect_to)).into_response()
        }
        GateDecision::RedirectToProtected => {
            tracing::debug!(path = %path, "signed-in user on auth page, redirecting");
            Redirect::to(PROTECTED_PATH).into_response()
        }
    };

    if sets_session_cookie(&response) {
        tracing::debug!(path = %path, "handler wrote the session cookies, dropping gate changes");
        return response;
    }

    (jar, response).into_response()
}
