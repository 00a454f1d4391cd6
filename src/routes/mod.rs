/// Router Module Index
///
/// Groups the site's endpoints by the auth state they expect. Access control itself is
/// not applied here: a single gate layer wraps the merged router (see `create_router`)
/// and decides per path, so these modules only declare routes.

/// CMS pages, detail pages and the public form actions.
pub mod public;

/// Sign-in, sign-up and password recovery. Signed-in visitors are redirected away
/// from the sign-in and sign-up pages.
pub mod auth;

/// Routes under `/protected`. Requires a session.
pub mod protected;

/// Routes under `/admin`. Requires a session.
pub mod admin;
