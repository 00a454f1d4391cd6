use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CMS Schemas (Mapped to Database) ---

/// Page
///
/// A CMS page from the `public.pages` table. Authored externally, read-only here.
/// `content` is the raw JSON payload; it is turned into a typed
/// [`PageContent`](crate::content::PageContent) by the repository before it reaches
/// the page composer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Page {
    pub slug: String,
    pub title: String,
    // Categorical tag driving the navigation label ("MAIN", "CONTENT_HUB", ...).
    pub page_type: Option<String>,
    pub content: Option<serde_json::Value>,
    pub meta_description: Option<String>,
    pub og_image_url: Option<String>,
    pub sort_order: i32,
}

/// NavigablePageInfo
///
/// Projection of [`Page`] used only to order the site's prev/next navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct NavigablePageInfo {
    pub slug: String,
    pub title: String,
    pub page_type: Option<String>,
}

/// NavLinkInfo
///
/// A resolved previous/next link. Computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NavLinkInfo {
    pub slug: String,
    pub title: String,
    pub category_label: String,
}

/// Post
///
/// A blog post from `public.posts`. Only rows with `is_published = true` are read.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Service
///
/// An offered service from `public.services`, ordered by `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
}

/// Project
///
/// A portfolio case study from `public.projects`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub client_name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub project_url: Option<String>,
    pub is_featured: bool,
    pub sort_order: i32,
    #[ts(type = "string | null")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// FaqCategory
///
/// Grouping for FAQ entries (`public.faq_categories`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct FaqCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

/// Faq
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Faq {
    pub id: Uuid,
    pub category_id: Uuid,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
}

/// Testimonial
///
/// Client quote from `public.testimonials`. `project_id` ties it to a case study.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Testimonial {
    pub id: Uuid,
    pub author_name: String,
    pub author_title: Option<String>,
    pub company: Option<String>,
    pub quote: String,
    pub rating: Option<i32>,
    pub project_id: Option<Uuid>,
    pub is_featured: bool,
}

/// UxProblem
///
/// A usability problem a service addresses. Linked to services through the
/// `service_ux_problems` join table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct UxProblem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// UxSolution
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct UxSolution {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// DesignProcessStep
///
/// One step of the studio's design process (`public.design_process_steps`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct DesignProcessStep {
    pub id: Uuid,
    pub step_number: i32,
    pub title: String,
    pub description: Option<String>,
}

// --- Insert-only Submission Schemas ---

/// NewContactSubmission
///
/// A validated contact form, ready for a single insert into `contact_submissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// NewFeedbackSubmission
///
/// A validated feedback form. Ratings the visitor skipped stay `None` and are
/// stored as NULL, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NewFeedbackSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub overall_rating: Option<i32>,
    pub design_rating: Option<i32>,
    pub usability_rating: Option<i32>,
    pub content_rating: Option<i32>,
    pub comments: String,
    pub page_url: Option<String>,
}

/// ContactSubmission
///
/// Stored contact form row, as listed on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// FeedbackSubmission
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct FeedbackSubmission {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub overall_rating: Option<i32>,
    pub design_rating: Option<i32>,
    pub usability_rating: Option<i32>,
    pub content_rating: Option<i32>,
    pub comments: String,
    pub page_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Form Schemas) ---

/// ContactForm
///
/// Raw `application/x-www-form-urlencoded` body of `POST /contact`. Every field is a
/// plain string so that missing and malformed input reach validation instead of
/// being rejected by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// FeedbackForm
///
/// Raw body of `POST /feedback`. Ratings arrive as strings; an empty string means
/// the visitor skipped that question.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(default)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub overall_rating: String,
    pub design_rating: String,
    pub usability_rating: String,
    pub content_rating: String,
    pub comments: String,
    pub page_url: String,
}

/// SignInForm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    /// Where to send the user after a successful sign-in. Only site-relative paths are honored.
    pub redirect_to: String,
}

/// SignUpForm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
}

/// ForgotPasswordForm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// ResetPasswordForm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

// --- Action Responses (Output Schemas) ---

/// ActionResult
///
/// Outcome of a form submission. `errors` maps field names to a single message and is
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub errors: std::collections::BTreeMap<String, String>,
}

/// AuthPageView
///
/// Body of the GET auth pages (sign-in, sign-up, forgot-password, reset-password).
/// Echoes the flash message a previous form action redirected with.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthPageView {
    pub page: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub redirect_to: Option<String>,
}

/// UserProfile
///
/// Output of `GET /protected`: the identity carried by the current session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
}
