use crate::content::PageRecord;
use crate::error::SubmissionError;
use crate::models::{
    ContactSubmission, DesignProcessStep, Faq, FaqCategory, FeedbackSubmission, NavigablePageInfo,
    NewContactSubmission, NewFeedbackSubmission, Page, Post, Project, Service, Testimonial,
    UxProblem, UxSolution,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// The contract for every database access the site performs. Read methods never fail
/// from the caller's point of view: upstream errors are logged and surface as "no
/// data", so pages degrade to placeholder content. Inserts report a typed
/// [`SubmissionError`] because the form handlers must tell policy rejections apart.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Pages & Navigation ---
    async fn get_page(&self, slug: &str) -> Option<PageRecord>;
    // Every navigable page, ordered by sort_order.
    async fn get_navigable_pages(&self) -> Vec<NavigablePageInfo>;

    // --- Blog ---
    // Published posts only, newest first.
    async fn get_posts(&self) -> Vec<Post>;
    async fn get_post(&self, slug: &str) -> Option<Post>;

    // --- Services ---
    async fn get_services(&self) -> Vec<Service>;
    async fn get_service(&self, slug: &str) -> Option<Service>;
    async fn get_service_ux_problems(&self, service_id: Uuid) -> Vec<UxProblem>;
    // Solutions to every problem linked to the service.
    async fn get_service_ux_solutions(&self, service_id: Uuid) -> Vec<UxSolution>;
    async fn get_design_process_steps(&self) -> Vec<DesignProcessStep>;

    // --- Projects ---
    async fn get_projects(&self) -> Vec<Project>;
    async fn get_featured_projects(&self, limit: i64) -> Vec<Project>;
    async fn get_project(&self, slug: &str) -> Option<Project>;
    // Services delivered on a project (project_services join table).
    async fn get_project_services(&self, project_id: Uuid) -> Vec<Service>;

    // --- FAQ & Testimonials ---
    async fn get_faq_categories(&self) -> Vec<FaqCategory>;
    async fn get_faqs(&self) -> Vec<Faq>;
    async fn get_featured_testimonials(&self) -> Vec<Testimonial>;
    async fn get_project_testimonials(&self, project_id: Uuid) -> Vec<Testimonial>;

    // --- Submissions (service role) ---
    // Exactly one insert per call, no retry.
    async fn insert_contact_submission(&self, submission: NewContactSubmission) -> Result<(), SubmissionError>;
    async fn insert_feedback_submission(&self, submission: NewFeedbackSubmission) -> Result<(), SubmissionError>;
    async fn get_contact_submissions(&self, limit: i64) -> Vec<ContactSubmission>;
    async fn get_feedback_submissions(&self, limit: i64) -> Vec<FeedbackSubmission>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Postgres-backed implementation holding one pool per credential tier. Reads go
/// through `read_pool` (restricted role, row-level policies apply); inserts and the
/// admin submission listings go through `service_pool`.
pub struct PostgresRepository {
    read_pool: PgPool,
    service_pool: PgPool,
}

impl PostgresRepository {
    pub fn new(read_pool: PgPool, service_pool: PgPool) -> Self {
        Self { read_pool, service_pool }
    }
}

const POST_COLUMNS: &str =
    "id, slug, title, excerpt, body, cover_image_url, author_name, published_at";
const SERVICE_COLUMNS: &str = "id, slug, title, summary, description, icon, sort_order";
const PROJECT_COLUMNS: &str = "id, slug, title, client_name, summary, description, cover_image_url, project_url, is_featured, sort_order, completed_at";
const TESTIMONIAL_COLUMNS: &str =
    "id, author_name, author_title, company, quote, rating, project_id, is_featured";

/// Collapses a list query result into "rows or nothing", logging the failure.
fn rows_or_empty<T>(result: Result<Vec<T>, sqlx::Error>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("{} error: {:?}", what, e);
        vec![]
    })
}

fn row_or_none<T>(result: Result<Option<T>, sqlx::Error>, what: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("{} error: {:?}", what, e);
        None
    })
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_page
    ///
    /// Loads a page by slug and validates its JSON content into the typed union
    /// before handing it out.
    async fn get_page(&self, slug: &str) -> Option<PageRecord> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT slug, title, page_type, content, meta_description, og_image_url, sort_order
            FROM pages
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.read_pool)
        .await;

        row_or_none(page, "get_page").map(PageRecord::from)
    }

    /// get_navigable_pages
    ///
    /// The ordering contract of the navigation resolver lives here: rows come back
    /// sorted by `sort_order`, ties broken by slug so the order is stable.
    async fn get_navigable_pages(&self) -> Vec<NavigablePageInfo> {
        let pages = sqlx::query_as::<_, NavigablePageInfo>(
            "SELECT slug, title, page_type FROM pages ORDER BY sort_order ASC, slug ASC",
        )
        .fetch_all(&self.read_pool)
        .await;

        rows_or_empty(pages, "get_navigable_pages")
    }

    async fn get_posts(&self) -> Vec<Post> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE is_published = true ORDER BY published_at DESC NULLS LAST"
        );
        let posts = sqlx::query_as::<_, Post>(&query).fetch_all(&self.read_pool).await;
        rows_or_empty(posts, "get_posts")
    }

    async fn get_post(&self, slug: &str) -> Option<Post> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1 AND is_published = true");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(&self.read_pool)
            .await;
        row_or_none(post, "get_post")
    }

    async fn get_services(&self) -> Vec<Service> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY sort_order ASC");
        let services = sqlx::query_as::<_, Service>(&query).fetch_all(&self.read_pool).await;
        rows_or_empty(services, "get_services")
    }

    async fn get_service(&self, slug: &str) -> Option<Service> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE slug = $1");
        let service = sqlx::query_as::<_, Service>(&query)
            .bind(slug)
            .fetch_optional(&self.read_pool)
            .await;
        row_or_none(service, "get_service")
    }

    async fn get_service_ux_problems(&self, service_id: Uuid) -> Vec<UxProblem> {
        let problems = sqlx::query_as::<_, UxProblem>(
            r#"
            SELECT p.id, p.title, p.description, p.sort_order
            FROM ux_problems p
            JOIN service_ux_problems sp ON sp.ux_problem_id = p.id
            WHERE sp.service_id = $1
            ORDER BY p.sort_order ASC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(problems, "get_service_ux_problems")
    }

    /// get_service_ux_solutions
    ///
    /// Resolves solutions through the same join table as the problems, so both can be
    /// fetched concurrently instead of waiting for the problem ids first.
    async fn get_service_ux_solutions(&self, service_id: Uuid) -> Vec<UxSolution> {
        let solutions = sqlx::query_as::<_, UxSolution>(
            r#"
            SELECT s.id, s.problem_id, s.title, s.description
            FROM ux_solutions s
            JOIN service_ux_problems sp ON sp.ux_problem_id = s.problem_id
            WHERE sp.service_id = $1
            ORDER BY s.title ASC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(solutions, "get_service_ux_solutions")
    }

    async fn get_design_process_steps(&self) -> Vec<DesignProcessStep> {
        let steps = sqlx::query_as::<_, DesignProcessStep>(
            "SELECT id, step_number, title, description FROM design_process_steps ORDER BY step_number ASC",
        )
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(steps, "get_design_process_steps")
    }

    async fn get_projects(&self) -> Vec<Project> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY sort_order ASC, completed_at DESC NULLS LAST"
        );
        let projects = sqlx::query_as::<_, Project>(&query).fetch_all(&self.read_pool).await;
        rows_or_empty(projects, "get_projects")
    }

    async fn get_featured_projects(&self, limit: i64) -> Vec<Project> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_featured = true ORDER BY sort_order ASC LIMIT $1"
        );
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(&self.read_pool)
            .await;
        rows_or_empty(projects, "get_featured_projects")
    }

    async fn get_project(&self, slug: &str) -> Option<Project> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(&self.read_pool)
            .await;
        row_or_none(project, "get_project")
    }

    async fn get_project_services(&self, project_id: Uuid) -> Vec<Service> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT s.id, s.slug, s.title, s.summary, s.description, s.icon, s.sort_order
            FROM services s
            JOIN project_services ps ON ps.service_id = s.id
            WHERE ps.project_id = $1
            ORDER BY s.sort_order ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(services, "get_project_services")
    }

    async fn get_faq_categories(&self) -> Vec<FaqCategory> {
        let categories = sqlx::query_as::<_, FaqCategory>(
            "SELECT id, name, slug, sort_order FROM faq_categories ORDER BY sort_order ASC",
        )
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(categories, "get_faq_categories")
    }

    async fn get_faqs(&self) -> Vec<Faq> {
        let faqs = sqlx::query_as::<_, Faq>(
            "SELECT id, category_id, question, answer, sort_order FROM faqs ORDER BY sort_order ASC",
        )
        .fetch_all(&self.read_pool)
        .await;
        rows_or_empty(faqs, "get_faqs")
    }

    async fn get_featured_testimonials(&self) -> Vec<Testimonial> {
        let query = format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE is_featured = true");
        let testimonials = sqlx::query_as::<_, Testimonial>(&query)
            .fetch_all(&self.read_pool)
            .await;
        rows_or_empty(testimonials, "get_featured_testimonials")
    }

    async fn get_project_testimonials(&self, project_id: Uuid) -> Vec<Testimonial> {
        let query = format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE project_id = $1");
        let testimonials = sqlx::query_as::<_, Testimonial>(&query)
            .bind(project_id)
            .fetch_all(&self.read_pool)
            .await;
        rows_or_empty(testimonials, "get_project_testimonials")
    }

    /// insert_contact_submission
    ///
    /// Single insert with the service-role pool. A row-level policy refusal maps to
    /// `SubmissionError::PolicyRejected` through the `From<sqlx::Error>` conversion.
    async fn insert_contact_submission(&self, submission: NewContactSubmission) -> Result<(), SubmissionError> {
        sqlx::query(
            "INSERT INTO contact_submissions (name, email, subject, message) VALUES ($1, $2, $3, $4)",
        )
        .bind(submission.name)
        .bind(submission.email)
        .bind(submission.subject)
        .bind(submission.message)
        .execute(&self.service_pool)
        .await?;
        Ok(())
    }

    /// insert_feedback_submission
    ///
    /// Skipped ratings are bound as NULL.
    async fn insert_feedback_submission(&self, submission: NewFeedbackSubmission) -> Result<(), SubmissionError> {
        sqlx::query(
            r#"
            INSERT INTO feedback_submissions
                (name, email, overall_rating, design_rating, usability_rating, content_rating, comments, page_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(submission.name)
        .bind(submission.email)
        .bind(submission.overall_rating)
        .bind(submission.design_rating)
        .bind(submission.usability_rating)
        .bind(submission.content_rating)
        .bind(submission.comments)
        .bind(submission.page_url)
        .execute(&self.service_pool)
        .await?;
        Ok(())
    }

    async fn get_contact_submissions(&self, limit: i64) -> Vec<ContactSubmission> {
        let rows = sqlx::query_as::<_, ContactSubmission>(
            "SELECT id, name, email, subject, message, created_at FROM contact_submissions ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.service_pool)
        .await;
        rows_or_empty(rows, "get_contact_submissions")
    }

    async fn get_feedback_submissions(&self, limit: i64) -> Vec<FeedbackSubmission> {
        let rows = sqlx::query_as::<_, FeedbackSubmission>(
            r#"
            SELECT id, name, email, overall_rating, design_rating, usability_rating, content_rating,
                   comments, page_url, created_at
            FROM feedback_submissions
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.service_pool)
        .await;
        rows_or_empty(rows, "get_feedback_submissions")
    }
}
