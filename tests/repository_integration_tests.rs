//! Runs against a real Postgres (`DATABASE_URL`, superuser). Ignored by default:
//! `cargo test -- --ignored` with a local database up.

use folio_site::{
    content::PageContent,
    error::SubmissionError,
    models::{NewContactSubmission, NewFeedbackSubmission},
    repository::{PostgresRepository, Repository},
};
use sqlx::{Executor, PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    /// Both tiers on the superuser connection.
    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone(), self.pool.clone())
    }

    /// Both tiers running as the restricted `anon` role.
    async fn anon_repository(&self) -> PostgresRepository {
        let db_url = std::env::var("DATABASE_URL").unwrap();
        let anon_pool = PgPoolOptions::new()
            .max_connections(1)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET ROLE anon").await?;
                    Ok(())
                })
            })
            .connect(&db_url)
            .await
            .unwrap();
        PostgresRepository::new(anon_pool.clone(), anon_pool)
    }
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

// --- Tests ---

#[tokio::test]
#[ignore]
async fn test_get_page_parses_content() {
    let ctx = DbTestContext::setup().await;
    let slug = unique("contact");

    sqlx::query("INSERT INTO pages (slug, title, content, sort_order) VALUES ($1, 'Contact', $2, 5)")
        .bind(&slug)
        .bind(serde_json::json!({ "email": "hi@example.com" }))
        .execute(&ctx.pool)
        .await
        .unwrap();

    let page = ctx.repository().get_page(&slug).await.unwrap();
    assert_eq!(page.title, "Contact");
    // Slug is not a known kind, so the payload stays raw.
    assert!(matches!(page.content, PageContent::Unknown(_)));

    assert!(ctx.repository().get_page(&unique("missing")).await.is_none());
}

#[tokio::test]
#[ignore]
async fn test_navigable_pages_are_ordered_by_sort_order() {
    let ctx = DbTestContext::setup().await;
    let (late, early) = (unique("late"), unique("early"));

    sqlx::query("INSERT INTO pages (slug, title, sort_order) VALUES ($1, 'Late', 900), ($2, 'Early', -900)")
        .bind(&late)
        .bind(&early)
        .execute(&ctx.pool)
        .await
        .unwrap();

    let slugs: Vec<String> = ctx
        .repository()
        .get_navigable_pages()
        .await
        .into_iter()
        .map(|p| p.slug)
        .collect();

    let early_at = slugs.iter().position(|s| *s == early).unwrap();
    let late_at = slugs.iter().position(|s| *s == late).unwrap();
    assert!(early_at < late_at);
}

#[tokio::test]
#[ignore]
async fn test_unpublished_posts_are_hidden() {
    let ctx = DbTestContext::setup().await;
    let (draft, live) = (unique("draft"), unique("live"));

    sqlx::query(
        "INSERT INTO posts (slug, title, is_published, published_at) VALUES ($1, 'Draft', false, NULL), ($2, 'Live', true, now())",
    )
    .bind(&draft)
    .bind(&live)
    .execute(&ctx.pool)
    .await
    .unwrap();

    let repo = ctx.repository();
    assert!(repo.get_post(&draft).await.is_none());
    assert_eq!(repo.get_post(&live).await.unwrap().title, "Live");
}

#[tokio::test]
#[ignore]
async fn test_submissions_round_trip_through_service_pool() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let name = unique("Ada");

    repo.insert_contact_submission(NewContactSubmission {
        name: name.clone(),
        email: "ada@example.com".to_string(),
        subject: None,
        message: "Integration test message".to_string(),
    })
    .await
    .unwrap();

    repo.insert_feedback_submission(NewFeedbackSubmission {
        comments: format!("Feedback from {name}"),
        ..NewFeedbackSubmission::default()
    })
    .await
    .unwrap();

    let contacts = repo.get_contact_submissions(100).await;
    assert!(contacts.iter().any(|c| c.name == name && c.subject.is_none()));

    let feedback = repo.get_feedback_submissions(100).await;
    let stored = feedback
        .iter()
        .find(|f| f.comments.contains(&name))
        .unwrap();
    assert_eq!(stored.overall_rating, None);
}

#[tokio::test]
#[ignore]
async fn test_restricted_role_insert_is_policy_rejected() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.anon_repository().await;

    let result = repo
        .insert_contact_submission(NewContactSubmission {
            name: "Mallory".to_string(),
            email: "m@example.com".to_string(),
            subject: None,
            message: "Should never be stored".to_string(),
        })
        .await;

    assert!(matches!(result, Err(SubmissionError::PolicyRejected)));
}
