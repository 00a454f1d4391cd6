#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use folio_site::{
    AppState,
    auth::{ACCESS_COOKIE, Claims, REFRESH_COOKIE, sign_access_token},
    config::AppConfig,
    content::PageRecord,
    create_router,
    error::SubmissionError,
    identity::{MOCK_USER_EMAIL, MOCK_USER_ID, MockBehavior, MockIdentityProvider},
    models::{
        ContactSubmission, DesignProcessStep, Faq, FaqCategory, FeedbackSubmission,
        NavigablePageInfo, NewContactSubmission, NewFeedbackSubmission, Page, Post, Project,
        Service, Testimonial, UxProblem, UxSolution,
    },
    repository::Repository,
};
use std::{
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;
use uuid::Uuid;

// --- STUB REPOSITORY ---

/// How the stub answers submission inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertOutcome {
    #[default]
    Stored,
    PolicyRejected,
    Broken,
}

/// In-memory repository: canned read results, recorded writes.
#[derive(Default)]
pub struct StubRepository {
    pub pages: Vec<Page>,
    pub navigable_pages: Vec<NavigablePageInfo>,
    pub posts: Vec<Post>,
    pub services: Vec<Service>,
    pub ux_problems: Vec<UxProblem>,
    pub ux_solutions: Vec<UxSolution>,
    pub process_steps: Vec<DesignProcessStep>,
    pub projects: Vec<Project>,
    pub faq_categories: Vec<FaqCategory>,
    pub faqs: Vec<Faq>,
    pub testimonials: Vec<Testimonial>,
    pub insert_outcome: InsertOutcome,

    pub contact_inserts: Mutex<Vec<NewContactSubmission>>,
    pub feedback_inserts: Mutex<Vec<NewFeedbackSubmission>>,
}

impl StubRepository {
    pub fn contact_inserts(&self) -> Vec<NewContactSubmission> {
        self.contact_inserts.lock().unwrap().clone()
    }

    pub fn feedback_inserts(&self) -> Vec<NewFeedbackSubmission> {
        self.feedback_inserts.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), SubmissionError> {
        match self.insert_outcome {
            InsertOutcome::Stored => Ok(()),
            InsertOutcome::PolicyRejected => Err(SubmissionError::PolicyRejected),
            InsertOutcome::Broken => Err(SubmissionError::Database(sqlx::Error::PoolTimedOut)),
        }
    }
}

#[async_trait]
impl Repository for StubRepository {
    async fn get_page(&self, slug: &str) -> Option<PageRecord> {
        self.pages
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .map(PageRecord::from)
    }
    async fn get_navigable_pages(&self) -> Vec<NavigablePageInfo> {
        self.navigable_pages.clone()
    }
    async fn get_posts(&self) -> Vec<Post> {
        self.posts.clone()
    }
    async fn get_post(&self, slug: &str) -> Option<Post> {
        self.posts.iter().find(|p| p.slug == slug).cloned()
    }
    async fn get_services(&self) -> Vec<Service> {
        self.services.clone()
    }
    async fn get_service(&self, slug: &str) -> Option<Service> {
        self.services.iter().find(|s| s.slug == slug).cloned()
    }
    async fn get_service_ux_problems(&self, _service_id: Uuid) -> Vec<UxProblem> {
        self.ux_problems.clone()
    }
    async fn get_service_ux_solutions(&self, _service_id: Uuid) -> Vec<UxSolution> {
        self.ux_solutions.clone()
    }
    async fn get_design_process_steps(&self) -> Vec<DesignProcessStep> {
        self.process_steps.clone()
    }
    async fn get_projects(&self) -> Vec<Project> {
        self.projects.clone()
    }
    async fn get_featured_projects(&self, limit: i64) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| p.is_featured)
            .take(limit as usize)
            .cloned()
            .collect()
    }
    async fn get_project(&self, slug: &str) -> Option<Project> {
        self.projects.iter().find(|p| p.slug == slug).cloned()
    }
    async fn get_project_services(&self, _project_id: Uuid) -> Vec<Service> {
        self.services.clone()
    }
    async fn get_faq_categories(&self) -> Vec<FaqCategory> {
        self.faq_categories.clone()
    }
    async fn get_faqs(&self) -> Vec<Faq> {
        self.faqs.clone()
    }
    async fn get_featured_testimonials(&self) -> Vec<Testimonial> {
        self.testimonials.iter().filter(|t| t.is_featured).cloned().collect()
    }
    async fn get_project_testimonials(&self, project_id: Uuid) -> Vec<Testimonial> {
        self.testimonials
            .iter()
            .filter(|t| t.project_id == Some(project_id))
            .cloned()
            .collect()
    }
    async fn insert_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<(), SubmissionError> {
        self.contact_inserts.lock().unwrap().push(submission);
        self.outcome()
    }
    async fn insert_feedback_submission(
        &self,
        submission: NewFeedbackSubmission,
    ) -> Result<(), SubmissionError> {
        self.feedback_inserts.lock().unwrap().push(submission);
        self.outcome()
    }
    async fn get_contact_submissions(&self, _limit: i64) -> Vec<ContactSubmission> {
        vec![]
    }
    async fn get_feedback_submissions(&self, _limit: i64) -> Vec<FeedbackSubmission> {
        vec![]
    }
}

// --- STATE & ROUTER ---

pub fn test_config() -> AppConfig {
    AppConfig::default()
}

pub fn state_with(repo: Arc<StubRepository>, identity: Arc<MockIdentityProvider>) -> AppState {
    let config = test_config();
    AppState {
        repo,
        identity,
        config,
    }
}

pub fn test_state(repo: StubRepository) -> AppState {
    state_with(Arc::new(repo), mock_identity(MockBehavior::Accept))
}

pub fn mock_identity(behavior: MockBehavior) -> Arc<MockIdentityProvider> {
    Arc::new(MockIdentityProvider::with_behavior(
        &test_config().jwt_secret,
        behavior,
    ))
}

pub fn app(repo: StubRepository) -> Router {
    create_router(test_state(repo))
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookies(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

// --- TOKENS ---

/// Access token for the mock user, signed with the test secret. A negative offset
/// yields an already expired token.
pub fn access_token(exp_offset: i64) -> String {
    access_token_with_secret(exp_offset, &test_config().jwt_secret)
}

pub fn access_token_with_secret(exp_offset: i64, secret: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: MOCK_USER_ID,
        exp: (now + exp_offset) as usize,
        iat: (now - 60) as usize,
        aud: "authenticated".to_string(),
        email: Some(MOCK_USER_EMAIL.to_string()),
    };
    sign_access_token(&claims, secret).unwrap()
}

pub fn session_cookie() -> String {
    format!("{}={}", ACCESS_COOKIE, access_token(3600))
}

pub fn expired_session_cookies() -> String {
    format!(
        "{}={}; {}=refresh-me",
        ACCESS_COOKIE,
        access_token(-3600),
        REFRESH_COOKIE
    )
}

// --- FIXTURES ---

pub fn nav(slug: &str, title: &str, page_type: Option<&str>) -> NavigablePageInfo {
    NavigablePageInfo {
        slug: slug.to_string(),
        title: title.to_string(),
        page_type: page_type.map(str::to_string),
    }
}

pub fn page(slug: &str, title: &str, content: serde_json::Value) -> Page {
    Page {
        slug: slug.to_string(),
        title: title.to_string(),
        page_type: Some("MAIN".to_string()),
        content: Some(content),
        ..Page::default()
    }
}

pub fn site_nav() -> Vec<NavigablePageInfo> {
    vec![
        nav("home", "Home", Some("MAIN")),
        nav("about", "About", Some("MAIN")),
        nav("services", "Services", Some("MAIN")),
        nav("blog", "Blog", Some("CONTENT_HUB")),
        nav("faq", "FAQ", Some("RESOURCES")),
    ]
}

pub fn service(slug: &str, title: &str) -> Service {
    Service {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        ..Service::default()
    }
}

pub fn project(slug: &str, title: &str, featured: bool) -> Project {
    Project {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        is_featured: featured,
        ..Project::default()
    }
}

pub fn post(slug: &str, title: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        ..Post::default()
    }
}
