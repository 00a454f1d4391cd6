use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::{
    DesignProcessStep, Faq, Post, Project, Service, Testimonial, UxSolution,
};
use crate::navigation::PageNavigation;

// --- Page Envelope ---

/// PageResponse
///
/// What every CMS-backed route returns: page metadata, the composed body and the
/// prev/next navigation. The navigation is present even when the page itself is not.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageResponse {
    pub slug: String,
    pub meta: PageMeta,
    pub body: PageBody,
    pub navigation: PageNavigation,
}

impl PageResponse {
    /// True when the page record was missing and the body is the placeholder.
    pub fn is_not_found(&self) -> bool {
        matches!(self.body, PageBody::NotFound(_))
    }
}

/// PageMeta
///
/// Head metadata (title, description, social image).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PageMeta {
    pub title: String,
    pub description: Option<String>,
    pub og_image_url: Option<String>,
}

/// PageBody
///
/// The composed view, tagged by kind so the frontend can switch on it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PageBody {
    Home(HomeView),
    About(AboutView),
    Contact(ContactView),
    Services(ServicesView),
    Projects(ProjectsView),
    Blog(BlogView),
    Faq(FaqView),
    Feedback(FeedbackView),
    NotFound(NotFoundView),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct HeroView {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NotFoundView {
    pub title: String,
    pub message: String,
}

// --- Page Bodies ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct HomeView {
    pub hero: HeroView,
    pub intro: String,
    pub featured_heading: String,
    pub featured_projects: Vec<Project>,
    pub services: Vec<Service>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ValueView {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AboutView {
    pub hero: HeroView,
    pub story: String,
    pub mission: String,
    pub values: Vec<ValueView>,
    pub process_steps: Vec<DesignProcessStep>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContactView {
    pub hero: HeroView,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub response_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ServicesView {
    pub hero: HeroView,
    pub intro: String,
    pub empty_message: String,
    pub services: Vec<Service>,
    pub process_steps: Vec<DesignProcessStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ProjectsView {
    pub hero: HeroView,
    pub intro: String,
    pub empty_message: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BlogView {
    pub hero: HeroView,
    pub intro: String,
    pub empty_message: String,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FaqCategoryView {
    pub name: String,
    pub slug: String,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FaqView {
    pub hero: HeroView,
    pub intro: String,
    pub contact_prompt: String,
    pub categories: Vec<FaqCategoryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FeedbackView {
    pub hero: HeroView,
    pub intro: String,
    pub thank_you: String,
}

// --- Detail Views ---

/// UxProblemView
///
/// A problem a service tackles, with the solutions offered for it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UxProblemView {
    pub title: String,
    pub description: Option<String>,
    pub solutions: Vec<UxSolution>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ServiceDetailView {
    pub service: Service,
    pub problems: Vec<UxProblemView>,
    pub process_steps: Vec<DesignProcessStep>,
    pub testimonials: Vec<Testimonial>,
    pub navigation: PageNavigation,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ProjectDetailView {
    pub project: Project,
    pub services: Vec<Service>,
    pub testimonials: Vec<Testimonial>,
    pub navigation: PageNavigation,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostDetailView {
    pub post: Post,
    pub navigation: PageNavigation,
}
