//! Page composition.
//!
//! Every route fans out its independent fetches with `tokio::join!`, waits for all of
//! them, and then merges the CMS copy with the fixed defaults below. A missing page
//! record still yields a response: a not-found body plus whatever navigation the
//! fetched page list allows.

use crate::content::{
    AboutContent, ContactContent, FaqContent, FeedbackContent, HeroContent, HomeContent,
    ListingContent, PageContent, PageRecord,
};
use crate::models::{
    DesignProcessStep, Faq, FaqCategory, NavigablePageInfo, Post, Project, Service, Testimonial,
    UxProblem, UxSolution,
};
use crate::navigation::resolve_navigation;
use crate::repository::Repository;
use crate::views::{
    AboutView, BlogView, ContactView, FaqCategoryView, FaqView, FeedbackView, HeroView, HomeView,
    NotFoundView, PageBody, PageMeta, PageResponse, PostDetailView, ProjectDetailView,
    ProjectsView, ServiceDetailView, ServicesView, UxProblemView, ValueView,
};

pub const HOME_SLUG: &str = "home";
pub const ABOUT_SLUG: &str = "about";
pub const CONTACT_SLUG: &str = "contact";
pub const SERVICES_SLUG: &str = "services";
pub const PROJECTS_SLUG: &str = "projects";
pub const BLOG_SLUG: &str = "blog";
pub const FAQ_SLUG: &str = "faq";
pub const FEEDBACK_SLUG: &str = "feedback";

pub const FEATURED_PROJECT_LIMIT: i64 = 3;

/// Fixed copy used whenever the CMS leaves a field absent or blank.
pub mod defaults {
    pub const NOT_FOUND_TITLE: &str = "Page not found";
    pub const NOT_FOUND_MESSAGE: &str =
        "This page hasn't been published yet. Please check back soon.";

    pub const HOME_TITLE: &str = "Design that works for people";
    pub const HOME_SUBTITLE: &str = "We research, design and build digital products that are a joy to use.";
    pub const HOME_INTRO: &str = "A small studio focused on user experience, from first interview to final pixel.";
    pub const HOME_FEATURED_HEADING: &str = "Selected work";

    pub const ABOUT_TITLE: &str = "About us";
    pub const ABOUT_SUBTITLE: &str = "The people and principles behind the work.";
    pub const ABOUT_STORY: &str = "We started as a pair of designers who believed good software begins with listening.";
    pub const ABOUT_MISSION: &str = "Our mission is to make digital products clearer, calmer and more useful.";
    pub const ABOUT_VALUES: &[(&str, &str)] = &[
        ("Research first", "Every decision starts with evidence from real users."),
        ("Craft", "Details matter, from information architecture to micro-interactions."),
        ("Partnership", "We work alongside your team, not around it."),
    ];

    pub const CONTACT_TITLE: &str = "Get in touch";
    pub const CONTACT_SUBTITLE: &str = "Tell us about your project and we'll get back to you.";
    pub const CONTACT_EMAIL: &str = "hello@example.com";
    pub const CONTACT_PHONE: &str = "Available on request";
    pub const CONTACT_LOCATION: &str = "Remote, working worldwide";
    pub const CONTACT_RESPONSE_TIME: &str = "We usually reply within two business days.";

    pub const SERVICES_TITLE: &str = "Services";
    pub const SERVICES_SUBTITLE: &str = "How we can help.";
    pub const SERVICES_INTRO: &str = "From discovery research to polished interfaces, pick what your product needs.";
    pub const SERVICES_EMPTY: &str = "Our services are being updated. Check back soon.";

    pub const PROJECTS_TITLE: &str = "Projects";
    pub const PROJECTS_SUBTITLE: &str = "A selection of recent work.";
    pub const PROJECTS_INTRO: &str = "Case studies showing the problems we tackled and the results we delivered.";
    pub const PROJECTS_EMPTY: &str = "New case studies are on their way.";

    pub const BLOG_TITLE: &str = "Blog";
    pub const BLOG_SUBTITLE: &str = "Notes on design, research and building products.";
    pub const BLOG_INTRO: &str = "Thoughts and lessons from our day-to-day work.";
    pub const BLOG_EMPTY: &str = "No posts yet. Stay tuned.";

    pub const FAQ_TITLE: &str = "Frequently asked questions";
    pub const FAQ_SUBTITLE: &str = "Answers to the questions we hear most.";
    pub const FAQ_INTRO: &str = "Can't find what you're looking for? We're happy to help.";
    pub const FAQ_CONTACT_PROMPT: &str = "Still have questions? Send us a message.";

    pub const FEEDBACK_TITLE: &str = "Feedback";
    pub const FEEDBACK_SUBTITLE: &str = "Help us improve this site.";
    pub const FEEDBACK_INTRO: &str = "Tell us what worked and what didn't. Every rating is optional.";
    pub const FEEDBACK_THANK_YOU: &str = "Thank you for taking the time to share your thoughts.";
}

/// Returns the CMS value when it has visible text, the fallback otherwise.
fn copy(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

fn hero(content: &HeroContent, title: &str, subtitle: &str) -> HeroView {
    HeroView {
        title: copy(&content.title, title),
        subtitle: copy(&content.subtitle, subtitle),
    }
}

/// assemble
///
/// Common tail of every CMS-backed route: resolve navigation from the fetched list,
/// then either build the body from the page content or fall back to the not-found
/// placeholder.
fn assemble<F>(
    slug: &str,
    page: Option<PageRecord>,
    navigable_pages: &[NavigablePageInfo],
    build: F,
) -> PageResponse
where
    F: FnOnce(&PageContent) -> PageBody,
{
    let navigation = resolve_navigation(navigable_pages, slug);

    let Some(page) = page else {
        tracing::warn!(slug, "page record missing, rendering placeholder");
        return PageResponse {
            slug: slug.to_string(),
            meta: PageMeta {
                title: defaults::NOT_FOUND_TITLE.to_string(),
                description: None,
                og_image_url: None,
            },
            body: PageBody::NotFound(NotFoundView {
                title: defaults::NOT_FOUND_TITLE.to_string(),
                message: defaults::NOT_FOUND_MESSAGE.to_string(),
            }),
            navigation,
        };
    };

    PageResponse {
        slug: page.slug.clone(),
        meta: PageMeta {
            title: page.title.clone(),
            description: page.meta_description.clone(),
            og_image_url: page.og_image_url.clone(),
        },
        body: build(&page.content),
        navigation,
    }
}

// --- Content → View ---

pub fn home_view(
    content: &PageContent,
    featured_projects: Vec<Project>,
    services: Vec<Service>,
    testimonials: Vec<Testimonial>,
) -> HomeView {
    let content = match content {
        PageContent::Home(c) => c.clone(),
        _ => HomeContent::default(),
    };

    HomeView {
        hero: hero(&content.hero, defaults::HOME_TITLE, defaults::HOME_SUBTITLE),
        intro: copy(&content.intro, defaults::HOME_INTRO),
        featured_heading: copy(&content.featured_heading, defaults::HOME_FEATURED_HEADING),
        featured_projects,
        services,
        testimonials,
    }
}

pub fn about_view(
    content: &PageContent,
    process_steps: Vec<DesignProcessStep>,
    testimonials: Vec<Testimonial>,
) -> AboutView {
    let content = match content {
        PageContent::About(c) => c.clone(),
        _ => AboutContent::default(),
    };

    // Values without a title are dropped; if none survive the defaults are shown.
    let mut values: Vec<ValueView> = content
        .values
        .iter()
        .filter(|v| v.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|v| ValueView {
            title: copy(&v.title, ""),
            description: copy(&v.description, ""),
        })
        .collect();
    if values.is_empty() {
        values = defaults::ABOUT_VALUES
            .iter()
            .map(|(title, description)| ValueView {
                title: title.to_string(),
                description: description.to_string(),
            })
            .collect();
    }

    AboutView {
        hero: hero(&content.hero, defaults::ABOUT_TITLE, defaults::ABOUT_SUBTITLE),
        story: copy(&content.story, defaults::ABOUT_STORY),
        mission: copy(&content.mission, defaults::ABOUT_MISSION),
        values,
        process_steps,
        testimonials,
    }
}

pub fn contact_view(content: &PageContent) -> ContactView {
    let content = match content {
        PageContent::Contact(c) => c.clone(),
        _ => ContactContent::default(),
    };

    ContactView {
        hero: hero(&content.hero, defaults::CONTACT_TITLE, defaults::CONTACT_SUBTITLE),
        email: copy(&content.email, defaults::CONTACT_EMAIL),
        phone: copy(&content.phone, defaults::CONTACT_PHONE),
        location: copy(&content.location, defaults::CONTACT_LOCATION),
        response_time: copy(&content.response_time, defaults::CONTACT_RESPONSE_TIME),
    }
}

fn listing(content: &PageContent) -> ListingContent {
    match content {
        PageContent::Listing(c) => c.clone(),
        _ => ListingContent::default(),
    }
}

pub fn services_view(
    content: &PageContent,
    services: Vec<Service>,
    process_steps: Vec<DesignProcessStep>,
) -> ServicesView {
    let content = listing(content);
    ServicesView {
        hero: hero(&content.hero, defaults::SERVICES_TITLE, defaults::SERVICES_SUBTITLE),
        intro: copy(&content.intro, defaults::SERVICES_INTRO),
        empty_message: copy(&content.empty_message, defaults::SERVICES_EMPTY),
        services,
        process_steps,
    }
}

pub fn projects_view(content: &PageContent, projects: Vec<Project>) -> ProjectsView {
    let content = listing(content);
    ProjectsView {
        hero: hero(&content.hero, defaults::PROJECTS_TITLE, defaults::PROJECTS_SUBTITLE),
        intro: copy(&content.intro, defaults::PROJECTS_INTRO),
        empty_message: copy(&content.empty_message, defaults::PROJECTS_EMPTY),
        projects,
    }
}

pub fn blog_view(content: &PageContent, posts: Vec<Post>) -> BlogView {
    let content = listing(content);
    BlogView {
        hero: hero(&content.hero, defaults::BLOG_TITLE, defaults::BLOG_SUBTITLE),
        intro: copy(&content.intro, defaults::BLOG_INTRO),
        empty_message: copy(&content.empty_message, defaults::BLOG_EMPTY),
        posts,
    }
}

/// group_faqs
///
/// Buckets FAQs under their categories, keeping both in the order they were fetched.
/// Categories without entries are omitted, as are entries whose category is unknown.
pub fn group_faqs(categories: Vec<FaqCategory>, faqs: Vec<Faq>) -> Vec<FaqCategoryView> {
    categories
        .into_iter()
        .map(|category| FaqCategoryView {
            faqs: faqs
                .iter()
                .filter(|faq| faq.category_id == category.id)
                .cloned()
                .collect(),
            name: category.name,
            slug: category.slug,
        })
        .filter(|group| !group.faqs.is_empty())
        .collect()
}

pub fn faq_view(content: &PageContent, categories: Vec<FaqCategoryView>) -> FaqView {
    let content = match content {
        PageContent::Faq(c) => c.clone(),
        _ => FaqContent::default(),
    };

    FaqView {
        hero: hero(&content.hero, defaults::FAQ_TITLE, defaults::FAQ_SUBTITLE),
        intro: copy(&content.intro, defaults::FAQ_INTRO),
        contact_prompt: copy(&content.contact_prompt, defaults::FAQ_CONTACT_PROMPT),
        categories,
    }
}

pub fn feedback_view(content: &PageContent) -> FeedbackView {
    let content = match content {
        PageContent::Feedback(c) => c.clone(),
        _ => FeedbackContent::default(),
    };

    FeedbackView {
        hero: hero(&content.hero, defaults::FEEDBACK_TITLE, defaults::FEEDBACK_SUBTITLE),
        intro: copy(&content.intro, defaults::FEEDBACK_INTRO),
        thank_you: copy(&content.thank_you, defaults::FEEDBACK_THANK_YOU),
    }
}

// --- Route Composers ---

pub async fn compose_home(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, featured, services, testimonials) = tokio::join!(
        repo.get_page(HOME_SLUG),
        repo.get_navigable_pages(),
        repo.get_featured_projects(FEATURED_PROJECT_LIMIT),
        repo.get_services(),
        repo.get_featured_testimonials(),
    );

    assemble(HOME_SLUG, page, &navigable_pages, |content| {
        PageBody::Home(home_view(content, featured, services, testimonials))
    })
}

pub async fn compose_about(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, steps, testimonials) = tokio::join!(
        repo.get_page(ABOUT_SLUG),
        repo.get_navigable_pages(),
        repo.get_design_process_steps(),
        repo.get_featured_testimonials(),
    );

    assemble(ABOUT_SLUG, page, &navigable_pages, |content| {
        PageBody::About(about_view(content, steps, testimonials))
    })
}

pub async fn compose_contact(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages) =
        tokio::join!(repo.get_page(CONTACT_SLUG), repo.get_navigable_pages());

    assemble(CONTACT_SLUG, page, &navigable_pages, |content| {
        PageBody::Contact(contact_view(content))
    })
}

pub async fn compose_services(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, services, steps) = tokio::join!(
        repo.get_page(SERVICES_SLUG),
        repo.get_navigable_pages(),
        repo.get_services(),
        repo.get_design_process_steps(),
    );

    assemble(SERVICES_SLUG, page, &navigable_pages, |content| {
        PageBody::Services(services_view(content, services, steps))
    })
}

pub async fn compose_projects(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, projects) = tokio::join!(
        repo.get_page(PROJECTS_SLUG),
        repo.get_navigable_pages(),
        repo.get_projects(),
    );

    assemble(PROJECTS_SLUG, page, &navigable_pages, |content| {
        PageBody::Projects(projects_view(content, projects))
    })
}

pub async fn compose_blog(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, posts) = tokio::join!(
        repo.get_page(BLOG_SLUG),
        repo.get_navigable_pages(),
        repo.get_posts(),
    );

    assemble(BLOG_SLUG, page, &navigable_pages, |content| {
        PageBody::Blog(blog_view(content, posts))
    })
}

pub async fn compose_faq(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages, categories, faqs) = tokio::join!(
        repo.get_page(FAQ_SLUG),
        repo.get_navigable_pages(),
        repo.get_faq_categories(),
        repo.get_faqs(),
    );

    assemble(FAQ_SLUG, page, &navigable_pages, |content| {
        PageBody::Faq(faq_view(content, group_faqs(categories, faqs)))
    })
}

pub async fn compose_feedback(repo: &dyn Repository) -> PageResponse {
    let (page, navigable_pages) =
        tokio::join!(repo.get_page(FEEDBACK_SLUG), repo.get_navigable_pages());

    assemble(FEEDBACK_SLUG, page, &navigable_pages, |content| {
        PageBody::Feedback(feedback_view(content))
    })
}

// --- Detail Composers ---

/// Projects an entity list into navigation entries labelled with the entity kind.
fn entity_nav<T>(items: &[T], label: &str, key: impl Fn(&T) -> (&str, &str)) -> Vec<NavigablePageInfo> {
    items
        .iter()
        .map(|item| {
            let (slug, title) = key(item);
            NavigablePageInfo {
                slug: slug.to_string(),
                title: title.to_string(),
                page_type: Some(label.to_string()),
            }
        })
        .collect()
}

/// Pairs each problem with its solutions, keeping the problems' order.
pub fn problems_with_solutions(problems: Vec<UxProblem>, solutions: Vec<UxSolution>) -> Vec<UxProblemView> {
    problems
        .into_iter()
        .map(|problem| UxProblemView {
            solutions: solutions
                .iter()
                .filter(|s| s.problem_id == problem.id)
                .cloned()
                .collect(),
            title: problem.title,
            description: problem.description,
        })
        .collect()
}

/// compose_service_detail
///
/// Two fan-outs: the service itself alongside the shared lists, then the rows keyed
/// by the service id. `None` when the slug does not exist.
pub async fn compose_service_detail(repo: &dyn Repository, slug: &str) -> Option<ServiceDetailView> {
    let (service, services, steps, testimonials) = tokio::join!(
        repo.get_service(slug),
        repo.get_services(),
        repo.get_design_process_steps(),
        repo.get_featured_testimonials(),
    );
    let service = service?;

    let (problems, solutions) = tokio::join!(
        repo.get_service_ux_problems(service.id),
        repo.get_service_ux_solutions(service.id),
    );

    let navigation = resolve_navigation(
        &entity_nav(&services, "Services", |s| (s.slug.as_str(), s.title.as_str())),
        &service.slug,
    );

    Some(ServiceDetailView {
        service,
        problems: problems_with_solutions(problems, solutions),
        process_steps: steps,
        testimonials,
        navigation,
    })
}

pub async fn compose_project_detail(repo: &dyn Repository, slug: &str) -> Option<ProjectDetailView> {
    let (project, projects) = tokio::join!(repo.get_project(slug), repo.get_projects());
    let project = project?;

    let (services, testimonials) = tokio::join!(
        repo.get_project_services(project.id),
        repo.get_project_testimonials(project.id),
    );

    let navigation = resolve_navigation(
        &entity_nav(&projects, "Projects", |p| (p.slug.as_str(), p.title.as_str())),
        &project.slug,
    );

    Some(ProjectDetailView {
        project,
        services,
        testimonials,
        navigation,
    })
}

pub async fn compose_post_detail(repo: &dyn Repository, slug: &str) -> Option<PostDetailView> {
    let (post, posts) = tokio::join!(repo.get_post(slug), repo.get_posts());
    let post = post?;

    let navigation = resolve_navigation(
        &entity_nav(&posts, "Blog", |p| (p.slug.as_str(), p.title.as_str())),
        &post.slug,
    );

    Some(PostDetailView { post, navigation })
}
