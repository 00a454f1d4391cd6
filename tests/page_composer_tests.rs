mod common;

use axum::http::StatusCode;
use common::{StubRepository, app, body_json, get, nav, page, post, project, service, site_nav};
use folio_site::{
    models::{Faq, FaqCategory, Testimonial, UxProblem, UxSolution},
    pages::{self, defaults},
    views::PageBody,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_missing_page_renders_placeholder_with_navigation() {
    let repo = StubRepository {
        navigable_pages: site_nav(),
        ..StubRepository::default()
    };

    let response = pages::compose_about(&repo).await;

    assert!(response.is_not_found());
    match &response.body {
        PageBody::NotFound(view) => assert_eq!(view.title, defaults::NOT_FOUND_TITLE),
        other => panic!("expected placeholder, got {other:?}"),
    }
    assert_eq!(response.navigation.previous.unwrap().slug, "home");
    assert_eq!(response.navigation.next.unwrap().slug, "services");
}

#[tokio::test]
async fn test_missing_page_answers_404_through_router() {
    let repo = StubRepository {
        navigable_pages: site_nav(),
        ..StubRepository::default()
    };

    let response = common::send(app(repo), get("/faq")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["body"]["kind"], "not_found");
    assert_eq!(body["navigation"]["previous"]["slug"], "blog");
    assert_eq!(body["navigation"]["previous"]["categoryLabel"], "Explore");
    assert!(body["navigation"]["next"].is_null());
}

#[tokio::test]
async fn test_empty_content_keys_fall_back_to_defaults() {
    let repo = StubRepository {
        pages: vec![page(
            "contact",
            "Contact",
            json!({
                "hero": { "title": "   ", "subtitle": "" },
                "email": "studio@example.com"
            }),
        )],
        ..StubRepository::default()
    };

    let response = pages::compose_contact(&repo).await;

    match response.body {
        PageBody::Contact(view) => {
            assert_eq!(view.hero.title, defaults::CONTACT_TITLE);
            assert_eq!(view.hero.subtitle, defaults::CONTACT_SUBTITLE);
            assert_eq!(view.email, "studio@example.com");
            assert_eq!(view.phone, defaults::CONTACT_PHONE);
        }
        other => panic!("expected contact body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mismatched_content_renders_all_defaults() {
    let repo = StubRepository {
        pages: vec![page("feedback", "Feedback", json!("legacy plain-text body"))],
        ..StubRepository::default()
    };

    let response = pages::compose_feedback(&repo).await;

    assert!(!response.is_not_found());
    match response.body {
        PageBody::Feedback(view) => {
            assert_eq!(view.hero.title, defaults::FEEDBACK_TITLE);
            assert_eq!(view.thank_you, defaults::FEEDBACK_THANK_YOU);
        }
        other => panic!("expected feedback body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_home_combines_page_and_entity_lists() {
    let repo = StubRepository {
        pages: vec![page(
            "home",
            "Home",
            json!({ "hero": { "title": "Hello" }, "intro": "We design." }),
        )],
        navigable_pages: site_nav(),
        projects: vec![
            project("a", "A", true),
            project("b", "B", false),
            project("c", "C", true),
            project("d", "D", true),
            project("e", "E", true),
        ],
        services: vec![service("research", "Research")],
        testimonials: vec![
            Testimonial {
                author_name: "Grace".to_string(),
                quote: "Great work".to_string(),
                is_featured: true,
                ..Testimonial::default()
            },
            Testimonial {
                author_name: "Hidden".to_string(),
                quote: "Not featured".to_string(),
                ..Testimonial::default()
            },
        ],
        ..StubRepository::default()
    };

    let response = pages::compose_home(&repo).await;

    assert_eq!(response.meta.title, "Home");
    match response.body {
        PageBody::Home(view) => {
            assert_eq!(view.hero.title, "Hello");
            assert_eq!(view.hero.subtitle, defaults::HOME_SUBTITLE);
            assert_eq!(view.intro, "We design.");
            assert_eq!(view.featured_projects.len(), pages::FEATURED_PROJECT_LIMIT as usize);
            assert_eq!(view.services.len(), 1);
            assert_eq!(view.testimonials.len(), 1);
        }
        other => panic!("expected home body, got {other:?}"),
    }
    assert!(response.navigation.previous.is_none());
    assert_eq!(response.navigation.next.unwrap().slug, "about");
}

#[tokio::test]
async fn test_about_drops_untitled_values() {
    let repo = StubRepository {
        pages: vec![page(
            "about",
            "About",
            json!({ "values": [
                { "title": "Clarity", "description": "Say less." },
                { "title": "  ", "description": "No title" }
            ]}),
        )],
        ..StubRepository::default()
    };

    match pages::compose_about(&repo).await.body {
        PageBody::About(view) => {
            assert_eq!(view.values.len(), 1);
            assert_eq!(view.values[0].title, "Clarity");
            assert_eq!(view.story, defaults::ABOUT_STORY);
        }
        other => panic!("expected about body, got {other:?}"),
    }
}

#[test]
fn test_faqs_are_grouped_and_empty_categories_omitted() {
    let general = FaqCategory {
        id: Uuid::from_u128(1),
        name: "General".to_string(),
        slug: "general".to_string(),
        sort_order: 1,
    };
    let pricing = FaqCategory {
        id: Uuid::from_u128(2),
        name: "Pricing".to_string(),
        slug: "pricing".to_string(),
        sort_order: 2,
    };
    let faq = |category: u128, question: &str| Faq {
        id: Uuid::new_v4(),
        category_id: Uuid::from_u128(category),
        question: question.to_string(),
        answer: "Yes.".to_string(),
        sort_order: 0,
    };

    let grouped = pages::group_faqs(
        vec![general, pricing],
        vec![faq(1, "Who are you?"), faq(9, "Orphan?"), faq(1, "Where are you?")],
    );

    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].slug, "general");
    let questions: Vec<_> = grouped[0].faqs.iter().map(|f| f.question.as_str()).collect();
    assert_eq!(questions, vec!["Who are you?", "Where are you?"]);
}

#[tokio::test]
async fn test_service_detail_pairs_problems_with_solutions() {
    let problem = UxProblem {
        id: Uuid::from_u128(10),
        title: "Users get lost".to_string(),
        ..UxProblem::default()
    };
    let repo = StubRepository {
        services: vec![
            service("research", "Research"),
            service("design", "Design"),
            service("build", "Build"),
        ],
        ux_problems: vec![problem],
        ux_solutions: vec![UxSolution {
            id: Uuid::new_v4(),
            problem_id: Uuid::from_u128(10),
            title: "Clear navigation".to_string(),
            description: None,
        }],
        ..StubRepository::default()
    };

    let view = pages::compose_service_detail(&repo, "design").await.unwrap();

    assert_eq!(view.service.title, "Design");
    assert_eq!(view.problems.len(), 1);
    assert_eq!(view.problems[0].solutions[0].title, "Clear navigation");

    let previous = view.navigation.previous.unwrap();
    assert_eq!(previous.slug, "research");
    assert_eq!(previous.category_label, "Services");
    assert_eq!(view.navigation.next.unwrap().slug, "build");
}

#[tokio::test]
async fn test_unknown_detail_slugs_answer_404() {
    let repo = StubRepository {
        posts: vec![post("hello", "Hello")],
        projects: vec![project("site", "Site", false)],
        ..StubRepository::default()
    };
    let router = app(repo);

    for uri in ["/blog/draft", "/projects/missing", "/services/missing"] {
        let response = common::send(router.clone(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let found = common::send(router, get("/blog/hello")).await;
    assert_eq!(found.status(), StatusCode::OK);
    let body = body_json(found).await;
    assert_eq!(body["post"]["title"], "Hello");
    assert!(body["navigation"]["next"].is_null());
}

#[tokio::test]
async fn test_listing_pages_expose_empty_message() {
    let repo = StubRepository {
        pages: vec![page("blog", "Blog", json!({}))],
        navigable_pages: vec![nav("blog", "Blog", Some("CONTENT_HUB"))],
        ..StubRepository::default()
    };

    let response = common::send(app(repo), get("/blog")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["body"]["kind"], "blog");
    assert_eq!(body["body"]["data"]["empty_message"], defaults::BLOG_EMPTY);
    assert_eq!(body["body"]["data"]["posts"], serde_json::json!([]));
}
