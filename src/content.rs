//! Typed page content.
//!
//! Each CMS page stores its copy in a free-form JSON `content` column. The repository
//! turns that payload into a [`PageContent`] variant picked by the page's kind, so the
//! page composer only ever matches on known shapes. Payloads that do not fit their
//! kind's shape are kept as [`PageContent::Unknown`].

use crate::models::Page;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// The page kinds the site knows how to compose, keyed by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    About,
    Contact,
    Services,
    Projects,
    Blog,
    Faq,
    Feedback,
    Other,
}

impl PageKind {
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "home" => PageKind::Home,
            "about" => PageKind::About,
            "contact" => PageKind::Contact,
            "services" => PageKind::Services,
            "projects" => PageKind::Projects,
            "blog" => PageKind::Blog,
            "faq" => PageKind::Faq,
            "feedback" => PageKind::Feedback,
            _ => PageKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeroContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HomeContent {
    pub hero: HeroContent,
    pub intro: Option<String>,
    pub featured_heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValueItem {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AboutContent {
    pub hero: HeroContent,
    pub story: Option<String>,
    pub mission: Option<String>,
    pub values: Vec<ValueItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContactContent {
    pub hero: HeroContent,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub response_time: Option<String>,
}

/// Shared shape of the services, projects and blog index pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListingContent {
    pub hero: HeroContent,
    pub intro: Option<String>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FaqContent {
    pub hero: HeroContent,
    pub intro: Option<String>,
    pub contact_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeedbackContent {
    pub hero: HeroContent,
    pub intro: Option<String>,
    pub thank_you: Option<String>,
}

/// PageContent
///
/// Tagged union of the known content shapes, with `Unknown` holding legacy or
/// unrecognized payloads verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    Home(HomeContent),
    About(AboutContent),
    Contact(ContactContent),
    Listing(ListingContent),
    Faq(FaqContent),
    Feedback(FeedbackContent),
    Unknown(serde_json::Value),
}

impl PageContent {
    /// parse
    ///
    /// Validates a raw payload against the shape expected for `kind`. A missing or
    /// `null` payload yields the kind's empty shape; a mismatch is logged and kept as
    /// `Unknown`, which the composer renders with default copy.
    pub fn parse(kind: PageKind, raw: Option<serde_json::Value>) -> Self {
        let raw = raw.unwrap_or(serde_json::Value::Null);
        match kind {
            PageKind::Home => shaped(raw, PageContent::Home),
            PageKind::About => shaped(raw, PageContent::About),
            PageKind::Contact => shaped(raw, PageContent::Contact),
            PageKind::Services | PageKind::Projects | PageKind::Blog => {
                shaped(raw, PageContent::Listing)
            }
            PageKind::Faq => shaped(raw, PageContent::Faq),
            PageKind::Feedback => shaped(raw, PageContent::Feedback),
            PageKind::Other => PageContent::Unknown(raw),
        }
    }
}

fn shaped<T, F>(raw: serde_json::Value, wrap: F) -> PageContent
where
    T: DeserializeOwned + Default,
    F: FnOnce(T) -> PageContent,
{
    if raw.is_null() {
        return wrap(T::default());
    }
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(content) => wrap(content),
        Err(e) => {
            tracing::warn!("page content does not match its kind, keeping raw payload: {}", e);
            PageContent::Unknown(raw)
        }
    }
}

/// PageRecord
///
/// A CMS page as handed to the composer: the row's metadata plus its content
/// already validated into a [`PageContent`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub slug: String,
    pub title: String,
    pub page_type: Option<String>,
    pub content: PageContent,
    pub meta_description: Option<String>,
    pub og_image_url: Option<String>,
    pub sort_order: i32,
}

impl From<Page> for PageRecord {
    fn from(page: Page) -> Self {
        let kind = PageKind::from_slug(&page.slug);
        Self {
            content: PageContent::parse(kind, page.content),
            slug: page.slug,
            title: page.title,
            page_type: page.page_type,
            meta_description: page.meta_description,
            og_image_url: page.og_image_url,
            sort_order: page.sort_order,
        }
    }
}
