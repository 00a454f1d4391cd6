use crate::models::{NavLinkInfo, NavigablePageInfo};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// PageNavigation
///
/// The previous/next links shown at the foot of every composed page. Either side is
/// `None` at the ends of the list or when the current slug is not navigable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PageNavigation {
    pub previous: Option<NavLinkInfo>,
    pub next: Option<NavLinkInfo>,
}

/// category_label
///
/// Maps a page type to the label shown above a navigation link. Matching is
/// case-insensitive; unrecognized types are returned unchanged and a missing type
/// maps to an empty label.
pub fn category_label(page_type: Option<&str>) -> String {
    let Some(page_type) = page_type else {
        return String::new();
    };

    match page_type.to_uppercase().as_str() {
        "MAIN" => "Main".to_string(),
        "CONTENT_HUB" => "Explore".to_string(),
        "RESOURCES" => "Resources".to_string(),
        _ => page_type.to_string(),
    }
}

fn to_link(page: &NavigablePageInfo) -> NavLinkInfo {
    NavLinkInfo {
        slug: page.slug.clone(),
        title: page.title.clone(),
        category_label: category_label(page.page_type.as_deref()),
    }
}

/// resolve_navigation
///
/// Finds the first entry whose slug equals `current_slug` and returns its neighbours
/// in `pages`, which is expected to be ordered by `sort_order` already. A slug that is
/// not in the list (e.g. content not yet published) resolves to no links at all.
pub fn resolve_navigation(pages: &[NavigablePageInfo], current_slug: &str) -> PageNavigation {
    let Some(index) = pages.iter().position(|page| page.slug == current_slug) else {
        return PageNavigation::default();
    };

    let previous = index.checked_sub(1).and_then(|i| pages.get(i)).map(to_link);
    let next = pages.get(index + 1).map(to_link);

    PageNavigation { previous, next }
}
