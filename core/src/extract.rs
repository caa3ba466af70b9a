//! HTML-to-record extraction for the showcase feed.
//!
//! Uses the `scraper` crate for CSS selector matching. Every function here is
//! pure: malformed markup is parsed leniently and anything that does not look
//! like a showcase item is skipped rather than reported.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use crate::types::ShowcaseRecord;

struct Selectors {
    container: Selector,
    title: Selector,
    info: Selector,
    views: Selector,
    replies: Selector,
    likes: Selector,
}

const SLUG_ATTR: &str = "data-slug-hash";

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        container: Selector::parse(".single-pen").expect("static selector"),
        title: Selector::parse(".item-title > a").expect("static selector"),
        info: Selector::parse(".meta-overlay > p").expect("static selector"),
        views: Selector::parse(".stats > .views").expect("static selector"),
        replies: Selector::parse(".stats > .comments").expect("static selector"),
        likes: Selector::parse(".loves > .count").expect("static selector"),
    })
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn sanitize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a likes counter as display text. The counter is kept verbatim, so
/// abbreviated values like `1.2k` survive.
pub fn format_likes(likes: &str) -> String {
    match likes {
        "" => "0 Likes".to_string(),
        "1" => "1 Like".to_string(),
        n => format!("{n} Likes"),
    }
}

/// Text of every element under `scope` matching `selector`, concatenated.
fn text_of(scope: &ElementRef<'_>, selector: &Selector) -> String {
    let raw: String = scope.select(selector).flat_map(|el| el.text()).collect();
    sanitize(&raw)
}

fn record_from(container: &ElementRef<'_>, profile_base: &str) -> Option<ShowcaseRecord> {
    let sel = selectors();
    let hash = sanitize(container.value().attr(SLUG_ATTR).unwrap_or_default());
    let title = text_of(container, &sel.title);
    if hash.is_empty() || title.is_empty() {
        return None;
    }

    Some(ShowcaseRecord {
        url: format!("{profile_base}/full/{hash}/"),
        image: format!("{profile_base}/pen/{hash}/image/large.png"),
        title,
        info: text_of(container, &sel.info),
        views: text_of(container, &sel.views),
        replies: text_of(container, &sel.replies),
        likes: format_likes(&text_of(container, &sel.likes)),
        hash,
    })
}

/// Extract showcase records from an HTML fragment, in document order.
///
/// Items missing a slug or a title are dropped. Repeated slugs are kept.
pub fn extract(html_fragment: &str, profile_base: &str) -> Vec<ShowcaseRecord> {
    let profile_base = profile_base.trim_end_matches('/');
    let document = Html::parse_fragment(html_fragment);
    let records: Vec<ShowcaseRecord> = document
        .select(&selectors().container)
        .filter_map(|container| record_from(&container, profile_base))
        .collect();

    tracing::debug!(count = records.len(), "extracted showcase records");
    records
}

/// The HTML fragment nested at `page.html` in a JSON envelope.
///
/// Bodies that are not JSON, or JSON of another shape, yield `None`.
pub fn page_html(body: &str) -> Option<String> {
    let data: serde_json::Value = serde_json::from_str(body).ok()?;
    data.get("page")?
        .get("html")?
        .as_str()
        .filter(|html| !html.is_empty())
        .map(str::to_string)
}
