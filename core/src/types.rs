//! Domain types produced by the relay.

use serde::{Deserialize, Serialize};

/// One public post scraped from the showcase feed.
///
/// Field order is the JSON key order callers see.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowcaseRecord {
    pub hash: String,
    pub url: String,
    pub image: String,
    pub title: String,
    pub info: String,
    pub views: String,
    pub replies: String,
    pub likes: String,
}

/// The upstream endpoint and the profile base record links are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSource {
    pub feed_url: String,
    pub profile_base: String,
}

impl UpstreamSource {
    /// Showcase grid of a codepen.io profile.
    pub fn codepen(user: &str) -> Self {
        let profile_base = format!("https://codepen.io/{user}");
        Self {
            feed_url: format!("{profile_base}/pens/showcase/grid/"),
            profile_base,
        }
    }
}

impl Default for UpstreamSource {
    fn default() -> Self {
        Self::codepen("rainner")
    }
}
