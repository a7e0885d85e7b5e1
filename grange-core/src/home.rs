//! Homepage content sections.

use serde::{Deserialize, Serialize};

/// One slug-keyed content block on the public homepage. The editor
/// writes whole sections at a time, so the store exposes upsert-by-slug
/// rather than separate create/update paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeSection {
    pub slug: String,
    pub heading: String,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
}
