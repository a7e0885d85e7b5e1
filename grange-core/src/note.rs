//! Knowledge-base notes.

use serde::{Deserialize, Serialize};

/// A stored note. `updated_at` is RFC 3339 text set by the backend on
/// create and update, used to pick the most recent notes for the
/// assistant context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub updated_at: String,
}

/// A note that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Filled in by the backend, not the caller.
    #[serde(default)]
    pub updated_at: String,
}
