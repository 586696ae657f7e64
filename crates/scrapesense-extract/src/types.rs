//! Snapshot types — field names match the extension's JSON payloads.

use serde::{Deserialize, Serialize};

/// Maximum characters of markup kept in a snapshot.
pub const MAX_HTML_CHARS: usize = 50_000;
/// Maximum characters of visible text kept in a snapshot.
pub const MAX_TEXT_CHARS: usize = 20_000;

/// Bounded capture of one page's content at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub title: String,
    pub url: String,
    pub html: String,
    pub text: String,
    pub metadata: PageMetadata,
}

/// Named meta tags read from the page. Absent tags are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub author: String,
}

/// Meta tag names captured into [`PageMetadata`].
pub const META_DESCRIPTION: &str = "description";
pub const META_KEYWORDS: &str = "keywords";
pub const META_AUTHOR: &str = "author";

/// Cut `text` to at most `max_chars` characters without splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
