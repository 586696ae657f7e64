//! Snapshot extraction.

use tracing::debug;

use crate::dom::{ExtractError, PageDom};
use crate::types::*;

/// Read the page and produce one bounded snapshot.
///
/// All fields are read at call time. Any failing DOM read fails the whole
/// extraction; missing meta tags only blank their own field.
pub fn extract_page_content(page: &dyn PageDom) -> Result<PageSnapshot, ExtractError> {
    let title = page.title()?;
    let url = page.location()?;
    let html = page.outer_html()?;
    let text = page.inner_text()?;

    let metadata = PageMetadata {
        description: page.meta_content(META_DESCRIPTION).unwrap_or_default(),
        keywords: page.meta_content(META_KEYWORDS).unwrap_or_default(),
        author: page.meta_content(META_AUTHOR).unwrap_or_default(),
    };

    debug!(
        "Extracted {} ({} html chars, {} text chars)",
        url,
        html.chars().count(),
        text.chars().count()
    );

    Ok(PageSnapshot {
        title,
        url,
        html: truncate_chars(&html, MAX_HTML_CHARS).to_string(),
        text: truncate_chars(&text, MAX_TEXT_CHARS).to_string(),
        metadata,
    })
}
