//! Page content extractor.
//!
//! Reads a page's DOM at call time and produces a bounded [`PageSnapshot`].
//! The [`ContentScript`] answers content requests coming from the chat UI.

pub mod content_script;
pub mod dom;
pub mod extract;
pub mod types;

pub use content_script::{ContentRequest, ContentResponse, ContentScript};
pub use dom::{ExtractError, HtmlPage, PageDom};
pub use extract::extract_page_content;
pub use types::*;
