//! Read-only DOM access — the surface the extractor needs from a page.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Elements whose text never reaches the rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document has no body element")]
    MissingBody,

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("DOM access failed: {0}")]
    Dom(String),
}

/// Best-effort reads against a live page.
///
/// Each read happens at call time. Reads that can fail on a real DOM
/// return [`ExtractError`]; meta lookups never fail and yield `None`
/// when the tag or its `content` attribute is missing.
pub trait PageDom {
    fn title(&self) -> Result<String, ExtractError>;
    fn location(&self) -> Result<String, ExtractError>;
    fn outer_html(&self) -> Result<String, ExtractError>;
    fn inner_text(&self) -> Result<String, ExtractError>;
    fn meta_content(&self, name: &str) -> Option<String>;
}

/// A page backed by a parsed HTML document.
pub struct HtmlPage {
    url: String,
    document: Html,
}

impl HtmlPage {
    pub fn parse(url: impl Into<String>, source: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(source),
        }
    }

    fn select_first(&self, css: &str) -> Result<Option<ElementRef<'_>>, ExtractError> {
        let selector = Selector::parse(css).map_err(|e| ExtractError::Selector(e.to_string()))?;
        Ok(self.document.select(&selector).next())
    }
}

impl PageDom for HtmlPage {
    fn title(&self) -> Result<String, ExtractError> {
        Ok(self
            .select_first("title")?
            .map(|t| collapse_whitespace(&t.text().collect::<String>()))
            .unwrap_or_default())
    }

    fn location(&self) -> Result<String, ExtractError> {
        Ok(self.url.clone())
    }

    fn outer_html(&self) -> Result<String, ExtractError> {
        Ok(self.document.root_element().html())
    }

    fn inner_text(&self) -> Result<String, ExtractError> {
        let body = self.select_first("body")?.ok_or(ExtractError::MissingBody)?;

        let lines: Vec<String> = body
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
                });
                if hidden {
                    return None;
                }
                let line = collapse_whitespace(text);
                (!line.is_empty()).then_some(line)
            })
            .collect();

        Ok(lines.join("\n"))
    }

    fn meta_content(&self, name: &str) -> Option<String> {
        if name.contains('"') {
            return None;
        }
        self.select_first(&format!("meta[name=\"{}\"]", name))
            .ok()
            .flatten()
            .and_then(|m| m.value().attr("content"))
            .map(|s| s.to_string())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
