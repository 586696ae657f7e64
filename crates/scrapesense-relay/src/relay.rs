//! Relay message handlers.

use tracing::{debug, info};

use crate::store::SnapshotStore;
use crate::types::*;

/// Message handlers over the snapshot store.
///
/// Handlers take `&mut self`; the relay is driven by one worker so
/// there is never concurrent mutation of the store.
#[derive(Debug, Default)]
pub struct Relay {
    store: SnapshotStore,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one raw message. Unrecognized or malformed kinds get no response.
    pub fn handle(
        &mut self,
        sender: &MessageSender,
        message: serde_json::Value,
    ) -> Option<RelayResponse> {
        let request: RelayRequest = match serde_json::from_value(message) {
            Ok(r) => r,
            Err(e) => {
                debug!("Ignoring message from page {}: {}", sender.page_id(), e);
                return None;
            }
        };
        Some(self.dispatch(sender, request))
    }

    /// Handle a typed request.
    pub fn dispatch(&mut self, sender: &MessageSender, request: RelayRequest) -> RelayResponse {
        match request {
            RelayRequest::StorePageContent {
                content,
                url,
                title,
            } => self.store_page_content(sender.page_id(), content, url, title),
            RelayRequest::GetPageContent => RelayResponse::Content {
                content: self.store.get(sender.page_id()).cloned(),
            },
            RelayRequest::QueryAi { query } => {
                info!("Assistant query received: {}", query);
                RelayResponse::Query {
                    response: QUERY_PLACEHOLDER.to_string(),
                }
            }
        }
    }

    fn store_page_content(
        &mut self,
        page_id: PageId,
        content: serde_json::Value,
        url: Option<String>,
        title: Option<String>,
    ) -> RelayResponse {
        self.store.insert(
            page_id,
            StoredPage {
                content,
                url,
                title,
                captured_at: chrono::Utc::now().timestamp_millis(),
            },
        );
        info!("Page content stored for page {}", page_id);
        RelayResponse::Stored {
            status: STORED_STATUS,
        }
    }

    /// Page-instance close hook: evict immediately.
    pub fn on_page_closed(&mut self, tab_id: i64) {
        self.store.remove(PageId::Tab(tab_id));
        info!("Cleaned up content for page {}", tab_id);
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }
}
