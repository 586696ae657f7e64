//! Page content requests from the chat UI to the content script.

use std::time::Duration;

use scrapesense_extract::{ContentRequest, ContentResponse, PageSnapshot};
use scrapesense_relay::pending::{PendingRequests, DEFAULT_REQUEST_TIMEOUT};
use scrapesense_relay::RelayError;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Requests snapshots over an outbound message channel and matches the
/// replies fed back through [`PageContentClient::on_message`].
pub struct PageContentClient {
    outbound: mpsc::UnboundedSender<serde_json::Value>,
    pending: PendingRequests<ContentResponse>,
    timeout: Duration,
}

impl PageContentClient {
    pub fn new(outbound: mpsc::UnboundedSender<serde_json::Value>) -> Self {
        Self {
            outbound,
            pending: PendingRequests::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one content request and wait for its tagged reply.
    pub async fn request_page_content(&self) -> Result<ContentResponse, RelayError> {
        self.pending
            .request(
                |request_id| {
                    let message = serde_json::to_value(ContentRequest::GetPageContent {
                        request_id: Some(request_id.to_string()),
                    })
                    .map_err(|e| RelayError::Send(e.to_string()))?;
                    self.outbound.send(message).map_err(|_| RelayError::Closed)
                },
                self.timeout,
            )
            .await
    }

    /// Request a snapshot, degrading to `None` on any failure.
    pub async fn fetch_snapshot(&self) -> Option<PageSnapshot> {
        match self.request_page_content().await {
            Ok(ContentResponse::Success { content, .. }) => Some(content),
            Ok(ContentResponse::Error { message, .. }) => {
                warn!("Page extraction failed: {}", message);
                None
            }
            Err(e) => {
                warn!("Page content request failed: {}", e);
                None
            }
        }
    }

    /// Feed an incoming message. Returns `true` if it answered a pending request.
    pub fn on_message(&self, message: &serde_json::Value) -> bool {
        let response: ContentResponse = match serde_json::from_value(message.clone()) {
            Ok(r) => r,
            Err(_) => return false,
        };
        match response.request_id().map(str::to_string) {
            Some(id) => self.pending.resolve(&id, response),
            None => {
                debug!("Ignoring content response without requestId");
                false
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.in_flight()
    }
}
