//! Relay worker — runs every handler on one task, in arrival order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::relay::Relay;
use crate::types::{MessageSender, PageSummary, RelayError, RelayResponse};

enum RelayCommand {
    Message {
        sender: MessageSender,
        message: serde_json::Value,
        reply: oneshot::Sender<Option<RelayResponse>>,
    },
    PageClosed {
        tab_id: i64,
    },
    ListPages {
        reply: oneshot::Sender<Vec<PageSummary>>,
    },
}

/// Cloneable handle to a running relay worker.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayHandle {
    /// Start the worker task. Must be called inside a tokio runtime.
    pub fn spawn(relay: Relay) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<RelayCommand>();

        tokio::spawn(async move {
            let mut relay = relay;
            info!("Relay worker started");
            while let Some(command) = rx.recv().await {
                match command {
                    RelayCommand::Message {
                        sender,
                        message,
                        reply,
                    } => {
                        let response = relay.handle(&sender, message);
                        if reply.send(response).is_err() {
                            debug!("Requester for page {} went away", sender.page_id());
                        }
                    }
                    RelayCommand::PageClosed { tab_id } => relay.on_page_closed(tab_id),
                    RelayCommand::ListPages { reply } => {
                        let _ = reply.send(relay.store().summaries());
                    }
                }
            }
            info!("Relay worker stopped");
        });

        Self { tx }
    }

    /// Deliver a message and wait for the relay's answer.
    ///
    /// `Ok(None)` means the kind is not supported.
    pub async fn send(
        &self,
        sender: MessageSender,
        message: serde_json::Value,
    ) -> Result<Option<RelayResponse>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RelayCommand::Message {
                sender,
                message,
                reply,
            })
            .map_err(|_| RelayError::Closed)?;
        rx.await.map_err(|_| RelayError::Closed)
    }

    /// Notify the relay that a page instance closed.
    pub fn page_closed(&self, tab_id: i64) -> Result<(), RelayError> {
        self.tx
            .send(RelayCommand::PageClosed { tab_id })
            .map_err(|_| RelayError::Closed)
    }

    pub async fn list_pages(&self) -> Result<Vec<PageSummary>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RelayCommand::ListPages { reply })
            .map_err(|_| RelayError::Closed)?;
        rx.await.map_err(|_| RelayError::Closed)
    }
}
