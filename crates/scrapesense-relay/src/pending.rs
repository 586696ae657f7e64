//! Correlated request/response pairing over a best-effort channel.
//!
//! Each request gets a fresh `requestId`; a response is delivered only to
//! the request whose id it echoes. Registrations are removed when the
//! response arrives, when the wait times out, or when the waiting future
//! is dropped, so no listener outlives its request.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::types::RelayError;

/// Default wait for a response before giving up.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// In-flight requests keyed by correlation id.
pub struct PendingRequests<T> {
    pending: Mutex<HashMap<String, oneshot::Sender<T>>>,
}

impl<T> PendingRequests<T> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register a request, hand its id to `send`, and wait for the matching response.
    pub async fn request<F>(&self, send: F, timeout: Duration) -> Result<T, RelayError>
    where
        F: FnOnce(&str) -> Result<(), RelayError>,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id.clone(), tx);
        let _guard = Registration {
            pending: &self.pending,
            request_id: &request_id,
        };

        send(&request_id)?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(RelayError::Closed),
            Err(_) => {
                warn!("Request {} timed out after {:?}", request_id, timeout);
                Err(RelayError::Timeout(timeout.as_millis() as u64))
            }
        }
    }

    /// Deliver a response to the request with `request_id`.
    ///
    /// Returns `false` when no such request is waiting.
    pub fn resolve(&self, request_id: &str, value: T) -> bool {
        let waiter = self.pending.lock().remove(request_id);
        match waiter {
            Some(tx) => tx.send(value).is_ok(),
            None => {
                debug!("Dropping response for unknown request {}", request_id);
                false
            }
        }
    }

    /// Number of requests still waiting.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<T> Default for PendingRequests<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct Registration<'a, T> {
    pending: &'a Mutex<HashMap<String, oneshot::Sender<T>>>,
    request_id: &'a str,
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.pending.lock().remove(self.request_id);
    }
}
