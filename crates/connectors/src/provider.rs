use crate::{
    endpoint::Endpoint,
    sql::base::{adapter::SqlAdapter, error::ConnectorError},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

struct EndpointSlot {
    name: &'static str,
    endpoint: Endpoint,
    handle: Mutex<Option<Arc<dyn SqlAdapter>>>,
}

impl EndpointSlot {
    fn new(name: &'static str, endpoint: Endpoint) -> Self {
        EndpointSlot {
            name,
            endpoint,
            handle: Mutex::new(None),
        }
    }

    async fn get(&self) -> Result<Arc<dyn SqlAdapter>, ConnectorError> {
        let mut guard = self.handle.lock().await;
        if let Some(handle) = guard.as_ref() {
            return Ok(handle.clone());
        }

        info!(
            "Connecting to {} database at {}:{}/{}",
            self.name, self.endpoint.host, self.endpoint.port, self.endpoint.database
        );
        match self.endpoint.connect().await {
            Ok(adapter) => {
                info!("Connected to {} database", self.name);
                *guard = Some(adapter.clone());
                Ok(adapter)
            }
            Err(err) => {
                error!("Connection to {} database failed: {}", self.name, err);
                Err(err)
            }
        }
    }

    async fn close(&self) {
        let mut guard = self.handle.lock().await;
        if let Some(handle) = guard.take() {
            match handle.close().await {
                Ok(()) => info!("{} database connection closed", self.name),
                // Shutdown proceeds regardless of release failures.
                Err(error) => warn!(%error, "Failed to close {} database connection", self.name),
            }
        }
    }
}

/// Owns the two connection handles of one run. Handles are opened lazily on
/// first use, reused for the rest of the run and released by `close()`; the
/// provider is never shared across runs.
pub struct ConnectionProvider {
    source: EndpointSlot,
    target: EndpointSlot,
}

impl ConnectionProvider {
    pub fn new(source: Endpoint, target: Endpoint) -> Self {
        ConnectionProvider {
            source: EndpointSlot::new("source", source),
            target: EndpointSlot::new("target", target),
        }
    }

    pub async fn source(&self) -> Result<Arc<dyn SqlAdapter>, ConnectorError> {
        self.source.get().await
    }

    pub async fn target(&self) -> Result<Arc<dyn SqlAdapter>, ConnectorError> {
        self.target.get().await
    }

    /// Releases both handles if open. Release failures are logged and
    /// swallowed so shutdown always completes.
    pub async fn close(&self) {
        self.source.close().await;
        self.target.close().await;
    }
}
