//! Connection guard middleware for data-touching routes.
//!
//! # Design
//!
//! - Empty slot: connect through the state's connector; failure
//!   short-circuits the request without invoking the handler.
//! - Held store: ping it first, so every request pays one database
//!   round-trip before doing any work. A failed ping clears the slot, and
//!   the next request re-enters the connect path.
//! - The live handle reaches the downstream handler via request extensions.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use liftoff_store::SharedStore;
use tracing::{error, info, warn};

use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Live store handle inserted into request extensions by the guard.
#[derive(Clone)]
pub(crate) struct StoreHandle(pub(crate) SharedStore);

pub(crate) async fn ensure_store(
    State(state): State<Arc<ApiState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let store = resolve_store(&state).await?;
    req.extensions_mut().insert(StoreHandle(store));
    Ok(next.run(req).await)
}

pub(crate) async fn resolve_store(state: &ApiState) -> Result<SharedStore, ApiError> {
    if let Some(store) = state.held_store().await {
        if let Err(err) = store.ping().await {
            state.clear_store().await;
            warn!(error = %err, "database ping failed; cleared connection");
            return Err(ApiError::internal("database connection lost"));
        }
        return Ok(store);
    }

    match state.connector().connect().await {
        Ok(store) => {
            state.install_store(store.clone()).await;
            info!("established database connection");
            Ok(store)
        }
        Err(err) => {
            error!(error = %err, "failed to establish database connection");
            Err(ApiError::internal("database connection failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use liftoff_store::{ConfigStore, CountdownConfig, StoreConnector, UpsertOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubStore {
        ping_ok: bool,
    }

    #[async_trait]
    impl ConfigStore for StubStore {
        async fn ping(&self) -> Result<()> {
            if self.ping_ok {
                Ok(())
            } else {
                Err(anyhow!("connection reset"))
            }
        }

        async fn fetch(&self) -> Result<Option<CountdownConfig>> {
            Ok(None)
        }

        async fn replace(&self, _document: &CountdownConfig) -> Result<UpsertOutcome> {
            Err(anyhow!("not implemented"))
        }

        async fn close(&self) {}
    }

    #[derive(Default)]
    struct CountingConnector {
        connects: AtomicUsize,
    }

    #[async_trait]
    impl StoreConnector for CountingConnector {
        async fn connect(&self) -> Result<SharedStore> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubStore { ping_ok: true }))
        }
    }

    struct FailingConnector;

    #[async_trait]
    impl StoreConnector for FailingConnector {
        async fn connect(&self) -> Result<SharedStore> {
            Err(anyhow!("dial failed"))
        }
    }

    #[tokio::test]
    async fn empty_slot_connects_and_installs_the_store() {
        let connector = Arc::new(CountingConnector::default());
        let state = ApiState::new(connector.clone());

        let store = resolve_store(&state).await.expect("resolve");
        assert!(store.ping().await.is_ok());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert!(state.held_store().await.is_some());
    }

    #[tokio::test]
    async fn held_store_skips_the_connector() {
        let connector = Arc::new(CountingConnector::default());
        let state =
            ApiState::with_store(connector.clone(), Arc::new(StubStore { ping_ok: true }));

        resolve_store(&state).await.expect("resolve");
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn connect_failure_short_circuits_and_leaves_slot_empty() {
        let state = ApiState::new(Arc::new(FailingConnector));

        let Err(error) = resolve_store(&state).await else {
            panic!("connect failure must short-circuit");
        };
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.held_store().await.is_none());
    }

    #[tokio::test]
    async fn failed_ping_clears_slot_so_next_request_reconnects() {
        let connector = Arc::new(CountingConnector::default());
        let state =
            ApiState::with_store(connector.clone(), Arc::new(StubStore { ping_ok: false }));

        let Err(error) = resolve_store(&state).await else {
            panic!("failed ping must short-circuit");
        };
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.held_store().await.is_none());

        // Recovery path: the cleared slot re-enters the connect branch.
        resolve_store(&state).await.expect("reconnect");
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert!(state.held_store().await.is_some());
    }
}
