//! Health endpoint.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::state::ApiState;

/// Service name reported in health bodies.
const SERVICE_NAME: &str = "liftoff";

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) mongodb: &'static str,
    pub(crate) timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl HealthResponse {
    fn new(status: &'static str, mongodb: &'static str, error: Option<String>) -> Self {
        Self {
            status,
            service: SERVICE_NAME,
            mongodb,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            error,
        }
    }
}

/// Side-effect-free liveness report: pings the held connection when one
/// exists, reports disconnected without connecting when none does, and never
/// clears the slot.
pub(crate) async fn health(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let Some(store) = state.held_store().await else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("error", "disconnected", None)),
        );
    };

    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse::new("ok", "connected", None)),
        ),
        Err(err) => {
            warn!(error = %err, "health check failed to reach database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("error", "error", Some(err.to_string()))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use liftoff_store::{
        ConfigStore, CountdownConfig, SharedStore, StoreConnector, UpsertOutcome,
    };

    struct StubStore {
        ping_ok: bool,
    }

    #[async_trait]
    impl ConfigStore for StubStore {
        async fn ping(&self) -> Result<()> {
            if self.ping_ok {
                Ok(())
            } else {
                Err(anyhow!("socket closed"))
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

    struct NeverConnector;

    #[async_trait]
    impl StoreConnector for NeverConnector {
        async fn connect(&self) -> Result<SharedStore> {
            Err(anyhow!("health must not connect"))
        }
    }

    #[tokio::test]
    async fn reports_disconnected_without_attempting_to_connect() {
        let state = Arc::new(ApiState::new(Arc::new(NeverConnector)));

        let (status, Json(body)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "error");
        assert_eq!(body.mongodb, "disconnected");
        assert!(body.error.is_none());
        assert!(state.held_store().await.is_none());
    }

    #[tokio::test]
    async fn reports_connected_when_ping_succeeds() {
        let state = Arc::new(ApiState::with_store(
            Arc::new(NeverConnector),
            Arc::new(StubStore { ping_ok: true }),
        ));

        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.service, SERVICE_NAME);
        assert_eq!(body.mongodb, "connected");
    }

    #[tokio::test]
    async fn failed_ping_reports_error_and_keeps_the_handle() {
        let state = Arc::new(ApiState::with_store(
            Arc::new(NeverConnector),
            Arc::new(StubStore { ping_ok: false }),
        ));

        let (status, Json(body)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.mongodb, "error");
        assert_eq!(body.error.as_deref(), Some("socket closed"));
        // Health never clears the slot; that is the guard's job.
        assert!(state.held_store().await.is_some());
    }

    #[test]
    fn health_body_omits_error_when_absent() {
        let body = HealthResponse::new("ok", "connected", None);
        let value = serde_json::to_value(&body).expect("serialize health body");
        assert!(value.get("error").is_none());
        assert_eq!(value["service"], SERVICE_NAME);
    }
}
