//! Service index endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ServiceIndex {
    pub(crate) service: &'static str,
    pub(crate) version: &'static str,
    pub(crate) description: &'static str,
    pub(crate) status: &'static str,
    pub(crate) endpoints: Vec<EndpointDescriptor>,
}

#[derive(Serialize)]
pub(crate) struct EndpointDescriptor {
    pub(crate) method: &'static str,
    pub(crate) path: &'static str,
    pub(crate) description: &'static str,
}

/// Unguarded service metadata; touches no state.
pub(crate) async fn service_index() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        service: "liftoff",
        version: env!("CARGO_PKG_VERSION"),
        description: "Global countdown configuration service",
        status: "active",
        endpoints: vec![
            EndpointDescriptor {
                method: "GET",
                path: "/api/health",
                description: "Service and database liveness",
            },
            EndpointDescriptor {
                method: "GET",
                path: "/api/config",
                description: "Read the global countdown configuration",
            },
            EndpointDescriptor {
                method: "POST",
                path: "/api/config",
                description: "Replace the global countdown configuration",
            },
        ],
    })
}
