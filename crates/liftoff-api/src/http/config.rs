//! Countdown configuration read/write handlers.

use axum::{
    Json,
    extract::Extension,
    response::{IntoResponse, Response},
};
use liftoff_store::{ConfigUpdate, CountdownConfig, StoreError};
use serde::Serialize;
use tracing::{error, info};

use crate::http::errors::ApiError;
use crate::http::guard::StoreHandle;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigLoaded {
    pub(crate) success: bool,
    pub(crate) message: &'static str,
    pub(crate) data: CountdownConfig,
    pub(crate) is_global: bool,
}

/// Absence of the singleton document is a normal state, served with HTTP 200.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigMissing {
    pub(crate) success: bool,
    pub(crate) error: &'static str,
    pub(crate) is_global: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigSaved {
    pub(crate) success: bool,
    pub(crate) message: &'static str,
    pub(crate) data: SavedOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavedOutcome {
    pub(crate) acknowledged: bool,
    pub(crate) modified_count: u64,
    pub(crate) upserted_count: u64,
    pub(crate) config: CountdownConfig,
    pub(crate) global_update: bool,
}

/// Public visitor read of the singleton document.
pub(crate) async fn get_config(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
) -> Result<Response, ApiError> {
    match store.fetch().await {
        Ok(Some(document)) => Ok(Json(ConfigLoaded {
            success: true,
            message: "Global configuration loaded",
            data: document,
            is_global: true,
        })
        .into_response()),
        Ok(None) => Ok(Json(ConfigMissing {
            success: false,
            error: "No global configuration found",
            is_global: false,
        })
        .into_response()),
        Err(err) => {
            error!(error = %err, "failed to load countdown configuration");
            Err(ApiError::internal("failed to load countdown configuration"))
        }
    }
}

/// Administrative write of the singleton document: read the prior revision
/// for its counter, build the replacement, and upsert it under the fixed key.
pub(crate) async fn set_config(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ConfigSaved>, ApiError> {
    let previous = store.fetch().await.map_err(|err| {
        error!(error = %err, "failed to load countdown configuration");
        ApiError::internal("failed to load countdown configuration")
    })?;

    let document = CountdownConfig::next(&update, previous.as_ref()).map_err(|err| match err {
        StoreError::InvalidField { field, reason } => {
            ApiError::bad_request(format!("invalid {field}: {reason}"))
        }
        StoreError::Connection { .. } => {
            ApiError::internal("failed to build countdown configuration")
        }
    })?;

    let outcome = store.replace(&document).await.map_err(|err| {
        error!(error = %err, "failed to persist countdown configuration");
        ApiError::internal("failed to persist countdown configuration")
    })?;

    info!(
        update_count = document.update_count,
        target_date = %document.target_date,
        "saved global countdown configuration"
    );

    Ok(Json(ConfigSaved {
        success: true,
        message: "Global configuration saved for all visitors",
        data: SavedOutcome {
            acknowledged: outcome.acknowledged,
            modified_count: outcome.modified_count,
            upserted_count: outcome.upserted_count,
            config: document,
            global_update: true,
        },
    }))
}
