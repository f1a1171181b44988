//! The singleton countdown configuration document and its write-path
//! constructor.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Fixed identifier of the singleton document; exactly one document ever
/// exists under this key.
pub const DOCUMENT_ID: &str = "global_countdown_config";

/// Operator name recorded when a write request does not carry one.
pub const DEFAULT_CONFIGURED_BY: &str = "AndreSM";

/// Constant description stamped into every stored document.
pub const DESCRIPTION: &str = "Global countdown configuration shared by every visitor";

/// The global countdown configuration document.
///
/// Field names are the wire contract: JSON and BSON both use camelCase, and
/// the identifier is stored as `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownConfig {
    /// Singleton key; always [`DOCUMENT_ID`].
    #[serde(rename = "_id")]
    pub id: String,
    /// ISO-8601 countdown target supplied by the administrator.
    pub target_date: String,
    /// Operator that submitted the configuration.
    pub configured_by: String,
    /// ISO-8601 timestamp of the configuration, caller-supplied or defaulted
    /// to the write time.
    pub configured_at: String,
    /// ISO-8601 timestamp of the most recent write.
    pub last_update: String,
    /// Number of successful writes, starting at 1.
    pub update_count: i64,
    /// Constant `true`; retained for client-side disambiguation.
    pub is_global: bool,
    /// Constant human-readable description.
    pub description: String,
}

/// Incoming write request payload for the configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    /// Countdown target; required and validated as RFC 3339.
    pub target_date: Option<String>,
    /// Optional operator name.
    pub configured_by: Option<String>,
    /// Optional configuration timestamp; passed through as supplied.
    pub configured_at: Option<String>,
}

/// Counts reported by a replace-upsert of the singleton document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Whether the write was acknowledged by the deployment.
    pub acknowledged: bool,
    /// Number of existing documents modified (0 or 1).
    pub modified_count: u64,
    /// Number of documents inserted by the upsert (0 or 1).
    pub upserted_count: u64,
}

impl CountdownConfig {
    /// Build the next revision of the singleton document from a write
    /// request and the previously stored document, stamped with the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidField`] when `targetDate` is missing or
    /// is not a parseable RFC 3339 timestamp.
    pub fn next(update: &ConfigUpdate, previous: Option<&Self>) -> StoreResult<Self> {
        Self::next_at(update, previous, Utc::now())
    }

    /// [`Self::next`] with an explicit clock, for deterministic construction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidField`] when `targetDate` is missing or
    /// is not a parseable RFC 3339 timestamp.
    pub fn next_at(
        update: &ConfigUpdate,
        previous: Option<&Self>,
        now: DateTime<Utc>,
    ) -> StoreResult<Self> {
        let target_date = update
            .target_date
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| StoreError::invalid_field("targetDate", "required"))?;
        DateTime::parse_from_rfc3339(target_date)
            .map_err(|_| StoreError::invalid_field("targetDate", "must be an RFC 3339 timestamp"))?;

        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        // Read-then-increment without a lock: the counter is cosmetic and the
        // domain is single-writer, so a lost increment is tolerated.
        let update_count = previous.map_or(1, |prior| prior.update_count.saturating_add(1));

        Ok(Self {
            id: DOCUMENT_ID.to_string(),
            target_date: target_date.to_string(),
            configured_by: non_empty(update.configured_by.as_deref())
                .unwrap_or(DEFAULT_CONFIGURED_BY)
                .to_string(),
            configured_at: non_empty(update.configured_at.as_deref())
                .map_or_else(|| stamp.clone(), ToString::to_string),
            last_update: stamp,
            update_count,
            is_global: true,
            description: DESCRIPTION.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|candidate| !candidate.is_empty())
}
