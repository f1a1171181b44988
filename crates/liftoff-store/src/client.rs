#![allow(clippy::multiple_crate_versions)]

//! Facade traits and the MongoDB-backed store implementation.
//!
//! # Design
//!
//! - `ConfigStore` is the per-request contract: ping, fetch, replace, close.
//! - `StoreConnector` produces a freshly connected store; the HTTP layer uses
//!   it to re-enter the connect path after a dropped connection.
//! - Connecting performs a liveness probe so a returned store is known good.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::model::{CountdownConfig, DOCUMENT_ID, UpsertOutcome};
use crate::settings::StoreSettings;

/// Application name reported to the deployment on connect.
const APP_NAME: &str = "liftoff";

/// Async facade over the singleton-document store.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Issue a lightweight liveness check against the held connection.
    async fn ping(&self) -> Result<()>;
    /// Fetch the singleton document, or `None` when it has never been
    /// written.
    async fn fetch(&self) -> Result<Option<CountdownConfig>>;
    /// Replace the singleton document, inserting it when absent.
    async fn replace(&self, document: &CountdownConfig) -> Result<UpsertOutcome>;
    /// Release the underlying connection; idempotent and best-effort.
    async fn close(&self);
}

/// Shared handle to a live store.
pub type SharedStore = Arc<dyn ConfigStore>;

/// Factory producing freshly connected stores.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Establish a new connection and probe it.
    async fn connect(&self) -> Result<SharedStore>;
}

/// Shared handle to a connector.
pub type SharedConnector = Arc<dyn StoreConnector>;

/// MongoDB-backed store for the countdown configuration document.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    documents: Collection<CountdownConfig>,
}

impl MongoStore {
    /// Connect to the deployment described by `settings` and probe it with
    /// the `ping` database command.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] when the connection string is
    /// invalid, the client cannot be built, or the probe fails.
    pub async fn connect(settings: &StoreSettings) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|source| StoreError::connection("options.parse", source))?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)
            .map_err(|source| StoreError::connection("client.build", source))?;
        let database = client.database(&settings.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| StoreError::connection("connect.probe", source))?;

        info!(database = %settings.database, "connected to mongodb");
        let documents = database.collection::<CountdownConfig>(&settings.collection);
        Ok(Self {
            client,
            database,
            documents,
        })
    }
}

#[async_trait]
impl ConfigStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("mongodb ping failed")?;
        Ok(())
    }

    async fn fetch(&self) -> Result<Option<CountdownConfig>> {
        self.documents
            .find_one(doc! { "_id": DOCUMENT_ID })
            .await
            .context("failed to load countdown configuration")
    }

    async fn replace(&self, document: &CountdownConfig) -> Result<UpsertOutcome> {
        let result = self
            .documents
            .replace_one(doc! { "_id": DOCUMENT_ID }, document)
            .upsert(true)
            .await
            .context("failed to persist countdown configuration")?;
        Ok(UpsertOutcome {
            acknowledged: true,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
        })
    }

    async fn close(&self) {
        debug!("shutting down mongodb client");
        self.client.clone().shutdown().await;
    }
}

/// Connector that dials the deployment described by its settings.
#[derive(Clone)]
pub struct MongoConnector {
    settings: StoreSettings,
}

impl MongoConnector {
    /// Build a connector for the supplied settings.
    #[must_use]
    pub const fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self) -> Result<SharedStore> {
        let store = MongoStore::connect(&self.settings).await?;
        Ok(Arc::new(store))
    }
}
