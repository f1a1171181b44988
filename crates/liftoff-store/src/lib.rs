#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! MongoDB persistence layer for the global countdown configuration.
//!
//! Layout: `settings.rs` (connection settings), `model.rs` (the singleton
//! document and its write-path constructor), `client.rs` (facade traits and
//! the driver-backed store), `error.rs` (typed store errors).

pub mod client;
pub mod error;
pub mod model;
pub mod settings;

pub use client::{ConfigStore, MongoConnector, MongoStore, SharedConnector, SharedStore, StoreConnector};
pub use error::{StoreError, StoreResult};
pub use model::{
    ConfigUpdate, CountdownConfig, DEFAULT_CONFIGURED_BY, DESCRIPTION, DOCUMENT_ID, UpsertOutcome,
};
pub use settings::StoreSettings;
