//! Connection settings for the countdown configuration store.

/// Default database name when none is supplied.
pub const DEFAULT_DATABASE: &str = "liftoff";

/// Default collection holding the singleton configuration document.
pub const DEFAULT_COLLECTION: &str = "global_config";

/// Settings describing the MongoDB target for the store.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Connection string for the MongoDB deployment.
    pub uri: String,
    /// Database holding the configuration collection.
    pub database: String,
    /// Collection holding the singleton document.
    pub collection: String,
}

impl StoreSettings {
    /// Build settings for the supplied connection string with default
    /// database and collection names.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Override the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_apply_defaults() {
        let settings = StoreSettings::new("mongodb://localhost:27017");
        assert_eq!(settings.uri, "mongodb://localhost:27017");
        assert_eq!(settings.database, DEFAULT_DATABASE);
        assert_eq!(settings.collection, DEFAULT_COLLECTION);
    }

    #[test]
    fn settings_database_override_keeps_collection() {
        let settings = StoreSettings::new("mongodb://localhost:27017").with_database("staging");
        assert_eq!(settings.database, "staging");
        assert_eq!(settings.collection, DEFAULT_COLLECTION);
    }
}
