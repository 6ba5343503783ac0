//! Target configuration.

/// Database name reported by `GET /` unless configured otherwise.
pub const DEFAULT_DB_NAME: &str = "medic";

/// Configuration for the replication target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Name reported as `db_name` in the database info.
    pub db_name: String,
}

impl TargetConfig {
    /// Creates a configuration reporting `db_name`.
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
        }
    }

    /// Sets the reported database name.
    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_NAME)
    }
}
