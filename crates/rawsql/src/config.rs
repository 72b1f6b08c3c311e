//! Client configuration.

use crate::dialect::Dialect;
use serde::Deserialize;

/// Configuration for [`DialectClient`](crate::DialectClient).
///
/// Can be embedded in an application's own config file:
///
/// ```toml
/// [sql]
/// dialect = "postgres"
/// debug = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Placeholder and quoting conventions.
    pub dialect: Dialect,
    /// Log every compiled statement at DEBUG instead of TRACE.
    pub debug: bool,
    /// Whether the execution layer can cancel in-flight queries.
    ///
    /// `None` falls back to what the dialect supports.
    pub cancel_supported: Option<bool>,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub log_max_sql_length: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            debug: false,
            cancel_supported: None,
            log_max_sql_length: Some(200),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SQL dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Enable or disable debug logging of compiled statements.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Declare whether query cancellation is available.
    pub fn cancel_supported(mut self, supported: bool) -> Self {
        self.cancel_supported = Some(supported);
        self
    }

    /// Set maximum SQL length to log.
    pub fn log_max_sql_length(mut self, len: usize) -> Self {
        self.log_max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.log_max_sql_length = None;
        self
    }

    /// Effective cancel support, falling back to the dialect.
    pub fn can_cancel(&self) -> bool {
        self.cancel_supported
            .unwrap_or_else(|| self.dialect.supports_cancel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_postgres() {
        let config = ClientConfig::default();
        assert_eq!(config.dialect, Dialect::Postgres);
        assert!(!config.debug);
        assert!(config.can_cancel());
    }

    #[test]
    fn explicit_cancel_overrides_dialect() {
        assert!(!ClientConfig::new().cancel_supported(false).can_cancel());
        assert!(!ClientConfig::new().dialect(Dialect::Sqlite).can_cancel());
        assert!(
            ClientConfig::new()
                .dialect(Dialect::Sqlite)
                .cancel_supported(true)
                .can_cancel()
        );
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "dialect": "mysql", "debug": true }"#).unwrap();
        assert_eq!(config.dialect, Dialect::MySql);
        assert!(config.debug);
        assert_eq!(config.log_max_sql_length, Some(200));
    }
}
