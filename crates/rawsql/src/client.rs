//! Client capability consumed by raw statements.
//!
//! A raw statement never talks to a database. It only needs its client to hand
//! out a fresh [`Formatter`] for every compile and to answer whether in-flight
//! queries can be cancelled when `timeout(.., cancel)` is requested.

use crate::config::ClientConfig;
use crate::dialect::Dialect;
use crate::error::{RawError, RawResult};
use crate::formatter::{DialectFormatter, Formatter, LiteralFormatter};
use std::sync::{Arc, OnceLock};

/// Capabilities a raw statement needs from the client that owns it.
pub trait Client: Send + Sync {
    /// The dialect statements are compiled for.
    fn dialect(&self) -> Dialect;

    /// A fresh formatter for a single compile.
    fn formatter(&self) -> Box<dyn Formatter> {
        Box::new(DialectFormatter::new(self.dialect()))
    }

    /// A fresh formatter that inlines values as literals, for display.
    fn literal_formatter(&self) -> Box<dyn Formatter> {
        Box::new(LiteralFormatter::new(self.dialect()))
    }

    /// Whether the execution layer can cancel in-flight queries.
    fn can_cancel_query(&self) -> bool {
        false
    }

    /// Fail with [`RawError::CancelUnsupported`] unless cancellation is available.
    fn assert_can_cancel_query(&self) -> RawResult<()> {
        if self.can_cancel_query() {
            Ok(())
        } else {
            Err(RawError::CancelUnsupported)
        }
    }

    /// Whether compiled statements are logged at DEBUG.
    fn debug(&self) -> bool {
        false
    }

    /// Truncation applied to SQL in log events.
    fn log_max_sql_length(&self) -> Option<usize> {
        Some(200)
    }
}

/// A [`Client`] driven entirely by a [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct DialectClient {
    config: ClientConfig,
}

impl DialectClient {
    /// Create a client from a configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Create a client with default settings for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(ClientConfig::new().dialect(dialect))
    }

    /// Access the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Client for DialectClient {
    fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    fn can_cancel_query(&self) -> bool {
        self.config.can_cancel()
    }

    fn debug(&self) -> bool {
        self.config.debug
    }

    fn log_max_sql_length(&self) -> Option<usize> {
        self.config.log_max_sql_length
    }
}

/// The client used by statements created without one: default Postgres settings.
pub(crate) fn default_client() -> Arc<dyn Client> {
    static DEFAULT: OnceLock<Arc<dyn Client>> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(DialectClient::default())))
}
