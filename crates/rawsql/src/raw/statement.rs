use crate::bindings::Bindings;
use crate::client::{Client, default_client};
use crate::compiled::{CompiledStatement, Method};
use crate::error::{RawError, RawResult};
use crate::formatter::Formatter;
use crate::resolve::{resolve_named, resolve_positional};
use crate::value::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Options for [`RawStatement::timeout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutOptions {
    /// Cancel the query server-side once the timeout elapses.
    pub cancel: bool,
}

impl TimeoutOptions {
    /// Timeout that also cancels the running query.
    pub fn cancel() -> Self {
        Self { cancel: true }
    }
}

/// A SQL template with bindings, compiled on demand.
///
/// Configuration methods consume the statement and return the updated one, so a
/// statement can be cloned and specialised without affecting the original.
#[must_use]
#[derive(Clone)]
pub struct RawStatement {
    client: Arc<dyn Client>,
    template: String,
    bindings: Bindings,
    wrap_before: Option<String>,
    wrap_after: Option<String>,
    timeout: Option<Duration>,
    cancel_on_timeout: bool,
    options: Vec<BTreeMap<String, serde_json::Value>>,
    debug: Option<bool>,
}

impl RawStatement {
    /// Create an empty statement for the default (Postgres) client.
    pub fn new() -> Self {
        Self::with_client(default_client())
    }

    /// Create an empty statement owned by `client`.
    pub fn with_client(client: Arc<dyn Client>) -> Self {
        Self {
            client,
            template: String::new(),
            bindings: Bindings::None,
            wrap_before: None,
            wrap_after: None,
            timeout: None,
            cancel_on_timeout: false,
            options: Vec::new(),
            debug: None,
        }
    }

    /// Replace the template and its bindings.
    ///
    /// A single value is treated as a one-element positional list; see
    /// [`Bindings`] for how each container shape is interpreted.
    pub fn set(mut self, template: impl Into<String>, bindings: impl Into<Bindings>) -> Self {
        self.template = template.into();
        self.bindings = bindings.into();
        self
    }

    /// Attach an execution timeout of `ms` milliseconds.
    ///
    /// Non-positive values leave the statement unchanged. With
    /// [`TimeoutOptions::cancel`] the client must support query cancellation,
    /// otherwise this fails with [`RawError::CancelUnsupported`] and nothing is
    /// recorded. Once requested, cancellation stays on for later timeouts.
    pub fn timeout(mut self, ms: i64, options: TimeoutOptions) -> RawResult<Self> {
        let Ok(ms) = u64::try_from(ms) else {
            return Ok(self);
        };
        if ms == 0 {
            return Ok(self);
        }
        if options.cancel {
            self.client.assert_can_cancel_query()?;
        }
        self.timeout = Some(Duration::from_millis(ms));
        self.cancel_on_timeout |= options.cancel;
        Ok(self)
    }

    /// Wrap the resolved SQL with literal text. The text is never scanned for
    /// placeholders.
    pub fn wrap(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        let before: String = before.into();
        let after: String = after.into();
        self.wrap_before = (!before.is_empty()).then_some(before);
        self.wrap_after = (!after.is_empty()).then_some(after);
        self
    }

    /// Add execution options. Later keys override earlier ones when merged.
    pub fn options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.options.push(
            options
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Override the client's debug flag for this statement.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = Some(enabled);
        self
    }

    /// The SQL template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The bindings.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The owning client.
    pub fn client(&self) -> &Arc<dyn Client> {
        &self.client
    }

    /// Compile into SQL plus ordered driver bindings.
    ///
    /// Every call uses a fresh formatter and produces a new `uid`.
    pub fn compile(&self) -> RawResult<CompiledStatement> {
        let mut formatter = self.client.formatter();
        let sql = self
            .resolve_into(formatter.as_mut())
            .inspect_err(|err| self.log_failure(err))?;
        let bindings = formatter.into_bindings();

        if bindings.iter().any(Value::contains_undefined) {
            let err = RawError::undefined_binding(sql);
            self.log_failure(&err);
            return Err(err);
        }

        let compiled = CompiledStatement {
            method: Method::Raw,
            sql,
            bindings,
            options: self.merged_options(),
            timeout: self.timeout,
            cancel_on_timeout: self.timeout.is_some() && self.cancel_on_timeout,
            uid: Uuid::new_v4(),
        };
        self.log_compiled(&compiled);
        Ok(compiled)
    }

    /// Render the SQL with bindings inlined as escaped literals.
    ///
    /// Meant for display and logging, not for execution.
    pub fn to_query_string(&self) -> RawResult<String> {
        let mut formatter = self.client.literal_formatter();
        let sql = self.resolve_into(formatter.as_mut())?;
        if formatter.bindings().iter().any(Value::contains_undefined) {
            return Err(RawError::undefined_binding(sql));
        }
        Ok(sql)
    }

    /// Resolve this statement's placeholders with an existing formatter and
    /// apply the wrap text.
    ///
    /// Bound values are left in `formatter`. Formatters call this for nested
    /// raw statements so placeholder numbering continues across them.
    pub fn resolve_into(&self, formatter: &mut dyn Formatter) -> RawResult<String> {
        let sql = match &self.bindings {
            Bindings::Positional(values) => resolve_positional(&self.template, values, formatter)?,
            Bindings::Named(values) => resolve_named(&self.template, values, formatter)?,
            Bindings::Scalar(value) => {
                formatter.push_binding(value.clone());
                self.template.clone()
            }
            Bindings::None => self.template.clone(),
        };
        Ok(self.wrapped(sql))
    }

    fn wrapped(&self, sql: String) -> String {
        match (&self.wrap_before, &self.wrap_after) {
            (None, None) => sql,
            (before, after) => {
                let before = before.as_deref().unwrap_or("");
                let after = after.as_deref().unwrap_or("");
                let mut out = String::with_capacity(before.len() + sql.len() + after.len());
                out.push_str(before);
                out.push_str(&sql);
                out.push_str(after);
                out
            }
        }
    }

    fn merged_options(&self) -> BTreeMap<String, serde_json::Value> {
        let mut merged = BTreeMap::new();
        for options in &self.options {
            merged.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or_else(|| self.client.debug())
    }

    fn log_compiled(&self, compiled: &CompiledStatement) {
        let sql = truncate_sql(&compiled.sql, self.client.log_max_sql_length());
        if self.debug_enabled() {
            tracing::debug!(
                target: "rawsql.compile",
                uid = %compiled.uid,
                method = compiled.method.as_str(),
                binding_count = compiled.bindings.len(),
                sql = %sql,
                "compiled raw statement"
            );
        } else {
            tracing::trace!(
                target: "rawsql.compile",
                uid = %compiled.uid,
                method = compiled.method.as_str(),
                binding_count = compiled.bindings.len(),
                sql = %sql,
                "compiled raw statement"
            );
        }
    }

    fn log_failure(&self, err: &RawError) {
        if self.debug_enabled() {
            let template = truncate_sql(&self.template, self.client.log_max_sql_length());
            tracing::debug!(
                target: "rawsql.compile",
                error = %err,
                template = %template,
                "raw statement failed to compile"
            );
        }
    }
}

impl Default for RawStatement {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStatement")
            .field("dialect", &self.client.dialect())
            .field("template", &self.template)
            .field("bindings", &self.bindings)
            .field("wrap_before", &self.wrap_before)
            .field("wrap_after", &self.wrap_after)
            .field("timeout", &self.timeout)
            .field("cancel_on_timeout", &self.cancel_on_timeout)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Truncate `sql` to at most `max` bytes on a char boundary.
fn truncate_sql(sql: &str, max: Option<usize>) -> Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while !sql.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!("{}...", &sql[..end]))
        }
        _ => Cow::Borrowed(sql),
    }
}
