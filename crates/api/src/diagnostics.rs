//! Operator-facing failure reports.
//!
//! A [`DiagnosticReport`] collects everything known about an unexpected
//! failure inside a route handler (what was being done, the request payload,
//! the error and its source chain) and writes it as one formatted record to
//! the `watches_api::diagnostics` tracing target. Callers still receive only
//! a generic message.
//!
//! ```text
//! [ Log level: error | HTTP Status Code: 500 ] create route handler
//! Additional information:
//! [Request body] {"manufacturer":"Apple",...}
//! [Error stack] pool timed out
//!   caused by: connection refused
//! [Error message] pool timed out
//! ```

use std::error::Error;
use std::fmt::Write;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::Level;

/// Tracing target that receives formatted reports.
pub const TARGET: &str = "watches_api::diagnostics";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiagnosticError {
    /// Every report must say where the failure happened.
    #[error("Custom message is required.")]
    MissingContext,
}

/// Builder for a single failure record.
///
/// Defaults to level `ERROR` and status `500`.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    level: Level,
    status: StatusCode,
    context: Option<String>,
    payload: Option<String>,
    stack: Option<String>,
    message: Option<String>,
}

impl Default for DiagnosticReport {
    fn default() -> Self {
        Self {
            level: Level::ERROR,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            context: None,
            payload: None,
            stack: None,
            message: None,
        }
    }
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Where the failure happened, e.g. `"update route handler with id 7"`.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the request payload, serialized as compact JSON.
    pub fn payload<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        self.payload = Some(
            serde_json::to_string(payload)
                .unwrap_or_else(|e| format!("<unserializable payload: {e}>")),
        );
        self
    }

    /// Attach an error: its message and its rendered `source()` chain.
    pub fn error(mut self, err: &(dyn Error + 'static)) -> Self {
        self.message = Some(err.to_string());
        self.stack = Some(render_chain(err));
        self
    }

    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Render the report.
    ///
    /// Attachments appear in the order payload, stack, message, under an
    /// `Additional information:` header that is omitted when there are none.
    pub fn format(&self) -> Result<String, DiagnosticError> {
        let context = self
            .context
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(DiagnosticError::MissingContext)?;

        let mut out = format!(
            "[ Log level: {} | HTTP Status Code: {} ] {context}\n",
            self.level.to_string().to_lowercase(),
            self.status.as_u16(),
        );
        if self.payload.is_some() || self.stack.is_some() || self.message.is_some() {
            out.push_str("Additional information:\n");
        }
        if let Some(payload) = &self.payload {
            let _ = writeln!(out, "[Request body] {payload}");
        }
        if let Some(stack) = &self.stack {
            let _ = writeln!(out, "[Error stack] {stack}");
        }
        if let Some(message) = &self.message {
            let _ = write!(out, "[Error message] {message}");
        }
        Ok(out)
    }

    /// Format the report and write it to [`TARGET`] at the configured level.
    pub fn emit(&self) -> Result<(), DiagnosticError> {
        let report = self.format()?;
        match self.level {
            Level::ERROR => tracing::error!(target: TARGET, "{report}"),
            Level::WARN => tracing::warn!(target: TARGET, "{report}"),
            Level::INFO => tracing::info!(target: TARGET, "{report}"),
            Level::DEBUG => tracing::debug!(target: TARGET, "{report}"),
            _ => tracing::trace!(target: TARGET, "{report}"),
        }
        Ok(())
    }
}

/// The error followed by each of its sources, one per line.
fn render_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\n  caused by: {cause}");
        source = cause.source();
    }
    out
}
