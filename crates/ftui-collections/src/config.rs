#![forbid(unsafe_code)]

//! Notification configuration shared by all observable containers.

use std::fmt;
use std::rc::Rc;

use crate::error::ListenerFailure;

/// Sink for listener failures.
///
/// Invoked synchronously on the notifying thread, once per failing listener
/// call. The reporter must not panic.
pub type ErrorReporter = Rc<dyn Fn(&ListenerFailure)>;

/// Reporter used when none is configured: logs through `tracing`.
#[must_use]
pub fn tracing_reporter() -> ErrorReporter {
    Rc::new(|failure: &ListenerFailure| {
        tracing::error!(
            message = "collections.listener_failed",
            kind = %failure.kind,
            position = failure.position,
            error = %failure.error,
        );
    })
}

/// Configuration for listener delivery.
#[derive(Clone)]
pub struct NotifyConfig {
    /// Where listener failures go.
    pub reporter: ErrorReporter,
    /// Contain panicking listeners instead of unwinding through the
    /// mutating call. Has no effect when built with `panic = "abort"`.
    pub catch_panics: bool,
    /// Name attached to trace output for this container.
    pub label: Option<String>,
}

impl NotifyConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the failure reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Fn(&ListenerFailure) + 'static) -> Self {
        self.reporter = Rc::new(reporter);
        self
    }

    /// Set whether listener panics are contained.
    #[must_use]
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Attach a label used in trace output.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            reporter: tracing_reporter(),
            catch_panics: true,
            label: None,
        }
    }
}

impl fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("catch_panics", &self.catch_panics)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
