//! Progress reporting
//!
//! The resolver and the replacer narrate what they do as a stream of
//! [`ProgressEvent`]s written synchronously, in call order, to a
//! [`ProgressSink`] supplied by the caller.

use std::fmt;

/// How a progress line should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Plain informational line
    Normal,
    /// A step completed
    Success,
    /// Something was skipped or degraded
    Warning,
    /// Terminal failure
    Error,
}

/// A single human-readable progress line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Message text
    pub message: String,
    /// Presentation severity
    pub severity: Severity,
}

impl ProgressEvent {
    /// Create a new event
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver of progress events
pub trait ProgressSink {
    /// Deliver one event
    fn emit(&mut self, event: ProgressEvent);
}

impl dyn ProgressSink + '_ {
    /// Emit a [`Severity::Normal`] event
    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(ProgressEvent::new(message, Severity::Normal));
    }

    /// Emit a [`Severity::Success`] event
    pub fn success(&mut self, message: impl Into<String>) {
        self.emit(ProgressEvent::new(message, Severity::Success));
    }

    /// Emit a [`Severity::Warning`] event
    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(ProgressEvent::new(message, Severity::Warning));
    }
}

impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}
