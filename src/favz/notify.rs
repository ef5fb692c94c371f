//! The notification point between the store and whatever UI sits on top.
//!
//! The store never renders anything. When recovery kicks in or a write fails it
//! calls [`Notifier::notify`] with a message and a [`Severity`]; the UI decides
//! how to surface it (toast, status line, coloured terminal output).

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

impl<F: Fn(&str, Severity)> Notifier for F {
    fn notify(&self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// Drops every notification. The store still logs them through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Buffers notifications so a caller can collect them after an operation.
///
/// Clones share the same buffer: hand one to the store, keep one to drain.
#[derive(Debug, Default, Clone)]
pub struct NoticeLog {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, message: &str, severity: Severity) {
        self.notices.borrow_mut().push(Notice {
            severity,
            message: message.to_string(),
        });
    }
}
