//! Shopper-facing notices.
//!
//! The configurator never renders anything itself; it hands [`Notice`]s to a
//! [`Notifier`] (a toast service, a log, a test recorder).

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Destructive => "destructive",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
        }
    }
}

/// Something that can show a notice to the shopper.
pub trait Notifier {
    fn show(&self, notice: &Notice);
}

/// Records notices in order so a caller can render them afterwards.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every recorded notice, leaving the log empty.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.take()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn show(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}
