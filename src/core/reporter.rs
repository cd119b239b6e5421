//! Warning sink used by the core.
//!
//! The core never prints. Callers pass a [`Reporter`] and decide where
//! warnings end up.

use std::cell::RefCell;

pub trait Reporter {
    fn warn(&self, message: &str);
}

/// Drops every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn warn(&self, _message: &str) {}
}

/// Keeps warnings in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: RefCell<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages.into_inner()
    }
}

impl Reporter for CollectingReporter {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
