use std::slice::Iter;

use log::{debug, trace};

use super::errors::Error;

/// How many diagnostics a parse keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticMode {
    /// Keep the first error and stop at the end of the statement that raised it.
    FirstError,
    /// Keep every error, in source order.
    #[default]
    CollectAll,
}

/// Sink for the errors of one parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    mode: DiagnosticMode,
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new(mode: DiagnosticMode) -> Self {
        Diagnostics {
            mode,
            errors: Vec::new(),
        }
    }

    pub fn report(&mut self, error: Error) {
        if self.should_stop() {
            trace!("dropping diagnostic after first error: {}", error);
            return;
        }

        debug!("diagnostic {}: {}", error.get_error_name(), error);
        self.errors.push(error);
    }

    /// True once a `FirstError` sink has its error.
    pub fn should_stop(&self) -> bool {
        self.mode == DiagnosticMode::FirstError && !self.errors.is_empty()
    }

    pub fn mode(&self) -> DiagnosticMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }
}
