//! Failure reporters.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;
use type_explorer_sdk::{FailureReporter, LoadFailure};

/// Reports failures as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureReporter;

impl FailureReporter for TracingFailureReporter {
    fn report_failed_operation(&self, operation: &str, failure: &LoadFailure) {
        error!(
            operation,
            error = %failure,
            transport = failure.is_transport(),
            "operation failed"
        );
    }
}

/// One call to [`FailureReporter::report_failed_operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedFailure {
    pub operation: String,
    pub failure: LoadFailure,
}

/// Keeps every reported failure in memory, optionally forwarding to another reporter.
#[derive(Default)]
pub struct RecordingFailureReporter {
    failures: Mutex<Vec<ReportedFailure>>,
    forward: Option<Arc<dyn FailureReporter>>,
}

impl RecordingFailureReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records failures and also passes them on to `next`.
    #[must_use]
    pub fn forwarding_to(next: Arc<dyn FailureReporter>) -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
            forward: Some(next),
        }
    }

    /// Failures reported so far, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<ReportedFailure> {
        self.failures.lock().clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Removes and returns the recorded failures.
    pub fn drain(&self) -> Vec<ReportedFailure> {
        std::mem::take(&mut *self.failures.lock())
    }
}

impl FailureReporter for RecordingFailureReporter {
    fn report_failed_operation(&self, operation: &str, failure: &LoadFailure) {
        self.failures.lock().push(ReportedFailure {
            operation: operation.to_owned(),
            failure: failure.clone(),
        });
        if let Some(next) = &self.forward {
            next.report_failed_operation(operation, failure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use type_explorer_sdk::FetchError;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingFailureReporter::new();
        assert!(reporter.is_empty());

        reporter.report_failed_operation("get types for server", &LoadFailure::MissingTypeExplorer);
        reporter.report_failed_operation(
            "get types for server",
            &LoadFailure::from(FetchError::transport("refused")),
        );

        let failures = reporter.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].failure, LoadFailure::MissingTypeExplorer);
        assert!(failures[1].failure.is_transport());

        assert_eq!(reporter.drain().len(), 2);
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_recording_reporter_forwards() {
        let inner = Arc::new(RecordingFailureReporter::new());
        let outer = RecordingFailureReporter::forwarding_to(inner.clone());

        outer.report_failed_operation("get types for server", &LoadFailure::MissingTypeExplorer);

        assert_eq!(outer.failures(), inner.failures());
    }

    #[traced_test]
    #[test]
    fn test_tracing_reporter_logs_operation() {
        TracingFailureReporter.report_failed_operation(
            "get types for server",
            &LoadFailure::UnexpectedStatus {
                code: 404,
                exception_class: Some("InvalidParameterException".to_owned()),
                message: Some("server not known".to_owned()),
            },
        );

        assert!(logs_contain("get types for server"));
        assert!(logs_contain("server not known"));
        assert!(logs_contain("InvalidParameterException"));
    }
}
