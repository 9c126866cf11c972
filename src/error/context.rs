//! Error context attached to failures for logging.

use chrono::{DateTime, Utc};

/// Where and when an error happened.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `"load_exams"`.
    pub operation: String,

    /// Id of the resource the operation targeted (subject, exam, job...).
    pub resource_id: Option<String>,

    /// View-state holder or component that issued the operation.
    pub component: Option<String>,

    /// When the error was observed.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Create a new context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource_id: None,
            component: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the targeted resource id.
    pub fn with_resource(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Set the originating component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// `key=value` rendering for structured logs.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];
        if let Some(ref id) = self.resource_id {
            parts.push(format!("resource={}", id));
        }
        if let Some(ref component) = self.component {
            parts.push(format!("component={}", component));
        }
        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));
        parts.join(" ")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;
        if let Some(ref id) = self.resource_id {
            write!(f, " resource={}", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_resource() {
        let ctx = ErrorContext::new("delete_exam").with_resource("exam-1");
        assert_eq!(ctx.to_string(), "[delete_exam] resource=exam-1");
    }

    #[test]
    fn test_log_string_contains_fields() {
        let ctx = ErrorContext::new("load_exams")
            .with_resource("subj-9")
            .with_component("exam_list");
        let log = ctx.to_log_string();
        assert!(log.contains("operation=load_exams"));
        assert!(log.contains("resource=subj-9"));
        assert!(log.contains("component=exam_list"));
        assert!(log.contains("timestamp="));
    }
}
