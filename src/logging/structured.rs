//! Structured logging utilities.
//!
//! Every log line carries the request id, then the activity and remote
//! recording it concerns when those are known.

use std::fmt;

/// Logging context for one request touching recordings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub request_id: String,
    pub instance_id: Option<i64>,
    pub recording_id: Option<String>,
}

impl LogContext {
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            instance_id: None,
            recording_id: None,
        }
    }

    /// Scope to an activity instance. Clears any recording scope, since a
    /// recording belongs to exactly one activity.
    pub fn with_instance(&self, instance_id: i64) -> Self {
        Self {
            request_id: self.request_id.clone(),
            instance_id: Some(instance_id),
            recording_id: None,
        }
    }

    /// Scope to a remote recording. Headless rows have no remote id yet;
    /// an empty id leaves the context as it is.
    pub fn with_recording(&self, recording_id: &str) -> Self {
        if recording_id.is_empty() {
            return self.clone();
        }
        Self {
            recording_id: Some(recording_id.to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[request={}]", self.request_id)?;
        if let Some(instance_id) = self.instance_id {
            write!(f, " [instance={}]", instance_id)?;
        }
        if let Some(recording_id) = &self.recording_id {
            write!(f, " [recording={}]", recording_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("req-123");
        assert_eq!(format!("{}", ctx), "[request=req-123]");

        let ctx_with_recording = ctx.with_recording("abc-456");
        assert_eq!(
            format!("{}", ctx_with_recording),
            "[request=req-123] [recording=abc-456]"
        );

        let full = ctx.with_instance(7).with_recording("abc-456");
        assert_eq!(
            format!("{}", full),
            "[request=req-123] [instance=7] [recording=abc-456]"
        );
    }

    #[test]
    fn test_with_recording_keeps_request() {
        let ctx = LogContext::new("req-1").with_recording("a").with_recording("b");
        assert_eq!(ctx.request_id, "req-1");
        assert_eq!(ctx.recording_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_recording_id_keeps_context() {
        let ctx = LogContext::new("req-1").with_instance(3);
        assert_eq!(ctx.with_recording(""), ctx);
        assert_eq!(ctx.with_recording("a").with_recording("").recording_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_instance_scope_drops_recording() {
        let ctx = LogContext::new("req-1").with_recording("a").with_instance(9);
        assert_eq!(ctx.instance_id, Some(9));
        assert_eq!(ctx.recording_id, None);
    }
}
