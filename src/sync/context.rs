//! Request and activity context.
//!
//! Provides request context for logging and the activity a recording
//! operation targets.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one request into the synchronizer.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub started_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: format!("req-{}", &Uuid::new_v4().simple().to_string()[..8]),
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.request_id)
    }

    /// Log context scoped to one remote recording.
    pub fn recording_context(&self, recording_id: &str) -> LogContext {
        self.log_context().with_recording(recording_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// How an activity presents recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceType {
    /// Room and recordings.
    #[default]
    All,
    /// Room only.
    RoomOnly,
    /// Recordings only, drawn from the whole course.
    RecordingOnly,
}

impl InstanceType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(InstanceType::All),
            1 => Some(InstanceType::RoomOnly),
            2 => Some(InstanceType::RecordingOnly),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            InstanceType::All => 0,
            InstanceType::RoomOnly => 1,
            InstanceType::RecordingOnly => 2,
        }
    }
}

/// The activity a recording belongs to, or is being imported into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityContext {
    pub instance_id: i64,
    pub course_id: i64,
    pub instance_type: InstanceType,
}

impl ActivityContext {
    pub fn new(instance_id: i64, course_id: i64) -> Self {
        Self {
            instance_id,
            course_id,
            instance_type: InstanceType::All,
        }
    }

    pub fn with_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = instance_type;
        self
    }
}
