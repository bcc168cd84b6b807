//! Recording set queries.
//!
//! A `RecordingQuery` describes which persisted recordings an activity
//! lists. The same predicate renders as parameterised SQL for SQL-backed
//! stores and evaluates in memory for `InMemoryRecordingStore`.

use crate::storage::models::{RecordingRecord, RecordingStatus};

pub const RECORDINGS_TABLE: &str = "bigbluebuttonbn_recordings";

/// Whether imported recordings take part in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Only the activity's own recordings.
    #[default]
    Exclude,
    /// Own recordings plus recordings imported into the activity.
    Include,
    /// Only recordings imported into the activity.
    Only,
}

/// Scope of the non-imported recordings considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingScope {
    /// Recordings made in one activity.
    Instance(i64),
    /// Every recording made in a course, for recording-only activities.
    Course(i64),
}

/// Bound SQL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingQuery {
    /// Activity the listing is for; imported recordings are bound to it.
    pub instance_id: i64,
    pub scope: RecordingScope,
    pub imported: ImportMode,
    pub include_headless: bool,
    /// Empty means any status.
    pub statuses: Vec<RecordingStatus>,
}

impl RecordingQuery {
    pub fn for_instance(instance_id: i64) -> Self {
        Self {
            instance_id,
            scope: RecordingScope::Instance(instance_id),
            imported: ImportMode::Exclude,
            include_headless: false,
            statuses: RecordingStatus::ALL
                .into_iter()
                .filter(|s| s.is_listable())
                .collect(),
        }
    }

    pub fn course_wide(mut self, course_id: i64) -> Self {
        self.scope = RecordingScope::Course(course_id);
        self
    }

    pub fn imported(mut self, mode: ImportMode) -> Self {
        self.imported = mode;
        self
    }

    pub fn include_headless(mut self, include: bool) -> Self {
        self.include_headless = include;
        self
    }

    pub fn any_status(mut self) -> Self {
        self.statuses.clear();
        self
    }

    fn own_matches(&self, record: &RecordingRecord) -> bool {
        !record.imported
            && match self.scope {
                RecordingScope::Instance(id) => record.instance_id == id,
                RecordingScope::Course(id) => record.course_id == id,
            }
    }

    fn imported_matches(&self, record: &RecordingRecord) -> bool {
        record.imported && record.instance_id == self.instance_id
    }

    /// Evaluate the query predicate against one record.
    pub fn matches(&self, record: &RecordingRecord) -> bool {
        let in_scope = match self.imported {
            ImportMode::Exclude => self.own_matches(record),
            ImportMode::Include => self.own_matches(record) || self.imported_matches(record),
            ImportMode::Only => self.imported_matches(record),
        };
        if !in_scope {
            return false;
        }
        if record.headless && !self.include_headless {
            return false;
        }
        self.statuses.is_empty() || self.statuses.contains(&record.status)
    }

    /// Build the SELECT for this query with `$n` placeholders.
    pub fn to_sql(&self) -> (String, Vec<SqlParam>) {
        let mut params = Vec::new();

        let scope = match self.imported {
            ImportMode::Exclude => self.own_sql(&mut params),
            ImportMode::Include => {
                let own = self.own_sql(&mut params);
                format!("({} OR {})", own, self.imported_sql(&mut params))
            }
            ImportMode::Only => self.imported_sql(&mut params),
        };
        let mut clauses = vec![scope];

        if !self.include_headless {
            clauses.push(format!("headless = {}", bind(&mut params, SqlParam::Bool(false))));
        }

        if !self.statuses.is_empty() {
            let placeholders: Vec<String> = self
                .statuses
                .iter()
                .map(|s| bind(&mut params, SqlParam::Int(s.code())))
                .collect();
            clauses.push(format!("status IN ({})", placeholders.join(", ")));
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY timecreated ASC, id ASC",
            get_recording_columns().join(", "),
            RECORDINGS_TABLE,
            clauses.join(" AND ")
        );
        (sql, params)
    }

    fn own_sql(&self, params: &mut Vec<SqlParam>) -> String {
        let imported = bind(params, SqlParam::Bool(false));
        match self.scope {
            RecordingScope::Instance(id) => format!(
                "(imported = {} AND bigbluebuttonbnid = {})",
                imported,
                bind(params, SqlParam::Int(id))
            ),
            RecordingScope::Course(id) => format!(
                "(imported = {} AND courseid = {})",
                imported,
                bind(params, SqlParam::Int(id))
            ),
        }
    }

    fn imported_sql(&self, params: &mut Vec<SqlParam>) -> String {
        let imported = bind(params, SqlParam::Bool(true));
        format!(
            "(imported = {} AND bigbluebuttonbnid = {})",
            imported,
            bind(params, SqlParam::Int(self.instance_id))
        )
    }
}

/// Append a parameter and return its placeholder.
fn bind(params: &mut Vec<SqlParam>, param: SqlParam) -> String {
    params.push(param);
    format!("${}", params.len())
}

/// Columns of the recordings table, in select order.
pub fn get_recording_columns() -> Vec<&'static str> {
    vec![
        "id",
        "courseid",
        "bigbluebuttonbnid",
        "groupid",
        "recordingid",
        "headless",
        "imported",
        "status",
        "importeddata",
        "timecreated",
        "timemodified",
    ]
}
