//! Playback inclusion policy.
//!
//! Decides which playback formats of a recording a viewer gets links to.

use crate::listing::visibility::Actor;
use crate::logging::structured::LogContext;
use crate::metadata::playback::Playback;
use crate::metadata::values::FieldValue;
use crate::sync::recording::{Recording, RecordingField};
use crate::sync::synchronizer::RecordingSynchronizer;

/// Format only shown to privileged viewers of live recordings.
pub const STATISTICS_PLAYBACK: &str = "statistics";

/// Whether one playback is shown.
///
/// # Decision Tree
/// 1. `restricted = false` -> shown
/// 2. Not the statistics format -> shown
/// 3. Imported recording -> hidden
/// 4. Otherwise shown to moderators and administrators only
pub fn playback_allowed(playback: &Playback, imported: bool, viewer: &Actor) -> bool {
    if playback.restricted == Some(false) {
        return true;
    }
    if playback.kind != STATISTICS_PLAYBACK {
        return true;
    }
    !imported && viewer.is_privileged_viewer()
}

/// Playbacks of `recording` that `viewer` may open. Empty unless published.
pub fn visible_playbacks(
    sync: &RecordingSynchronizer,
    recording: &Recording,
    viewer: &Actor,
    ctx: &LogContext,
) -> Vec<Playback> {
    if sync.get(recording, RecordingField::Published, ctx) != FieldValue::Bool(true) {
        log::debug!(
            "{} PLAYBACKS_HIDDEN reason=unpublished recording={}",
            ctx,
            recording.recording_id()
        );
        return Vec::new();
    }

    let playbacks = match sync.get(recording, RecordingField::Playbacks, ctx) {
        FieldValue::Playbacks(playbacks) => playbacks,
        _ => return Vec::new(),
    };

    let total = playbacks.len();
    let visible: Vec<Playback> = playbacks
        .into_iter()
        .filter(|p| playback_allowed(p, recording.is_imported(), viewer))
        .collect();

    if visible.len() < total {
        log::debug!(
            "{} PLAYBACKS_FILTERED recording={} total={} visible={}",
            ctx,
            recording.recording_id(),
            total,
            visible.len()
        );
    }
    visible
}
