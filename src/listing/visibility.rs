//! Group visibility rules.
//!
//! Recordings with `groupid = 0` are visible to every enrolled actor.
//! Group-scoped recordings are visible to members of that group and to
//! actors who manage recordings.

use std::collections::HashSet;

/// The user a listing is computed for, with the permission checks already
/// resolved by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub groups: HashSet<i64>,
    /// May see and manage recordings of every group.
    pub can_manage_recordings: bool,
    pub is_moderator: bool,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn in_groups<I: IntoIterator<Item = i64>>(mut self, groups: I) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn manager(mut self) -> Self {
        self.can_manage_recordings = true;
        self
    }

    pub fn moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn is_member(&self, group_id: i64) -> bool {
        self.groups.contains(&group_id)
    }

    /// Group-scoped content outside the actor's own groups is visible.
    pub fn sees_all_groups(&self) -> bool {
        self.can_manage_recordings || self.is_admin
    }

    /// Moderators and administrators see restricted playback formats.
    pub fn is_privileged_viewer(&self) -> bool {
        self.is_moderator || self.is_admin
    }
}

/// Whether a recording scoped to `group_id` is visible to `actor`.
///
/// With a group filter only recordings of that group qualify, and only
/// when the actor may see the group at all.
pub fn is_visible(group_id: i64, actor: &Actor, group_filter: Option<i64>) -> bool {
    if let Some(filter) = group_filter {
        if group_id != filter {
            return false;
        }
    }
    group_id == 0 || actor.sees_all_groups() || actor.is_member(group_id)
}
