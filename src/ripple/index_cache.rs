//! Secondary indices over the reaction-list collections.
//!
//! Maps a reactor's user id to its position inside every paginated
//! reactor list it appears in, so the mutation engine can move a user
//! between reaction-type lists in O(1) instead of scanning every tracked
//! subject's lists. Positions are rebuilt after any full list replace and
//! patched per-list after single-item edits.
//!
//! An index value is a hint, not a guarantee: consumers must verify the
//! referenced slot still holds the expected user id before mutating it and
//! fall back to a scan plus rebuild when the check fails.

use std::collections::HashMap;

use crate::ripple::reactions::{PaginationData, ReactionStore, Subject};

/// Positions of one reactor across all tracked lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactorIndices {
    /// reaction_type_id -> position in the current user's list of that type.
    pub in_current_user_lists: HashMap<i64, usize>,
    /// subject user id -> (reaction_type_id -> position) for other subjects.
    pub in_other_user_lists: HashMap<i64, HashMap<i64, usize>>,
}

impl ReactorIndices {
    pub fn is_empty(&self) -> bool {
        self.in_current_user_lists.is_empty() && self.in_other_user_lists.is_empty()
    }

    /// The reactor's positions within a given subject's lists.
    pub fn for_subject(&self, subject: Subject) -> Option<&HashMap<i64, usize>> {
        match subject {
            Subject::CurrentUser => {
                if self.in_current_user_lists.is_empty() {
                    None
                } else {
                    Some(&self.in_current_user_lists)
                }
            }
            Subject::Other(id) => self.in_other_user_lists.get(&id),
        }
    }
}

#[derive(Default)]
pub(crate) struct IndexCache {
    by_reactor: HashMap<i64, ReactorIndices>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every index from scratch. Required after any full collection
    /// replace; a stale index must never survive one.
    pub fn rebuild_all(&mut self, store: &ReactionStore) {
        self.by_reactor.clear();
        store.for_each_list(|subject, reaction_type_id, data| {
            self.index_list(subject, reaction_type_id, data);
        });
    }

    /// Re-indexes a single (subject, reaction type) list after it was loaded
    /// or mutated, leaving every other list's entries untouched.
    pub fn patch_list(&mut self, subject: Subject, reaction_type_id: i64, data: &PaginationData) {
        self.drop_list(subject, reaction_type_id);
        self.index_list(subject, reaction_type_id, data);
    }

    /// O(1) position lookup for a reactor.
    pub fn indices_for(&self, reactor_id: i64) -> ReactorIndices {
        self.by_reactor.get(&reactor_id).cloned().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.by_reactor.clear();
    }

    fn index_list(&mut self, subject: Subject, reaction_type_id: i64, data: &PaginationData) {
        for (position, entry) in data.users.iter().enumerate() {
            let indices = self.by_reactor.entry(entry.user_id).or_default();
            match subject {
                Subject::CurrentUser => {
                    indices.in_current_user_lists.insert(reaction_type_id, position);
                }
                Subject::Other(subject_id) => {
                    indices
                        .in_other_user_lists
                        .entry(subject_id)
                        .or_default()
                        .insert(reaction_type_id, position);
                }
            }
        }
    }

    fn drop_list(&mut self, subject: Subject, reaction_type_id: i64) {
        self.by_reactor.retain(|_, indices| {
            match subject {
                Subject::CurrentUser => {
                    indices.in_current_user_lists.remove(&reaction_type_id);
                }
                Subject::Other(subject_id) => {
                    let now_empty = indices
                        .in_other_user_lists
                        .get_mut(&subject_id)
                        .map(|per_type| {
                            per_type.remove(&reaction_type_id);
                            per_type.is_empty()
                        })
                        .unwrap_or(false);
                    if now_empty {
                        indices.in_other_user_lists.remove(&subject_id);
                    }
                }
            }
            !indices.is_empty()
        });
    }
}
