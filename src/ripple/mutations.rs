//! Optimistic mutation engine for social actions.
//!
//! Every state-changing action follows the same shape: validate
//! preconditions (fail fast, no local mutation), snapshot the affected
//! state verbatim, apply the local effect synchronously, then issue the
//! remote call. A rejected or failed remote call writes the snapshot back,
//! discarding the optimistic edits; a confirmed call leaves the optimistic
//! state as final without a second reconciliation fetch.

use crate::ripple::error::{Result, RippleError};
use crate::ripple::profiles::UserProfile;
use crate::ripple::reactions::{ReactionUsersPaginationState, ReactorEntry, Subject};
use crate::ripple::sync_bus::SyncEvent;
use crate::ripple::taxonomy::is_valid_reaction_type;
use crate::ripple::{Ripple, SocialState};

/// Pre-action state captured for a reaction mutation, restored verbatim on
/// rollback.
struct ReactionSnapshot {
    target_profile: UserProfile,
    target_reactions: Option<ReactionUsersPaginationState>,
}

/// Pre-action state captured for a follow/unfollow mutation.
struct FollowSnapshot {
    me: UserProfile,
    target: UserProfile,
}

impl Ripple {
    /// Reacts to another user with the given reaction type.
    ///
    /// The local effect is applied before any network I/O: the acting user
    /// is moved into the front of the target's list for the new type, a
    /// prior reaction of a different type is withdrawn (count floored at
    /// zero), and page counters are recomputed. The acting user's own
    /// received `reaction_counts` are never touched — reacting is something
    /// a user gives, not receives.
    pub async fn create_user_reaction(
        &self,
        target_user_id: i64,
        reaction_type_id: i64,
    ) -> Result<()> {
        if target_user_id <= 0 {
            return Err(RippleError::Validation(format!(
                "target_user_id must be positive, got {target_user_id}"
            )));
        }
        if !is_valid_reaction_type(reaction_type_id) {
            return Err(RippleError::UnknownReactionType(reaction_type_id));
        }
        let token = self.auth_token()?;

        let (generation, snapshot) = {
            let mut state = self.state.lock().await;
            let me = state
                .profiles
                .current
                .clone()
                .ok_or(RippleError::NotLoggedIn)?;
            if target_user_id == me.id {
                return Err(RippleError::Conflict(
                    "cannot react to yourself".to_string(),
                ));
            }
            let target_profile = state
                .profiles
                .others
                .get(&target_user_id)
                .cloned()
                .ok_or(RippleError::ProfileNotFound)?;

            let snapshot = ReactionSnapshot {
                target_profile,
                target_reactions: state
                    .reactions
                    .state_for(Subject::Other(target_user_id))
                    .cloned(),
            };

            apply_reaction(
                &mut state,
                &me,
                target_user_id,
                reaction_type_id,
                self.config.page_size,
            );
            state.pending_mutations += 1;

            (state.generation, snapshot)
        };

        match self
            .api
            .create_reaction(&token, target_user_id, reaction_type_id)
            .await
        {
            Ok(_ack) => {
                let mut state = self.state.lock().await;
                state.pending_mutations = state.pending_mutations.saturating_sub(1);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    target: "ripple::mutations",
                    "Reaction to user {} rejected, rolling back: {}",
                    target_user_id,
                    e
                );
                let mut state = self.state.lock().await;
                state.pending_mutations = state.pending_mutations.saturating_sub(1);
                if state.generation == generation {
                    restore_reaction_snapshot(&mut state, target_user_id, snapshot);
                }
                Err(e)
            }
        }
    }

    /// Follows another user, optimistically updating both sides' counters.
    pub async fn follow_user(&self, target_user_id: i64) -> Result<()> {
        self.set_follow_state(target_user_id, true).await
    }

    /// Unfollows another user with the reversed counter update.
    pub async fn unfollow_user(&self, target_user_id: i64) -> Result<()> {
        self.set_follow_state(target_user_id, false).await
    }

    async fn set_follow_state(&self, target_user_id: i64, follow: bool) -> Result<()> {
        if target_user_id <= 0 {
            return Err(RippleError::Validation(format!(
                "target_user_id must be positive, got {target_user_id}"
            )));
        }
        let token = self.auth_token()?;

        let (generation, snapshot) = {
            let mut state = self.state.lock().await;
            let me = state
                .profiles
                .current
                .clone()
                .ok_or(RippleError::NotLoggedIn)?;
            if target_user_id == me.id {
                return Err(RippleError::Conflict(
                    "cannot follow yourself".to_string(),
                ));
            }
            let target = state
                .profiles
                .others
                .get(&target_user_id)
                .cloned()
                .ok_or(RippleError::ProfileNotFound)?;
            if target.is_following == follow {
                return Err(RippleError::Conflict(if follow {
                    "already following this user".to_string()
                } else {
                    "not following this user".to_string()
                }));
            }

            let snapshot = FollowSnapshot {
                me: me.clone(),
                target: target.clone(),
            };

            let mut updated_me = me;
            let mut updated_target = target;
            updated_target.is_following = follow;
            if follow {
                updated_target.follows += 1;
                updated_me.followings += 1;
            } else {
                updated_target.follows = updated_target.follows.saturating_sub(1);
                updated_me.followings = updated_me.followings.saturating_sub(1);
            }
            state.profiles.current = Some(updated_me);
            state.profiles.others.insert(target_user_id, updated_target);
            state.pending_mutations += 1;

            (state.generation, snapshot)
        };

        self.sync_bus.publish(SyncEvent::FollowStatusChanged {
            user_id: target_user_id,
            is_following: follow,
        });

        let remote = if follow {
            self.api.follow(&token, target_user_id).await
        } else {
            self.api.unfollow(&token, target_user_id).await
        };

        match remote {
            Ok(()) => {
                // Keep the persisted blob in step with the confirmed counters.
                let current = {
                    let mut state = self.state.lock().await;
                    state.pending_mutations = state.pending_mutations.saturating_sub(1);
                    state.profiles.current.clone()
                };
                if let Some(profile) = current
                    && let Err(e) = self.storage.save_current_profile(&profile)
                {
                    tracing::warn!(
                        target: "ripple::mutations",
                        "Failed to persist profile after follow change: {}",
                        e
                    );
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    target: "ripple::mutations",
                    "Follow-state change for user {} rejected, rolling back: {}",
                    target_user_id,
                    e
                );
                let was_following = snapshot.target.is_following;
                {
                    let mut state = self.state.lock().await;
                    state.pending_mutations = state.pending_mutations.saturating_sub(1);
                    if state.generation == generation {
                        state.profiles.current = Some(snapshot.me);
                        state.profiles.others.insert(target_user_id, snapshot.target);
                    }
                }
                // Re-publish the correction so subscribers converge back.
                self.sync_bus.publish(SyncEvent::FollowStatusChanged {
                    user_id: target_user_id,
                    is_following: was_following,
                });
                Err(e)
            }
        }
    }
}

/// Applies the local effect of a reaction synchronously, before network I/O.
fn apply_reaction(
    state: &mut SocialState,
    me: &UserProfile,
    target_user_id: i64,
    reaction_type_id: i64,
    page_size: u32,
) {
    let subject = Subject::Other(target_user_id);
    let indices = state.index.indices_for(me.id);
    let positions = indices
        .for_subject(subject)
        .cloned()
        .unwrap_or_default();

    let mut stale_index = false;
    let mut already_credited = false;

    // Withdraw a prior reaction of a different type, or detect a same-type
    // entry that only needs to move to the front.
    for (&old_type, &position) in &positions {
        if old_type == reaction_type_id {
            continue;
        }
        if remove_reactor(state, subject, old_type, Some(position), me.id, page_size) {
            decrement_count(state, target_user_id, old_type);
        } else {
            stale_index = true;
        }
    }
    if positions.contains_key(&reaction_type_id) {
        already_credited = true;
    }

    // Each reactor appears at most once per reaction-type list: remove any
    // stale entry in the new type's list before the front insert.
    let same_type_position = positions.get(&reaction_type_id).copied();
    if remove_reactor(state, subject, reaction_type_id, same_type_position, me.id, page_size) {
        // A move within the same list, not a withdrawal: the server-side
        // total is unchanged, so undo the removal's decrement.
        let data = state.reactions.state_mut(subject).entry(reaction_type_id);
        data.total += 1;
        if same_type_position.is_none() {
            // An entry existed that the index didn't know about.
            already_credited = true;
            stale_index = true;
        }
    }

    if !already_credited {
        increment_count(state, target_user_id, reaction_type_id);
    }

    let data = state.reactions.state_mut(subject).entry(reaction_type_id);
    data.users.insert(0, ReactorEntry::from(me));
    data.total = data.users.len().max(data.total as usize) as u64;
    data.recompute_pages(page_size);
    let snapshot = data.clone();
    state.index.patch_list(subject, reaction_type_id, &snapshot);

    if stale_index {
        tracing::warn!(
            target: "ripple::mutations",
            "Stale index detected while reacting to user {}, rebuilding",
            target_user_id
        );
        let SocialState { reactions, index, .. } = state;
        index.rebuild_all(reactions);
    }
}

/// Removes `reactor_id` from one list, verifying the indexed slot before
/// trusting it. Returns true when an entry was actually removed. A position
/// that no longer holds the expected user id falls back to a full scan.
fn remove_reactor(
    state: &mut SocialState,
    subject: Subject,
    reaction_type_id: i64,
    position: Option<usize>,
    reactor_id: i64,
    page_size: u32,
) -> bool {
    let data = state.reactions.state_mut(subject).entry(reaction_type_id);

    let verified = position
        .filter(|&p| data.users.get(p).map(|u| u.user_id) == Some(reactor_id));
    let found = verified.or_else(|| data.users.iter().position(|u| u.user_id == reactor_id));

    let Some(slot) = found else {
        return false;
    };
    data.users.remove(slot);
    data.total = data.total.saturating_sub(1);
    data.recompute_pages(page_size);
    let snapshot = data.clone();
    state.index.patch_list(subject, reaction_type_id, &snapshot);
    true
}

fn decrement_count(state: &mut SocialState, user_id: i64, reaction_type_id: i64) {
    if let Some(profile) = state.profiles.get_profile_mut(user_id)
        && let Some(count) = profile.reaction_counts.get_mut(&reaction_type_id)
    {
        *count = count.saturating_sub(1);
    }
}

fn increment_count(state: &mut SocialState, user_id: i64, reaction_type_id: i64) {
    if let Some(profile) = state.profiles.get_profile_mut(user_id) {
        *profile.reaction_counts.entry(reaction_type_id).or_insert(0) += 1;
    }
}

/// Writes both captured snapshots back verbatim and rebuilds the index,
/// discarding every optimistic edit of the failed action.
fn restore_reaction_snapshot(
    state: &mut SocialState,
    target_user_id: i64,
    snapshot: ReactionSnapshot,
) {
    state
        .profiles
        .others
        .insert(target_user_id, snapshot.target_profile);
    match snapshot.target_reactions {
        Some(reactions) => state
            .reactions
            .restore(Subject::Other(target_user_id), reactions),
        None => state.reactions.reset_subject(Subject::Other(target_user_id)),
    }
    let SocialState { reactions, index, .. } = state;
    index.rebuild_all(reactions);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::ReactionAck;
    use crate::ripple::test_utils::{create_mock_ripple, server_error};

    async fn login_with_target(
        ripple: &Ripple,
        target_id: i64,
    ) -> UserProfile {
        ripple
            .set_current_profile(UserProfile::new(1, "tester"))
            .await
            .unwrap();
        let target = UserProfile::new(target_id, format!("user{target_id}"));
        ripple
            .state
            .lock()
            .await
            .profiles
            .set_profile(target.clone());
        target
    }

    async fn reaction_count(ripple: &Ripple, user_id: i64, reaction_type_id: i64) -> u32 {
        ripple
            .cached_profile(user_id)
            .await
            .unwrap()
            .reaction_counts
            .get(&reaction_type_id)
            .copied()
            .unwrap_or(0)
    }

    async fn reactor_ids(ripple: &Ripple, subject: Subject, reaction_type_id: i64) -> Vec<i64> {
        ripple
            .reaction_pagination(subject, reaction_type_id)
            .await
            .map(|d| d.users.iter().map(|u| u.user_id).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn precondition_failures_have_no_side_effects() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        let before_target = ripple.cached_profile(42).await.unwrap();

        // Non-positive target id.
        let err = ripple.create_user_reaction(0, 1).await.unwrap_err();
        assert!(matches!(err, RippleError::Validation(_)));

        // Unknown reaction type.
        let err = ripple.create_user_reaction(42, 999).await.unwrap_err();
        assert!(matches!(err, RippleError::UnknownReactionType(999)));

        // Self-reaction.
        let err = ripple.create_user_reaction(1, 1).await.unwrap_err();
        assert!(matches!(err, RippleError::Conflict(_)));

        assert_eq!(ripple.cached_profile(42).await.unwrap(), before_target);
        assert_eq!(mock.call_count("create_reaction"), 0);
    }

    #[tokio::test]
    async fn reaction_applies_optimistically_and_is_final_on_success() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        mock.push_reaction_result(Ok(ReactionAck::default()));

        ripple.create_user_reaction(42, 3).await.unwrap();

        assert_eq!(reaction_count(&ripple, 42, 3).await, 1);
        assert_eq!(reactor_ids(&ripple, Subject::Other(42), 3).await, vec![1]);
        assert_eq!(mock.call_count("create_reaction"), 1);
    }

    #[tokio::test]
    async fn switching_reaction_type_moves_the_single_credit() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        mock.push_reaction_result(Ok(ReactionAck::default()));
        mock.push_reaction_result(Ok(ReactionAck::default()));

        ripple.create_user_reaction(42, 1).await.unwrap();
        ripple.create_user_reaction(42, 3).await.unwrap();

        assert_eq!(reaction_count(&ripple, 42, 1).await, 0);
        assert_eq!(reaction_count(&ripple, 42, 3).await, 1);
        assert!(reactor_ids(&ripple, Subject::Other(42), 1).await.is_empty());
        assert_eq!(reactor_ids(&ripple, Subject::Other(42), 3).await, vec![1]);
    }

    #[tokio::test]
    async fn repeated_same_type_reaction_keeps_one_credit() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        for _ in 0..3 {
            mock.push_reaction_result(Ok(ReactionAck::default()));
        }

        for _ in 0..3 {
            ripple.create_user_reaction(42, 2).await.unwrap();
        }

        assert_eq!(reaction_count(&ripple, 42, 2).await, 1);
        assert_eq!(reactor_ids(&ripple, Subject::Other(42), 2).await, vec![1]);
    }

    #[tokio::test]
    async fn reactor_moves_to_front_without_duplication() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;

        // Seed the target's list with other reactors, acting user buried.
        {
            let mut state = ripple.state.lock().await;
            let data = state.reactions.state_mut(Subject::Other(42)).entry(2);
            for id in [5, 1, 6] {
                data.users.push(ReactorEntry {
                    user_id: id,
                    username: format!("user{id}"),
                    nickname: String::new(),
                    avatar: String::new(),
                    is_following: false,
                    is_online: false,
                });
            }
            data.total = 3;
            let snapshot = data.clone();
            state.index.patch_list(Subject::Other(42), 2, &snapshot);
        }
        mock.push_reaction_result(Ok(ReactionAck::default()));

        ripple.create_user_reaction(42, 2).await.unwrap();

        assert_eq!(
            reactor_ids(&ripple, Subject::Other(42), 2).await,
            vec![1, 5, 6]
        );
    }

    #[tokio::test]
    async fn same_type_move_keeps_server_total() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;

        // Only one partial page is loaded; the server knows 40 reactors.
        {
            let mut state = ripple.state.lock().await;
            let data = state.reactions.state_mut(Subject::Other(42)).entry(2);
            for id in [5, 1, 6] {
                data.users.push(ReactorEntry {
                    user_id: id,
                    username: format!("user{id}"),
                    nickname: String::new(),
                    avatar: String::new(),
                    is_following: false,
                    is_online: false,
                });
            }
            data.total = 40;
            let snapshot = data.clone();
            state.index.patch_list(Subject::Other(42), 2, &snapshot);
        }
        for _ in 0..2 {
            mock.push_reaction_result(Ok(ReactionAck::default()));
        }

        for _ in 0..2 {
            ripple.create_user_reaction(42, 2).await.unwrap();
        }

        let data = ripple
            .reaction_pagination(Subject::Other(42), 2)
            .await
            .unwrap();
        assert_eq!(data.total, 40);
        assert_eq!(
            reactor_ids(&ripple, Subject::Other(42), 2).await,
            vec![1, 5, 6]
        );
    }

    #[tokio::test]
    async fn failed_remote_call_rolls_back_exactly() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;

        // Establish a confirmed prior reaction and take a full snapshot.
        mock.push_reaction_result(Ok(ReactionAck::default()));
        ripple.create_user_reaction(42, 1).await.unwrap();

        let profile_before = ripple.cached_profile(42).await.unwrap();
        let lists_before = ripple
            .state
            .lock()
            .await
            .reactions
            .state_for(Subject::Other(42))
            .cloned()
            .unwrap();
        let indices_before = ripple.state.lock().await.index.indices_for(1);

        mock.push_reaction_result(Err(server_error("rejected")));
        let err = ripple.create_user_reaction(42, 3).await.unwrap_err();
        assert!(err.is_remote_failure());

        assert_eq!(ripple.cached_profile(42).await.unwrap(), profile_before);
        assert_eq!(
            ripple
                .state
                .lock()
                .await
                .reactions
                .state_for(Subject::Other(42))
                .cloned()
                .unwrap(),
            lists_before
        );
        assert_eq!(ripple.state.lock().await.index.indices_for(1), indices_before);
    }

    #[tokio::test]
    async fn decode_failure_after_apply_also_rolls_back() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        let profile_before = ripple.cached_profile(42).await.unwrap();

        mock.push_reaction_result(Err(RippleError::Decode("bad shape".to_string())));
        let err = ripple.create_user_reaction(42, 3).await.unwrap_err();
        assert!(matches!(err, RippleError::Decode(_)));

        assert_eq!(ripple.cached_profile(42).await.unwrap(), profile_before);
        assert!(reactor_ids(&ripple, Subject::Other(42), 3).await.is_empty());
    }

    #[tokio::test]
    async fn stale_index_falls_back_to_scan() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;

        // Prior reaction of type 1, then corrupt the index so the recorded
        // position points at a different user.
        mock.push_reaction_result(Ok(ReactionAck::default()));
        ripple.create_user_reaction(42, 1).await.unwrap();
        {
            let mut state = ripple.state.lock().await;
            let data = state.reactions.state_mut(Subject::Other(42)).entry(1);
            data.users.insert(
                0,
                ReactorEntry {
                    user_id: 77,
                    username: "intruder".to_string(),
                    nickname: String::new(),
                    avatar: String::new(),
                    is_following: false,
                    is_online: false,
                },
            );
            // Index still says user 1 sits at position 0.
        }
        mock.push_reaction_result(Ok(ReactionAck::default()));

        ripple.create_user_reaction(42, 3).await.unwrap();

        // The stale slot (user 77) must survive; user 1 moved to type 3.
        assert_eq!(reactor_ids(&ripple, Subject::Other(42), 1).await, vec![77]);
        assert_eq!(reactor_ids(&ripple, Subject::Other(42), 3).await, vec![1]);
        assert_eq!(reaction_count(&ripple, 42, 1).await, 0);
        assert_eq!(reaction_count(&ripple, 42, 3).await, 1);
    }

    #[tokio::test]
    async fn follow_updates_both_counters_and_publishes() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        let mut rx = ripple.sync_bus.subscribe();
        mock.push_follow_result(Ok(()));

        ripple.follow_user(42).await.unwrap();

        let me = ripple.current_profile().await.unwrap();
        let target = ripple.cached_profile(42).await.unwrap();
        assert_eq!(me.followings, 1);
        assert_eq!(target.follows, 1);
        assert!(target.is_following);
        assert_eq!(
            rx.try_recv().unwrap(),
            SyncEvent::FollowStatusChanged {
                user_id: 42,
                is_following: true
            }
        );
    }

    #[tokio::test]
    async fn failed_follow_rolls_back_and_republishes() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        let me_before = ripple.current_profile().await.unwrap();
        let target_before = ripple.cached_profile(42).await.unwrap();
        let mut rx = ripple.sync_bus.subscribe();
        mock.push_follow_result(Err(server_error("nope")));

        let err = ripple.follow_user(42).await.unwrap_err();
        assert!(err.is_remote_failure());

        assert_eq!(ripple.current_profile().await.unwrap(), me_before);
        assert_eq!(ripple.cached_profile(42).await.unwrap(), target_before);

        // Optimistic event followed by the correction.
        assert_eq!(
            rx.try_recv().unwrap(),
            SyncEvent::FollowStatusChanged {
                user_id: 42,
                is_following: true
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SyncEvent::FollowStatusChanged {
                user_id: 42,
                is_following: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reconciliation_defers_while_follow_is_in_flight() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        mock.push_follow_result(Ok(()));
        mock.set_delay(Duration::from_secs(5));

        let follow = {
            let ripple = ripple.clone();
            tokio::spawn(async move { ripple.follow_user(42).await })
        };
        tokio::task::yield_now().await;

        // The remote call is still sleeping; a reconciliation pass now would
        // diff against the server's pre-follow copy and wipe the optimistic
        // counter, so it must back off without fetching.
        ripple.reconcile_current_profile().await;
        assert_eq!(mock.call_count("fetch_profile"), 0);

        follow.await.unwrap().unwrap();
        assert_eq!(ripple.current_profile().await.unwrap().followings, 1);
    }

    #[tokio::test]
    async fn unfollow_reverses_counters_with_floor() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        ripple
            .set_current_profile(UserProfile::new(1, "tester"))
            .await
            .unwrap();
        let mut target = UserProfile::new(42, "user42");
        target.is_following = true;
        // follows intentionally 0: the floor must hold.
        ripple.state.lock().await.profiles.set_profile(target);
        mock.push_follow_result(Ok(()));

        ripple.unfollow_user(42).await.unwrap();

        let target = ripple.cached_profile(42).await.unwrap();
        assert_eq!(target.follows, 0);
        assert!(!target.is_following);
    }

    #[tokio::test]
    async fn duplicate_follow_is_a_conflict() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        mock.push_follow_result(Ok(()));
        ripple.follow_user(42).await.unwrap();

        let err = ripple.follow_user(42).await.unwrap_err();
        assert!(matches!(err, RippleError::Conflict(_)));
        assert_eq!(mock.call_count("follow"), 1);
    }

    #[tokio::test]
    async fn reaction_never_touches_acting_users_received_counts() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        login_with_target(&ripple, 42).await;
        mock.push_reaction_result(Ok(ReactionAck::default()));

        ripple.create_user_reaction(42, 5).await.unwrap();

        let me = ripple.current_profile().await.unwrap();
        assert!(me.reaction_counts.is_empty());
    }
}
