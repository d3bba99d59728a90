use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::intake::{IntakeError, IntakeSession, IntakeSessionView};

/// Open intake sessions, keyed by id and visible only to their owner.
///
/// Closures passed to [`SessionStore::with_session`] run under the entry's
/// shard lock and must not await.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, IntakeSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: IntakeSession) {
        self.sessions.insert(session.id(), session);
    }

    /// Runs `f` on the caller's session. Sessions owned by someone else are
    /// reported as missing; sessions being submitted are locked.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        user_id: &str,
        f: impl FnOnce(&mut IntakeSession) -> R,
    ) -> Result<R, IntakeError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .filter(|s| s.opened_by() == user_id)
            .ok_or(IntakeError::SessionNotFound(id))?;
        if session.is_submitting() {
            return Err(IntakeError::SubmitInProgress);
        }
        Ok(f(&mut session))
    }

    /// Current view of the caller's session, including one mid-submit.
    pub fn view(&self, id: Uuid, user_id: &str) -> Result<IntakeSessionView, IntakeError> {
        self.sessions
            .get(&id)
            .filter(|s| s.opened_by() == user_id)
            .map(|s| s.view())
            .ok_or(IntakeError::SessionNotFound(id))
    }

    /// Removes the caller's session and hands it over.
    pub fn take(&self, id: Uuid, user_id: &str) -> Result<IntakeSession, IntakeError> {
        if let Some((_, session)) = self
            .sessions
            .remove_if(&id, |_, s| s.opened_by() == user_id && !s.is_submitting())
        {
            return Ok(session);
        }
        match self.sessions.get(&id).filter(|s| s.opened_by() == user_id) {
            Some(_) => Err(IntakeError::SubmitInProgress),
            None => Err(IntakeError::SessionNotFound(id)),
        }
    }

    /// Locks the caller's session for submission.
    ///
    /// The session stays in the store until [`SubmitGuard::complete`]; if the
    /// guard is dropped first the lock is released and the session is left as
    /// it was.
    pub fn begin_submit(&self, id: Uuid, user_id: &str) -> Result<SubmitGuard<'_>, IntakeError> {
        let (snapshot, purchase_order_id) = self.with_session(id, user_id, |s| {
            let purchase_order_id = s.check_submittable()?;
            s.set_submitting(true);
            Ok::<_, IntakeError>((s.clone(), purchase_order_id))
        })??;
        Ok(SubmitGuard {
            store: self,
            snapshot,
            purchase_order_id,
            completed: false,
        })
    }

    fn release(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.set_submitting(false);
        }
    }

    /// Removes every session idle since before `cutoff`. Sessions being
    /// submitted are kept.
    pub fn remove_idle(&self, cutoff: DateTime<Utc>) -> Vec<IntakeSession> {
        let is_stale = |s: &IntakeSession| s.last_activity() < cutoff && !s.is_submitting();
        let stale: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|s| is_stale(s.value()))
            .map(|s| *s.key())
            .collect();

        stale
            .into_iter()
            .filter_map(|id| {
                self.sessions
                    .remove_if(&id, |_, s| is_stale(s))
                    .map(|(_, session)| session)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Submission lock on one session, released on drop.
#[must_use = "dropping the guard releases the submission lock immediately"]
pub struct SubmitGuard<'a> {
    store: &'a SessionStore,
    snapshot: IntakeSession,
    purchase_order_id: Uuid,
    completed: bool,
}

impl SubmitGuard<'_> {
    /// Copy of the session taken when the lock was acquired.
    pub fn session(&self) -> &IntakeSession {
        &self.snapshot
    }

    pub fn purchase_order_id(&self) -> Uuid {
        self.purchase_order_id
    }

    /// Closes the session after a successful commit.
    pub fn complete(mut self) {
        self.completed = true;
        self.store.sessions.remove(&self.snapshot.id());
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.store.release(self.snapshot.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{DeviceEntry, IdentifierKind, TrayAllocator};
    use chrono::Duration;

    fn open(store: &SessionStore, user: &str) -> Uuid {
        let session = IntakeSession::new(IdentifierKind::Serial, TrayAllocator::default(), user);
        let id = session.id();
        store.insert(session);
        id
    }

    fn open_ready(store: &SessionStore, user: &str) -> Uuid {
        let id = open(store, user);
        store
            .with_session(id, user, |s| {
                s.select_purchase_order(Some(Uuid::new_v4()));
                s.push(DeviceEntry::new("SN1"))
            })
            .unwrap()
            .unwrap();
        id
    }

    #[test]
    fn other_users_cannot_see_a_session() {
        let store = SessionStore::new();
        let id = open(&store, "alice");
        assert!(store.with_session(id, "alice", |s| s.len()).is_ok());
        assert_eq!(
            store.with_session(id, "bob", |s| s.len()),
            Err(IntakeError::SessionNotFound(id))
        );
        assert!(store.view(id, "bob").is_err());
        assert!(store.take(id, "bob").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn submit_lock_blocks_changes_until_released() {
        let store = SessionStore::new();
        let id = open_ready(&store, "alice");

        let guard = store.begin_submit(id, "alice").unwrap();
        assert_eq!(guard.session().len(), 1);
        assert_eq!(
            store.with_session(id, "alice", |s| s.push(DeviceEntry::new("SN2"))),
            Err(IntakeError::SubmitInProgress)
        );
        assert_eq!(store.take(id, "alice").err(), Some(IntakeError::SubmitInProgress));
        assert_eq!(
            store.begin_submit(id, "alice").err(),
            Some(IntakeError::SubmitInProgress)
        );
        assert_eq!(store.view(id, "alice").map(|v| v.devices.len()), Ok(1));

        drop(guard);
        assert_eq!(store.with_session(id, "alice", |s| s.len()), Ok(1));
    }

    #[test]
    fn completed_submit_closes_the_session() {
        let store = SessionStore::new();
        let id = open_ready(&store, "alice");
        store.begin_submit(id, "alice").unwrap().complete();
        assert!(store.is_empty());
    }

    #[test]
    fn begin_submit_checks_preconditions_without_locking() {
        let store = SessionStore::new();
        let id = open(&store, "alice");
        assert_eq!(
            store.begin_submit(id, "alice").err(),
            Some(IntakeError::MissingPurchaseOrder)
        );
        assert_eq!(store.with_session(id, "alice", |s| s.is_submitting()), Ok(false));
    }

    #[test]
    fn idle_sessions_are_removed() {
        let store = SessionStore::new();
        let id = open(&store, "alice");
        assert!(store.remove_idle(Utc::now() - Duration::hours(1)).is_empty());
        let removed = store.remove_idle(Utc::now() + Duration::seconds(1));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), id);
        assert!(store.is_empty());
    }

    #[test]
    fn idle_sweep_skips_sessions_being_submitted() {
        let store = SessionStore::new();
        let id = open_ready(&store, "alice");
        let _guard = store.begin_submit(id, "alice").unwrap();
        assert!(store.remove_idle(Utc::now() + Duration::seconds(1)).is_empty());
        assert_eq!(store.len(), 1);
    }
}
