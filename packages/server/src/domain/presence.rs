//! Presence registry: which users currently hold a live connection.
//!
//! The registry is an ordered list of [`ConnectedUser`] entries with at most
//! one entry per user. It owns no durable data and starts empty on every
//! process start; reconnecting clients simply register again.

use super::{
    entity::ConnectedUser,
    value_object::{SessionId, UserId},
};

/// What happens when a user registers while already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReregistrationPolicy {
    /// The new session replaces the old one, keeping the entry's position.
    #[default]
    Replace,
    /// The first registered session stays; later registrations are ignored
    /// until that session disconnects.
    FirstWins,
}

/// Result of [`PresenceRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new entry was appended.
    Added,
    /// The user's existing entry now points at the new session.
    Replaced { previous: SessionId },
    /// The registry was left unchanged.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    entries: Vec<ConnectedUser>,
    policy: ReregistrationPolicy,
}

impl PresenceRegistry {
    pub fn new(policy: ReregistrationPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ReregistrationPolicy {
        self.policy
    }

    /// Register `user_id` on `session_id`.
    ///
    /// Registering the same pair twice is always a no-op.
    pub fn register(&mut self, user_id: UserId, session_id: SessionId) -> RegisterOutcome {
        let Some(index) = self.entries.iter().position(|e| e.user_id == user_id) else {
            self.entries.push(ConnectedUser::new(user_id, session_id));
            return RegisterOutcome::Added;
        };

        let existing = &mut self.entries[index];
        if existing.session_id == session_id {
            return RegisterOutcome::Unchanged;
        }

        match self.policy {
            ReregistrationPolicy::Replace => {
                let previous = std::mem::replace(&mut existing.session_id, session_id);
                RegisterOutcome::Replaced { previous }
            }
            ReregistrationPolicy::FirstWins => RegisterOutcome::Unchanged,
        }
    }

    /// Remove the entries bound to `session_id`.
    ///
    /// Matching is by session, never by user: a disconnect only ever removes
    /// the entry its own connection created.
    pub fn unregister(&mut self, session_id: &SessionId) -> Vec<ConnectedUser> {
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if &entry.session_id == session_id {
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn session_of(&self, user_id: UserId) -> Option<&SessionId> {
        self.entries
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| &e.session_id)
    }

    pub fn entries(&self) -> &[ConnectedUser] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<ConnectedUser> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
