//! # Session Store Module
//!
//! Holds the in-progress booking of every chat. The store is a teloxide
//! dialogue [`Storage`], so the conversation reads and writes it through a
//! [`Dialogue`](teloxide::dispatching::dialogue::Dialogue) and any other
//! teloxide storage can take its place.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::BoxFuture;
use teloxide::dispatching::dialogue::{ErasedStorage, Storage};
use teloxide::types::ChatId;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dialogue::BookingState;

/// Type-erased session storage the booking flow runs on
pub type SessionStorage = ErasedStorage<BookingState>;

#[derive(Debug, Clone)]
struct StoredSession {
    state: BookingState,
    touched_at: Instant,
}

/// Process-memory session store with optional idle expiry
///
/// Every operation touches a single key, which `DashMap` performs atomically.
/// A session that has not been written for longer than the TTL reads as
/// absent and is removed on access or by [`InMemorySessionStore::purge_expired`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<ChatId, StoredSession>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, session: &StoredSession, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(session.touched_at) >= ttl,
            None => false,
        }
    }

    fn load(&self, chat_id: ChatId) -> Option<BookingState> {
        let now = Instant::now();
        let expired = self
            .sessions
            .remove_if(&chat_id, |_, session| self.is_expired(session, now))
            .is_some();
        if expired {
            debug!(chat_id = %chat_id, "Booking session expired");
            return None;
        }
        self.sessions
            .get(&chat_id)
            .map(|session| session.state.clone())
    }

    fn save(&self, chat_id: ChatId, state: BookingState) {
        self.sessions.insert(
            chat_id,
            StoredSession {
                state,
                touched_at: Instant::now(),
            },
        );
    }

    /// Remove every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !self.is_expired(session, now));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!(purged, "Purged expired booking sessions");
        }
        purged
    }
}

impl Storage<BookingState> for InMemorySessionStore {
    type Error = Infallible;

    /// Removing a chat without a session is not an error
    fn remove_dialogue(
        self: Arc<Self>,
        chat_id: ChatId,
    ) -> BoxFuture<'static, Result<(), Self::Error>> {
        Box::pin(async move {
            self.sessions.remove(&chat_id);
            Ok(())
        })
    }

    fn update_dialogue(
        self: Arc<Self>,
        chat_id: ChatId,
        dialogue: BookingState,
    ) -> BoxFuture<'static, Result<(), Self::Error>> {
        Box::pin(async move {
            self.save(chat_id, dialogue);
            Ok(())
        })
    }

    fn get_dialogue(
        self: Arc<Self>,
        chat_id: ChatId,
    ) -> BoxFuture<'static, Result<Option<BookingState>, Self::Error>> {
        Box::pin(async move { Ok(self.load(chat_id)) })
    }
}

/// Upper bound on the pause between two expiry sweeps
const MAX_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Periodically drop abandoned sessions. Returns `None` when the store has no TTL.
pub fn spawn_session_purger(store: Arc<InMemorySessionStore>) -> Option<JoinHandle<()>> {
    let ttl = store.ttl()?;
    let period = ttl.clamp(Duration::from_secs(1), MAX_PURGE_INTERVAL);

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            store.purge_expired();
        }
    }))
}
