//! In-memory session store.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

use super::{Result, Session, SessionStore, SessionSummary};

/// Mutex-guarded map of sessions; state dies with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<FxHashMap<String, Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .expect("session map poisoned")
            .get(id)
            .cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .lock()
            .expect("session map poisoned")
            .values()
            .map(SessionSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(summaries)
    }
}
