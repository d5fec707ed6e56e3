use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use command_queue::FlashSource;
use shared::domain::FlashMessage;

/// Pending flash messages per session, kept in memory.
#[derive(Clone, Default)]
pub(crate) struct FlashStore {
    sessions: Arc<Mutex<HashMap<String, Vec<FlashMessage>>>>,
}

impl FlashStore {
    pub(crate) fn push(&self, session: &str, message: FlashMessage) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session.to_string())
            .or_default()
            .push(message);
    }

    pub(crate) fn pending(&self, session: &str) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .map_or(0, Vec::len)
    }

    pub(crate) fn session(&self, session: &str) -> SessionFlash {
        SessionFlash {
            store: self.clone(),
            session: session.to_string(),
        }
    }
}

/// One session's view of the store; draining removes its messages.
pub(crate) struct SessionFlash {
    store: FlashStore,
    session: String,
}

impl FlashSource for SessionFlash {
    fn drain(&mut self) -> Vec<FlashMessage> {
        self.store
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session)
            .unwrap_or_default()
    }
}
