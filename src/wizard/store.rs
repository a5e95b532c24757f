use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::wizard::WizardSession;

/// In-memory wizard sessions, one per in-progress booking draft. A
/// draft never outlives the process; the server-owned booking does.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<WizardSession>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        &self,
        estimate_debounce: Duration,
        lookup_debounce: Duration,
    ) -> (Uuid, Arc<Mutex<WizardSession>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(WizardSession::new(
            id,
            estimate_debounce,
            lookup_debounce,
        )));
        self.inner.write().await.insert(id, Arc::clone(&session));
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<WizardSession>>> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Drops an abandoned draft (e.g. after a payment redirect).
    pub async fn remove(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_returns_the_same_session() {
        let store = SessionStore::new();
        let (id, _) = store
            .create(Duration::from_millis(1), Duration::from_millis(1))
            .await;
        assert!(store.get(id).await.is_some());

        store.remove(id).await;
        assert!(store.get(id).await.is_none());
    }
}
