use std::collections::HashMap;

use sticker_layout::{CancelToken, Session};
use tokio::task::JoinHandle;

use crate::{SessionId, WorkerError};

/// A spawned rasterization and the token that stops it
struct RasterTask {
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Open sessions and their in-flight rasterizations
#[derive(Default)]
pub(crate) struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    in_flight: HashMap<SessionId, RasterTask>,
    next_id: u64,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub(crate) fn insert(&mut self, session: Session) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, session);
        id
    }

    pub(crate) fn get(&self, id: SessionId) -> Result<&Session, WorkerError> {
        self.sessions
            .get(&id)
            .ok_or(WorkerError::UnknownSession(id))
    }

    pub(crate) fn get_mut(&mut self, id: SessionId) -> Result<&mut Session, WorkerError> {
        self.sessions
            .get_mut(&id)
            .ok_or(WorkerError::UnknownSession(id))
    }

    pub(crate) fn remove(&mut self, id: SessionId) -> Result<Session, WorkerError> {
        self.cancel_raster(id);
        self.sessions
            .remove(&id)
            .ok_or(WorkerError::UnknownSession(id))
    }

    /// Track a spawned rasterization, cancelling any older one for the session
    pub(crate) fn track_raster(
        &mut self,
        id: SessionId,
        cancel: CancelToken,
        handle: JoinHandle<()>,
    ) {
        if let Some(previous) = self.in_flight.insert(id, RasterTask { cancel, handle }) {
            if !previous.handle.is_finished() {
                log::debug!("Superseding in-flight raster for {id}");
                previous.cancel.cancel();
            }
        }
    }

    /// Cancel the session's in-flight rasterization, if any.
    ///
    /// Returns `false` when nothing was running, including a job that has
    /// already delivered its result.
    pub(crate) fn cancel_raster(&mut self, id: SessionId) -> bool {
        self.prune_finished(id);
        match self.in_flight.remove(&id) {
            Some(task) => {
                task.cancel.cancel();
                true
            }
            None => false,
        }
    }

    fn prune_finished(&mut self, id: SessionId) {
        if self
            .in_flight
            .get(&id)
            .is_some_and(|task| task.handle.is_finished())
        {
            self.in_flight.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: SessionId = SessionId(1);

    fn raster_in_flight(store: &mut SessionStore) -> bool {
        store.prune_finished(SESSION);
        store.in_flight.contains_key(&SESSION)
    }

    async fn wait_until_finished(store: &mut SessionStore) {
        for _ in 0..100 {
            if !raster_in_flight(store) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("raster task never finished");
    }

    #[tokio::test]
    async fn test_finished_raster_is_not_cancelled() {
        let mut store = SessionStore::new();
        let cancel = CancelToken::new();
        store.track_raster(SESSION, cancel.clone(), tokio::spawn(async {}));

        wait_until_finished(&mut store).await;
        assert!(!store.cancel_raster(SESSION));
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_running_raster_is_cancelled() {
        let mut store = SessionStore::new();
        let cancel = CancelToken::new();
        let handle = tokio::spawn(std::future::pending::<()>());
        store.track_raster(SESSION, cancel.clone(), handle);

        assert!(raster_in_flight(&mut store));
        assert!(store.cancel_raster(SESSION));
        assert!(cancel.is_cancelled());
        assert!(!raster_in_flight(&mut store));
    }

    #[tokio::test]
    async fn test_new_raster_supersedes_running_one() {
        let mut store = SessionStore::new();
        let first = CancelToken::new();
        store.track_raster(SESSION, first.clone(), tokio::spawn(std::future::pending::<()>()));

        let second = CancelToken::new();
        store.track_raster(SESSION, second.clone(), tokio::spawn(std::future::pending::<()>()));

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }
}
