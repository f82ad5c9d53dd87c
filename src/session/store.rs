use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::kernel::state::{SessionId, SessionState};

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence for per-caller conversation state.
pub trait SessionStore {
    /// `Ok(None)` when the session has never been saved.
    fn load(&self, id: SessionId) -> Result<Option<SessionState>, SessionStoreError>;
    fn save(&mut self, state: &SessionState) -> Result<(), SessionStoreError>;
    fn remove(&mut self, id: SessionId) -> Result<(), SessionStoreError>;
}

/// Process-local store; sessions vanish with the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<SessionId, SessionState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: SessionId) -> Result<Option<SessionState>, SessionStoreError> {
        Ok(self.sessions.get(&id).cloned())
    }

    fn save(&mut self, state: &SessionState) -> Result<(), SessionStoreError> {
        self.sessions.insert(state.id, state.clone());
        Ok(())
    }

    fn remove(&mut self, id: SessionId) -> Result<(), SessionStoreError> {
        self.sessions.remove(&id);
        Ok(())
    }
}

/// One pretty-printed JSON file per session: `<dir>/<uuid>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, id: SessionId) -> Result<Option<SessionState>, SessionStoreError> {
        let path = self.path_for(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &SessionState) -> Result<(), SessionStoreError> {
        let content = serde_json::to_string_pretty(state)?;
        let path = self.path_for(state.id);
        fs::write(&path, content)?;
        debug!("Saved session {} to {:?}", state.id, path);
        Ok(())
    }

    fn remove(&mut self, id: SessionId) -> Result<(), SessionStoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
