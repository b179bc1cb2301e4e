//! Session snapshot persistence
//!
//! One JSON document under one fixed key holds everything worth restoring
//! between sessions: the input text, the custom instruction, the last
//! output, and the directive selections. The format is forward tolerant - missing fields
//! default, unknown directive keys are ignored on restore - because the
//! catalog changes between releases while old snapshots linger.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed storage key for the session snapshot
pub const SNAPSHOT_KEY: &str = "session-v1";

/// One persisted directive selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectiveSelection {
    #[serde(rename = "value")]
    pub key: String,
    #[serde(rename = "checked")]
    pub active: bool,
}

/// The serialized unit of session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    #[serde(rename = "text")]
    pub input_text: String,

    #[serde(rename = "custom")]
    pub custom_instruction: String,

    #[serde(rename = "output")]
    pub raw_output: String,

    #[serde(rename = "switches")]
    pub directive_selections: Vec<DirectiveSelection>,
}

/// Key-value storage capability, injected so tests can use an in-memory fake
pub trait StateStorage: Send {
    /// Read the value stored under `key`, if present
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`; returns false when the write failed
    fn write(&mut self, key: &str, value: &str) -> bool;
}

/// File-backed storage: one `<key>.json` file per key under a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> bool {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "write: cannot create storage directory");
            return false;
        }
        match fs::write(self.path_for(key), value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "write: failed to persist snapshot");
                false
            }
        }
    }
}

/// Reads and writes the session snapshot
///
/// The store owns no session state; the orchestrator asks it to save after
/// each state-changing user action and to load once at startup.
pub struct SessionStore {
    storage: Box<dyn StateStorage>,
    key: &'static str,
}

impl SessionStore {
    pub fn new(storage: Box<dyn StateStorage>) -> Self {
        Self {
            storage,
            key: SNAPSHOT_KEY,
        }
    }

    /// Load the persisted snapshot
    ///
    /// A missing key or a malformed payload both yield `None` - a corrupt
    /// snapshot means "no prior session", never a fatal error.
    pub fn load(&self) -> Option<SessionSnapshot> {
        let raw = self.storage.read(self.key)?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => {
                debug!("load: restored session snapshot");
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "load: malformed snapshot, starting fresh");
                None
            }
        }
    }

    /// Persist the snapshot; failures are logged, never raised
    pub fn save(&mut self, snapshot: &SessionSnapshot) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "save: failed to serialize snapshot");
                return;
            }
        };
        if self.storage.write(self.key, &payload) {
            debug!("save: snapshot persisted");
        }
    }
}
