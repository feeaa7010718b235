//! Device connection store
//!
//! Observable connection state for the paired water sensor. The store is a
//! plain value handed to whoever needs it, so the live-reading loop can be
//! driven from tests without any UI.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

/// Errors from pairing or persisting the device id
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device id must not be empty")]
    EmptyId,

    #[error("Device id storage error: {0}")]
    Storage(#[from] io::Error),
}

/// Snapshot of the connection state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Whether a sensor is connected
    pub is_connected: bool,
    /// Id of the paired sensor, if any
    pub device_id: Option<String>,
}

/// Persistent storage for the paired device id
pub trait DeviceIdStore: Send + Sync {
    /// Stored id, if any
    fn load(&self) -> io::Result<Option<String>>;
    /// Persist `id`, replacing any previous one
    fn save(&self, id: &str) -> io::Result<()>;
    /// Forget the stored id
    fn delete(&self) -> io::Result<()>;
}

/// In-memory id store
#[derive(Debug, Default)]
pub struct MemoryDeviceIdStore {
    id: Mutex<Option<String>>,
}

impl MemoryDeviceIdStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `id`
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Mutex::new(Some(id.into())),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.id
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "device id store poisoned"))
    }
}

impl DeviceIdStore for MemoryDeviceIdStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, id: &str) -> io::Result<()> {
        *self.lock()? = Some(id.to_string());
        Ok(())
    }

    fn delete(&self) -> io::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Id store backed by a single file
#[derive(Debug, Clone)]
pub struct FileDeviceIdStore {
    path: PathBuf,
}

impl FileDeviceIdStore {
    /// Default file name inside an app data directory
    pub const FILE_NAME: &'static str = "device_id";

    /// Store the id in `dir/device_id`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceIdStore for FileDeviceIdStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let id = content.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, id: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id)
    }

    fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Shared, observable device connection state
#[derive(Debug, Clone)]
pub struct DeviceStore {
    tx: Arc<watch::Sender<DeviceState>>,
}

impl DeviceStore {
    /// Disconnected store with no paired device
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DeviceState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Current state
    pub fn state(&self) -> DeviceState {
        self.tx.borrow().clone()
    }

    /// Whether a sensor is connected
    pub fn is_connected(&self) -> bool {
        self.tx.borrow().is_connected
    }

    /// Id of the paired sensor
    pub fn device_id(&self) -> Option<String> {
        self.tx.borrow().device_id.clone()
    }

    /// Watch for state changes
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.tx.subscribe()
    }

    /// Record the paired device id
    pub fn set_device_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.tx.send_if_modified(|state| {
            if state.device_id.as_deref() == Some(id.as_str()) {
                return false;
            }
            state.device_id = Some(id);
            true
        });
    }

    /// Mark the device connected or disconnected. Subscribers are only woken
    /// on an actual change.
    pub fn set_connected(&self, connected: bool) {
        let changed = self.tx.send_if_modified(|state| {
            if state.is_connected == connected {
                return false;
            }
            state.is_connected = connected;
            true
        });
        if changed {
            debug!(connected, "device connection changed");
        }
    }

    /// Disconnect and forget the device id
    pub fn reset(&self) {
        self.tx.send_if_modified(|state| {
            if *state == DeviceState::default() {
                return false;
            }
            *state = DeviceState::default();
            true
        });
    }

    /// Restore the paired device on startup. Connected iff an id was stored.
    pub fn initialize_from(&self, store: &dyn DeviceIdStore) -> Result<bool, DeviceError> {
        match store.load()? {
            Some(id) => {
                info!(device_id = %id, "restored paired device");
                self.set_device_id(id);
                self.set_connected(true);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pair with `id`: persist it, then mark connected
    pub fn pair(&self, id: &str, store: &dyn DeviceIdStore) -> Result<(), DeviceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DeviceError::EmptyId);
        }
        store.save(id)?;
        self.set_device_id(id);
        self.set_connected(true);
        info!(device_id = %id, "device paired");
        Ok(())
    }

    /// Forget the device on logout: delete the stored id and reset
    pub fn forget(&self, store: &dyn DeviceIdStore) -> Result<(), DeviceError> {
        store.delete()?;
        self.reset();
        info!("device forgotten");
        Ok(())
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}
