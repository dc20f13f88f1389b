use crate::app_dirs::AppDirs;
use crate::session::SessionConfig;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::warn;

/// Where session settings live between runs
pub trait ConfigStore {
    /// `None` when nothing has ever been stored
    fn load(&self) -> Option<SessionConfig>;
    fn save(&self, cfg: &SessionConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Option<SessionConfig> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice::<SessionConfig>(&bytes) {
            Ok(cfg) => Some(cfg.sanitized()),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn save(&self, cfg: &SessionConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    slot: Rc<RefCell<Option<SessionConfig>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: SessionConfig) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(cfg))),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Option<SessionConfig> {
        *self.slot.borrow()
    }

    fn save(&self, cfg: &SessionConfig) -> std::io::Result<()> {
        *self.slot.borrow_mut() = Some(*cfg);
        Ok(())
    }
}
