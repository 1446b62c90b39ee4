//! Application context: every component constructed once at startup and
//! handed around explicitly. There is no global state in this crate.

use std::path::PathBuf;
use std::sync::Arc;

use directories::ProjectDirs;

use crate::ai::ChatClient;
use crate::config::{ConfigStore, CONFIG_FILE_NAME};
use crate::db::Database;
use crate::error::Result;
use crate::storage::AttachmentStore;

pub const DB_FILE_NAME: &str = "eaiser.db";

pub struct App {
    pub db: Database,
    pub config: Arc<ConfigStore>,
    pub attachments: AttachmentStore,
    pub chat: ChatClient,
}

impl App {
    /// Wires everything up under the installation directory: `eaiser.db`,
    /// `eaiser.config.json`, and the `pdf/`/`images/` storage roots all live
    /// beside the executable.
    pub fn init() -> Result<Self> {
        Self::init_at(install_dir())
    }

    pub fn init_at(base: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base)?;

        let db = Database::open(&base.join(DB_FILE_NAME))?;
        db.migrate()?;

        let config = Arc::new(ConfigStore::load(base.join(CONFIG_FILE_NAME)));
        let attachments = AttachmentStore::new(&base);
        let chat = ChatClient::new(config.clone())?;

        Ok(Self {
            db,
            config,
            attachments,
            chat,
        })
    }
}

/// Directory the executable lives in, or the platform data dir when the
/// executable path cannot be resolved.
fn install_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.to_path_buf();
        }
    }
    ProjectDirs::from("", "", "eaiser")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
