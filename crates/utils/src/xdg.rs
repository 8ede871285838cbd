use std::env;
use std::path::PathBuf;
use todo_core::{APP_DIR_NAME, TASKS_FILE_NAME};

/// XDG Base Directory paths for todo
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_DATA_HOME/todo or fallback
    pub fn data_dir() -> PathBuf {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".local/share"))
                    .unwrap_or_else(|| PathBuf::from(".local/share"))
            })
            .join(APP_DIR_NAME)
    }

    /// Default location of the task snapshot
    pub fn tasks_file() -> PathBuf {
        Self::data_dir().join(TASKS_FILE_NAME)
    }
}
