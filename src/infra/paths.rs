// src/infra/paths.rs — Config and data locations
//
// TRIPMATE_HOME, when set, holds both config and data.
// Otherwise config lives in ~/.tripmate/ and data in XDG_DATA_HOME/tripmate.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

fn tripmate_home() -> Option<PathBuf> {
    std::env::var_os("TRIPMATE_HOME").map(PathBuf::from)
}

/// Home directory, falling back to the working directory on exotic systems.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// $TRIPMATE_HOME/ or ~/.tripmate/
pub fn config_dir() -> PathBuf {
    if let Some(home) = tripmate_home() {
        return home;
    }
    dirs_home().join(".tripmate")
}

/// $TRIPMATE_HOME/data/ or ~/.local/share/tripmate/
pub fn data_dir() -> PathBuf {
    if let Some(home) = tripmate_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "tripmate")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

pub fn db_path() -> PathBuf {
    data_dir().join("tripmate.db")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub async fn ensure_dirs() -> anyhow::Result<()> {
    for dir in [config_dir(), data_dir()] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}
