// src/infra/paths.rs — Path management
//
// All paths respect the TILLER_HOME environment variable for isolation.
// When TILLER_HOME is set, config and data live under that directory.
// When unset, config uses ~/.tiller/ and data uses the platform data dir.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "tiller").expect("Could not determine home directory")
    })
}

/// Returns the TILLER_HOME override, if set.
fn tiller_home() -> Option<PathBuf> {
    std::env::var_os("TILLER_HOME").map(PathBuf::from)
}

/// Configuration directory: $TILLER_HOME/ or ~/.tiller/
pub fn config_dir() -> PathBuf {
    if let Some(home) = tiller_home() {
        return home;
    }
    dirs_home().join(".tiller")
}

/// Data directory: $TILLER_HOME/data/ or the platform-local data dir.
pub fn data_dir() -> PathBuf {
    if let Some(home) = tiller_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Session notebooks land here, one .ipynb per session.
pub fn reports_dir() -> PathBuf {
    data_dir().join("reports")
}

/// Default SQLite database consulted by the data responder.
pub fn db_path() -> PathBuf {
    data_dir().join("observations.db")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure all required directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    let dirs = [config_dir(), data_dir(), reports_dir()];

    for dir in &dirs {
        tokio::fs::create_dir_all(dir).await?;
    }

    Ok(())
}
