use directories::ProjectDirs;
use std::{
    env,
    path::PathBuf,
};

const PROJECT_NAME: &str = "MIRTH_EXPORTER";

lazy_static::lazy_static! {
    static ref CONFIG_FOLDER: Option<PathBuf> = env::var(format!("{PROJECT_NAME}_CONFIG"))
        .ok()
        .map(PathBuf::from);
}

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory searched for `config.yaml` when no explicit file is given.
///
/// `MIRTH_EXPORTER_CONFIG` takes precedence over the platform config dir.
pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "mirth-exporter", env!("CARGO_PKG_NAME"))
}
