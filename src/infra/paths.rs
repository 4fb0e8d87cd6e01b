// src/infra/paths.rs — Config location
//
// INTERPERSONAL_HOME overrides everything. Otherwise config lives in
// ~/.interpersonal/.

use std::path::PathBuf;

/// Returns the INTERPERSONAL_HOME override, if set.
fn interpersonal_home() -> Option<PathBuf> {
    std::env::var_os("INTERPERSONAL_HOME").map(PathBuf::from)
}

/// Configuration directory: $INTERPERSONAL_HOME/ or ~/.interpersonal/
///
/// `None` only when neither the override nor a home directory is available.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = interpersonal_home() {
        return Some(home);
    }
    dirs_home().map(|home| home.join(".interpersonal"))
}

/// Home directory
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
