use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result, env_subst::substitute_env, schema::ReginaConfig};

/// Standard config file name.
const CONFIG_FILENAME: &str = "regina.toml";

/// Load config from the given TOML file, expanding `${ENV_VAR}` placeholders.
pub fn load_config(path: &Path) -> Result<ReginaConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    if ext != "toml" {
        return Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&substitute_env(&raw)).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./regina.toml` (project-local)
/// 2. `<user config dir>/regina/regina.toml` (user-global)
///
/// Returns `ReginaConfig::default()` if no config file is found or the file
/// cannot be loaded.
pub fn discover_and_load() -> ReginaConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    ReginaConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }
    config_dir()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|p| p.exists())
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "regina").map(|d| d.config_dir().to_path_buf())
}
