use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::Location;
use crate::errors::{SkycastError, SkycastResult};

/// Weather sites reject the default client agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64)";

/// How long cached pages stay valid.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Retry budget per drill-down selection prompt.
pub const SELECTION_ATTEMPTS: u32 = 3;

pub const CONFIG_FILE: &str = "locations.toml";

/// Environment overrides, mainly for tests and scripting.
pub const CONFIG_PATH_ENV: &str = "SKYCAST_CONFIG_PATH";
pub const CACHE_DIR_ENV: &str = "SKYCAST_CACHE_DIR";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "skycast")
}

/// Path to the persisted locations file.
pub fn config_file_path() -> SkycastResult<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = project_dirs().ok_or_else(|| {
        SkycastError::Config("Could not determine platform config directory".to_string())
    })?;

    Ok(dirs.config_dir().join(CONFIG_FILE))
}

/// Directory holding cached page bodies.
pub fn cache_dir() -> SkycastResult<PathBuf> {
    if let Ok(path) = std::env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = project_dirs().ok_or_else(|| {
        SkycastError::Config("Could not determine platform cache directory".to_string())
    })?;

    Ok(dirs.cache_dir().to_path_buf())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationEntry {
    name: String,
    url: String,
}

/// Persisted per-provider locations: one section per provider id, each
/// holding `name` and `url`. A section is replaced wholesale on save,
/// never partially updated.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    sections: BTreeMap<String, LocationEntry>,
}

impl ConfigStore {
    /// Open the store at the default (or env-overridden) path.
    pub fn open_default() -> SkycastResult<Self> {
        Self::open(config_file_path()?)
    }

    /// Open the store at an explicit path. A missing file is an empty store.
    pub fn open(path: PathBuf) -> SkycastResult<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                sections: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path)?;
        let sections = toml::from_str(&contents)?;

        Ok(Self { path, sections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted location for a provider, if any.
    pub fn location_for(&self, provider: &str) -> Option<Location> {
        self.sections
            .get(provider)
            .map(|entry| Location::new(entry.name.clone(), entry.url.clone()))
    }

    /// Replace the provider's section and write the whole file back.
    pub fn save_location(&mut self, provider: &str, name: &str, url: &str) -> SkycastResult<()> {
        self.sections.insert(
            provider.to_string(),
            LocationEntry {
                name: name.to_string(),
                url: url.to_string(),
            },
        );
        self.persist()
    }

    fn persist(&self) -> SkycastResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml = toml::to_string_pretty(&self.sections)?;
        fs::write(&self.path, toml)?;

        Ok(())
    }
}
