use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::storage::{VAULT_FILE_NAME, ensure_parent_dir, restrict_file};

pub const CONFIG_DIR: &str = "clipvault";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    ConfigFile,
    Default,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PathSource::Explicit => "command line / environment",
            PathSource::ConfigFile => "config file",
            PathSource::Default => "default location",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let cfg: Config = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn load_config() -> Result<Option<Config>> {
    load_config_from(&config_path()?)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    ensure_parent_dir(path)?;
    let data = serde_json::to_string_pretty(cfg)?;
    atomic_write(path, data.as_bytes())?;
    restrict_file(path)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<()> {
    save_config_to(&config_path()?, cfg)
}

/// Next to the executable in release builds, in the crate root otherwise.
pub fn default_vault_path() -> Result<PathBuf> {
    let base = if cfg!(debug_assertions) {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    } else {
        let exe = std::env::current_exe().context("Could not locate executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("Executable has no parent directory"))?
    };
    Ok(base.join(VAULT_FILE_NAME))
}

/// First hit wins: explicit path, config file, default location.
pub fn resolve_vault_path_with(
    explicit: Option<PathBuf>,
    config: Option<&Config>,
) -> Result<ResolvedPath> {
    if let Some(path) = explicit {
        return Ok(ResolvedPath {
            path,
            source: PathSource::Explicit,
        });
    }
    if let Some(path) = config.and_then(|cfg| cfg.vault_path.clone()) {
        return Ok(ResolvedPath {
            path,
            source: PathSource::ConfigFile,
        });
    }
    Ok(ResolvedPath {
        path: default_vault_path()?,
        source: PathSource::Default,
    })
}

pub fn resolve_vault_path(explicit: Option<PathBuf>) -> Result<ResolvedPath> {
    if explicit.is_some() {
        return resolve_vault_path_with(explicit, None);
    }
    let cfg = load_config()?;
    resolve_vault_path_with(None, cfg.as_ref())
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| anyhow!("Invalid target path"))?;
    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| anyhow!("Atomic write failed: {}", e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn config_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let cfg = Config {
            vault_path: Some(PathBuf::from("/srv/vault.enc")),
        };
        save_config_to(&path, &cfg).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), Some(cfg));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let cfg = Config {
            vault_path: Some(PathBuf::from("/from/config")),
        };
        let resolved =
            resolve_vault_path_with(Some(PathBuf::from("/from/flag")), Some(&cfg)).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/from/flag"));
        assert_eq!(resolved.source, PathSource::Explicit);

        let resolved = resolve_vault_path_with(None, Some(&cfg)).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/from/config"));
        assert_eq!(resolved.source, PathSource::ConfigFile);
    }

    #[test]
    fn default_uses_fixed_file_name() {
        let resolved = resolve_vault_path_with(None, Some(&Config::default())).unwrap();
        assert_eq!(resolved.source, PathSource::Default);
        assert_eq!(resolved.path.file_name().unwrap(), VAULT_FILE_NAME);
    }
}
