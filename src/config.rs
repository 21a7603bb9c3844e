use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeckstoreConfig {
    /// Directory that receives `<deck>.db` store files
    pub store_dir: Option<String>,
    /// JSON card catalog used to resolve card names
    pub catalog: Option<String>,
}

impl DeckstoreConfig {
    pub fn store_dir(&self) -> Option<PathBuf> {
        self.store_dir.as_ref().map(PathBuf::from)
    }

    pub fn catalog(&self) -> Option<PathBuf> {
        self.catalog.as_ref().map(PathBuf::from)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("deckstore.toml")
}

pub fn default_store_dir_in(base: &Path) -> PathBuf {
    base.join(".deckstore")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DeckstoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DeckstoreConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &DeckstoreConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_store_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("deckstore.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckstore.toml");
        let config = DeckstoreConfig {
            store_dir: Some(".deckstore".to_string()),
            catalog: Some("cards.json".to_string()),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.catalog(), Some(PathBuf::from("cards.json")));
    }

    #[test]
    fn test_ensure_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let stores = default_store_dir_in(dir.path());
        ensure_store_dir(&stores).unwrap();
        assert!(stores.is_dir());
    }
}
