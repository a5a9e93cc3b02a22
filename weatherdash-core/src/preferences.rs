//! The two values the dashboard remembers between runs.

use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{error::Error, units::UnitSystem};

pub const UNIT_KEY: &str = "unit";
pub const CITY_KEY: &str = "city";
pub const DEFAULT_CITY: &str = "greenwich";

/// String key/value persistence.
pub trait PreferenceStore: Send + Sync + Debug {
    fn get_string(&self, key: &str) -> Result<Option<String>>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat TOML table on disk, rewritten on every `set_string`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values: BTreeMap<String, String> = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&self.values).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub unit: UnitSystem,
    pub city: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { unit: UnitSystem::default(), city: DEFAULT_CITY.to_string() }
    }
}

impl Preferences {
    /// Absent keys fall back to defaults. A stored unit that does not parse
    /// is an error rather than a silent reset.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, Error> {
        let unit = match store.get_string(UNIT_KEY).map_err(Error::Preferences)? {
            Some(raw) => UnitSystem::try_from(raw.as_str())?,
            None => UnitSystem::default(),
        };

        let city = store
            .get_string(CITY_KEY)
            .map_err(Error::Preferences)?
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        Ok(Self { unit, city })
    }

    pub fn save_unit(&mut self, store: &mut dyn PreferenceStore, unit: UnitSystem) -> Result<()> {
        self.unit = unit;
        store.set_string(UNIT_KEY, unit.as_str())?;
        info!(%unit, "Saved unit preference");
        Ok(())
    }

    pub fn save_city(&mut self, store: &mut dyn PreferenceStore, city: &str) -> Result<()> {
        self.city = city.to_string();
        store.set_string(CITY_KEY, city)?;
        info!(city, "Saved city preference");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn empty_store_gives_defaults() {
        let store = MemoryPreferenceStore::default();

        let prefs = Preferences::load(&store).expect("defaults");

        assert_eq!(prefs, Preferences { unit: UnitSystem::Metric, city: "greenwich".into() });
    }

    #[test]
    fn stored_values_are_read_back() {
        let mut store = MemoryPreferenceStore::default();
        store.set_string(UNIT_KEY, "imperial").unwrap();
        store.set_string(CITY_KEY, "Lisbon").unwrap();

        let prefs = Preferences::load(&store).expect("valid prefs");

        assert_eq!(prefs.unit, UnitSystem::Imperial);
        assert_eq!(prefs.city, "Lisbon");
    }

    #[test]
    fn unknown_stored_unit_fails_loudly() {
        let mut store = MemoryPreferenceStore::default();
        store.set_string(UNIT_KEY, "standard").unwrap();

        let err = Preferences::load(&store).unwrap_err();

        assert!(matches!(err, Error::Format(FormatError::UnknownUnit(ref u)) if u == "standard"));
    }

    #[test]
    fn save_updates_value_and_store() {
        let mut store = MemoryPreferenceStore::default();
        let mut prefs = Preferences::default();

        prefs.save_unit(&mut store, UnitSystem::Imperial).unwrap();
        prefs.save_city(&mut store, "Oslo").unwrap();

        assert_eq!(prefs.unit, UnitSystem::Imperial);
        assert_eq!(store.get_string(UNIT_KEY).unwrap().as_deref(), Some("imperial"));
        assert_eq!(store.get_string(CITY_KEY).unwrap().as_deref(), Some("Oslo"));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs").join("preferences.toml");

        let mut store = FilePreferenceStore::open(&path).expect("open empty");
        assert_eq!(store.get_string(CITY_KEY).unwrap(), None);
        store.set_string(CITY_KEY, "Reykjavík").unwrap();
        store.set_string(UNIT_KEY, "metric").unwrap();

        let reopened = FilePreferenceStore::open(&path).expect("reopen");
        assert_eq!(reopened.get_string(CITY_KEY).unwrap().as_deref(), Some("Reykjavík"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "unit = [").unwrap();

        let err = FilePreferenceStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse preferences file"));
    }
}
