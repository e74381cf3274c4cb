/*
 * Settings Store Module
 *
 * Persists the ordered list of flock settings, one record per spawn anchor,
 * as a JSON array. Records are sanitized as they are loaded so a broken file
 * degrades to default values instead of failing the simulation. This is the
 * only module that touches the filesystem and it is never used from a tick.
 */

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{FlockError, FlockResult};
use crate::settings::FlockSettings;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    records: Vec<FlockSettings>,
}

impl SettingsStore {
    pub fn new(records: Vec<FlockSettings>) -> Self {
        Self { records }
    }

    pub fn from_json(text: &str) -> FlockResult<Self> {
        let records: Vec<FlockSettings> = serde_json::from_str(text)?;
        Ok(Self::new(records.iter().map(FlockSettings::sanitized).collect()))
    }

    // Records are sanitized first; JSON has no spelling for NaN or infinity
    pub fn to_json(&self) -> FlockResult<String> {
        let records: Vec<FlockSettings> =
            self.records.iter().map(FlockSettings::sanitized).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Reads the store from `path`. A missing file yields an empty store;
    /// any other I/O or parse failure is returned.
    pub fn load(path: &Path) -> FlockResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let store = Self::from_json(&text)?;
                info!(path = %path.display(), records = store.len(), "settings loaded");
                Ok(store)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(FlockError::Io(err)),
        }
    }

    pub fn save(&self, path: &Path) -> FlockResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), records = self.len(), "settings saved");
        Ok(())
    }

    // Pads with defaults up to `anchor_count`; extra records are kept
    pub fn reconcile(&mut self, anchor_count: usize) {
        if self.records.len() < anchor_count {
            debug!(
                have = self.records.len(),
                need = anchor_count,
                "padding settings with defaults"
            );
            self.records.resize(anchor_count, FlockSettings::default());
        }
    }

    pub fn get(&self, index: usize) -> Option<&FlockSettings> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FlockSettings> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[FlockSettings] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
