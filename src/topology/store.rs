use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::PositionMap;

/// Where saved layouts live. The session reads it once per graph and writes it only
/// on an explicit save.
pub trait PositionStore {
    fn load(&self) -> Result<Option<PositionMap>>;
    fn save(&self, positions: &PositionMap) -> Result<()>;
}

/// A PositionMap stored as a JSON object keyed by node id.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<stem>.layout.json` next to the discovery file.
    pub fn beside(discovery_path: &Path) -> Self {
        let stem = discovery_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("topology");
        Self::new(discovery_path.with_file_name(format!("{stem}.layout.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self) -> Result<Option<PositionMap>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let positions = serde_json::from_str(&raw).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(positions))
    }

    fn save(&self, positions: &PositionMap) -> Result<()> {
        let body = serde_json::to_string_pretty(positions).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| Error::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        log::info!(
            "saved layout of {} nodes to {}",
            positions.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("layout.json"));
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn saved_layout_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("layout.json"));
        let positions = PositionMap::from([("sw1".to_owned(), Point::new(310.0, 225.5))]);

        store.save(&positions).expect("save");
        assert_eq!(store.load().expect("load"), Some(positions));
        assert!(!dir.path().join("layout.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layout.json");
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(
            JsonFileStore::new(path).load(),
            Err(Error::Json { .. })
        ));
    }

    #[test]
    fn beside_derives_layout_path() {
        let store = JsonFileStore::beside(Path::new("/tmp/discoveries/site-a.json"));
        assert_eq!(
            store.path(),
            Path::new("/tmp/discoveries/site-a.layout.json")
        );
    }
}
