//! Browser extension manifest fragment for the generated icons
//!
//! Produces the `icons` and `action.default_icon` maps that a WebExtension
//! `manifest.json` expects, so the output can be pasted straight in.

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::Path;

/// Size-to-path map, serialized in insertion order
///
/// A plain `BTreeMap<String, _>` would sort "128" before "16".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconMap {
    entries: Vec<(u32, String)>,
}

impl IconMap {
    /// Add `size`, replacing the path in place if the size is already present
    pub fn insert(&mut self, size: u32, path: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == size) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((size, path)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for IconMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (size, path) in &self.entries {
            map.serialize_entry(&size.to_string(), path)?;
        }
        map.end()
    }
}

/// `action` section of the manifest
#[derive(serde::Serialize, Debug, Clone)]
pub struct Action {
    pub default_icon: IconMap,
}

/// Root of the manifest fragment
#[derive(serde::Serialize, Debug, Clone)]
pub struct ManifestIcons {
    /// Icons shown on the extensions page and in the store
    pub icons: IconMap,

    /// Icons for the toolbar button
    pub action: Action,
}

impl ManifestIcons {
    /// Build the fragment for `filenames`, each path prefixed with `prefix`
    ///
    /// # Arguments
    /// * `prefix` - Directory of the icons relative to `manifest.json` (e.g. "icons/")
    /// * `filenames` - (size, file name) pairs in generation order
    pub fn new(prefix: &str, filenames: &[(u32, String)]) -> Self {
        let mut icons = IconMap::default();
        for (size, filename) in filenames {
            icons.insert(*size, format!("{prefix}{filename}"));
        }
        Self {
            action: Action {
                default_icon: icons.clone(),
            },
            icons,
        }
    }
}

/// Writes `icons.json` into `dir`
pub fn write_manifest(dir: &Path, manifest: &ManifestIcons) -> Result<()> {
    let json =
        serde_json::to_string_pretty(manifest).context("Failed to serialize icons.json")?;
    std::fs::write(dir.join("icons.json"), json).context("Failed to write icons.json file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_files() -> Vec<(u32, String)> {
        [16, 48, 128]
            .iter()
            .map(|&size| (size, format!("icon{size}.png")))
            .collect()
    }

    #[test]
    fn test_prefix_applied() {
        let manifest = ManifestIcons::new("icons/", &default_files());
        assert_eq!(manifest.icons.len(), 3);
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("\"16\":\"icons/icon16.png\""));
        assert!(json.contains("\"128\":\"icons/icon128.png\""));
    }

    #[test]
    fn test_keys_keep_generation_order() {
        let manifest = ManifestIcons::new("", &default_files());
        let json = serde_json::to_string(&manifest.icons).unwrap();
        assert_eq!(
            json,
            r#"{"16":"icon16.png","48":"icon48.png","128":"icon128.png"}"#
        );
    }

    #[test]
    fn test_repeated_size_keeps_one_key() {
        let mut icons = IconMap::default();
        icons.insert(16, "a.png".to_string());
        icons.insert(48, "b.png".to_string());
        icons.insert(16, "c.png".to_string());

        assert_eq!(icons.len(), 2);
        assert_eq!(
            serde_json::to_string(&icons).unwrap(),
            r#"{"16":"c.png","48":"b.png"}"#
        );
    }

    #[test]
    fn test_action_mirrors_icons() {
        let manifest = ManifestIcons::new("img/", &default_files());
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["icons"], value["action"]["default_icon"]);
        assert_eq!(value["action"]["default_icon"]["48"], "img/icon48.png");
    }

    #[test]
    fn test_write_manifest() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manifest = ManifestIcons::new("icons/", &default_files());
        write_manifest(temp_dir.path(), &manifest).unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("icons.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(parsed["icons"].is_object());
        assert_eq!(parsed["icons"]["16"], "icons/icon16.png");
    }
}
