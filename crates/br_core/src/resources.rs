//! Named resource lookup.
//!
//! The loader itself is a collaborator: scenes only ask whether a key exists
//! and, for images, how large the texture is. A missing optional resource is
//! never an error; the element that wanted it is simply left out.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

pub trait ResourceProvider {
    fn has_resource(&self, key: &str) -> bool;
    fn texture_size(&self, key: &str) -> Option<TextureSize>;
}

/// Checks an optional resource and logs when it is absent. Returns whether the
/// caller should build the element that depends on it.
pub fn optional_resource(provider: &dyn ResourceProvider, owner: &str, key: &str) -> bool {
    if provider.has_resource(key) {
        true
    } else {
        log::warn!("{owner}: resource '{key}' not found, element omitted");
        false
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    Audio,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResourceManifest {
    pub version: String,
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ManifestEntry {
    pub key: String,
    pub kind: ResourceKind,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub path: PathBuf,
    pub texture_size: Option<TextureSize>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    records: HashMap<String, ResourceRecord>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, record: ResourceRecord) {
        self.records.insert(key.to_string(), record);
    }

    /// Registers an image with a known size without touching the filesystem.
    pub fn insert_texture(&mut self, key: &str, width: u32, height: u32) {
        self.insert(
            key,
            ResourceRecord {
                kind: ResourceKind::Image,
                path: PathBuf::from(key),
                texture_size: Some(TextureSize { width, height }),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&ResourceRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResourceProvider for ResourceCatalog {
    fn has_resource(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    fn texture_size(&self, key: &str) -> Option<TextureSize> {
        self.records.get(key).and_then(|r| r.texture_size)
    }
}

/// Loads a manifest and probes every entry. Relative entry paths resolve
/// against the manifest's directory. Entries whose file is missing or whose
/// image header cannot be read are skipped with a warning; only a broken
/// manifest is an error.
pub fn load_catalog_from_path(manifest_path: &Path) -> Result<ResourceCatalog, String> {
    let raw = fs::read_to_string(manifest_path).map_err(|e| {
        format!(
            "Failed to read resource manifest {}: {e}",
            manifest_path.display()
        )
    })?;
    let manifest: ResourceManifest = serde_json::from_str(&raw).map_err(|e| {
        format!(
            "Failed to parse resource manifest {}: {e}",
            manifest_path.display()
        )
    })?;
    validate_manifest(&manifest)?;

    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let mut catalog = ResourceCatalog::new();
    for entry in &manifest.resources {
        let path = base.join(&entry.path);
        if !path.exists() {
            log::warn!(
                "Resource '{}' points at missing file '{}'; skipping",
                entry.key,
                path.display()
            );
            continue;
        }
        let texture_size = match entry.kind {
            ResourceKind::Image => match image::image_dimensions(&path) {
                Ok((width, height)) => Some(TextureSize { width, height }),
                Err(err) => {
                    log::warn!(
                        "Resource '{}' ({}) is not a readable image: {err}; skipping",
                        entry.key,
                        path.display()
                    );
                    continue;
                }
            },
            ResourceKind::Video | ResourceKind::Audio => None,
        };
        catalog.insert(
            &entry.key,
            ResourceRecord {
                kind: entry.kind,
                path,
                texture_size,
            },
        );
    }

    log::info!(
        "Resource manifest {} ({}): {}/{} entries available",
        manifest_path.display(),
        manifest.version,
        catalog.len(),
        manifest.resources.len()
    );
    Ok(catalog)
}

fn validate_manifest(manifest: &ResourceManifest) -> Result<(), String> {
    let mut keys = HashSet::new();
    for entry in &manifest.resources {
        if entry.key.is_empty() {
            return Err("Manifest validation failed: empty resource key".to_string());
        }
        if !keys.insert(entry.key.as_str()) {
            return Err(format!(
                "Manifest validation failed: duplicate resource key '{}'",
                entry.key
            ));
        }
    }
    if manifest.resources.is_empty() {
        log::warn!("Resource manifest lists no resources. Every visual will be omitted.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "br_resources_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    #[test]
    fn catalog_probes_image_dimensions_and_skips_missing_files() {
        let png_path = temp_file_path("logo", "png");
        image::RgbaImage::new(8, 4)
            .save(&png_path)
            .expect("write temp png");

        let manifest_path = temp_file_path("manifest", "json");
        let json = format!(
            r#"{{
              "version": "0.1",
              "resources": [
                {{ "key": "logo_primary", "kind": "image", "path": {:?} }},
                {{ "key": "nerf_video", "kind": "video", "path": "/definitely/not/here.mp4" }}
              ]
            }}"#,
            png_path.display().to_string()
        );
        fs::write(&manifest_path, json).expect("write manifest");

        let catalog = load_catalog_from_path(&manifest_path).expect("manifest should load");
        assert!(catalog.has_resource("logo_primary"));
        assert!(!catalog.has_resource("nerf_video"));
        let size = catalog.texture_size("logo_primary").expect("size probed");
        assert_eq!(size, TextureSize { width: 8, height: 4 });
        assert!((size.aspect() - 2.0).abs() < f32::EPSILON);

        let _ = fs::remove_file(png_path);
        let _ = fs::remove_file(manifest_path);
    }

    #[test]
    fn catalog_rejects_duplicate_keys() {
        let manifest_path = temp_file_path("dup", "json");
        fs::write(
            &manifest_path,
            r#"{"version":"0.1","resources":[
                {"key":"a","kind":"audio","path":"x.ogg"},
                {"key":"a","kind":"audio","path":"y.ogg"}
            ]}"#,
        )
        .expect("write manifest");
        let err = load_catalog_from_path(&manifest_path).expect_err("duplicates should fail");
        assert!(err.contains("duplicate resource key"));
        let _ = fs::remove_file(manifest_path);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let err = load_catalog_from_path(Path::new("/no/such/manifest.json"))
            .expect_err("missing manifest should fail");
        assert!(err.contains("Failed to read resource manifest"));
    }

    #[test]
    fn optional_resource_reports_presence() {
        let mut catalog = ResourceCatalog::new();
        catalog.insert_texture("main_bg", 1920, 1080);
        assert!(optional_resource(&catalog, "test", "main_bg"));
        assert!(!optional_resource(&catalog, "test", "weapon_bg"));
        assert_eq!(catalog.texture_size("weapon_bg"), None);
    }

    #[test]
    fn zero_height_texture_has_unit_aspect() {
        let size = TextureSize { width: 10, height: 0 };
        assert_eq!(size.aspect(), 1.0);
    }

    #[test]
    fn relative_entries_resolve_against_the_manifest_directory() {
        let dir = temp_file_path("dir", "d");
        fs::create_dir_all(dir.join("images")).expect("create temp dir");
        image::RgbaImage::new(6, 3)
            .save(dir.join("images/bg.png"))
            .expect("write temp png");
        let manifest_path = dir.join("manifest.json");
        fs::write(
            &manifest_path,
            r#"{"version":"0.1","resources":[
                {"key":"main_bg","kind":"image","path":"images/bg.png"},
                {"key":"promo_video","kind":"video","path":"video/promo.mp4"}
            ]}"#,
        )
        .expect("write manifest");

        let catalog = load_catalog_from_path(&manifest_path).expect("manifest should load");
        assert_eq!(
            catalog.texture_size("main_bg"),
            Some(TextureSize { width: 6, height: 3 })
        );
        assert!(!catalog.has_resource("promo_video"));
        assert_eq!(catalog.len(), 1);

        let _ = fs::remove_dir_all(dir);
    }
}
