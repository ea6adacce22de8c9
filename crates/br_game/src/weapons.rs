//! Weapon catalog: the ordered content table behind the gallery, the detail
//! page and the game-over screen.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Weapon {
    pub key: String,
    pub display_name: String,
    /// Resource key of the weapon art.
    pub image_resource: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: Vec<WeaponStat>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WeaponStat {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Clone)]
struct WeaponFile {
    version: String,
    weapons: Vec<Weapon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponCatalog {
    weapons: Vec<Weapon>,
}

impl WeaponCatalog {
    pub fn new(weapons: Vec<Weapon>) -> Result<Self, String> {
        validate_weapons(&weapons)?;
        Ok(Self { weapons })
    }

    /// The four blasters the range ships with.
    pub fn builtin() -> Self {
        let weapon = |key: &str, name: &str, description: &str| Weapon {
            key: key.to_string(),
            display_name: name.to_string(),
            image_resource: key.to_string(),
            description: description.to_string(),
            stats: Vec::new(),
        };
        Self {
            weapons: vec![
                weapon(
                    "Volt",
                    "ELITE 2.0 VOLT",
                    "Equipped with 2 tactical rails and light beam targeting reaching up to \
                     15 feet. Includes 6 darts and fires up to 90 feet.",
                ),
                weapon(
                    "Shockwave",
                    "ELITE 2.0 SHOCKWAVE",
                    "Comes with 30 darts to load the 15-dart rotating drum. Fire 1 dart or \
                     slam-fire all 15 at once, up to 90 feet.",
                ),
                weapon(
                    "Echo",
                    "ELITE 2.0 ECHO",
                    "Removable stock and barrel give 4 configurations in one. Fire 1 dart at \
                     a time or 10 rapidly. Comes with 24 darts.",
                ),
                weapon(
                    "Commander",
                    "ELITE 2.0 COMMANDER",
                    "6-dart rotating drum, 3 tactical rails and 2 stock attachments. Fire 1 \
                     dart or all 6 with slam-fire action.",
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.key == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.weapons.iter().position(|w| w.key == key)
    }

    pub fn at(&self, index: usize) -> Option<&Weapon> {
        self.weapons.get(index)
    }

    pub fn first(&self) -> Option<&Weapon> {
        self.weapons.first()
    }

    pub fn next_index(&self, index: usize) -> usize {
        if self.weapons.is_empty() {
            return 0;
        }
        (index + 1) % self.weapons.len()
    }

    pub fn previous_index(&self, index: usize) -> usize {
        if self.weapons.is_empty() {
            return 0;
        }
        let len = self.weapons.len();
        (index + len - 1) % len
    }

    /// Index for an optional requested key; unknown or missing keys start at
    /// the first weapon.
    pub fn resolve_index(&self, key: Option<&str>) -> usize {
        match key {
            Some(key) => self.index_of(key).unwrap_or_else(|| {
                log::warn!("Unknown weapon '{key}', showing the first weapon instead");
                0
            }),
            None => 0,
        }
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn load_weapons_from_path(path: &Path) -> Result<WeaponCatalog, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read weapon catalog {}: {e}", path.display()))?;
    let file: WeaponFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse weapon catalog {}: {e}", path.display()))?;
    let catalog = WeaponCatalog::new(file.weapons)?;
    log::info!(
        "Weapon catalog {} ({}): {} weapons",
        path.display(),
        file.version,
        catalog.len()
    );
    Ok(catalog)
}

pub fn load_weapons_or_builtin(path: &Path) -> WeaponCatalog {
    if !path.exists() {
        log::warn!(
            "Weapon catalog '{}' not found, using the built-in table",
            path.display()
        );
        return WeaponCatalog::builtin();
    }
    load_weapons_from_path(path).unwrap_or_else(|err| {
        log::error!("{err}; using the built-in table");
        WeaponCatalog::builtin()
    })
}

fn validate_weapons(weapons: &[Weapon]) -> Result<(), String> {
    if weapons.is_empty() {
        return Err("Weapon catalog validation failed: weapons array is empty".to_string());
    }
    let mut keys = HashSet::new();
    for weapon in weapons {
        if !keys.insert(weapon.key.as_str()) {
            return Err(format!(
                "Weapon catalog validation failed: duplicate weapon key '{}'",
                weapon.key
            ));
        }
        if weapon.display_name.trim().is_empty() {
            return Err(format!(
                "Weapon catalog validation failed: weapon '{}' has no display_name",
                weapon.key
            ));
        }
    }
    Ok(())
}
