//! Indexed collection of levels, loaded once from TOML.

use crate::error::CatalogError;
use crate::level::{Level, LevelDef};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_CATALOG: &str = include_str!("../levels/catalog.toml");

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    levels: Vec<LevelDef>,
}

/// An ordered list of levels. Index 0 is the first puzzle a player sees.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { levels })
    }

    /// Parses a catalog document with one `[[levels]]` table per level.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let levels = file
            .levels
            .into_iter()
            .enumerate()
            .map(|(index, def)| {
                let name = def.name.clone();
                Level::try_from(def).map_err(|source| CatalogError::Level {
                    index,
                    name,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), levels = catalog.len(), "loaded level catalog");
        Ok(catalog)
    }

    /// The catalog bundled with the crate, parsed on first use.
    ///
    /// # Panics
    ///
    /// If the bundled `levels/catalog.toml` is invalid, which the test suite rules out.
    pub fn builtin() -> &'static LevelCatalog {
        static BUILTIN: OnceLock<LevelCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_toml_str(BUILTIN_CATALOG).expect("bundled level catalog is valid")
        })
    }

    /// Serializes the catalog back into the document format `from_toml_str` reads.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let file = CatalogFile {
            levels: self.levels.iter().cloned().map(LevelDef::from).collect(),
        };
        toml::to_string(&file)
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Looks a level up by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<(usize, &Level)> {
        self.levels
            .iter()
            .enumerate()
            .find(|(_, level)| level.name().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

impl<'a> IntoIterator for &'a LevelCatalog {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}
