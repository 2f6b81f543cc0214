// The fixed, ordered hymn list. Positions are the identity used by every
// persisted list, so entries are never reordered after loading.
use crate::model::hymn::Hymn;
use crate::search::normalize::fold_digits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

#[derive(Deserialize, Serialize)]
struct CatalogFile {
    #[serde(rename = "hymn", default)]
    hymns: Vec<Hymn>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hymns: Vec<Hymn>,
    asset_root: PathBuf,
}

impl Catalog {
    pub fn new(hymns: Vec<Hymn>, asset_root: PathBuf) -> Self {
        Self { hymns, asset_root }
    }

    /// Loads a catalog file. `.toml` files use `[[hymn]]` tables, anything
    /// else is read as a JSON array of hymns.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog '{}'", path.display()))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let hymns = if is_toml {
            Self::parse_toml(&contents)
                .with_context(|| format!("Failed to parse catalog '{}'", path.display()))?
        } else {
            serde_json::from_str::<Vec<Hymn>>(&contents)
                .with_context(|| format!("Failed to parse catalog '{}'", path.display()))?
        };

        let asset_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        log::info!("Loaded {} hymns from {}", hymns.len(), path.display());
        Ok(Self { hymns, asset_root })
    }

    /// The demo catalog compiled into the binary.
    pub fn builtin() -> Self {
        let hymns = match Self::parse_toml(BUILTIN_CATALOG) {
            Ok(h) => h,
            Err(e) => {
                log::error!("Built-in catalog is invalid: {}", e);
                Vec::new()
            }
        };
        Self {
            hymns,
            asset_root: PathBuf::from("assets"),
        }
    }

    fn parse_toml(contents: &str) -> Result<Vec<Hymn>> {
        let file: CatalogFile = toml::from_str(contents)?;
        Ok(file.hymns)
    }

    pub fn len(&self) -> usize {
        self.hymns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hymns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Hymn> {
        self.hymns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Hymn)> {
        self.hymns.iter().enumerate()
    }

    pub fn hymns(&self) -> &[Hymn] {
        &self.hymns
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Title for display. Stored lists can outlive catalog edits, so an
    /// unknown index renders as `Item <index>` instead of failing.
    pub fn title_or_placeholder(&self, index: usize) -> String {
        match self.hymns.get(index) {
            Some(h) => h.title.clone(),
            None => format!("Item {}", index),
        }
    }

    /// Quick-access "go to number": `1..=len` maps to index `n - 1`.
    pub fn resolve_number(&self, input: &str) -> Option<usize> {
        let digits = fold_digits(input.trim());
        let n: usize = digits.parse().ok()?;
        if n >= 1 && n <= self.hymns.len() {
            Some(n - 1)
        } else {
            None
        }
    }

    pub fn image_path(&self, index: usize) -> Option<PathBuf> {
        self.hymns
            .get(index)
            .map(|h| self.asset_root.join(&h.image))
    }

    pub fn music_path(&self, index: usize) -> Option<PathBuf> {
        self.hymns
            .get(index)
            .and_then(|h| h.music.as_ref())
            .map(|m| self.asset_root.join(m))
    }
}
