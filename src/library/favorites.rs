// Favorites: hymn indices in the order they were added.
use super::Library;
use crate::storage::{FAVORITES_KEY, read_json, write_json};
use anyhow::Result;

impl Library {
    pub fn get_favorites(&self) -> Result<Vec<usize>> {
        Ok(read_json(self.store(), FAVORITES_KEY)?.unwrap_or_default())
    }

    /// Appends `index` unless it is already a favorite.
    pub fn add_favorite(&self, index: usize) -> Result<()> {
        let mut favorites = self.get_favorites()?;
        if !favorites.contains(&index) {
            favorites.push(index);
            write_json(self.store(), FAVORITES_KEY, &favorites)?;
        }
        Ok(())
    }

    pub fn remove_favorite(&self, index: usize) -> Result<()> {
        let favorites: Vec<usize> = self
            .get_favorites()?
            .into_iter()
            .filter(|f| *f != index)
            .collect();
        write_json(self.store(), FAVORITES_KEY, &favorites)
    }

    pub fn is_favorite(&self, index: usize) -> Result<bool> {
        Ok(self.get_favorites()?.contains(&index))
    }

    /// Flips the favorite state and returns the new one.
    pub fn toggle_favorite(&self, index: usize) -> Result<bool> {
        if self.is_favorite(index)? {
            self.remove_favorite(index)?;
            Ok(false)
        } else {
            self.add_favorite(index)?;
            Ok(true)
        }
    }
}
