// Bookmarks on (hymn, page) pairs.
use super::Library;
use crate::model::Bookmark;
use crate::storage::{BOOKMARKS_KEY, read_json, write_json};
use anyhow::Result;

impl Library {
    pub fn get_bookmarks(&self) -> Result<Vec<Bookmark>> {
        Ok(read_json(self.store(), BOOKMARKS_KEY)?.unwrap_or_default())
    }

    /// Appends a bookmark unless `(index, page)` is already bookmarked.
    pub fn add_bookmark(&self, index: usize, page: u32) -> Result<()> {
        let mut bookmarks = self.get_bookmarks()?;
        if bookmarks.iter().any(|b| b.matches(index, page)) {
            return Ok(());
        }
        bookmarks.push(Bookmark {
            index,
            page,
            timestamp: self.now(),
        });
        write_json(self.store(), BOOKMARKS_KEY, &bookmarks)
    }

    pub fn remove_bookmark(&self, index: usize, page: u32) -> Result<()> {
        let bookmarks: Vec<Bookmark> = self
            .get_bookmarks()?
            .into_iter()
            .filter(|b| !b.matches(index, page))
            .collect();
        write_json(self.store(), BOOKMARKS_KEY, &bookmarks)
    }

    pub fn is_bookmarked(&self, index: usize, page: u32) -> Result<bool> {
        Ok(self.get_bookmarks()?.iter().any(|b| b.matches(index, page)))
    }

    pub fn toggle_bookmark(&self, index: usize, page: u32) -> Result<bool> {
        if self.is_bookmarked(index, page)? {
            self.remove_bookmark(index, page)?;
            Ok(false)
        } else {
            self.add_bookmark(index, page)?;
            Ok(true)
        }
    }
}
