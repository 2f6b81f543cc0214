// Recently opened hymns (from search and quick access), newest first.
use super::Library;
use crate::storage::{RECENT_KEY, read_json, write_json};
use anyhow::Result;

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const RECENT_CAPACITY: usize = 20;

impl Library {
    /// Up to `max_items` most recent entries.
    pub fn get_recent(&self, max_items: usize) -> Result<Vec<usize>> {
        let mut recent: Vec<usize> = read_json(self.store(), RECENT_KEY)?.unwrap_or_default();
        recent.truncate(max_items);
        Ok(recent)
    }

    /// Moves `index` to the front, dropping older duplicates.
    pub fn add_recent(&self, index: usize) -> Result<()> {
        let previous = self.get_recent(RECENT_CAPACITY)?;
        let mut updated = Vec::with_capacity(RECENT_CAPACITY);
        updated.push(index);
        updated.extend(previous.into_iter().filter(|r| *r != index));
        updated.truncate(RECENT_CAPACITY);
        write_json(self.store(), RECENT_KEY, &updated)
    }

    pub fn clear_recent(&self) -> Result<()> {
        self.store().remove_item(RECENT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::test_library;

    #[test]
    fn test_most_recent_first_without_duplicates() {
        let (lib, _) = test_library();
        lib.add_recent(1).unwrap();
        lib.add_recent(2).unwrap();
        lib.add_recent(3).unwrap();
        lib.add_recent(1).unwrap();
        assert_eq!(lib.get_recent(DEFAULT_RECENT_LIMIT).unwrap(), vec![1, 3, 2]);
    }

    #[test]
    fn test_capacity_and_limit() {
        let (lib, _) = test_library();
        for i in 0..30 {
            lib.add_recent(i).unwrap();
        }
        let all = lib.get_recent(100).unwrap();
        assert_eq!(all.len(), RECENT_CAPACITY);
        assert_eq!(all[0], 29);
        assert_eq!(*all.last().unwrap(), 10);

        assert_eq!(lib.get_recent(DEFAULT_RECENT_LIMIT).unwrap().len(), 10);
    }

    #[test]
    fn test_clear() {
        let (lib, _) = test_library();
        lib.add_recent(4).unwrap();
        lib.clear_recent().unwrap();
        assert!(lib.get_recent(10).unwrap().is_empty());
        assert_eq!(lib.store().get_item(RECENT_KEY).unwrap(), None);
    }
}
