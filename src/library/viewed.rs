// Viewing history, newest first, one entry per hymn.
use super::Library;
use crate::model::ViewedEntry;
use crate::storage::{VIEWED_KEY, read_json, write_json};
use anyhow::Result;

pub const DEFAULT_VIEWED_LIMIT: usize = 20;
pub const VIEWED_CAPACITY: usize = 50;

impl Library {
    pub fn add_viewed(&self, index: usize) -> Result<()> {
        let previous: Vec<ViewedEntry> = read_json(self.store(), VIEWED_KEY)?.unwrap_or_default();
        let mut updated = Vec::with_capacity(VIEWED_CAPACITY);
        updated.push(ViewedEntry {
            index,
            timestamp: self.now(),
        });
        updated.extend(previous.into_iter().filter(|v| v.index != index));
        updated.truncate(VIEWED_CAPACITY);
        write_json(self.store(), VIEWED_KEY, &updated)
    }

    pub fn get_viewed(&self, max_items: usize) -> Result<Vec<ViewedEntry>> {
        let mut viewed: Vec<ViewedEntry> =
            read_json(self.store(), VIEWED_KEY)?.unwrap_or_default();
        viewed.truncate(max_items);
        Ok(viewed)
    }

    pub fn clear_viewed(&self) -> Result<()> {
        self.store().remove_item(VIEWED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::test_library;

    #[test]
    fn test_reopening_moves_to_front_with_new_time() {
        let (lib, clock) = test_library();
        lib.add_viewed(1).unwrap();
        clock.advance(10);
        lib.add_viewed(2).unwrap();
        clock.advance(10);
        lib.add_viewed(1).unwrap();

        let viewed = lib.get_viewed(DEFAULT_VIEWED_LIMIT).unwrap();
        assert_eq!(viewed.len(), 2);
        assert_eq!(viewed[0].index, 1);
        assert_eq!(viewed[0].timestamp, 1_700_000_000_020);
        assert_eq!(viewed[1].index, 2);
    }

    #[test]
    fn test_capacity_is_fifty() {
        let (lib, _) = test_library();
        for i in 0..60 {
            lib.add_viewed(i).unwrap();
        }
        assert_eq!(lib.get_viewed(1000).unwrap().len(), VIEWED_CAPACITY);
        assert_eq!(lib.get_viewed(DEFAULT_VIEWED_LIMIT).unwrap().len(), 20);
        assert_eq!(lib.get_viewed(1).unwrap()[0].index, 59);
    }

    #[test]
    fn test_clear() {
        let (lib, _) = test_library();
        lib.add_viewed(0).unwrap();
        lib.clear_viewed().unwrap();
        assert!(lib.get_viewed(DEFAULT_VIEWED_LIMIT).unwrap().is_empty());
    }
}
