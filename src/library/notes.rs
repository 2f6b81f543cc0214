// Free-text notes, one per hymn.
//
// Stored as a JSON object keyed by the decimal hymn index.
use super::Library;
use crate::storage::{NOTES_KEY, read_json, write_json};
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};

impl Library {
    fn load_notes_raw(&self) -> Result<HashMap<String, String>> {
        Ok(read_json(self.store(), NOTES_KEY)?.unwrap_or_default())
    }

    pub fn get_note(&self, index: usize) -> Result<String> {
        Ok(self
            .load_notes_raw()?
            .remove(&index.to_string())
            .unwrap_or_default())
    }

    /// Stores `text` as typed. Whitespace-only text deletes the note.
    pub fn save_note(&self, index: usize, text: &str) -> Result<()> {
        let mut notes = self.load_notes_raw()?;
        if text.trim().is_empty() {
            notes.remove(&index.to_string());
        } else {
            notes.insert(index.to_string(), text.to_string());
        }
        write_json(self.store(), NOTES_KEY, &notes)
    }

    /// All notes ordered by hymn index. Keys that are not indices are skipped.
    pub fn get_all_notes(&self) -> Result<BTreeMap<usize, String>> {
        Ok(self
            .load_notes_raw()?
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
            .collect())
    }

    pub fn delete_note(&self, index: usize) -> Result<()> {
        let mut notes = self.load_notes_raw()?;
        notes.remove(&index.to_string());
        write_json(self.store(), NOTES_KEY, &notes)
    }
}

#[cfg(test)]
mod tests {
    use crate::library::test_library;
    use crate::storage::NOTES_KEY;

    #[test]
    fn test_save_get_delete() {
        let (lib, _) = test_library();
        assert_eq!(lib.get_note(2).unwrap(), "");

        lib.save_note(2, "  capo 3 \n").unwrap();
        assert_eq!(lib.get_note(2).unwrap(), "  capo 3 \n");

        lib.delete_note(2).unwrap();
        assert_eq!(lib.get_note(2).unwrap(), "");
    }

    #[test]
    fn test_blank_note_removes_entry() {
        let (lib, _) = test_library();
        lib.save_note(1, "slow").unwrap();
        lib.save_note(1, "   \n\t").unwrap();
        assert!(lib.get_all_notes().unwrap().is_empty());
    }

    #[test]
    fn test_all_notes_sorted_and_skip_foreign_keys() {
        let (lib, _) = test_library();
        lib.store()
            .set_item(NOTES_KEY, r#"{"10":"b","2":"a","x":"ignored"}"#)
            .unwrap();
        let all = lib.get_all_notes().unwrap();
        assert_eq!(
            all.into_iter().collect::<Vec<_>>(),
            vec![(2, "a".to_string()), (10, "b".to_string())]
        );
    }
}
