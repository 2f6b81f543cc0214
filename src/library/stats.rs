// Counts shown on the statistics screen.
use super::Library;
use anyhow::Result;
use serde::Serialize;

/// History read for statistics; larger than the list capacity on purpose so
/// the count is never truncated.
const STATS_VIEWED_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_hymns: usize,
    pub favorites: usize,
    pub viewed: usize,
    pub notes: usize,
    pub bookmarks: usize,
}

impl Statistics {
    /// Share of the catalog present in the viewing history, rounded.
    pub fn progress_percent(&self) -> u32 {
        if self.total_hymns == 0 {
            return 0;
        }
        (self.viewed as f64 / self.total_hymns as f64 * 100.0).round() as u32
    }
}

impl Library {
    pub fn statistics(&self, total_hymns: usize) -> Result<Statistics> {
        Ok(Statistics {
            total_hymns,
            favorites: self.get_favorites()?.len(),
            viewed: self.get_viewed(STATS_VIEWED_LIMIT)?.len(),
            notes: self.get_all_notes()?.len(),
            bookmarks: self.get_bookmarks()?.len(),
        })
    }
}
