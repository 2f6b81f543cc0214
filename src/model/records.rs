// Persisted list entries.
use serde::{Deserialize, Serialize};

/// A bookmarked page of a hymn. `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub index: usize,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub timestamp: i64,
}

impl Bookmark {
    pub fn matches(&self, index: usize, page: u32) -> bool {
        self.index == index && self.page == page
    }
}

/// One entry of the viewing history. `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewedEntry {
    pub index: usize,
    #[serde(default)]
    pub timestamp: i64,
}

impl ViewedEntry {
    /// Local date/time for display, `None` for out-of-range timestamps.
    pub fn local_time(&self) -> Option<chrono::DateTime<chrono::Local>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
            .map(|dt| dt.with_timezone(&chrono::Local))
    }
}
