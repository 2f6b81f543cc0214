// A single hymnbook entry.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    pub title: String,
    /// Sheet image, relative to the catalog's asset root.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
}

impl Hymn {
    pub fn new(title: &str, image: &str) -> Self {
        Self {
            title: title.to_string(),
            image: image.to_string(),
            music: None,
        }
    }

    /// Printed hymn number for titles shaped like `"12. Title"`.
    ///
    /// Introductory pages ("مقدمة") carry no number.
    pub fn number(&self) -> Option<u32> {
        hymn_number(&self.title)
    }
}

pub fn hymn_number(title: &str) -> Option<u32> {
    let trimmed = title.trim_start();
    let digits: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let rest = &trimmed[digits.len()..];
    if !rest.starts_with('.') {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hymn_number() {
        assert_eq!(hymn_number("1. إسم بتاو بركة يسو"), Some(1));
        assert_eq!(hymn_number("476. Music lesson (11)"), Some(476));
        assert_eq!(hymn_number("مقدمة(English)"), None);
        assert_eq!(hymn_number("2024 edition"), None);
    }
}
