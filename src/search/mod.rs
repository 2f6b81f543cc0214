// Title search over the catalog.
//
// A query matches a hymn when the normalized query is a substring of the
// normalized title. Results keep catalog order; there is no ranking.
pub mod normalize;
pub mod voice;

use crate::model::Catalog;
pub use normalize::{fold_digits, normalize};
pub use voice::clean_voice_input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub index: usize,
    pub title: String,
}

/// Prepares a raw (typed or dictated) query for matching.
/// Returns `None` when nothing searchable is left.
pub fn prepare_query(query: &str) -> Option<String> {
    let cleaned = normalize(&clean_voice_input(query));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalized titles kept alongside the catalog so incremental typing does not
/// re-fold every title on each keystroke.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    titles: Vec<(usize, String, String)>,
}

impl Searcher {
    pub fn new(catalog: &Catalog) -> Self {
        let titles = catalog
            .iter()
            .map(|(i, h)| (i, h.title.clone(), normalize(&h.title)))
            .collect();
        Self { titles }
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let Some(needle) = prepare_query(query) else {
            return Vec::new();
        };
        self.titles
            .iter()
            .filter(|(_, _, folded)| folded.contains(&needle))
            .map(|(index, title, _)| SearchHit {
                index: *index,
                title: title.clone(),
            })
            .collect()
    }
}

/// One-shot search. Blank queries return no hits.
pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchHit> {
    Searcher::new(catalog).search(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hymn;
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Hymn::new("مقدمة(English)", "0.jpg"),
                Hymn::new("1. إسم بتاو بركة يسو", "001.jpg"),
                Hymn::new("12. أَبَانَا الَّذِي", "012.jpg"),
                Hymn::new("476. Music lesson (11) كوردات الـجـيـتـار", "476.jpg"),
            ],
            PathBuf::new(),
        )
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        assert!(search(&catalog(), "").is_empty());
        assert!(search(&catalog(), "   ").is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let hits = search(&catalog(), "MUSIC");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 3);
    }

    #[test]
    fn test_diacritics_and_alef_forms_ignored() {
        let hits = search(&catalog(), "ابانا");
        assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![2]);

        let hits = search(&catalog(), "اسم");
        assert_eq!(hits[0].index, 1);

        let hits = search(&catalog(), "الجيتار");
        assert_eq!(hits[0].index, 3);
    }

    #[test]
    fn test_results_keep_catalog_order() {
        // "1" appears in hymns 1, 2 ("12.") and 3 ("(11)")
        let hits = search(&catalog(), "1");
        assert_eq!(
            hits.iter().map(|h| h.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_dictated_query() {
        let hits = search(&catalog(), "ترتيلة رقم ١٢.");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "12. أَبَانَا الَّذِي");
    }

    #[test]
    fn test_no_match() {
        assert!(search(&catalog(), "zzz").is_empty());
    }
}
