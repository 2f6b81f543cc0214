// Title search as users actually type or dictate it.
use hosanna::model::{Catalog, Hymn};
use hosanna::search::{Searcher, clean_voice_input, normalize, search};
use std::path::PathBuf;

fn catalog() -> Catalog {
    let titles = [
        "مقدمة(English)",
        "1. إسم بتاو بركة يسو",
        "12. يَا رَبُّ أَنْتَ رَاعِيَّ",
        "45. آمين هللويا",
        "120. نُورُ الحَيَاةِ",
        "476. Music lesson (11) كوردات الـجـيـتـار",
        "477. Sudanese Hymnbook info",
    ];
    let hymns = titles
        .iter()
        .enumerate()
        .map(|(i, t)| Hymn::new(t, &format!("images/{}.jpg", i)))
        .collect();
    Catalog::new(hymns, PathBuf::from("/srv/hosanna"))
}

fn hit_indices(catalog: &Catalog, query: &str) -> Vec<usize> {
    search(catalog, query).into_iter().map(|h| h.index).collect()
}

#[test]
fn test_diacritics_are_ignored_both_ways() {
    let c = catalog();
    // Plain query against a vocalized title
    assert_eq!(hit_indices(&c, "يا رب"), vec![2]);
    // Vocalized query against the same title
    assert_eq!(hit_indices(&c, "رَبُّ"), vec![2]);
    assert_eq!(hit_indices(&c, "نور الحياه"), vec![4]);
}

#[test]
fn test_alef_forms_and_tatweel() {
    let c = catalog();
    assert_eq!(hit_indices(&c, "امين"), vec![3]);
    assert_eq!(hit_indices(&c, "اسم"), vec![1]);
    assert_eq!(hit_indices(&c, "الجيتار"), vec![5]);
}

#[test]
fn test_numbers_in_arabic_digits() {
    let c = catalog();
    assert_eq!(hit_indices(&c, "١٢٠"), vec![4]);
    // Substring semantics: "12" also appears in "120"
    assert_eq!(hit_indices(&c, "12"), vec![2, 4]);
}

#[test]
fn test_case_insensitive_latin() {
    let c = catalog();
    assert_eq!(hit_indices(&c, "SUDANESE"), vec![6]);
    assert_eq!(hit_indices(&c, "english"), vec![0]);
}

#[test]
fn test_blank_query_has_no_results() {
    let c = catalog();
    assert!(search(&c, "").is_empty());
    assert!(search(&c, "   ").is_empty());
    assert!(search(&c, "؟").is_empty());
}

#[test]
fn test_dictated_queries() {
    let c = catalog();
    assert_eq!(clean_voice_input("ترتيلة رقم ٤٥."), "٤٥");
    assert_eq!(hit_indices(&c, "ترنيمة آمين هللويا؟"), vec![3]);
    assert_eq!(hit_indices(&c, "hymn number 477"), vec![6]);
    // A lone filler word is kept as the query itself
    assert_eq!(clean_voice_input("hymn"), "hymn");
}

#[test]
fn test_searcher_matches_one_shot_search() {
    let c = catalog();
    let searcher = Searcher::new(&c);
    for q in ["يا", "music", "٤٧", "xyz"] {
        assert_eq!(searcher.search(q), search(&c, q), "query {}", q);
    }
}

#[test]
fn test_normalize_collapses_whitespace() {
    assert_eq!(normalize("  نُورُ   الحَيَاةِ \n"), "نور الحياه");
}
