// One-shot subcommands against an in-memory library.
use hosanna::cli::{Command, execute};
use hosanna::config::Config;
use hosanna::library::Library;
use hosanna::model::Catalog;
use serial_test::serial;

fn words(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

fn run(lib: &Library, line: &str) -> anyhow::Result<String> {
    rust_i18n::set_locale("en");
    let catalog = Catalog::builtin();
    let cmd = Command::parse(&words(line))?.expect("command");
    let mut out = Vec::new();
    execute(lib, &catalog, &Config::default(), cmd, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
#[serial]
fn test_list_numbers_every_hymn() {
    let lib = Library::in_memory();
    let out = run(&lib, "list").unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), Catalog::builtin().len());
    assert!(lines[0].starts_with("1  "));
    assert!(lines[4].contains("Sudanese"));
}

#[test]
#[serial]
fn test_show_records_recent_and_viewed() {
    let lib = Library::in_memory();
    let out = run(&lib, "show ٣").unwrap();
    assert!(out.starts_with("1. إسم بتاو بركة يسو"));
    assert!(out.contains("Page: 3 / 5"));
    assert_eq!(lib.get_recent(10).unwrap(), vec![2]);
    assert_eq!(lib.get_viewed(10).unwrap()[0].index, 2);

    let err = run(&lib, "show 99").unwrap_err();
    assert!(err.to_string().contains("1 to 5"));
}

#[test]
#[serial]
fn test_favorites_and_notes_roundtrip() {
    let lib = Library::in_memory();
    run(&lib, "favorites add 2").unwrap();
    run(&lib, "favorites add 2").unwrap();
    assert_eq!(lib.get_favorites().unwrap(), vec![1]);

    run(&lib, "note 2 play in G").unwrap();
    assert_eq!(run(&lib, "note 2").unwrap().trim(), "play in G");
    let notes = run(&lib, "notes").unwrap();
    assert!(notes.contains("play in G"));

    run(&lib, "favorites remove 2").unwrap();
    assert!(run(&lib, "favorites").unwrap().contains("No favorites"));
}

#[test]
#[serial]
fn test_bookmark_pages_roundtrip_as_typed() {
    let lib = Library::in_memory();
    run(&lib, "bookmarks add 4 2").unwrap();
    run(&lib, "bookmarks add 4").unwrap();
    let out = run(&lib, "bookmarks").unwrap();
    assert!(out.contains("page 2"));
    assert!(out.contains("page 1"));
    assert!(!out.contains("page 3"));

    // Removing by the printed page removes that bookmark
    run(&lib, "bookmarks remove 4 2").unwrap();
    let left = lib.get_bookmarks().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].page, 0);

    assert!(run(&lib, "bookmarks add 4 0").is_err());
}

#[test]
#[serial]
fn test_bookmark_on_last_page_number_lists_without_overflow() {
    let lib = Library::in_memory();
    lib.add_bookmark(0, u32::MAX).unwrap();
    let out = run(&lib, "bookmarks").unwrap();
    assert!(out.contains(&format!("page {}", u32::MAX)));

    run(&lib, &format!("bookmarks add 1 {}", u32::MAX)).unwrap();
    assert!(lib.is_bookmarked(0, u32::MAX - 1).unwrap());
}

#[test]
#[serial]
fn test_stats_and_settings() {
    let lib = Library::in_memory();
    run(&lib, "show 1").unwrap();
    let out = run(&lib, "stats").unwrap();
    assert!(out.contains("20% of hymns viewed"));

    let out = run(&lib, "settings dark on").unwrap();
    assert!(out.contains("Dark mode: on"));
    assert!(out.contains("theme: dark"));
    let out = run(&lib, "settings reset").unwrap();
    assert!(out.contains("Font size: Medium (16pt)"));
}

#[test]
#[serial]
fn test_search_and_clear_history() {
    let lib = Library::in_memory();
    let out = run(&lib, "search music lesson").unwrap();
    assert!(out.trim_start().starts_with("4  476."));
    assert!(run(&lib, "search zzzz").unwrap().contains("No search results"));

    run(&lib, "show 1").unwrap();
    run(&lib, "viewed clear").unwrap();
    assert!(lib.get_viewed(10).unwrap().is_empty());
    run(&lib, "recent clear").unwrap();
    assert!(lib.get_recent(10).unwrap().is_empty());
}
