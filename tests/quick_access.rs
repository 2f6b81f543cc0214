// Go-to-number resolution and catalog files on disk.
use hosanna::context::TestContext;
use hosanna::model::Catalog;
use std::fs;

fn write_catalog(ctx: &TestContext, name: &str, contents: &str) -> std::path::PathBuf {
    let path = ctx.root.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_resolve_number_bounds() {
    let c = Catalog::builtin();
    let len = c.len();
    assert_eq!(c.resolve_number("1"), Some(0));
    assert_eq!(c.resolve_number(&len.to_string()), Some(len - 1));
    assert_eq!(c.resolve_number("0"), None);
    assert_eq!(c.resolve_number(&(len + 1).to_string()), None);
    assert_eq!(c.resolve_number("-2"), None);
    assert_eq!(c.resolve_number(""), None);
    assert_eq!(c.resolve_number("abc"), None);
}

#[test]
fn test_resolve_number_accepts_arabic_digits_and_spaces() {
    let c = Catalog::builtin();
    assert_eq!(c.resolve_number(" ٣ "), Some(2));
    assert_eq!(c.resolve_number("۲"), Some(1));
}

#[test]
fn test_toml_catalog_resolves_assets_next_to_file() {
    let ctx = TestContext::new();
    let path = write_catalog(
        &ctx,
        "hymns.toml",
        r#"
[[hymn]]
title = "1. أول"
image = "images/001.jpg"
music = "music/001.jpg"

[[hymn]]
title = "2. ثاني"
image = "images/002.jpg"
"#,
    );
    let c = Catalog::load(&path).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.image_path(1), Some(ctx.root.join("images/002.jpg")));
    assert_eq!(c.music_path(0), Some(ctx.root.join("music/001.jpg")));
    assert_eq!(c.music_path(1), None);
    assert_eq!(c.get(0).and_then(|h| h.number()), Some(1));
}

#[test]
fn test_json_catalog() {
    let ctx = TestContext::new();
    let path = write_catalog(
        &ctx,
        "hymns.json",
        r#"[{"title": "مقدمة", "image": "intro.jpg"}, {"title": "7. سبعة", "image": "7.jpg", "music": "7.mp3"}]"#,
    );
    let c = Catalog::load(&path).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.get(0).and_then(|h| h.number()), None);
    assert_eq!(c.title_or_placeholder(9), "Item 9");
}

#[test]
fn test_broken_catalog_reports_path() {
    let ctx = TestContext::new();
    let path = write_catalog(&ctx, "broken.toml", "[[hymn]]\ntitle = ");
    let err = Catalog::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.toml"));

    let missing = ctx.root.join("nope.json");
    assert!(Catalog::load(&missing).is_err());
}
