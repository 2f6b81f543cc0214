// File: ./src/cli.rs
//! Command-line parsing, help text and the one-shot subcommands.
//!
//! Arguments are parsed by hand. Anything that is not a global flag is treated
//! as a subcommand; no subcommand starts the TUI.
use crate::config::Config;
use crate::context::AppContext;
use crate::help::get_keyboard_help;
use crate::library::{FontSize, Library, SettingsPatch};
use crate::model::Catalog;
use crate::{i18n, logging, search};
use anyhow::{Context, Result, bail};
use rust_i18n::t;
use std::io::Write;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

pub fn print_help(binary_name: &str) {
    println!(
        "Hosanna v{} - Arabic hymnbook viewer",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--catalog <file>]", binary_name);
    println!("    {} [--root <path>] [--catalog <file>] <command>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -c, --catalog <file>  Catalog file (.toml or .json) instead of the configured one.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    list                              List every hymn with its number");
    println!("    search <query>                    Search titles (Arabic diacritics ignored)");
    println!("    show <number>                     Show a hymn and record it as viewed");
    println!("    favorites [add|remove <number>]   List or edit favorites");
    println!("    recent [clear]                    Recently opened from search or number");
    println!("    viewed [clear]                    Viewing history");
    println!("    bookmarks [add|remove <number> [page]]  Pages start at 1");
    println!("    note <number> [text...]           Show a note, or set it (empty text deletes)");
    println!("    notes                             List every note");
    println!("    stats                             Reading statistics");
    println!("    settings [reset|font <small|medium|large>|dark <on|off>]");
    println!("    export [file]                     Write all lists as JSON (stdout by default)");
    println!("    import <file>                     Restore lists from an export");
    println!();
    println!("KEYBINDINGS:");
    for section in get_keyboard_help() {
        println!("  {}", section.title);
        for item in section.items {
            println!("    {}  {}", pad(&item.keys, 16), item.desc);
        }
    }
    println!();
    println!("FILES:");
    println!("    config.toml   catalog, language, log_level, recent_limit, viewed_limit");
}

/// Global flags plus the remaining positional words.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub help: bool,
    pub rest: Vec<String>,
}

/// Parses everything after the binary name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" if out.rest.is_empty() => out.help = true,
            "-r" | "--root" => {
                let v = iter.next().context("--root requires a path")?;
                out.root = Some(PathBuf::from(v));
            }
            "-c" | "--catalog" => {
                let v = iter.next().context("--catalog requires a file")?;
                out.catalog = Some(PathBuf::from(v));
            }
            _ => out.rest.push(arg.clone()),
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Search(String),
    Show(String),
    Favorites(Option<(Edit, String)>),
    Recent { clear: bool },
    Viewed { clear: bool },
    Bookmarks(Option<(Edit, String, u32)>),
    Note { number: String, text: Option<String> },
    Notes,
    Stats,
    Settings(Option<SettingsChange>),
    Export(Option<PathBuf>),
    Import(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Reset,
    Font(FontSize),
    Dark(bool),
}

fn parse_edit(word: &str) -> Result<Edit> {
    match word {
        "add" => Ok(Edit::Add),
        "remove" | "rm" => Ok(Edit::Remove),
        other => bail!("Unknown action '{}', expected add or remove", other),
    }
}

fn parse_switch(word: &str) -> Result<bool> {
    match word {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("Expected on or off, got '{}'", other),
    }
}

impl Command {
    /// `Ok(None)` means no subcommand was given.
    pub fn parse(words: &[String]) -> Result<Option<Command>> {
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize, what: &str| -> Result<String> {
            args.get(i)
                .cloned()
                .with_context(|| format!("'{}' requires {}", name, what))
        };
        let cmd = match name.as_str() {
            "list" => Command::List,
            "search" => {
                if args.is_empty() {
                    bail!("'search' requires a query");
                }
                Command::Search(args.join(" "))
            }
            "show" => Command::Show(arg(0, "a hymn number")?),
            "favorites" | "favs" => match args.first() {
                None => Command::Favorites(None),
                Some(w) => Command::Favorites(Some((parse_edit(w)?, arg(1, "a hymn number")?))),
            },
            "recent" => Command::Recent {
                clear: matches!(args.first().map(String::as_str), Some("clear")),
            },
            "viewed" | "history" => Command::Viewed {
                clear: matches!(args.first().map(String::as_str), Some("clear")),
            },
            "bookmarks" => match args.first() {
                None => Command::Bookmarks(None),
                Some(w) => {
                    // Pages are 1-based on the command line, 0-based in storage
                    let page = match args.get(2) {
                        Some(p) => p
                            .parse::<u32>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .with_context(|| format!("Invalid page '{}', pages start at 1", p))?,
                        None => 0,
                    };
                    Command::Bookmarks(Some((parse_edit(w)?, arg(1, "a hymn number")?, page)))
                }
            },
            "note" => Command::Note {
                number: arg(0, "a hymn number")?,
                text: if args.len() > 1 {
                    Some(args[1..].join(" "))
                } else {
                    None
                },
            },
            "notes" => Command::Notes,
            "stats" | "statistics" => Command::Stats,
            "settings" => match args.first().map(String::as_str) {
                None => Command::Settings(None),
                Some("reset") => Command::Settings(Some(SettingsChange::Reset)),
                Some("font") => {
                    let v = arg(1, "small, medium or large")?;
                    let size = FontSize::parse(&v)
                        .with_context(|| format!("Unknown font size '{}'", v))?;
                    Command::Settings(Some(SettingsChange::Font(size)))
                }
                Some("dark") => {
                    Command::Settings(Some(SettingsChange::Dark(parse_switch(&arg(1, "on or off")?)?)))
                }
                Some(other) => bail!("Unknown settings option '{}'", other),
            },
            "export" => Command::Export(args.first().map(PathBuf::from)),
            "import" => Command::Import(PathBuf::from(arg(0, "a file")?)),
            other => bail!("Unknown command '{}'. See --help.", other),
        };
        Ok(Some(cmd))
    }
}

/// Left-aligns `text` to `width` terminal columns (Arabic and emoji aware).
fn pad(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    if w >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - w))
    }
}

fn number_column(catalog: &Catalog) -> usize {
    catalog.len().max(1).to_string().len()
}

fn resolve(catalog: &Catalog, number: &str) -> Result<usize> {
    catalog
        .resolve_number(number)
        .with_context(|| t!("invalid_number", max = catalog.len()).to_string())
}

fn print_indices(out: &mut dyn Write, catalog: &Catalog, indices: &[usize], empty: &str) -> Result<()> {
    if indices.is_empty() {
        writeln!(out, "{}", empty)?;
        return Ok(());
    }
    let w = number_column(catalog);
    for &i in indices {
        writeln!(out, "{:>w$}  {}", i + 1, catalog.title_or_placeholder(i), w = w)?;
    }
    Ok(())
}

/// Loads config, logging, locale, catalog and store, then runs `cmd`.
pub fn run(ctx: &dyn AppContext, catalog_override: Option<PathBuf>, cmd: Command) -> Result<()> {
    let mut cfg = Config::load_or_init(ctx)?;
    if catalog_override.is_some() {
        cfg.catalog = catalog_override;
    }
    if let Err(e) = logging::init_term_logger(&cfg) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    i18n::apply(&cfg);
    let catalog = cfg.open_catalog()?;
    let library = Library::open(ctx)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&library, &catalog, &cfg, cmd, &mut out)
}

/// Runs one subcommand against an opened library, writing to `out`.
pub fn execute(
    library: &Library,
    catalog: &Catalog,
    cfg: &Config,
    cmd: Command,
    out: &mut dyn Write,
) -> Result<()> {
    log::debug!("Running command {:?}", cmd);
    match cmd {
        Command::List => {
            let all: Vec<usize> = (0..catalog.len()).collect();
            print_indices(out, catalog, &all, &t!("empty_catalog"))?;
        }
        Command::Search(query) => {
            let hits: Vec<usize> = search::search(catalog, &query)
                .into_iter()
                .map(|h| h.index)
                .collect();
            print_indices(out, catalog, &hits, &t!("no_search_results"))?;
        }
        Command::Show(number) => {
            let index = resolve(catalog, &number)?;
            // Opening by number counts as quick access
            library.add_recent(index)?;
            library.add_viewed(index)?;
            writeln!(out, "{}", catalog.title_or_placeholder(index))?;
            writeln!(out, "{}: {} / {}", t!("page_label"), index + 1, catalog.len())?;
            if let Some(p) = catalog.image_path(index) {
                writeln!(out, "{}: {}", t!("image_label"), p.display())?;
            }
            if let Some(p) = catalog.music_path(index) {
                writeln!(out, "{}: {}", t!("music_label"), p.display())?;
            }
            if library.is_favorite(index)? {
                writeln!(out, "★ {}", t!("favorite"))?;
            }
            if library.get_bookmarks()?.iter().any(|b| b.index == index) {
                writeln!(out, "🔖 {}", t!("bookmarked"))?;
            }
            let note = library.get_note(index)?;
            if !note.is_empty() {
                writeln!(out, "{}: {}", t!("note_label"), note)?;
            }
        }
        Command::Favorites(None) => {
            print_indices(out, catalog, &library.get_favorites()?, &t!("no_favorites"))?;
        }
        Command::Favorites(Some((edit, number))) => {
            let index = resolve(catalog, &number)?;
            match edit {
                Edit::Add => {
                    library.add_favorite(index)?;
                    writeln!(out, "{}", t!("added_to_favorites"))?;
                }
                Edit::Remove => {
                    library.remove_favorite(index)?;
                    writeln!(out, "{}", t!("removed_from_favorites"))?;
                }
            }
        }
        Command::Recent { clear: true } => {
            library.clear_recent()?;
            writeln!(out, "{}", t!("recent_cleared"))?;
        }
        Command::Recent { clear: false } => {
            let recent = library.get_recent(cfg.recent_limit)?;
            print_indices(out, catalog, &recent, &t!("no_recent"))?;
        }
        Command::Viewed { clear: true } => {
            library.clear_viewed()?;
            writeln!(out, "{}", t!("history_cleared"))?;
        }
        Command::Viewed { clear: false } => {
            let viewed = library.get_viewed(cfg.viewed_limit)?;
            if viewed.is_empty() {
                writeln!(out, "{}", t!("no_viewed"))?;
            }
            let w = number_column(catalog);
            for v in viewed {
                let when = v
                    .local_time()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{:>w$}  {}  {}",
                    v.index + 1,
                    when,
                    catalog.title_or_placeholder(v.index),
                    w = w
                )?;
            }
        }
        Command::Bookmarks(None) => {
            let bookmarks = library.get_bookmarks()?;
            if bookmarks.is_empty() {
                writeln!(out, "{}", t!("no_bookmarks"))?;
            }
            let titles: Vec<String> = bookmarks
                .iter()
                .map(|b| catalog.title_or_placeholder(b.index))
                .collect();
            let width = titles.iter().map(|t| t.width()).max().unwrap_or(0);
            let w = number_column(catalog);
            for (b, title) in bookmarks.iter().zip(titles) {
                writeln!(
                    out,
                    "{:>w$}  {}  {}",
                    b.index + 1,
                    pad(&title, width),
                    t!("bookmark_page", page = b.page.saturating_add(1)),
                    w = w
                )?;
            }
        }
        Command::Bookmarks(Some((edit, number, page))) => {
            let index = resolve(catalog, &number)?;
            match edit {
                Edit::Add => {
                    library.add_bookmark(index, page)?;
                    writeln!(out, "{}", t!("bookmark_added"))?;
                }
                Edit::Remove => {
                    library.remove_bookmark(index, page)?;
                    writeln!(out, "{}", t!("bookmark_removed"))?;
                }
            }
        }
        Command::Note { number, text: None } => {
            let index = resolve(catalog, &number)?;
            let note = library.get_note(index)?;
            if note.is_empty() {
                writeln!(out, "{}", t!("no_note"))?;
            } else {
                writeln!(out, "{}", note)?;
            }
        }
        Command::Note {
            number,
            text: Some(text),
        } => {
            let index = resolve(catalog, &number)?;
            library.save_note(index, &text)?;
            if text.trim().is_empty() {
                writeln!(out, "{}", t!("note_deleted"))?;
            } else {
                writeln!(out, "{}", t!("note_saved"))?;
            }
        }
        Command::Notes => {
            let notes = library.get_all_notes()?;
            if notes.is_empty() {
                writeln!(out, "{}", t!("no_notes"))?;
            }
            let w = number_column(catalog);
            for (index, note) in notes {
                writeln!(out, "{:>w$}  {}", index + 1, catalog.title_or_placeholder(index), w = w)?;
                for line in note.lines() {
                    writeln!(out, "{:>w$}  {}", "", line, w = w)?;
                }
            }
        }
        Command::Stats => {
            let stats = library.statistics(catalog.len())?;
            let rows = [
                (t!("stat_total"), stats.total_hymns),
                (t!("stat_favorites"), stats.favorites),
                (t!("stat_viewed"), stats.viewed),
                (t!("stat_notes"), stats.notes),
                (t!("stat_bookmarks"), stats.bookmarks),
            ];
            let width = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
            for (label, value) in rows {
                writeln!(out, "{}  {}", pad(&label, width), value)?;
            }
            writeln!(
                out,
                "{}",
                t!("progress_detail", percent = stats.progress_percent())
            )?;
        }
        Command::Settings(change) => {
            let settings = match change {
                None => library.get_settings()?,
                Some(SettingsChange::Reset) => library.reset_settings()?,
                Some(SettingsChange::Font(size)) => {
                    library.update_settings(&SettingsPatch::font(size))?
                }
                Some(SettingsChange::Dark(on)) => {
                    library.update_settings(&SettingsPatch::dark_mode(on))?
                }
            };
            let font = match settings.font_preset() {
                Some(p) => t!(p.i18n_key()).to_string(),
                None => settings.font_size.to_string(),
            };
            writeln!(out, "{}: {} ({}pt)", t!("font_size_label"), font, settings.font_size)?;
            writeln!(
                out,
                "{}: {}",
                t!("dark_mode"),
                if settings.dark_mode { t!("on") } else { t!("off") }
            )?;
            writeln!(out, "theme: {}", settings.theme)?;
        }
        Command::Export(path) => {
            let snapshot = serde_json::to_string_pretty(&library.export()?)?;
            match path {
                Some(p) => {
                    std::fs::write(&p, snapshot)
                        .with_context(|| format!("Failed to write {:?}", p))?;
                    log::info!("Exported lists to {:?}", p);
                }
                None => writeln!(out, "{}", snapshot)?,
            }
        }
        Command::Import(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let snapshot: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid backup file {:?}", path))?;
            let written = library.import(&snapshot)?;
            writeln!(out, "{}", t!("import_done", count = written))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_global_flags() {
        let a = parse_args(&words("--root /tmp/h -c cat.toml search ربي يسوع")).unwrap();
        assert_eq!(a.root, Some(PathBuf::from("/tmp/h")));
        assert_eq!(a.catalog, Some(PathBuf::from("cat.toml")));
        assert_eq!(a.rest, words("search ربي يسوع"));
        assert!(!a.help);

        assert!(parse_args(&words("--help")).unwrap().help);
        assert!(parse_args(&words("--root")).is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&[]).unwrap(), None);
        assert_eq!(
            Command::parse(&words("search hymn 12")).unwrap(),
            Some(Command::Search("hymn 12".into()))
        );
        assert_eq!(
            Command::parse(&words("bookmarks add 3 2")).unwrap(),
            Some(Command::Bookmarks(Some((Edit::Add, "3".into(), 1))))
        );
        assert_eq!(
            Command::parse(&words("bookmarks add 3")).unwrap(),
            Some(Command::Bookmarks(Some((Edit::Add, "3".into(), 0))))
        );
        assert!(Command::parse(&words("bookmarks add 3 0")).is_err());
        assert!(Command::parse(&words("bookmarks add 3 two")).is_err());
        assert_eq!(
            Command::parse(&words("note 3")).unwrap(),
            Some(Command::Note {
                number: "3".into(),
                text: None
            })
        );
        assert_eq!(
            Command::parse(&words("settings font large")).unwrap(),
            Some(Command::Settings(Some(SettingsChange::Font(FontSize::Large))))
        );
        assert_eq!(
            Command::parse(&words("settings dark on")).unwrap(),
            Some(Command::Settings(Some(SettingsChange::Dark(true))))
        );
        assert!(Command::parse(&words("favorites toggle 3")).is_err());
        assert!(Command::parse(&words("frobnicate")).is_err());
        assert!(Command::parse(&words("show")).is_err());
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("★", 3).width(), 3);
        assert_eq!(pad("toolong", 3), "toolong");
    }
}
