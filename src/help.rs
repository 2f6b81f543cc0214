// File: ./src/help.rs
//! Localized keyboard help.
//!
//! Sections are built at call time with `rust_i18n::t!()` so they follow the
//! active locale. The TUI help popup and `hosanna --help` both render them.

#[derive(Clone, Debug)]
pub struct HelpItem {
    pub keys: String,
    pub desc: String,
}

#[derive(Clone, Debug)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<HelpItem>,
}

fn item(keys: &str, desc: impl Into<String>) -> HelpItem {
    HelpItem {
        keys: keys.to_string(),
        desc: desc.into(),
    }
}

pub fn get_keyboard_help() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: rust_i18n::t!("help_section_navigation").to_string(),
            items: vec![
                item("j/k, ↓/↑", rust_i18n::t!("help_move_selection")),
                item("PgDn/PgUp", rust_i18n::t!("help_scroll_page")),
                item("Enter", rust_i18n::t!("help_open_selected")),
                item("Esc, Backspace", rust_i18n::t!("help_go_back")),
                item("q", rust_i18n::t!("help_quit")),
            ],
        },
        HelpSection {
            title: rust_i18n::t!("help_section_viewer").to_string(),
            items: vec![
                item("→/l, ←/h", rust_i18n::t!("help_next_previous_hymn")),
                item("+ / -", rust_i18n::t!("help_zoom")),
                item("0", rust_i18n::t!("help_reset_zoom")),
                item("f", rust_i18n::t!("help_toggle_favorite")),
                item("b", rust_i18n::t!("help_toggle_bookmark")),
                item("n", rust_i18n::t!("help_edit_note")),
            ],
        },
        HelpSection {
            title: rust_i18n::t!("help_section_screens").to_string(),
            items: vec![
                item("/", rust_i18n::t!("search_title")),
                item("g", rust_i18n::t!("quick_access_title")),
                item("F", rust_i18n::t!("favorites_title")),
                item("V", rust_i18n::t!("recently_viewed_title")),
                item("N", rust_i18n::t!("notes_title")),
                item("B", rust_i18n::t!("bookmarks_title")),
                item("S", rust_i18n::t!("statistics_title")),
                item(",", rust_i18n::t!("settings_title")),
                item("?", rust_i18n::t!("help_toggle_help")),
            ],
        },
        HelpSection {
            title: rust_i18n::t!("help_section_lists").to_string(),
            items: vec![
                item("d, Delete", rust_i18n::t!("help_remove_entry")),
                item("C", rust_i18n::t!("help_clear_list")),
                item("Tab", rust_i18n::t!("help_switch_tab")),
            ],
        },
    ]
}
