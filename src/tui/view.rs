// File: src/tui/view.rs
use crate::help::get_keyboard_help;
use crate::library::FontSize;
use crate::tui::action::QuickTab;
use crate::tui::state::{AppState, InputMode, SETTINGS_ROWS, Screen, SettingsRow};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap},
};
use rust_i18n::t;

struct Palette {
    base: Style,
    accent: Color,
    highlight: Style,
    muted: Color,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            base: Style::default().fg(Color::Gray).bg(Color::Black),
            accent: Color::LightCyan,
            highlight: Style::default().bg(Color::DarkGray).fg(Color::White),
            muted: Color::DarkGray,
        }
    } else {
        Palette {
            base: Style::default(),
            accent: Color::Blue,
            highlight: Style::default().bg(Color::Blue).fg(Color::White),
            muted: Color::Gray,
        }
    }
}

fn screen_title(screen: Screen) -> String {
    match screen {
        Screen::Titles => t!("app_title"),
        Screen::Viewer => t!("viewer_title"),
        Screen::Search => t!("search_title"),
        Screen::QuickAccess => t!("quick_access_title"),
        Screen::Favorites => t!("favorites_title"),
        Screen::Viewed => t!("recently_viewed_title"),
        Screen::Notes => t!("notes_title"),
        Screen::Bookmarks => t!("bookmarks_title"),
        Screen::Statistics => t!("statistics_title"),
        Screen::Settings => t!("settings_title"),
    }
    .to_string()
}

fn row(text: String, rtl: bool) -> ListItem<'static> {
    let line = Line::from(text);
    if rtl {
        ListItem::new(line.alignment(Alignment::Right))
    } else {
        ListItem::new(line)
    }
}

fn align(rtl: bool) -> Alignment {
    if rtl { Alignment::Right } else { Alignment::Left }
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let pal = palette(state.settings.dark_mode);
    f.render_widget(Block::default().style(pal.base), f.area());

    let footer_height = if state.show_full_help {
        Constraint::Percentage(60)
    } else {
        Constraint::Length(3)
    };
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), footer_height])
        .split(f.area());
    let main_area = v_chunks[0];
    let footer_area = v_chunks[1];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(pal.accent))
        .title(format!(" {} ", screen_title(state.screen)))
        .title_alignment(align(state.rtl));

    match state.screen {
        Screen::Titles => draw_titles(f, state, main_area, block, &pal),
        Screen::Viewer => draw_viewer(f, state, main_area, block, &pal),
        Screen::Search => draw_search(f, state, main_area, block, &pal),
        Screen::QuickAccess => draw_quick_access(f, state, main_area, block, &pal),
        Screen::Favorites => {
            let items = state
                .favorites
                .iter()
                .map(|&i| row(state.title(i), state.rtl))
                .collect();
            draw_list(f, items, main_area, block, &pal, &mut state.favorites_state, t!("no_favorites").to_string());
        }
        Screen::Viewed => {
            let items = state
                .viewed
                .iter()
                .map(|v| {
                    let when = v
                        .local_time()
                        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    row(format!("{}  ({})", state.title(v.index), when), state.rtl)
                })
                .collect();
            draw_list(f, items, main_area, block, &pal, &mut state.viewed_state, t!("no_viewed").to_string());
        }
        Screen::Notes => {
            let items = state
                .notes
                .iter()
                .map(|(&i, note)| {
                    let first_line = note.lines().next().unwrap_or_default();
                    row(format!("{}: {}", state.title(i), first_line), state.rtl)
                })
                .collect();
            draw_list(f, items, main_area, block, &pal, &mut state.notes_state, t!("no_notes").to_string());
        }
        Screen::Bookmarks => {
            let items = state
                .bookmarks
                .iter()
                .map(|b| {
                    row(
                        format!("{}  {}", state.title(b.index), t!("bookmark_page", page = b.page.saturating_add(1))),
                        state.rtl,
                    )
                })
                .collect();
            draw_list(f, items, main_area, block, &pal, &mut state.bookmarks_state, t!("no_bookmarks").to_string());
        }
        Screen::Statistics => draw_statistics(f, state, main_area, block, &pal),
        Screen::Settings => draw_settings(f, state, main_area, block, &pal),
    }

    draw_footer(f, state, footer_area, &pal);

    if state.mode == InputMode::EditingNote {
        draw_note_editor(f, state, &pal);
    }
}

fn draw_list(
    f: &mut Frame,
    items: Vec<ListItem<'static>>,
    area: Rect,
    block: Block,
    pal: &Palette,
    list_state: &mut ratatui::widgets::ListState,
    empty_text: String,
) {
    if items.is_empty() {
        let p = Paragraph::new(empty_text)
            .style(Style::default().fg(pal.muted))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(pal.highlight)
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, list_state);
}

fn draw_titles(f: &mut Frame, state: &mut AppState, area: Rect, block: Block, pal: &Palette) {
    let items = state
        .catalog
        .iter()
        .map(|(i, hymn)| {
            let mut marks = String::new();
            if state.favorites.contains(&i) {
                marks.push('★');
            }
            if state.notes.contains_key(&i) {
                marks.push('✎');
            }
            let text = if marks.is_empty() {
                hymn.title.clone()
            } else {
                format!("{} {}", hymn.title, marks)
            };
            row(text, state.rtl)
        })
        .collect();
    draw_list(f, items, area, block, pal, &mut state.titles_state, t!("empty_catalog").to_string());
}

fn draw_viewer(f: &mut Frame, state: &AppState, area: Rect, block: Block, pal: &Palette) {
    let Some(viewer) = state.viewer.as_ref() else {
        return;
    };
    let index = viewer.index();
    let label = Style::default().fg(pal.accent).add_modifier(Modifier::BOLD);

    let mut flags = Vec::new();
    if state.favorites.contains(&index) {
        flags.push(format!("★ {}", t!("favorite")));
    }
    if state.bookmarks.iter().any(|b| b.matches(index, 0)) {
        flags.push(format!("🔖 {}", t!("bookmarked")));
    }

    let path_or_dash = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    let mut lines = vec![
        Line::from(Span::styled(
            viewer.current_title(&state.catalog),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}: ", t!("page_label")), label),
            Span::raw(viewer.page_label()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", t!("zoom_label")), label),
            Span::raw(format!("{}%", viewer.zoom_percent())),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", t!("image_label")), label),
            Span::raw(path_or_dash(state.catalog.image_path(index))),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", t!("music_label")), label),
            Span::raw(path_or_dash(state.catalog.music_path(index))),
        ]),
    ];
    if !flags.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(flags.join("   ")));
    }
    if let Some(note) = state.notes.get(&index) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("{}:", t!("note_label")), label)));
        for l in note.lines() {
            lines.push(Line::from(l.to_string()));
        }
    }

    let p = Paragraph::new(lines)
        .block(block)
        .alignment(align(state.rtl))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn draw_input(f: &mut Frame, state: &AppState, area: Rect, title: String, pal: &Palette) {
    let input = Paragraph::new(state.input_buffer.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(pal.accent))
            .title(title),
    );
    f.render_widget(input, area);
    let cursor_x = area.x + 1 + state.cursor_position as u16;
    f.set_cursor_position((
        cursor_x.min(area.x + area.width.saturating_sub(2)),
        area.y + 1,
    ));
}

fn draw_search(f: &mut Frame, state: &mut AppState, area: Rect, block: Block, pal: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    draw_input(f, state, chunks[0], format!(" {} ", t!("search_placeholder")), pal);

    let empty = if state.input_buffer.trim().is_empty() {
        String::new()
    } else {
        t!("no_search_results").to_string()
    };
    let items = state
        .search_results
        .iter()
        .map(|hit| row(hit.title.clone(), state.rtl))
        .collect();
    draw_list(f, items, chunks[1], block, pal, &mut state.search_state, empty);
}

fn draw_quick_access(f: &mut Frame, state: &mut AppState, area: Rect, block: Block, pal: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let selected = match state.quick_tab {
        QuickTab::Favorites => 0,
        QuickTab::Recent => 1,
        QuickTab::Number => 2,
    };
    let tabs = Tabs::new(vec![
        t!("tab_favorites").to_string(),
        t!("tab_recent").to_string(),
        t!("tab_number").to_string(),
    ])
    .select(selected)
    .block(block)
    .highlight_style(
        Style::default()
            .fg(pal.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    );
    f.render_widget(tabs, chunks[0]);

    let body = Block::default().borders(Borders::ALL);
    match state.quick_tab {
        QuickTab::Favorites => {
            let items = state
                .favorites
                .iter()
                .map(|&i| row(state.title(i), state.rtl))
                .collect();
            draw_list(f, items, chunks[1], body, pal, &mut state.quick_state, t!("no_favorites").to_string());
        }
        QuickTab::Recent => {
            let items = state
                .recent
                .iter()
                .map(|&i| row(state.title(i), state.rtl))
                .collect();
            draw_list(f, items, chunks[1], body, pal, &mut state.quick_state, t!("no_recent").to_string());
        }
        QuickTab::Number => {
            let inner = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            draw_input(f, state, inner[0], format!(" {} ", t!("go_to_number")), pal);
            let hint = Paragraph::new(t!("go_to_number_hint", max = state.catalog.len()).to_string())
                .style(Style::default().fg(pal.muted))
                .alignment(align(state.rtl));
            f.render_widget(hint, inner[1]);
        }
    }
}

fn draw_statistics(f: &mut Frame, state: &AppState, area: Rect, block: Block, pal: &Palette) {
    let Some(stats) = state.statistics else {
        let p = Paragraph::new(t!("loading").to_string()).block(block);
        f.render_widget(p, area);
        return;
    };
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let label = Style::default().fg(pal.accent).add_modifier(Modifier::BOLD);
    let stat = |key: String, value: usize| {
        Line::from(vec![
            Span::styled(format!("{}: ", key), label),
            Span::raw(value.to_string()),
        ])
    };
    let lines = vec![
        stat(t!("stat_total").to_string(), stats.total_hymns),
        stat(t!("stat_favorites").to_string(), stats.favorites),
        stat(t!("stat_viewed").to_string(), stats.viewed),
        stat(t!("stat_notes").to_string(), stats.notes),
        stat(t!("stat_bookmarks").to_string(), stats.bookmarks),
    ];
    f.render_widget(Paragraph::new(lines).alignment(align(state.rtl)), chunks[0]);

    let percent = stats.progress_percent().min(100) as u16;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", t!("progress"))))
        .gauge_style(Style::default().fg(pal.accent))
        .percent(percent);
    f.render_widget(gauge, chunks[1]);

    let detail = Paragraph::new(t!("progress_detail", percent = percent).to_string())
        .style(Style::default().fg(pal.muted))
        .alignment(Alignment::Center);
    f.render_widget(detail, chunks[2]);
}

fn draw_settings(f: &mut Frame, state: &mut AppState, area: Rect, block: Block, pal: &Palette) {
    let preset = state.settings.font_preset();
    let radio = |size: FontSize| {
        let mark = if preset == Some(size) { "(•)" } else { "( )" };
        format!("{} {}: {}", mark, t!("font_size_label"), t!(size.i18n_key()))
    };
    let items = SETTINGS_ROWS
        .iter()
        .map(|r| {
            let text = match r {
                SettingsRow::FontSmall => radio(FontSize::Small),
                SettingsRow::FontMedium => radio(FontSize::Medium),
                SettingsRow::FontLarge => radio(FontSize::Large),
                SettingsRow::DarkMode => {
                    let mark = if state.settings.dark_mode { "[x]" } else { "[ ]" };
                    format!("{} {}", mark, t!("dark_mode"))
                }
                SettingsRow::Reset => t!("reset_settings").to_string(),
            };
            row(text, state.rtl)
        })
        .collect();
    draw_list(f, items, area, block, pal, &mut state.settings_state, String::new());
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect, pal: &Palette) {
    if state.show_full_help {
        let mut lines = Vec::new();
        for section in get_keyboard_help() {
            lines.push(Line::from(Span::styled(
                format!(" {} ", section.title),
                Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
            )));
            for item in section.items {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<16}", item.keys), Style::default().fg(Color::Yellow)),
                    Span::raw(item.desc),
                ]));
            }
        }
        let p = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", t!("help_title"))),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
        return;
    }

    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(pal.accent))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(format!(" {} ", t!("status_title"))),
        );
    let hints = match (state.screen, state.mode) {
        (_, InputMode::Searching) => t!("actions_search"),
        (_, InputMode::GoToNumber) => t!("actions_number"),
        (_, InputMode::EditingNote) => t!("actions_note"),
        (Screen::Viewer, _) => t!("actions_viewer"),
        (Screen::Settings, _) => t!("actions_settings"),
        (Screen::Titles, _) => t!("actions_titles"),
        _ => t!("actions_list"),
    };
    let help = Paragraph::new(hints.to_string())
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(format!(" {} ", t!("actions_title"))),
        );
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);
    f.render_widget(status, chunks[0]);
    f.render_widget(help, chunks[1]);
}

fn draw_note_editor(f: &mut Frame, state: &AppState, pal: &Palette) {
    let area = centered_rect(60, 20, f.area());
    let title = match state.note_target {
        Some(i) => format!(" {}: {} ", t!("note_editor_title"), state.title(i)),
        None => format!(" {} ", t!("note_editor_title")),
    };
    f.render_widget(Clear, area);
    let input = Paragraph::new(state.input_buffer.as_str())
        .style(pal.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(input, area);
    let inner_width = area.width.saturating_sub(2).max(1);
    let pos = state.cursor_position as u16;
    f.set_cursor_position((
        area.x + 1 + pos % inner_width,
        (area.y + 1 + pos / inner_width).min(area.y + area.height.saturating_sub(2)),
    ));
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
