//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "open folder / play track".to_string());
    map.insert("bksp/u".to_string(), "parent folder".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L is filled dynamically from config.
    map.insert("r".to_string(), "loop mode".to_string());
    map.insert("R".to_string(), "reload".to_string());
    map.insert("x".to_string(), "stop".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "gg/G", "enter", "bksp/u", "space/p", "h/l", "H/L", "r", "R", "x", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `elapsed/total`, or just `elapsed` while the duration is unresolved.
fn now_playing_time_text(elapsed: Duration, total: Option<Duration>) -> String {
    match total {
        Some(t) => format!("{}/{}", format_mmss(elapsed), format_mmss(t)),
        None => format_mmss(elapsed),
    }
}

/// Breadcrumb trail of the folder being shown.
fn crumb_text(app: &App) -> String {
    app.crumbs
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<&str>>()
        .join("/")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cirro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        parts.push(format!(" Path: {}", crumb_text(app)));

        let loop_text = match app.loop_mode {
            crate::audio::LoopMode::NoLoop => "PLAYBACK: No-loop",
            crate::audio::LoopMode::LoopAll => "PLAYBACK: Loop-around",
            crate::audio::LoopMode::LoopOne => "PLAYBACK: Repeat-one",
        };
        parts.push(loop_text.to_string());

        // playback info
        if let Some(ref h) = app.playback_handle {
            if let Ok(info) = h.lock() {
                match info.track {
                    Some(id) => {
                        let state = if info.playing { "Playing" } else { "Paused" };
                        // The playing track may belong to a listing we already
                        // navigated away from.
                        let song = app
                            .tracks
                            .iter()
                            .find(|t| t.id == id)
                            .map(|t| t.display())
                            .unwrap_or_else(|| "…".to_string());
                        let time = now_playing_time_text(info.elapsed, info.duration);
                        parts.push(format!("Song: {} [{}]", song, time));
                        parts.push(state.to_string());
                    }
                    None => parts.push("Stopped".to_string()),
                }
            }
        }

        if app.loading {
            parts.push("Loading…".to_string());
        }

        if let Some(ref message) = app.status {
            parts.push(format!("! {}", message));
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .slow_blink()
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list: either sub-folders or tracks, never both.
    {
        let playing_id = app
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().and_then(|info| info.track));

        let (title, rows): (&str, Vec<String>) = if app.is_browsing_folders() {
            (
                " folders ",
                app.folders.iter().map(|f| format!("{}/", f.name)).collect(),
            )
        } else {
            (
                " tracks ",
                app.tracks
                    .iter()
                    .map(|t| {
                        if playing_id == Some(t.id) {
                            format!("♪ {}", t.display())
                        } else {
                            t.display()
                        }
                    })
                    .collect(),
            )
        };

        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window (avoid allocating the entire list).
        let total = rows.len();
        let list_height = chunks[2].height as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = rows[start..end]
            .iter()
            .map(|row| ListItem::new(row.as_str()))
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let footer_text = controls_text(controls_settings.seek_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
