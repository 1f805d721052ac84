//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Sparkline, Wrap},
};
use std::time::Duration;

use crate::app::{App, PlaybackState};
use crate::audio::PlaybackStatus;
use crate::config::{ControlsSettings, UiSettings};
use crate::visualizer::BAR_COUNT;

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{}s", scrub_seconds),
        "[-/+] volume".to_string(),
        "[v] visualizer".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the status line: playback state, current song, time and volume.
fn status_text(app: &App, status: &PlaybackStatus) -> String {
    let mut parts: Vec<String> = Vec::new();

    if status.loading {
        parts.push("Loading…".to_string());
    } else {
        let state = match app.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        parts.push(state.to_string());
    }

    if let Some(track) = &status.track {
        let time = if status.duration > Duration::ZERO {
            format!(
                " [{} / {}]",
                format_mmss(status.position),
                format_mmss(status.duration)
            )
        } else {
            // Until the decoder reports a duration, show the sleeve label.
            format!(" [{}]", track.duration_label)
        };
        parts.push(format!("Song: {}{}", track.display, time));
    }

    parts.push(format!("Vol: {:.0}%", status.volume * 100.0));

    if let Some(error) = &status.error {
        parts.push(format!("ERR: {error}"));
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame` using `app` state and
/// the latest playback/visualizer snapshots.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    status: &PlaybackStatus,
    bars: &[u8; BAR_COUNT],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let mut constraints = vec![
        Constraint::Length(3), // header
        Constraint::Length(3), // status
        Constraint::Length(3), // progress
    ];
    if app.show_visualizer {
        constraints.push(Constraint::Length(6));
    }
    constraints.push(Constraint::Min(3)); // track list
    constraints.push(Constraint::Length(3)); // controls

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());
    let mut next_chunk = 0;
    let mut chunk = || {
        let area = chunks[next_chunk];
        next_chunk += 1;
        area
    };

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jewelbox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunk());

    // Status box
    let status_par = Paragraph::new(status_text(app, status))
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
    frame.render_widget(status_par, chunk());

    // Progress gauge
    let ratio = if status.duration > Duration::ZERO {
        (status.position.as_secs_f64() / status.duration.as_secs_f64()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge_label = format!(
        "{} / {}",
        format_mmss(status.position),
        format_mmss(status.duration)
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .ratio(ratio)
        .label(gauge_label);
    frame.render_widget(gauge, chunk());

    // Visualizer bars
    if app.show_visualizer {
        let data: Vec<u64> = bars.iter().map(|&b| u64::from(b)).collect();
        let sparkline = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(" visualizer "))
            .data(data)
            .max(255);
        frame.render_widget(sparkline, chunk());
    }

    // Track list
    {
        let playing_id = status.track.as_ref().map(|t| t.id.as_str());
        let items: Vec<ListItem> = app
            .catalog
            .tracks()
            .iter()
            .map(|track| {
                let marker = if Some(track.id.as_str()) == playing_id {
                    "♪ "
                } else {
                    "  "
                };
                let line = format!("{}{}  [{}]", marker, track.display, track.duration_label);
                if Some(track.id.as_str()) == playing_id {
                    ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list_title = format!(" {} · {} ", app.album_title, app.album_artist);
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if app.has_tracks() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, chunk(), &mut state);
    }

    // Controls footer
    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
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
    frame.render_widget(footer, chunk());
}
