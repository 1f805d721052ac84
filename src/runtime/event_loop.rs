use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioPlayer, PlaybackStatus, PlayerCmd};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;
use crate::visualizer::Visualizer;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last-known playing track id as emitted to MPRIS.
    pub last_mpris_track: Option<String>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            last_mpris_track: None,
            last_mpris_playback: app.playback,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    visualizer: &Visualizer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Fold the audio thread's snapshot into the app model.
        app.refresh_from_status();
        let status = app.status_snapshot();

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        let track_id = status.track.as_ref().map(|t| t.id.clone());
        if track_id != state.last_mpris_track || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_track = track_id;
            state.last_mpris_playback = app.playback;
        }

        let bars = visualizer.bars();
        terminal.draw(|f| ui::draw(f, app, &status, &bars, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, control_tx, &status)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn play_selected(app: &mut App, audio_player: &AudioPlayer) {
    if let Some(track) = app.selected_track().cloned() {
        app.follow_playback_on();
        let _ = audio_player.send(PlayerCmd::PlayTrack(track));
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                let _ = audio_player.send(PlayerCmd::Play);
            }
            PlaybackState::Stopped => play_selected(app, audio_player),
            PlaybackState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = audio_player.send(PlayerCmd::Pause);
            }
        }
        ControlCmd::PlayPause => match app.playback {
            PlaybackState::Stopped => play_selected(app, audio_player),
            PlaybackState::Playing | PlaybackState::Paused => {
                let _ = audio_player.send(PlayerCmd::TogglePlay);
            }
        },
        ControlCmd::Stop => {
            // The player rests at pause; there is no separate stop.
            let _ = audio_player.send(PlayerCmd::Pause);
        }
        ControlCmd::Next => {
            app.follow_playback_on();
            let _ = audio_player.send(PlayerCmd::Next);
        }
        ControlCmd::Prev => {
            app.follow_playback_on();
            let _ = audio_player.send(PlayerCmd::Prev);
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    status: &PlaybackStatus,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.select_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.select_previous();
        }
        KeyCode::Char('g') => {
            app.follow_playback_off();
            app.selected = 0;
        }
        KeyCode::Char('G') => {
            if app.has_tracks() {
                app.follow_playback_off();
                app.selected = app.catalog.len() - 1;
            }
        }
        KeyCode::Enter => {
            play_selected(app, audio_player);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave like the MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            let target = status.position.as_secs_f64() + settings.controls.scrub_seconds as f64;
            let _ = audio_player.send(PlayerCmd::Seek(target));
        }
        KeyCode::Char('H') => {
            let target = status.position.as_secs_f64() - settings.controls.scrub_seconds as f64;
            let _ = audio_player.send(PlayerCmd::Seek(target));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let _ = audio_player.send(PlayerCmd::SetVolume(
                status.volume + settings.controls.volume_step,
            ));
        }
        KeyCode::Char('-') => {
            let _ = audio_player.send(PlayerCmd::SetVolume(
                status.volume - settings.controls.volume_step,
            ));
        }
        KeyCode::Char('v') => {
            app.toggle_visualizer();
        }
        _ => {}
    }

    Ok(false)
}
