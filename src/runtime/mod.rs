use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;
use crate::visualizer::Visualizer;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = crate::logging::init() {
        // Logging is optional; the player works fine without a log file.
        eprintln!("jewelbox: logging disabled: {e}");
    }

    let settings = settings::load_settings();
    let (album, catalog) = startup::prepare_catalog(&settings);

    let audio_player = AudioPlayer::new(catalog.clone(), settings.audio.clone());
    let visualizer = Visualizer::connect(audio_player.status_handle());

    let mut app = App::new(catalog, album.title.clone(), album.artist.clone());
    app.show_visualizer = settings.ui.show_visualizer;
    app.set_status_handle(audio_player.status_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone(), album.title, album.artist);

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &visualizer,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    visualizer.disconnect();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
