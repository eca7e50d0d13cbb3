//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and to the audio player.
//!
//! Architecture: two producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key events
//! - Ticker thread: sends the current instant once per frame
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::player::{Player, ProcessPlayer};
use crate::playlist::Command;
use crate::registry::ScreenId;

use super::state::{Action, App, AppEvent, Direction, Effect, Transition};
use super::update::{playback_exited, playback_failed, tick, update};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Direction::Right)),

        // Interaction
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Char('r') => Some(Action::Restart),

        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore releases, mouse, resize, etc.
                Err(e) => {
                    tracing::error!(error = %e, "key reader stopped");
                    break;
                }
            }
        }
    });
}

/// Spawn a thread that sends a tick every `frame`.
fn spawn_ticker(frame: Duration, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            thread::sleep(frame);
            if tx.send(AppEvent::Tick(Instant::now())).is_err() {
                break;
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop from `start` until the user quits.
pub fn run(config: Config, start: ScreenId) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let mut player = ProcessPlayer::new(config.player.clone());
    let frame = config.timings.frame();
    let mut app = App::with_rng(config, StdRng::from_entropy(), start, Instant::now());
    tracing::info!(start = %start, "experience started");

    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Spawn producer threads
    spawn_key_reader(tx.clone());
    spawn_ticker(frame, tx);

    let result = event_loop(&mut terminal, &mut app, &mut player, &rx);

    player.stop();
    restore_terminal()?;
    tracing::info!(last = %app.current_screen(), "experience closed");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    player: &mut impl Player,
    rx: &mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame, Instant::now()))?;

        if app.should_quit {
            return Ok(());
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => return Ok(()), // all senders dropped
        };

        handle_event(app, player, event);
    }
}

/// Feed one event through the pure layers and apply the result.
pub fn handle_event(app: &mut App, player: &mut impl Player, event: AppEvent) {
    match event {
        AppEvent::Key(key) => {
            if let Some(action) = map_key(key) {
                let now = Instant::now();
                let screen = std::mem::take(&mut app.scene.screen);
                let transition = update(screen, &action, now, &app.config);
                apply(app, player, transition, now);
            }
        }
        AppEvent::Tick(now) => {
            let screen = std::mem::take(&mut app.scene.screen);
            let transition = tick(screen, now);
            apply(app, player, transition, now);

            if let Some(exit) = player.poll_exit() {
                tracing::debug!(?exit, "player exited on its own");
                playback_exited(app, exit, now);
            }
        }
    }
}

/// Apply a transition to the app. Leaving a scene silences its music.
pub fn apply(app: &mut App, player: &mut impl Player, transition: Transition, now: Instant) {
    match transition {
        Transition::Screen(screen) => {
            app.scene.screen = screen;
        }
        Transition::Advance(target) => {
            player.stop();
            app.advance(target, now);
        }
        Transition::Restart => {
            player.stop();
            app.restart(now);
        }
        Transition::Effect { screen, effect } => {
            app.scene.screen = screen;
            handle_effect(effect, app, player);
        }
        Transition::Quit(screen) => {
            app.scene.screen = screen;
            app.should_quit = true;
        }
    }
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Handle a side effect requested by a pure transition.
fn handle_effect(effect: Effect, app: &mut App, player: &mut impl Player) {
    match effect {
        Effect::Playback(Command::Play { track, from }) => {
            let Some(song) = app.config.songs.get(track) else {
                tracing::warn!(track, "no song configured for track");
                playback_failed(app, track);
                return;
            };
            if let Err(e) = player.play(song, from) {
                tracing::warn!(track, title = %song.title, error = %e, "playback failed");
                playback_failed(app, track);
            }
        }
        Effect::Playback(Command::Pause) => player.stop(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Song;
    use crate::error::PlaybackError;
    use crate::player::Exit;
    use crate::tui::state::Screen;
    use std::path::PathBuf;

    /// Records calls instead of spawning anything.
    #[derive(Default)]
    struct FakePlayer {
        played: Vec<(String, Duration)>,
        stops: usize,
        fail: bool,
        /// Reported once by the next `poll_exit`.
        exit: Option<Exit>,
    }

    impl Player for FakePlayer {
        fn play(&mut self, song: &Song, from: Duration) -> Result<(), PlaybackError> {
            if self.fail {
                return Err(PlaybackError::MissingAsset(PathBuf::from(&song.source)));
            }
            self.played.push((song.title.clone(), from));
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }

        fn poll_exit(&mut self) -> Option<Exit> {
            self.exit.take()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_at(id: ScreenId) -> App {
        App::seeded(Config::default(), 1, id, Instant::now())
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn q_and_esc_quit() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        assert_eq!(map_key(key(KeyCode::Char('h'))), Some(Action::Move(Direction::Left)));
        assert_eq!(map_key(key(KeyCode::Char('j'))), Some(Action::Move(Direction::Down)));
        assert_eq!(map_key(key(KeyCode::Char('k'))), Some(Action::Move(Direction::Up)));
        assert_eq!(map_key(key(KeyCode::Char('l'))), Some(Action::Move(Direction::Right)));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(key(KeyCode::Up)), Some(Action::Move(Direction::Up)));
        assert_eq!(map_key(key(KeyCode::Down)), Some(Action::Move(Direction::Down)));
        assert_eq!(map_key(key(KeyCode::Left)), Some(Action::Move(Direction::Left)));
        assert_eq!(map_key(key(KeyCode::Right)), Some(Action::Move(Direction::Right)));
    }

    #[test]
    fn enter_space_and_r() {
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Action::Restart));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn enter_key_event_advances_welcome() {
        let mut app = app_at(ScreenId::Welcome);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Enter)));
        assert_eq!(app.current_screen(), ScreenId::Game);
    }

    #[test]
    fn tick_event_finishes_loading() {
        let t0 = Instant::now();
        let mut app = App::seeded(Config::default(), 1, ScreenId::Loading, t0);
        let mut player = FakePlayer::default();

        handle_event(&mut app, &mut player, AppEvent::Tick(t0 + Duration::from_secs(1)));
        assert_eq!(app.current_screen(), ScreenId::Loading);

        handle_event(&mut app, &mut player, AppEvent::Tick(t0 + Duration::from_secs(7)));
        assert_eq!(app.current_screen(), ScreenId::Welcome);
    }

    #[test]
    fn toggle_on_songs_plays_the_track() {
        let mut app = app_at(ScreenId::Songs);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char(' '))));

        assert_eq!(player.played, vec![("High On You".to_string(), Duration::ZERO)]);
        match &app.scene.screen {
            Screen::Songs { playlist, .. } => assert!(playlist.is_playing(0)),
            other => panic!("expected Songs, got {:?}", other),
        }
    }

    #[test]
    fn failed_playback_leaves_track_paused() {
        let mut app = app_at(ScreenId::Songs);
        let mut player = FakePlayer {
            fail: true,
            ..FakePlayer::default()
        };
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char(' '))));

        assert_eq!(app.current_screen(), ScreenId::Songs);
        match &app.scene.screen {
            Screen::Songs { playlist, .. } => assert!(!playlist.is_playing(0)),
            other => panic!("expected Songs, got {:?}", other),
        }
    }

    fn songs_playlist(app: &App) -> &crate::playlist::Playlist {
        match &app.scene.screen {
            Screen::Songs { playlist, .. } => playlist,
            other => panic!("expected Songs, got {:?}", other),
        }
    }

    #[test]
    fn player_dying_early_leaves_track_paused() {
        let mut app = app_at(ScreenId::Songs);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char(' '))));
        assert!(songs_playlist(&app).is_playing(0));

        player.exit = Some(Exit::Failed);
        let later = Instant::now() + Duration::from_millis(300);
        handle_event(&mut app, &mut player, AppEvent::Tick(later));

        assert_eq!(app.current_screen(), ScreenId::Songs);
        assert!(!songs_playlist(&app).is_playing(0));
        assert_eq!(songs_playlist(&app).current(), Some(0));
    }

    #[test]
    fn player_reaching_the_end_stops_the_clock() {
        let mut app = app_at(ScreenId::Songs);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char(' '))));

        player.exit = Some(Exit::Finished);
        let later = Instant::now() + Duration::from_secs(200);
        handle_event(&mut app, &mut player, AppEvent::Tick(later));

        let playlist = songs_playlist(&app);
        assert!(!playlist.is_playing(0));
        assert_eq!(playlist.elapsed(0, later + Duration::from_secs(60)), Duration::ZERO);
    }

    #[test]
    fn leaving_songs_stops_the_player() {
        let mut app = app_at(ScreenId::Songs);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char(' '))));
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Enter)));

        assert_eq!(app.current_screen(), ScreenId::Cards);
        assert!(player.stops >= 1);
    }

    #[test]
    fn quit_sets_flag_without_changing_screen() {
        let mut app = app_at(ScreenId::Cards);
        let mut player = FakePlayer::default();
        handle_event(&mut app, &mut player, AppEvent::Key(key(KeyCode::Char('q'))));
        assert!(app.should_quit);
        assert_eq!(app.current_screen(), ScreenId::Cards);
    }
}
