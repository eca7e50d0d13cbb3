//! TUI state algebra: the orchestrator, the mounted scene, and every screen.
//!
//! These types define the whole state space of the experience. Exactly one
//! [`Scene`] is mounted at a time and only [`App`] replaces it. Screen
//! variants carry only their own local state (timers, cursors, toggles);
//! nothing crosses from one screen to the next.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{Config, Timings};
use crate::playlist::{Command, Playlist};
use crate::registry::ScreenId;
use crate::snowfall::Snowfall;
use crate::timer::Deferred;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - A key reader thread sends `Key` variants
/// - A ticker thread sends `Tick` at the frame interval
///
/// A tick carries only the current instant. It never names a screen, so a
/// tick cannot be delivered to a screen that is no longer mounted.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick(Instant),
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Top-level TUI model and the sole owner of the current screen.
#[derive(Debug)]
pub struct App {
    /// The one mounted scene.
    pub scene: Scene,

    pub config: Config,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,

    rng: StdRng,
}

/// A mounted screen: its state, when it was mounted, and its own snowfall.
#[derive(Debug)]
pub struct Scene {
    pub screen: Screen,
    pub mounted_at: Instant,
    pub snowfall: Snowfall,
}

impl App {
    /// Start at the beginning of the path.
    pub fn new(config: Config, now: Instant) -> Self {
        App::with_rng(config, StdRng::from_entropy(), ScreenId::START, now)
    }

    /// Start at `start` with a given RNG.
    pub fn with_rng(config: Config, mut rng: StdRng, start: ScreenId, now: Instant) -> Self {
        let scene = Scene::mount(start, now, &config, &mut rng);
        App {
            scene,
            config,
            should_quit: false,
            rng,
        }
    }

    /// Convenience for tests and tools: deterministic snowfall.
    pub fn seeded(config: Config, seed: u64, start: ScreenId, now: Instant) -> Self {
        App::with_rng(config, StdRng::seed_from_u64(seed), start, now)
    }

    pub fn current_screen(&self) -> ScreenId {
        self.scene.screen.id()
    }

    /// Replace the mounted scene with a fresh one for `target`.
    ///
    /// The previous scene, its timers and its snowfall are dropped here.
    pub fn advance(&mut self, target: ScreenId, now: Instant) {
        let from = self.current_screen();
        self.scene = Scene::mount(target, now, &self.config, &mut self.rng);
        tracing::info!(from = %from, to = %target, "screen transition");
    }

    /// Go back to the first screen.
    pub fn restart(&mut self, now: Instant) {
        self.advance(ScreenId::START, now);
    }

    /// Time since the current scene was mounted.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.scene.mounted_at)
    }
}

impl Scene {
    pub fn mount(id: ScreenId, now: Instant, config: &Config, rng: &mut StdRng) -> Self {
        let snowfall = match id {
            ScreenId::Loading => Snowfall::inline(config.snowfall.inline_count, rng),
            _ => Snowfall::overlay(config.snowfall.overlay_count, rng),
        };
        Scene {
            screen: Screen::mount(id, now, config),
            mounted_at: now,
            snowfall,
        }
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current screen and its local state.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Cat walks by, greeting appears, status line types out, then moves on.
    Loading { finish: Deferred },

    /// Welcome card with a single "open your gift" button.
    Welcome,

    /// 3x3 sweets board. Tapping the cookie starts the burst.
    Game {
        /// Focused cell, 0..9 row-major.
        cursor: usize,
        burst: Option<Burst>,
    },

    /// Envelope first, then the letter.
    Letter { open: bool },

    /// Track list with a tape player.
    Songs { cursor: usize, playlist: Playlist },

    /// Three flip-cards.
    Cards {
        cursor: usize,
        flipped: BTreeSet<usize>,
    },

    /// Closing message with a continue and a restart button.
    FinalMessage { focus: FinalChoice },

    /// Short wrapping animation, then sealed.
    Wrapping { finish: Deferred },

    /// The end. Only restart leaves it.
    Sealed {
        /// Fixed at mount so the line doesn't change under the reader.
        date: String,
    },
}

/// The cookie burst on the game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Burst {
    pub started: Instant,
    pub advance: Deferred,
}

/// Buttons on the final message screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalChoice {
    Continue,
    Restart,
}

/// Placeholder used while a screen is moved through the update function.
impl Default for Screen {
    fn default() -> Self {
        Screen::Welcome
    }
}

impl Screen {
    /// Fresh local state for `id`. Timed screens arm their timers here.
    pub fn mount(id: ScreenId, now: Instant, config: &Config) -> Self {
        let timings = &config.timings;
        match id {
            ScreenId::Loading => Screen::Loading {
                finish: Deferred::after(now, timings.loading_complete()),
            },
            ScreenId::Welcome => Screen::Welcome,
            ScreenId::Game => Screen::Game {
                cursor: 0,
                burst: None,
            },
            ScreenId::Letter => Screen::Letter { open: false },
            ScreenId::Songs => Screen::Songs {
                cursor: 0,
                playlist: Playlist::new(config.songs.iter().map(|s| s.length()).collect()),
            },
            ScreenId::Cards => Screen::Cards {
                cursor: 0,
                flipped: BTreeSet::new(),
            },
            ScreenId::FinalMessage => Screen::FinalMessage {
                focus: FinalChoice::Continue,
            },
            ScreenId::Wrapping => Screen::Wrapping {
                finish: Deferred::after(now, timings.wrapping()),
            },
            ScreenId::Sealed => Screen::Sealed {
                date: chrono::Local::now().format("%A, %B %-d, %Y").to_string(),
            },
        }
    }

    pub fn id(&self) -> ScreenId {
        match self {
            Screen::Loading { .. } => ScreenId::Loading,
            Screen::Welcome => ScreenId::Welcome,
            Screen::Game { .. } => ScreenId::Game,
            Screen::Letter { .. } => ScreenId::Letter,
            Screen::Songs { .. } => ScreenId::Songs,
            Screen::Cards { .. } => ScreenId::Cards,
            Screen::FinalMessage { .. } => ScreenId::FinalMessage,
            Screen::Wrapping { .. } => ScreenId::Wrapping,
            Screen::Sealed { .. } => ScreenId::Sealed,
        }
    }
}

impl Burst {
    pub fn start(now: Instant, timings: &Timings) -> Self {
        Burst {
            started: now,
            advance: Deferred::after(now, timings.game_burst()),
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move focus.
    Move(Direction),
    /// Flip, open, play/pause: the local interaction of the screen.
    Toggle,
    /// Press the screen's main button.
    Confirm,
    /// See everything again (only where offered).
    Restart,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// `Advance` and `Restart` are the two callbacks a screen can invoke on the
/// orchestrator. Everything else stays inside the screen.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Keep the current scene, with this (possibly updated) screen state.
    Screen(Screen),
    /// Ask the orchestrator to mount `ScreenId`.
    Advance(ScreenId),
    /// Ask the orchestrator to go back to the start.
    Restart,
    /// Keep the updated screen and run a side effect.
    Effect { screen: Screen, effect: Effect },
    /// Stop the event loop, keeping this screen mounted until exit.
    Quit(Screen),
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Playback(Command),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app_at(start: ScreenId) -> (App, Instant) {
        let now = Instant::now();
        (App::seeded(Config::default(), 9, start, now), now)
    }

    #[test]
    fn app_starts_on_loading() {
        let app = App::new(Config::default(), Instant::now());
        assert_eq!(app.current_screen(), ScreenId::Loading);
        assert!(!app.should_quit);
    }

    #[test]
    fn advance_replaces_the_scene() {
        let (mut app, t0) = app_at(ScreenId::Welcome);
        let later = t0 + Duration::from_secs(3);
        app.advance(ScreenId::Game, later);

        assert_eq!(app.current_screen(), ScreenId::Game);
        assert_eq!(app.scene.mounted_at, later);
        assert_eq!(app.elapsed(later), Duration::ZERO);
    }

    #[test]
    fn restart_goes_to_loading_from_anywhere() {
        for id in ScreenId::ALL {
            let (mut app, t0) = app_at(id);
            app.restart(t0);
            assert_eq!(app.current_screen(), ScreenId::Loading, "from {}", id);
        }
    }

    #[test]
    fn every_mount_gets_fresh_snowfall() {
        let (mut app, t0) = app_at(ScreenId::Welcome);
        let first = app.scene.snowfall.clone();
        app.advance(ScreenId::Welcome, t0);
        assert_ne!(app.scene.snowfall, first);
    }

    #[test]
    fn loading_uses_inline_snowfall_count() {
        let (app, _) = app_at(ScreenId::Loading);
        assert_eq!(app.scene.snowfall.particles().len(), 45);

        let (app, _) = app_at(ScreenId::Cards);
        assert_eq!(app.scene.snowfall.particles().len(), 50);
    }

    #[test]
    fn mount_produces_matching_id() {
        let config = Config::default();
        let now = Instant::now();
        for id in ScreenId::ALL {
            assert_eq!(Screen::mount(id, now, &config).id(), id);
        }
    }

    #[test]
    fn songs_mount_with_one_entry_per_configured_song() {
        let config = Config::default();
        match Screen::mount(ScreenId::Songs, Instant::now(), &config) {
            Screen::Songs { cursor, playlist } => {
                assert_eq!(cursor, 0);
                assert_eq!(playlist.len(), config.songs.len());
                assert_eq!(playlist.current(), None);
            }
            other => panic!("expected Songs, got {:?}", other),
        }
    }

    #[test]
    fn sealed_date_is_filled_in() {
        match Screen::mount(ScreenId::Sealed, Instant::now(), &Config::default()) {
            Screen::Sealed { date } => assert!(!date.is_empty()),
            other => panic!("expected Sealed, got {:?}", other),
        }
    }

    #[test]
    fn screen_default_is_welcome() {
        assert_eq!(Screen::default(), Screen::Welcome);
    }
}
