//! Pure state transitions: (Screen, Action) → Transition, and (Screen, Tick) → Transition.
//!
//! This is the core logic of the TUI. Fully testable without a terminal.
//! Each screen defines which actions it accepts. Unhandled actions return
//! the current screen unchanged (no-op). A screen leaves only by returning
//! `Advance` with its registry successor, or `Restart` where offered.

use std::time::Instant;

use crate::config::Config;
use crate::content::{CARDS, GRID, TARGET_CELL};
use crate::player::Exit;
use crate::playlist::{Command, Playlist};

use super::state::{Action, App, Burst, Direction, Effect, FinalChoice, Screen, Transition};

/// Pure state transition for a user action.
pub fn update(screen: Screen, action: &Action, now: Instant, config: &Config) -> Transition {
    if *action == Action::Quit {
        return Transition::Quit(screen);
    }

    match screen {
        // Timed screens ignore input.
        Screen::Loading { .. } | Screen::Wrapping { .. } => Transition::Screen(screen),
        Screen::Welcome => update_welcome(action),
        Screen::Game { cursor, burst } => update_game(cursor, burst, action, now, config),
        Screen::Letter { open } => update_letter(open, action),
        Screen::Songs { cursor, playlist } => update_songs(cursor, playlist, action, now),
        Screen::Cards { cursor, flipped } => update_cards(cursor, flipped, action),
        Screen::FinalMessage { focus } => update_final_message(focus, action),
        Screen::Sealed { .. } => update_sealed(screen, action),
    }
}

/// Pure state transition for the passage of time.
///
/// Timers live inside the screen they belong to, so only the mounted
/// screen's timers are ever polled.
pub fn tick(screen: Screen, now: Instant) -> Transition {
    match screen {
        Screen::Loading { mut finish } => {
            if finish.poll(now) {
                advance(Screen::Loading { finish })
            } else {
                Transition::Screen(Screen::Loading { finish })
            }
        }
        Screen::Wrapping { mut finish } => {
            if finish.poll(now) {
                advance(Screen::Wrapping { finish })
            } else {
                Transition::Screen(Screen::Wrapping { finish })
            }
        }
        Screen::Game {
            cursor,
            burst: Some(mut burst),
        } => {
            let fired = burst.advance.poll(now);
            let screen = Screen::Game {
                cursor,
                burst: Some(burst),
            };
            if fired {
                advance(screen)
            } else {
                Transition::Screen(screen)
            }
        }
        Screen::Songs {
            cursor,
            mut playlist,
        } => {
            let ended = playlist.tick(now);
            let screen = Screen::Songs { cursor, playlist };
            if ended {
                Transition::Effect {
                    screen,
                    effect: Effect::Playback(Command::Pause),
                }
            } else {
                Transition::Screen(screen)
            }
        }
        other => Transition::Screen(other),
    }
}

/// A track failed to start. Fold the failure into the songs screen.
///
/// The failure never reaches the orchestrator.
pub fn playback_failed(app: &mut App, track: usize) {
    if let Screen::Songs { playlist, .. } = &mut app.scene.screen {
        playlist.mark_failed(track);
    }
}

/// The player stopped on its own. Fold that into the songs screen.
///
/// A clean exit means the track played to its end; anything else counts as
/// a failed start.
pub fn playback_exited(app: &mut App, exit: Exit, now: Instant) {
    let Screen::Songs { playlist, .. } = &mut app.scene.screen else {
        return;
    };
    let Some(track) = playlist.current() else {
        return;
    };
    match exit {
        Exit::Finished => playlist.finish(track, now),
        Exit::Failed => playlist.mark_failed(track),
    }
}

/// The advance callback: go to the registry successor of `screen`.
///
/// Only the terminal screen has no successor. Asking it to advance is a
/// wiring bug; it is logged and the screen stays mounted.
fn advance(screen: Screen) -> Transition {
    let from = screen.id();
    match from.next() {
        Some(next) => Transition::Advance(next),
        None => {
            tracing::error!(screen = %from, "advance requested with no successor");
            Transition::Screen(screen)
        }
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

fn update_welcome(action: &Action) -> Transition {
    match action {
        Action::Confirm => advance(Screen::Welcome),
        _ => Transition::Screen(Screen::Welcome),
    }
}

/// Game: move over the board; tapping the cookie arms the burst once.
fn update_game(
    cursor: usize,
    burst: Option<Burst>,
    action: &Action,
    now: Instant,
    config: &Config,
) -> Transition {
    // Once the burst is running the board is done listening.
    if burst.is_some() {
        return Transition::Screen(Screen::Game { cursor, burst });
    }

    match action {
        Action::Move(direction) => Transition::Screen(Screen::Game {
            cursor: move_on_grid(cursor, *direction),
            burst,
        }),
        Action::Confirm | Action::Toggle if cursor == TARGET_CELL => {
            tracing::debug!("cookie tapped");
            Transition::Screen(Screen::Game {
                cursor,
                burst: Some(Burst::start(now, &config.timings)),
            })
        }
        _ => Transition::Screen(Screen::Game { cursor, burst }),
    }
}

/// Letter: the first press opens the envelope, the next one moves on.
fn update_letter(open: bool, action: &Action) -> Transition {
    match (open, action) {
        (false, Action::Confirm | Action::Toggle) => {
            Transition::Screen(Screen::Letter { open: true })
        }
        (true, Action::Confirm) => advance(Screen::Letter { open }),
        _ => Transition::Screen(Screen::Letter { open }),
    }
}

/// Songs: pick a track, play/pause it, continue when done listening.
fn update_songs(cursor: usize, mut playlist: Playlist, action: &Action, now: Instant) -> Transition {
    match action {
        Action::Move(Direction::Up) => Transition::Screen(Screen::Songs {
            cursor: cursor.saturating_sub(1),
            playlist,
        }),
        Action::Move(Direction::Down) => {
            let last = playlist.len().saturating_sub(1);
            Transition::Screen(Screen::Songs {
                cursor: (cursor + 1).min(last),
                playlist,
            })
        }
        Action::Toggle => match playlist.toggle(cursor, now) {
            Some(command) => Transition::Effect {
                screen: Screen::Songs { cursor, playlist },
                effect: Effect::Playback(command),
            },
            None => Transition::Screen(Screen::Songs { cursor, playlist }),
        },
        Action::Confirm => advance(Screen::Songs { cursor, playlist }),
        _ => Transition::Screen(Screen::Songs { cursor, playlist }),
    }
}

/// Cards: move between cards, flip the focused one.
fn update_cards(
    cursor: usize,
    mut flipped: std::collections::BTreeSet<usize>,
    action: &Action,
) -> Transition {
    let last = CARDS.len() - 1;

    match action {
        Action::Move(Direction::Left | Direction::Up) => Transition::Screen(Screen::Cards {
            cursor: cursor.saturating_sub(1),
            flipped,
        }),
        Action::Move(Direction::Right | Direction::Down) => Transition::Screen(Screen::Cards {
            cursor: (cursor + 1).min(last),
            flipped,
        }),
        Action::Toggle => {
            if !flipped.remove(&cursor) {
                flipped.insert(cursor);
            }
            Transition::Screen(Screen::Cards { cursor, flipped })
        }
        Action::Confirm => advance(Screen::Cards { cursor, flipped }),
        _ => Transition::Screen(Screen::Cards { cursor, flipped }),
    }
}

/// Final message: two buttons, plus a restart shortcut.
fn update_final_message(focus: FinalChoice, action: &Action) -> Transition {
    match action {
        Action::Move(_) => Transition::Screen(Screen::FinalMessage {
            focus: match focus {
                FinalChoice::Continue => FinalChoice::Restart,
                FinalChoice::Restart => FinalChoice::Continue,
            },
        }),
        Action::Confirm => match focus {
            FinalChoice::Continue => advance(Screen::FinalMessage { focus }),
            FinalChoice::Restart => Transition::Restart,
        },
        Action::Restart => Transition::Restart,
        _ => Transition::Screen(Screen::FinalMessage { focus }),
    }
}

/// Sealed: the only way out is to see it again.
fn update_sealed(screen: Screen, action: &Action) -> Transition {
    match action {
        Action::Confirm | Action::Restart => Transition::Restart,
        _ => Transition::Screen(screen),
    }
}

/// Move a row-major 3x3 cursor, clamping at the edges.
fn move_on_grid(cursor: usize, direction: Direction) -> usize {
    let side = 3;
    let (row, col) = (cursor / side, cursor % side);
    let (row, col) = match direction {
        Direction::Up => (row.saturating_sub(1), col),
        Direction::Down => ((row + 1).min(side - 1), col),
        Direction::Left => (row, col.saturating_sub(1)),
        Direction::Right => (row, (col + 1).min(side - 1)),
    };
    (row * side + col).min(GRID.len() - 1)
}

// ============================================================================
// TESTS
// ============================================================================
