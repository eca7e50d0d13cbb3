//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()` draws
//! the scene's snowfall first, then dispatches on the current Screen
//! variant. Animation is derived from the time since the scene mounted;
//! nothing here mutates state.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::config::{Config, Song};
use crate::content::{self, BURST, CARDS, GRID, TARGET_CELL};
use crate::playlist::{Playlist, format_time};
use crate::timer::{Deferred, Typewriter};

use super::state::{App, Burst, FinalChoice, Screen};
use super::theme;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current scene to the terminal frame as of `now`.
pub fn render(app: &App, frame: &mut Frame, now: Instant) {
    let area = frame.area();

    // Common layout: title bar at top, content in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // content
        Constraint::Length(1), // help
    ])
    .split(area);

    let elapsed = app.elapsed(now);
    let content_area = chunks[1];

    frame.render_widget(app.scene.snowfall.at(elapsed), content_area);
    frame.render_widget(render_title(&app.scene.screen), chunks[0]);
    frame.render_widget(render_help(&app.scene.screen), chunks[2]);

    let config = &app.config;
    match &app.scene.screen {
        Screen::Loading { .. } => render_loading(elapsed, config, frame, content_area),
        Screen::Welcome => render_welcome(elapsed, frame, content_area),
        Screen::Game { cursor, burst } => {
            render_game(*cursor, burst.as_ref(), now, frame, content_area)
        }
        Screen::Letter { open } => render_letter(*open, elapsed, config, frame, content_area),
        Screen::Songs { cursor, playlist } => {
            render_songs(*cursor, playlist, &config.songs, now, elapsed, frame, content_area)
        }
        Screen::Cards { cursor, flipped } => render_cards(*cursor, flipped, frame, content_area),
        Screen::FinalMessage { focus } => render_final_message(*focus, frame, content_area),
        Screen::Wrapping { finish } => render_wrapping(finish, now, elapsed, frame, content_area),
        Screen::Sealed { date } => render_sealed(date, elapsed, config, frame, content_area),
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar showing the app name and the screen.
fn render_title(screen: &Screen) -> Paragraph<'static> {
    let title_text = match screen {
        Screen::Loading { .. } | Screen::Welcome => "snowcard",
        Screen::Game { .. } => "A Quick Game",
        Screen::Letter { .. } => "A Christmas Note",
        Screen::Songs { .. } => "Songs",
        Screen::Cards { .. } => "Little Things",
        Screen::FinalMessage { .. } => "One More Thing",
        Screen::Wrapping { .. } => "Wrapping...",
        Screen::Sealed { .. } => "Sealed",
    };

    Paragraph::new(Line::from(vec![Span::styled(
        title_text,
        theme::STYLE_TITLE,
    )]))
}

/// Help line showing available keybindings for the current screen.
fn render_help(screen: &Screen) -> Paragraph<'static> {
    let help_text = match screen {
        Screen::Loading { .. } | Screen::Wrapping { .. } => "[q] quit",
        Screen::Welcome => "[Enter] open your gift  [q] quit",
        Screen::Game { .. } => "[arrows/hjkl] move  [Enter] tap  [q] quit",
        Screen::Letter { open: false } => "[Enter] unwrap  [q] quit",
        Screen::Letter { open: true } => "[Enter] continue  [q] quit",
        Screen::Songs { .. } => "[j/k] move  [Space] play/pause  [Enter] next  [q] quit",
        Screen::Cards { .. } => "[h/l] move  [Space] flip  [Enter] next  [q] quit",
        Screen::FinalMessage { .. } => "[h/l] choose  [Enter] press  [r] restart  [q] quit",
        Screen::Sealed { .. } => "[Enter/r] see again  [q] quit",
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// Draw `lines` centred horizontally and vertically in `area`.
fn render_centered(lines: Vec<Line<'_>>, frame: &mut Frame, area: Rect) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height - height) / 2;
    let target = Rect::new(area.x, top, area.width, height);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, target);
}

fn heading<'a>(subtitle: &'a str, title: &'a str) -> Vec<Line<'a>> {
    vec![
        Line::from(Span::styled(subtitle, theme::STYLE_SUBTITLE)),
        Line::from(""),
        Line::from(Span::styled(title, theme::STYLE_HEADING)),
        Line::from(""),
    ]
}

fn button(label: &str, focused: bool) -> Span<'_> {
    let style = if focused {
        theme::STYLE_FOCUS
    } else {
        theme::STYLE_BUTTON
    };
    Span::styled(format!("  {}  ", label), style)
}

/// On/off square wave with the given half period.
fn blink(elapsed: Duration, half_period: Duration) -> bool {
    let half = half_period.as_millis().max(1);
    (elapsed.as_millis() / half) % 2 == 0
}

// ============================================================================
// SCREEN: LOADING
// ============================================================================

/// How long the cat takes to cross.
const CAT_WALK: f64 = 8.0;

/// Cat position as a fraction of half the width from centre.
///
/// Walks in from the left, pauses in the middle, walks out to the right.
/// Beyond ±1.0 the cat is off screen.
pub fn cat_offset(elapsed: Duration) -> f64 {
    let t = (elapsed.as_secs_f64() / CAT_WALK).min(1.0);
    let ease = |x: f64| x * x * (3.0 - 2.0 * x);
    if t < 0.4 {
        -1.4 * (1.0 - ease(t / 0.4))
    } else if t < 0.55 {
        0.0
    } else {
        1.4 * ease((t - 0.55) / 0.45)
    }
}

fn render_loading(elapsed: Duration, config: &Config, frame: &mut Frame, area: Rect) {
    let timings = &config.timings;
    let status = Typewriter::new(content::LOADING_TEXT, timings.loading_type());
    // The caret blinks while typing and goes away once the line is done.
    let cursor = if !status.finished(elapsed) && blink(elapsed, Duration::from_millis(500)) {
        "|"
    } else {
        " "
    };

    let mut lines = vec![Line::from(""), Line::from("")];
    if elapsed >= timings.loading_reveal() {
        lines.push(Line::from(Span::styled(
            content::LOADING_GREETING,
            theme::STYLE_HEADING,
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(status.visible(elapsed), theme::STYLE_BODY),
        Span::styled(cursor, theme::STYLE_SOFT),
    ]));

    render_centered(lines, frame, area);

    // The cat walks along the row above the greeting.
    let offset = cat_offset(elapsed);
    if offset.abs() <= 1.0 && area.height > 6 && area.width > 4 {
        let mid = f64::from(area.width / 2);
        let x = area.x + (mid + offset * (mid - 2.0)).max(0.0) as u16;
        let y = area.y + area.height / 2 - 3;
        frame.render_widget(Paragraph::new("🐱"), Rect::new(x, y, 2, 1));
    }

    // Snow on the ground.
    if area.height > 0 {
        let ground = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        let snow = "▁".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(Span::styled(snow, theme::STYLE_BODY)), ground);
    }
}

// ============================================================================
// SCREEN: WELCOME
// ============================================================================

fn render_welcome(elapsed: Duration, frame: &mut Frame, area: Rect) {
    let mut lines = heading("a little christmas thought… 🎄", "Hey You");
    lines.extend([
        Line::from(Span::styled(
            "I wanted to do a tiny something this Christmas,",
            theme::STYLE_BODY,
        )),
        Line::from(Span::styled("because you mean a lot to me.", theme::STYLE_BODY)),
        Line::from(""),
        Line::from(Span::styled("Tap below, okay?", theme::STYLE_SOFT)),
        Line::from(""),
        Line::from(button("Open Your Gift →", true)),
        Line::from(""),
    ]);

    // The right-hand cat hops.
    let hop = if blink(elapsed, Duration::from_millis(1300)) {
        "🐈        🐈"
    } else {
        "🐈       🐈 "
    };
    lines.push(Line::from(hop));

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: GAME
// ============================================================================

/// How long the sweets fly out of the cookie.
const BURST_FLIGHT: Duration = Duration::from_millis(800);

fn render_game(
    cursor: usize,
    burst: Option<&Burst>,
    now: Instant,
    frame: &mut Frame,
    area: Rect,
) {
    let mut lines = heading("A quick game first…", "Sweet Tic-Tac-Toe");

    for row in 0..3 {
        let mut spans = Vec::new();
        for col in 0..3 {
            let index = row * 3 + col;
            let style = if index == cursor && burst.is_none() {
                theme::STYLE_FOCUS
            } else if index == TARGET_CELL && burst.is_none() {
                theme::STYLE_PULSE
            } else {
                Style::new()
            };
            let cell = if index == TARGET_CELL && burst.is_none() {
                format!("[{}]", GRID[index])
            } else {
                format!(" {} ", GRID[index])
            };
            spans.push(Span::styled(cell, style));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    match burst {
        Some(b) => {
            let flown = now.saturating_duration_since(b.started);
            if flown < BURST_FLIGHT {
                let spread = (flown.as_secs_f64() / BURST_FLIGHT.as_secs_f64() * 6.0) as usize;
                let gap = " ".repeat(spread + 1);
                lines.push(Line::from(BURST.join(gap.as_str())));
            } else {
                lines.push(Line::from(Span::styled("Yum!", theme::STYLE_HEADING)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "TAP THE COOKIE TO CONTINUE",
            theme::STYLE_BUTTON,
        ))),
    }

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: LETTER
// ============================================================================

fn render_letter(open: bool, elapsed: Duration, config: &Config, frame: &mut Frame, area: Rect) {
    let mut lines = heading("Wrapped straight from my heart", "A Christmas Note 🎅 💌");

    if !open {
        let heart = if blink(elapsed, Duration::from_millis(500)) {
            "❤️"
        } else {
            "♥"
        };
        lines.extend([
            Line::from("┌────────────────────┐"),
            Line::from("│╲                  ╱│"),
            Line::from(format!("│  ╲      {}      ╱  │", heart)),
            Line::from("│    ╲──────────╱    │"),
            Line::from("└────────────────────┘"),
            Line::from(""),
            Line::from(Span::styled("Tap to unwrap 🎁", theme::STYLE_PULSE)),
        ]);
    } else {
        lines.extend([
            Line::from(Span::styled("💖 MY PASANDIDA AURAT", theme::STYLE_BUTTON)),
            Line::from(""),
            Line::from(Span::styled(
                format!("Hey {},", config.recipient),
                theme::STYLE_HEADING,
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Christmas feels warmer because of you.",
                theme::STYLE_BODY,
            )),
            Line::from(Span::styled(
                "You bring comfort, light, and calm into my world.",
                theme::STYLE_BODY,
            )),
            Line::from(""),
            Line::from(Span::styled(config.signature.as_str(), theme::STYLE_SOFT)),
            Line::from(""),
            Line::from(button("Continue ✨", true)),
        ]);
    }

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: SONGS
// ============================================================================

const REEL_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

fn tape_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0)) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_songs(
    cursor: usize,
    playlist: &Playlist,
    songs: &[Song],
    now: Instant,
    elapsed: Duration,
    frame: &mut Frame,
    area: Rect,
) {
    let mut lines = heading(
        "Soft, warm & full of feeling",
        "Songs That Feel Like Christmas With You 🎶",
    );

    if songs.is_empty() {
        lines.push(Line::from(Span::styled("(no songs configured)", theme::STYLE_DIM)));
    }

    for (index, song) in songs.iter().enumerate() {
        let playing = playlist.is_playing(index);
        let icon = if playing { "⏸" } else { "▶" };
        let title_style = if index == cursor {
            theme::STYLE_FOCUS
        } else {
            theme::STYLE_HEADING
        };

        lines.push(Line::from(Span::styled(
            format!(" {} {} ", icon, song.title),
            title_style,
        )));
        lines.push(Line::from(Span::styled(song.subtitle.as_str(), theme::STYLE_SOFT)));

        if playlist.current() == Some(index) {
            let reel = if playing {
                REEL_FRAMES[(elapsed.as_millis() / 250) as usize % REEL_FRAMES.len()]
            } else {
                REEL_FRAMES[0]
            };
            let length = playlist
                .length(index)
                .map(format_time)
                .unwrap_or_else(|| format_time(Duration::ZERO));
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", reel)),
                Span::styled(tape_bar(playlist.ratio(index, now), 20), theme::STYLE_TAPE),
                Span::raw(format!(" {}  ", reel)),
                Span::styled(
                    format!("{} / {}", format_time(playlist.elapsed(index, now)), length),
                    theme::STYLE_DIM,
                ),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(button("Next 🎄 →", false)));

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: CARDS
// ============================================================================

fn render_cards(cursor: usize, flipped: &BTreeSet<usize>, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(6), // heading + hint
        Constraint::Min(0),    // cards
        Constraint::Length(2), // next button
    ])
    .split(area);

    let mut lines = heading("✨ ☁️ from a sincere heart", "Little Things I Want You To Know");
    lines.push(Line::from(Span::styled("Tap the card to flip it ❄️", theme::STYLE_SUBTITLE)));
    render_centered(lines, frame, chunks[0]);

    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(chunks[1]);

    for (index, card) in CARDS.iter().enumerate() {
        let border = if index == cursor {
            theme::STYLE_FOCUS
        } else {
            theme::STYLE_SOFT
        };
        let block = Block::bordered().border_style(border);

        let body = if flipped.contains(&index) {
            vec![
                Line::from(Span::styled(card.back_title, theme::STYLE_HEADING)),
                Line::from(""),
                Line::from(Span::styled(card.back_text, theme::STYLE_BODY)),
                Line::from(""),
                Line::from(card.back_emoji),
            ]
        } else {
            vec![
                Line::from(Span::styled(card.front, theme::STYLE_BODY)),
                Line::from(""),
                Line::from(card.front_emoji),
            ]
        };

        let paragraph = Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, columns[index]);
    }

    render_centered(vec![Line::from(button("Next →", false))], frame, chunks[2]);
}

// ============================================================================
// SCREEN: FINAL MESSAGE
// ============================================================================

fn render_final_message(focus: FinalChoice, frame: &mut Frame, area: Rect) {
    let mut lines = heading("the grand finale...", "One More Thing");
    lines.extend([
        Line::from(Span::styled(
            "This Christmas, I just want you to know how special you are to me.",
            theme::STYLE_BODY,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "I hope this brought you a little comfort and a smile.",
            theme::STYLE_SOFT,
        )),
        Line::from(""),
        Line::from(vec![
            button("Always for you, Cutie 💌", focus == FinalChoice::Continue),
            Span::raw("   "),
            button("Restart", focus == FinalChoice::Restart),
        ]),
    ]);

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: WRAPPING
// ============================================================================

const SPIN_FRAMES: [&str; 4] = ["◜", "◝", "◞", "◟"];

/// Spinner frame: two fast turns for 1.5s, then one slow turn.
fn spin_frame(elapsed: Duration) -> &'static str {
    let ms = elapsed.as_millis();
    let step = if ms < 1500 { 94 } else { 500 };
    SPIN_FRAMES[(ms / step) as usize % SPIN_FRAMES.len()]
}

fn render_wrapping(
    finish: &Deferred,
    now: Instant,
    elapsed: Duration,
    frame: &mut Frame,
    area: Rect,
) {
    let spin = spin_frame(elapsed);
    let heart = if blink(elapsed, Duration::from_millis(900)) {
        "❤️"
    } else {
        "  "
    };
    let dots = 3 - (finish.remaining(now).as_secs() as usize).min(3);

    let lines = vec![
        Line::from(heart),
        Line::from(format!("{} 💌 {}", spin, spin)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Wrapping this with care{}", ".".repeat(dots)),
            theme::STYLE_SUBTITLE,
        )),
    ];

    render_centered(lines, frame, area);
}

// ============================================================================
// SCREEN: SEALED
// ============================================================================

fn render_sealed(date: &str, elapsed: Duration, config: &Config, frame: &mut Frame, area: Rect) {
    let closing = Typewriter::new(content::SEALED_TEXT, config.timings.sealed_type());
    let heart = if blink(elapsed, Duration::from_millis(500)) {
        "💝"
    } else {
        "💗"
    };

    let mut lines = heading("the grand finale...", "One More Thing");
    lines.extend([
        Line::from(heart),
        Line::from(""),
        Line::from(Span::styled("From my heart 💌", theme::STYLE_HEADING)),
        Line::from(Span::styled("You Matter To Me", theme::STYLE_SOFT)),
        Line::from(""),
        Line::from(Span::styled(closing.visible(elapsed), theme::STYLE_BUTTON)),
        Line::from(""),
        Line::from(Span::styled(date, theme::STYLE_DIM)),
        Line::from(""),
        Line::from(button("See Again ✨ 🔄", true)),
    ]);

    render_centered(lines, frame, area);
}

// ============================================================================
// TESTS
// ============================================================================
