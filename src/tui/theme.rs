//! TUI color semantics and style constants.
//!
//! Pure data, consumed by the rendering layer and the snowfall widget.
//!
//! Color semantics:
//! - Pink: warmth, headings, the things to press
//! - Gold: titles and the focused element
//! - Frost (light blue): secondary copy
//! - White / gray: snow, by opacity
//! - Dim: hints and key help

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// PALETTE
// ============================================================================

const PINK: Color = Color::Rgb(255, 122, 158);
const GOLD: Color = Color::Rgb(255, 196, 92);
const FROST: Color = Color::Rgb(170, 205, 235);
const SNOW: Color = Color::Rgb(245, 248, 255);

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Screen headings.
pub const STYLE_HEADING: Style = Style::new().fg(GOLD).add_modifier(Modifier::BOLD);

/// Small italic line above a heading.
pub const STYLE_SUBTITLE: Style = Style::new().fg(PINK).add_modifier(Modifier::ITALIC);

/// Body copy.
pub const STYLE_BODY: Style = Style::new().fg(SNOW);

/// Secondary copy.
pub const STYLE_SOFT: Style = Style::new().fg(FROST);

/// Something to press, not focused.
pub const STYLE_BUTTON: Style = Style::new().fg(PINK).add_modifier(Modifier::BOLD);

/// Focused button, cell or card.
pub const STYLE_FOCUS: Style = Style::new()
    .fg(Color::Black)
    .bg(GOLD)
    .add_modifier(Modifier::BOLD);

/// The pulsing hint on interactive targets.
pub const STYLE_PULSE: Style = Style::new().fg(PINK).add_modifier(Modifier::SLOW_BLINK);

/// De-emphasized metadata (dates, timestamps).
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

/// Filled part of the tape bar.
pub const STYLE_TAPE: Style = Style::new().fg(PINK);

/// Snow flake colour by opacity: faint flakes recede into the background.
pub fn snow_style(opacity: f64) -> Style {
    if opacity < 0.45 {
        Style::new().fg(Color::DarkGray)
    } else if opacity < 0.75 {
        Style::new().fg(Color::Gray)
    } else {
        Style::new().fg(SNOW)
    }
}

// ============================================================================
// TESTS
// ============================================================================
