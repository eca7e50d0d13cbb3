//! snowcard: a winter greeting card that plays out in the terminal.

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod player;
pub mod playlist;
pub mod registry;
pub mod snowfall;
pub mod timer;
pub mod tui;
