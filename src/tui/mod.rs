//! Interactive terminal front end.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Screen, Action, Transition)
//! - `update`: Pure transitions for actions and ticks
//! - `view`: Pure rendering
//! - `theme`: Colors and styles
//! - `run`: Effects (terminal, threads, audio)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
