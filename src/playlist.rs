//! Playback bookkeeping for the songs screen.
//!
//! Pure state: which track is selected, whether it plays, and how far each
//! track has got. The effects layer starts and stops the actual audio based
//! on the [`Command`] each operation returns.

use std::time::{Duration, Instant};

/// What the audio side should do after a playlist operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start `track` at offset `from`, replacing whatever plays.
    Play { track: usize, from: Duration },
    /// Stop whatever plays.
    Pause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    lengths: Vec<Option<Duration>>,
    current: Option<usize>,
    playing: bool,
    /// Saved offset per track, as of the last pause.
    progress: Vec<Duration>,
    /// When the current track last started or resumed.
    resumed_at: Option<Instant>,
}

impl Playlist {
    pub fn new(lengths: Vec<Option<Duration>>) -> Self {
        let progress = vec![Duration::ZERO; lengths.len()];
        Playlist {
            lengths,
            current: None,
            playing: false,
            progress,
            resumed_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_playing(&self, track: usize) -> bool {
        self.playing && self.current == Some(track)
    }

    pub fn length(&self, track: usize) -> Option<Duration> {
        self.lengths.get(track).copied().flatten()
    }

    /// Play/pause `track`.
    ///
    /// Toggling the current track flips play and pause. Toggling another
    /// track pauses the current one, keeping its offset, and starts the
    /// other from its own saved offset. Returns `None` for an unknown track.
    pub fn toggle(&mut self, track: usize, now: Instant) -> Option<Command> {
        if track >= self.len() {
            return None;
        }

        if self.current == Some(track) && self.playing {
            self.pause(now);
            return Some(Command::Pause);
        }

        if self.playing {
            self.pause(now);
        }

        if self.length(track).is_some_and(|len| self.progress[track] >= len) {
            self.progress[track] = Duration::ZERO;
        }

        self.current = Some(track);
        self.playing = true;
        self.resumed_at = Some(now);
        Some(Command::Play {
            track,
            from: self.progress[track],
        })
    }

    /// How far `track` has played as of `now`.
    pub fn elapsed(&self, track: usize, now: Instant) -> Duration {
        let saved = self.progress.get(track).copied().unwrap_or_default();
        let running = match (self.is_playing(track), self.resumed_at) {
            (true, Some(at)) => now.saturating_duration_since(at),
            _ => Duration::ZERO,
        };
        let total = saved + running;
        match self.length(track) {
            Some(len) => total.min(len),
            None => total,
        }
    }

    /// Fraction of `track` played, 0.0 when the length is unknown.
    pub fn ratio(&self, track: usize, now: Instant) -> f64 {
        match self.length(track) {
            Some(len) if !len.is_zero() => {
                self.elapsed(track, now).as_secs_f64() / len.as_secs_f64()
            }
            _ => 0.0,
        }
    }

    /// Advance time. Returns true if the current track just reached its end,
    /// in which case it is now paused at the end.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(track) = self.current else {
            return false;
        };
        if !self.playing {
            return false;
        }
        match self.length(track) {
            Some(len) if self.elapsed(track, now) >= len => {
                self.pause(now);
                true
            }
            _ => false,
        }
    }

    /// The track could not start. Leave it selected but paused.
    pub fn mark_failed(&mut self, track: usize) {
        if self.current == Some(track) {
            self.playing = false;
            self.resumed_at = None;
        }
    }

    /// The audio for `track` ran out on its own. It stops, and the next
    /// toggle starts it over.
    pub fn finish(&mut self, track: usize, now: Instant) {
        if self.is_playing(track) {
            self.pause(now);
            self.progress[track] = Duration::ZERO;
        }
    }

    fn pause(&mut self, now: Instant) {
        if let Some(track) = self.current {
            self.progress[track] = self.elapsed(track, now);
        }
        self.playing = false;
        self.resumed_at = None;
    }
}

/// `m:ss`, as shown next to the tape.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ============================================================================
// TESTS
// ============================================================================
