//! Audio playback through an external player program.
//!
//! The songs screen only tracks play/pause state; this is where a track
//! actually starts making sound. One child process at a time: starting a
//! track stops the previous one, and dropping the player stops it too.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use crate::config::{PlayerConfig, Song};
use crate::error::PlaybackError;

/// Something that can play songs.
pub trait Player {
    /// Start `song` at offset `from`, stopping anything already playing.
    fn play(&mut self, song: &Song, from: Duration) -> Result<(), PlaybackError>;

    /// Stop playback, if any. Always safe to call.
    fn stop(&mut self);

    /// Report, once, that playback ended without being stopped.
    fn poll_exit(&mut self) -> Option<Exit>;
}

/// How a player ended on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Played through to the end.
    Finished,
    /// Exited with an error status, or could not be waited on.
    Failed,
}

/// Plays songs by spawning the configured program.
#[derive(Debug)]
pub struct ProcessPlayer {
    config: PlayerConfig,
    child: Option<Child>,
}

impl ProcessPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        ProcessPlayer {
            config,
            child: None,
        }
    }

    /// Whether a child process is currently attached.
    pub fn is_active(&self) -> bool {
        self.child.is_some()
    }

    fn command(&self, song: &Song, from: Duration) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args);
        if !self.config.seek_arg.is_empty() && !from.is_zero() {
            cmd.arg(format!("{}{}", self.config.seek_arg, from.as_secs()));
        }
        cmd.arg(&song.source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Player for ProcessPlayer {
    fn play(&mut self, song: &Song, from: Duration) -> Result<(), PlaybackError> {
        self.stop();

        if !song.is_remote() {
            let path = PathBuf::from(&song.source);
            if !path.is_file() {
                return Err(PlaybackError::MissingAsset(path));
            }
        }

        let child = self
            .command(song, from)
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        tracing::debug!(
            "Started {} (pid {}) for '{}' at {}s",
            self.config.program,
            child.id(),
            song.title,
            from.as_secs()
        );
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine.
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("Stopped player pid {}", child.id());
        }
    }

    fn poll_exit(&mut self) -> Option<Exit> {
        let child = self.child.as_mut()?;
        let exit = match child.try_wait() {
            Ok(None) => return None,
            Ok(Some(status)) if status.success() => Exit::Finished,
            Ok(Some(status)) => {
                tracing::warn!("{} exited with {}", self.config.program, status);
                Exit::Failed
            }
            Err(e) => {
                tracing::warn!("Lost track of {}: {}", self.config.program, e);
                Exit::Failed
            }
        };
        self.child = None;
        Some(exit)
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn song(source: &str) -> Song {
        Song {
            title: "test".to_string(),
            subtitle: String::new(),
            source: source.to_string(),
            length_secs: None,
        }
    }

    fn player(program: &str) -> ProcessPlayer {
        ProcessPlayer::new(PlayerConfig {
            program: program.to_string(),
            args: Vec::new(),
            seek_arg: "--start=".to_string(),
        })
    }

    #[test]
    fn missing_local_asset_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.mp3");
        let mut p = player("mpv");

        match p.play(&song(&path.display().to_string()), Duration::ZERO) {
            Err(PlaybackError::MissingAsset(missing)) => assert_eq!(missing, path),
            other => panic!("expected MissingAsset, got {:?}", other),
        }
        assert!(!p.is_active());
    }

    #[test]
    fn unspawnable_program_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"not really audio").unwrap();
        let mut p = player("snowcard-no-such-player-binary");

        match p.play(&song(&path.display().to_string()), Duration::ZERO) {
            Err(PlaybackError::Spawn { program, .. }) => {
                assert_eq!(program, "snowcard-no-such-player-binary");
            }
            other => panic!("expected Spawn, got {:?}", other),
        }
        assert!(!p.is_active());
    }

    #[test]
    fn remote_source_skips_file_check() {
        let mut p = player("snowcard-no-such-player-binary");
        let result = p.play(&song("https://example.com/a.mp3"), Duration::ZERO);
        assert!(matches!(result, Err(PlaybackError::Spawn { .. })));
    }

    /// Wait up to a few seconds for the child to be reaped.
    #[cfg(unix)]
    fn wait_for_exit(p: &mut ProcessPlayer) -> Option<Exit> {
        for _ in 0..100 {
            if let Some(exit) = p.poll_exit() {
                return Some(exit);
            }
            std::thread::sleep(Duration::from_millis(30));
        }
        None
    }

    #[cfg(unix)]
    #[test]
    fn program_failing_right_away_is_reported_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"not really audio").unwrap();
        let mut p = player("false");

        p.play(&song(&path.display().to_string()), Duration::ZERO).unwrap();

        assert_eq!(wait_for_exit(&mut p), Some(Exit::Failed));
        assert!(!p.is_active());
        assert_eq!(p.poll_exit(), None);
    }

    #[cfg(unix)]
    #[test]
    fn clean_exit_counts_as_finished() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"not really audio").unwrap();
        let mut p = player("true");

        p.play(&song(&path.display().to_string()), Duration::ZERO).unwrap();

        assert_eq!(wait_for_exit(&mut p), Some(Exit::Finished));
    }

    #[test]
    fn poll_without_child_reports_nothing() {
        let mut p = player("mpv");
        assert_eq!(p.poll_exit(), None);
    }

    #[test]
    fn stop_without_child_is_noop() {
        let mut p = player("mpv");
        p.stop();
        p.stop();
        assert!(!p.is_active());
    }

    #[test]
    fn seek_arg_only_added_for_nonzero_offset() {
        let p = player("mpv");
        let s = song("a.mp3");

        let args: Vec<String> = p
            .command(&s, Duration::ZERO)
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["a.mp3"]);

        let args: Vec<String> = p
            .command(&s, Duration::from_secs(42))
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["--start=42", "a.mp3"]);
    }
}
