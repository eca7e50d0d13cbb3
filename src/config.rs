//! Configuration: timings, snowfall sizes, songs and the audio player.
//!
//! Stored as JSON. Every field has a default, so a missing file or a
//! partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snowfall::{INLINE_COUNT, OVERLAY_COUNT};

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Who the letter is addressed to.
    pub recipient: String,
    /// Closing line of the letter.
    pub signature: String,
    pub timings: Timings,
    pub snowfall: SnowfallConfig,
    pub songs: Vec<Song>,
    pub player: PlayerConfig,
}

/// All delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Event loop tick.
    pub frame_ms: u64,
    /// Loading: "Merry Christmas" appears.
    pub loading_reveal_ms: u64,
    /// Loading: one character of the status line.
    pub loading_type_ms: u64,
    /// Loading: advance to the welcome card.
    pub loading_complete_ms: u64,
    /// Game: burst plays this long before advancing.
    pub game_burst_ms: u64,
    /// Wrapping: advance to the sealed screen.
    pub wrapping_ms: u64,
    /// Sealed: one character of the closing line.
    pub sealed_type_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowfallConfig {
    pub overlay_count: usize,
    pub inline_count: usize,
}

/// A track on the songs screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub subtitle: String,
    /// Local path (relative to the config file) or http(s) URL.
    pub source: String,
    /// Track length, when known. Playback stops on its own at this point.
    #[serde(default)]
    pub length_secs: Option<u64>,
}

/// External program used to play songs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Prefix for the start offset in seconds, e.g. `--start=`.
    /// Empty means the player cannot seek and always starts at zero.
    pub seek_arg: String,
}

// ============================================================================
// DEFAULTS
// ============================================================================

impl Default for Config {
    fn default() -> Self {
        Config {
            recipient: "Laado".to_string(),
            signature: "Always yours".to_string(),
            timings: Timings::default(),
            snowfall: SnowfallConfig::default(),
            songs: default_songs(),
            player: PlayerConfig::default(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            frame_ms: 50,
            loading_reveal_ms: 1500,
            loading_type_ms: 80,
            loading_complete_ms: 6500,
            game_burst_ms: 1400,
            wrapping_ms: 3000,
            sealed_type_ms: 130,
        }
    }
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        SnowfallConfig {
            overlay_count: OVERLAY_COUNT,
            inline_count: INLINE_COUNT,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            program: "mpv".to_string(),
            args: vec!["--no-video".to_string(), "--really-quiet".to_string()],
            seek_arg: "--start=".to_string(),
        }
    }
}

fn default_songs() -> Vec<Song> {
    vec![
        Song {
            title: "High On You".to_string(),
            subtitle: "LIKE FAIRY LIGHTS FOR MY HEART".to_string(),
            source: "assets/high-on-you.mp3".to_string(),
            length_secs: None,
        },
        Song {
            title: "For a Reason".to_string(),
            subtitle: "SOME PEOPLE FEEL LIKE HOME".to_string(),
            source: "assets/forreason.mp3".to_string(),
            length_secs: None,
        },
        Song {
            title: "Dil Kaa Jo Haal Hai".to_string(),
            subtitle: "WINTER FEELINGS HIT DIFFERENT".to_string(),
            source: "assets/Dilkajohaalhai.mp3".to_string(),
            length_secs: None,
        },
    ]
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Timings {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn loading_reveal(&self) -> Duration {
        Duration::from_millis(self.loading_reveal_ms)
    }

    pub fn loading_type(&self) -> Duration {
        Duration::from_millis(self.loading_type_ms)
    }

    pub fn loading_complete(&self) -> Duration {
        Duration::from_millis(self.loading_complete_ms)
    }

    pub fn game_burst(&self) -> Duration {
        Duration::from_millis(self.game_burst_ms)
    }

    pub fn wrapping(&self) -> Duration {
        Duration::from_millis(self.wrapping_ms)
    }

    pub fn sealed_type(&self) -> Duration {
        Duration::from_millis(self.sealed_type_ms)
    }
}

impl Song {
    pub fn length(&self) -> Option<Duration> {
        self.length_secs.map(Duration::from_secs)
    }

    /// Whether the source is a URL handed to the player as-is.
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

impl Config {
    /// Rewrite relative song sources to be relative to `base`.
    pub fn resolve_sources(&mut self, base: &Path) {
        for song in &mut self.songs {
            if song.is_remote() || Path::new(&song.source).is_absolute() {
                continue;
            }
            song.source = base.join(&song.source).display().to_string();
        }
    }
}

// ============================================================================
// LOADING / SAVING
// ============================================================================

/// Default location: `<config_dir>/snowcard/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snowcard")
        .join(CONFIG_FILE)
}

/// Load from `path`, falling back to defaults when the file does not exist.
///
/// Relative song sources are resolved against the file's directory, whether
/// they came from the file or from the defaults.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        let mut config = Config::default();
        if let Some(base) = path.parent() {
            config.resolve_sources(base);
        }
        return Ok(config);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: Config =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(base) = path.parent() {
        config.resolve_sources(base);
    }

    tracing::info!(
        "Loaded config from {} ({} songs)",
        path.display(),
        config.songs.len()
    );
    Ok(config)
}

/// Write `config` as pretty JSON, creating parent directories.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote config to {}", path.display());
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
