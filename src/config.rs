use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::games::GameKind;

pub const DEFAULT_FRAME_MS: u64 = 16;

/// cellcade - six small games in your terminal
#[derive(Parser, Debug, Default)]
#[command(name = "cellcade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Best-score file (defaults to cellcade.scores.json next to the binary)
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Log file (defaults to cellcade.log next to the binary)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Frames per second; overrides the config file
    #[arg(long)]
    pub fps: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Open straight into a game, e.g. `snake` or `flappy`
    #[arg(long)]
    pub game: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArcadeConfig {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    /// Per-module step interval in milliseconds, keyed by module name.
    /// `0` steps every frame.
    #[serde(default)]
    pub tick_ms: HashMap<String, u64>,
}

fn default_frame_ms() -> u64 {
    DEFAULT_FRAME_MS
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            tick_ms: HashMap::new(),
        }
    }
}

impl ArcadeConfig {
    /// Reads `path`. No path, or a path that does not exist, gives defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Applies command-line overrides.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(fps) = cli.fps.filter(|fps| *fps > 0) {
            self.frame_ms = (1000 / u64::from(fps)).max(1);
        }
        self
    }

    pub fn frame_ms(&self) -> u64 {
        self.frame_ms.max(1)
    }

    /// Step interval for `kind`, `None` when it steps every frame.
    pub fn tick_interval(&self, kind: GameKind) -> Option<u64> {
        match self.tick_ms.get(kind.module_name()) {
            Some(0) => None,
            Some(ms) => Some(*ms),
            None => kind.default_tick_ms(),
        }
    }
}

/// `file_name` in the executable's directory, or the working directory when
/// that cannot be determined.
pub fn beside_executable(file_name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(file_name);
        }
    }
    PathBuf::from(file_name)
}
