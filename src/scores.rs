use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::beside_executable;

pub const DEFAULT_FILE: &str = "cellcade.scores.json";

/// One best score per game, persisted as a flat JSON object keyed by
/// per-game key (`snake_best`, `flappy_best`, ...).
#[derive(Clone, Debug)]
pub struct BestScores {
    scores: BTreeMap<String, i32>,
    path: Option<PathBuf>,
}

impl BestScores {
    /// Loads from `path`, or from the default file beside the executable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| beside_executable(DEFAULT_FILE));
        let scores = Self::read_file(&path);
        debug!("{} best score(s) from {}", scores.len(), path.display());
        Self {
            scores,
            path: Some(path),
        }
    }

    /// Never touches disk.
    pub fn in_memory() -> Self {
        Self {
            scores: BTreeMap::new(),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_file(path: &Path) -> BTreeMap<String, i32> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };
        Self::parse(&text).unwrap_or_else(|| {
            warn!("ignoring corrupt score file {}", path.display());
            BTreeMap::new()
        })
    }

    /// Entries that are not non-negative integers are dropped.
    fn parse(text: &str) -> Option<BTreeMap<String, i32>> {
        let Value::Object(map) = serde_json::from_str::<Value>(text).ok()? else {
            return None;
        };
        Some(
            map.into_iter()
                .filter_map(|(key, value)| {
                    let score = value.as_i64().and_then(|n| i32::try_from(n).ok());
                    match score {
                        Some(score) if score >= 0 => Some((key, score)),
                        _ => {
                            warn!("ignoring unusable best score for {}: {}", key, value);
                            None
                        }
                    }
                })
                .collect(),
        )
    }

    /// 0 when nothing has been recorded.
    pub fn get(&self, key: &str) -> i32 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    /// Stores `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, key: &str, score: i32) -> bool {
        if score <= self.get(key) {
            return false;
        }
        self.scores.insert(key.to_string(), score);
        info!("new best for {}: {}", key, score);
        self.write_file();
        true
    }

    fn write_file(&self) {
        let Some(path) = &self.path else { return };
        let text = match serde_json::to_string_pretty(&self.scores) {
            Ok(text) => text,
            Err(e) => {
                warn!("could not encode best scores: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(path, text) {
            warn!("could not write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_only_improves() {
        let mut scores = BestScores::in_memory();
        assert_eq!(scores.get("snake_best"), 0);
        assert!(!scores.record("snake_best", 0));
        assert!(scores.record("snake_best", 7));
        assert!(!scores.record("snake_best", 7));
        assert!(!scores.record("snake_best", 3));
        assert_eq!(scores.get("snake_best"), 7);
    }

    #[test]
    fn corrupt_entries_read_as_zero() {
        let parsed = BestScores::parse(r#"{"snake_best": 12, "flappy_best": "lots", "pacman_best": -4}"#)
            .unwrap();
        assert_eq!(parsed.get("snake_best"), Some(&12));
        assert!(!parsed.contains_key("flappy_best"));
        assert!(!parsed.contains_key("pacman_best"));
        assert!(BestScores::parse("[1, 2]").is_none());
        assert!(BestScores::parse("not json").is_none());
    }

    #[test]
    fn persists_across_loads() {
        let path = std::env::temp_dir().join(format!("cellcade-scores-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        let mut scores = BestScores::load(Some(&path));
        assert_eq!(scores.get("flappy_best"), 0);
        assert!(scores.record("flappy_best", 9));

        let reloaded = BestScores::load(Some(&path));
        let _ = fs::remove_file(&path);
        assert_eq!(reloaded.get("flappy_best"), 9);
    }
}
