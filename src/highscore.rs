//! Best score persisted as a single integer in a text file
//!
//! The stored value only ever goes up.

use std::io;
use std::path::{Path, PathBuf};

use crate::persistence::write_atomic;

/// Persisted best score
#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u32,
}

impl HighScore {
    /// Read the stored best score; a missing or unreadable file counts as 0
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u32>() {
                Ok(best) => {
                    log::info!("Loaded high score {} from {}", best, path.display());
                    best
                }
                Err(e) => {
                    log::warn!(
                        "High score file {} is not a number ({}), starting from 0",
                        path.display(),
                        e
                    );
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", path.display());
                0
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Commit a finished run's score
    ///
    /// Writes only when `score` beats the stored best. Returns whether the
    /// best changed. On a write error the in-memory best is left untouched.
    pub fn record(&mut self, score: u32) -> io::Result<bool> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        write_atomic(&self.path, score.to_string().as_bytes())?;
        log::info!("New high score {} (was {})", score, self.best);
        self.best = score;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flappy-arcade-hs-{}-{}.txt",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_zero() {
        let hs = HighScore::load(scratch("missing"));
        assert_eq!(hs.best(), 0);
    }

    #[test]
    fn test_garbage_is_zero() {
        let path = scratch("garbage");
        std::fs::write(&path, "lots").unwrap();
        assert_eq!(HighScore::load(&path).best(), 0);
        std::fs::write(&path, "-3").unwrap();
        assert_eq!(HighScore::load(&path).best(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_reads_trimmed_value() {
        let path = scratch("trimmed");
        std::fs::write(&path, " 17\n").unwrap();
        assert_eq!(HighScore::load(&path).best(), 17);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_record_only_raises() {
        let path = scratch("raise");
        let mut hs = HighScore::load(&path);

        assert!(hs.record(5).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "5");

        // Same or lower leaves the file alone
        assert!(!hs.record(5).unwrap());
        assert!(!hs.record(2).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "5");

        assert!(hs.record(9).unwrap());
        assert_eq!(HighScore::load(&path).best(), 9);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_zero_never_written() {
        let path = scratch("zero");
        let mut hs = HighScore::load(&path);
        assert!(!hs.record(0).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_failure_keeps_best() {
        let path = std::env::temp_dir()
            .join(format!("flappy-arcade-missing-dir-{}", std::process::id()))
            .join("highscore.txt");
        let mut hs = HighScore::load(&path);
        assert!(hs.record(3).is_err());
        assert_eq!(hs.best(), 0);
    }
}
