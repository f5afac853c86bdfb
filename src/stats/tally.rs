use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClassifyError, Result};

/// Running count of user-confirmed predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Predictions the user has judged.
    pub total: u64,
    /// Predictions the user confirmed as correct.
    pub correct: u64,
}

impl Tally {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Fraction of confirmed predictions in [0, 1]; 0 before any feedback.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 || self.correct == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tested:   {}", self.total)?;
        writeln!(f, "correct:  {}", self.correct)?;
        write!(f, "accuracy: {:.2}%", self.accuracy() * 100.0)
    }
}

/// JSON file holding a single [`Tally`].
#[derive(Debug, Clone)]
pub struct TallyStore {
    path: PathBuf,
}

impl TallyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TallyStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored tally; a missing file is an empty tally.
    pub fn load(&self) -> Result<Tally> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Tally::default()),
            Err(e) => Err(ClassifyError::io(&self.path, e)),
        }
    }

    /// Writes the tally via a sibling temp file and rename, so readers never
    /// observe a half-written file.
    pub fn save(&self, tally: &Tally) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| ClassifyError::io(dir, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(tally)?;
        std::fs::write(&tmp, json).map_err(|e| ClassifyError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ClassifyError::io(&self.path, e))?;
        Ok(())
    }

    /// Loads, records one judgement, saves, and returns the updated tally.
    pub fn record(&self, correct: bool) -> Result<Tally> {
        let mut tally = self.load()?;
        tally.record(correct);
        self.save(&tally)?;
        debug!(total = tally.total, correct = tally.correct, "recorded prediction feedback");
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_zero_without_correct_answers() {
        let mut t = Tally::default();
        assert_eq!(t.accuracy(), 0.0);
        t.record(false);
        assert_eq!(t.accuracy(), 0.0);
        t.record(true);
        assert_eq!(t, Tally { total: 2, correct: 1 });
        assert_eq!(t.accuracy(), 0.5);
    }

    #[test]
    fn store_starts_empty_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = TallyStore::new(dir.path().join("nested").join("tally.json"));
        assert_eq!(store.load().unwrap(), Tally::default());

        store.record(true).unwrap();
        store.record(true).unwrap();
        let t = store.record(false).unwrap();
        assert_eq!(t, Tally { total: 3, correct: 2 });

        let reopened = TallyStore::new(store.path().to_path_buf());
        assert_eq!(reopened.load().unwrap(), t);
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(TallyStore::new(path).load(), Err(ClassifyError::Json(_))));
    }

    #[test]
    fn display_shows_percentage() {
        let t = Tally { total: 4, correct: 3 };
        assert!(t.to_string().ends_with("accuracy: 75.00%"));
    }
}
