use bevy::prelude::*;
use std::{fs, io, num::ParseIntError, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("high score file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is not a number: {0}")]
    Parse(#[from] ParseIntError),
}

/// Best score per game mode, one text file each under the data directory.
#[derive(Resource, Debug, Clone)]
pub struct HighScoreStore { dir: PathBuf }

impl HighScoreStore {
    pub fn new(dir: PathBuf) -> Self { Self { dir } }

    pub fn path_for(&self, mode: &str) -> PathBuf { self.dir.join(format!("highscore_{mode}.txt")) }

    pub fn try_load(&self, mode: &str) -> Result<u32, PersistenceError> {
        let raw = fs::read_to_string(self.path_for(mode))?;
        Ok(raw.trim().parse::<u32>()?)
    }

    /// Missing or unreadable files count as no score yet.
    pub fn load_high_score(&self, mode: &str) -> u32 {
        match self.try_load(mode) {
            Ok(score) => score,
            Err(PersistenceError::Io(error)) if error.kind() == io::ErrorKind::NotFound => 0,
            Err(error) => {
                warn!("ignoring stored high score for {mode}: {error}");
                0
            }
        }
    }

    pub fn save_high_score(&mut self, mode: &str, score: u32) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(mode), score.to_string())?;
        Ok(())
    }
}
