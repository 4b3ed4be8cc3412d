//! Playlist persistence
//!
//! Writes a collected run to disk: one dated directory per calendar day,
//! one sequentially numbered file per playlist. Runs on the same day share
//! the directory and overwrite by index (last write wins); a failed run
//! leaves the files written before the failure in place - there is no
//! rollback.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::OutputConfig;
use crate::error::{Result, WriteError};
use crate::types::Playlist;

/// The on-disk outcome of one persisted run
#[derive(Clone, Debug)]
pub struct PersistedRun {
    /// The dated directory the run was written into
    pub directory: PathBuf,
    /// The written files, in playlist order
    pub files: Vec<PathBuf>,
}

/// Writes collected playlists into a dated output directory
pub struct PlaylistWriter {
    config: OutputConfig,
}

impl PlaylistWriter {
    /// Create a writer over the given output configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Persist the playlists of one run
    ///
    /// Creates the dated directory if absent (a pre-existing directory is
    /// not an error) and writes each playlist to
    /// `<file_prefix><N>.<file_extension>` with N counted from 1 in
    /// playlist order. An empty run still creates the directory.
    ///
    /// # Errors
    /// Returns [`WriteError`] on the first filesystem failure; files
    /// written before the failure remain on disk.
    pub async fn persist(&self, playlists: &[Playlist]) -> Result<PersistedRun> {
        let directory = self.run_directory(Local::now().date_naive());

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|source| WriteError::CreateDir {
                path: directory.clone(),
                source,
            })?;

        let mut files = Vec::with_capacity(playlists.len());
        for (i, playlist) in playlists.iter().enumerate() {
            let index = i + 1;
            let path = directory.join(format!(
                "{}{}.{}",
                self.config.file_prefix, index, self.config.file_extension
            ));
            tokio::fs::write(&path, playlist.data())
                .await
                .map_err(|source| WriteError::WriteFile {
                    index,
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), bytes = playlist.len(), "playlist written");
            files.push(path);
        }

        info!(
            directory = %directory.display(),
            files = files.len(),
            "run persisted"
        );
        Ok(PersistedRun { directory, files })
    }

    /// The dated directory for a given calendar day
    fn run_directory(&self, date: NaiveDate) -> PathBuf {
        self.config
            .base_dir
            .join(format!("{}{}", self.config.dir_prefix, date.format("%Y-%m-%d")))
    }
}
