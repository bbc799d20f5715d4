use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create `dir` if needed and check that a file can be created inside it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::OutputDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Replaces whole files in one directory. Content goes to a sibling temp file
/// that is renamed over the target, so readers never see a partial export.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        self.write_with(filename, |file| {
            file.write_all(content)?;
            Ok::<_, PersistError>(())
        })
    }

    /// Let `fill` stream into the temp file, then move it into place.
    /// Nothing is replaced if `fill` fails.
    pub fn write_with<E, F>(&self, filename: &str, fill: F) -> Result<PathBuf, E>
    where
        E: From<PersistError>,
        F: FnOnce(&mut NamedTempFile) -> Result<(), E>,
    {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(filename);

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(PersistError::from)?;
        fill(&mut tmp)?;
        tmp.flush().map_err(PersistError::from)?;
        tmp.as_file().sync_all().map_err(PersistError::from)?;
        tmp.persist(&target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
