//! Level files on disk: one `<name>.txt` document per level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{LevelError, LibraryError};
use crate::format::{self, LevelDocument};

pub const LEVEL_EXTENSION: &str = "txt";

/// Result of [`LevelLibrary::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The document failed validation and nothing was written.
    Rejected(LevelError),
}

/// A directory of level documents.
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    root: PathBuf,
}

impl LevelLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the built-in level with the given index.
    pub fn indexed_name(index: u32) -> String {
        format!("level{index}")
    }

    /// File path for a level name. The name may carry the `.txt` extension
    /// but must not contain path separators.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LibraryError> {
        let stem = name
            .strip_suffix(&format!(".{LEVEL_EXTENSION}"))
            .unwrap_or(name);
        let bad = stem.is_empty()
            || stem == "."
            || stem == ".."
            || stem.contains(['/', '\\'])
            || stem.chars().any(char::is_control);
        if bad {
            return Err(LibraryError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{stem}.{LEVEL_EXTENSION}")))
    }

    /// Names (without extension) of every level file that reads and
    /// validates, sorted. Anything else is skipped. A missing root directory
    /// lists as empty.
    pub fn list(&self) -> Result<Vec<String>, LibraryError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LibraryError::Io {
                    path: self.root.clone(),
                    source,
                });
            },
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                },
            };
            if path.extension().and_then(|e| e.to_str()) != Some(LEVEL_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(text) => match format::validate_text(&text) {
                    Ok(()) => names.push(stem.to_string()),
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "skipping invalid level file")
                    },
                },
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping unreadable level file")
                },
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read, validate and parse a level.
    pub fn load(&self, name: &str) -> Result<LevelDocument, LibraryError> {
        let path = self.path_for(name)?;
        let text = fs::read_to_string(&path).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;
        let checked = format::validate_text(&text).and_then(|()| format::parse(&text));
        checked.map_err(|source| LibraryError::Level { path, source })
    }

    pub fn load_index(&self, index: u32) -> Result<LevelDocument, LibraryError> {
        self.load(&Self::indexed_name(index))
    }

    /// Whether `level{index}.txt` exists, e.g. to decide if there is a next
    /// level after a win.
    pub fn has_index(&self, index: u32) -> bool {
        self.path_for(&Self::indexed_name(index))
            .is_ok_and(|p| p.is_file())
    }

    /// Validate and write a level, creating the root directory if needed.
    /// Invalid documents are rejected without touching the disk.
    pub fn save(&self, name: &str, doc: &LevelDocument) -> Result<SaveOutcome, LibraryError> {
        let path = self.path_for(name)?;
        if let Err(e) = doc.validate() {
            tracing::info!(level = name, error = %e, "level not saved");
            return Ok(SaveOutcome::Rejected(e));
        }
        fs::create_dir_all(&self.root).map_err(|source| LibraryError::Io {
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, doc.to_text()).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "level saved");
        Ok(SaveOutcome::Saved(path))
    }
}
