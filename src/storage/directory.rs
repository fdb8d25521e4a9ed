//! Course databases stored as files on disk.
//!
//! A database is either a single file or a directory of files. Each file
//! maps course codes to course records, in JSON, YAML or TOML depending on
//! its extension. When a directory is loaded, its files are read in path
//! order and a course defined twice keeps its last definition.

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;
use walkdir::WalkDir;

use crate::{
    domain::{Course, CourseDatabase},
    storage::record::{CourseRecord, RecordError},
};

/// Why a course database could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file or directory could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A file's contents are not a valid course map.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The parser's message.
        message: String,
    },

    /// The file extension is not one of `json`, `yaml`, `yml` or `toml`.
    #[error("unsupported database format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A record in a file could not be turned into a course.
    #[error("invalid course in {}", path.display())]
    Record {
        /// The file holding the record.
        path: PathBuf,
        /// The underlying problem.
        #[source]
        source: RecordError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(OsStr::to_str)? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<BTreeMap<String, CourseRecord>, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Loads a course database from a file or a directory of files.
///
/// # Errors
///
/// Fails if any file cannot be read or parsed, if a single file has an
/// unsupported extension, or if any record holds a malformed expression.
/// Files with unsupported extensions inside a directory are skipped.
#[instrument]
pub fn load_database(path: &Path) -> Result<CourseDatabase, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let courses = if metadata.is_dir() {
        load_directory(path)?
    } else {
        let format = Format::from_path(path)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
        load_file(path, format)?
    };

    let db = CourseDatabase::new(courses);
    tracing::info!("Loaded {} courses from {}", db.len(), path.display());
    Ok(db)
}

fn load_directory(root: &Path) -> Result<Vec<Course>, LoadError> {
    let paths = collect_database_paths(root)?;
    tracing::debug!("Found {} database files under {}", paths.len(), root.display());

    let loaded: Vec<Result<Vec<Course>, LoadError>> = paths
        .par_iter()
        .map(|(path, format)| load_file(path, *format))
        .collect();

    let mut courses = Vec::new();
    for result in loaded {
        courses.extend(result?);
    }
    Ok(courses)
}

fn collect_database_paths(root: &Path) -> Result<Vec<(PathBuf, Format)>, LoadError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || is_hidden(entry.path(), root) {
            continue;
        }
        match Format::from_path(entry.path()) {
            Some(format) => paths.push((entry.into_path(), format)),
            None => tracing::debug!("Skipping {}", entry.path().display()),
        }
    }
    Ok(paths)
}

fn is_hidden(path: &Path, root: &Path) -> bool {
    path.strip_prefix(root).is_ok_and(|relative| {
        relative
            .components()
            .any(|c| c.as_os_str().to_str().is_some_and(|s| s.starts_with('.')))
    })
}

fn load_file(path: &Path, format: Format) -> Result<Vec<Course>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = format.parse(&content).map_err(|message| LoadError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    records
        .into_iter()
        .map(|(key, record)| {
            record
                .into_course(&key)
                .map_err(|source| LoadError::Record {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}
