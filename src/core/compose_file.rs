// src/core/compose_file.rs

use crate::constants::{
    COMPOSE_FILE_ENV, CONVENTIONAL_COMPOSE_FILES, DEFAULT_COMPOSE_KEY, SETTINGS_FILENAME,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why no usable manifest could be selected.
#[derive(Error, Debug)]
pub enum ComposeFileError {
    /// An explicit or persisted manifest path is missing.
    #[error("Compose file '{0}' does not exist.")]
    FileNotFound(PathBuf),
    /// None of the sources produced a manifest.
    #[error(
        "No compose file found. Expected {} or {} in the current directory, \
         or pass one with '-f <file>' / {}.",
        CONVENTIONAL_COMPOSE_FILES[0],
        CONVENTIONAL_COMPOSE_FILES[1],
        COMPOSE_FILE_ENV
    )]
    NoComposeFile,
    /// `~` or `$VAR` in an override could not be expanded.
    #[error("Could not expand path '{path}': {reason}")]
    Expansion {
        /// The override as given.
        path: String,
        /// What the expansion reported.
        reason: String,
    },
    /// Reading or writing the `.env` default failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
}

type ComposeResult<T> = Result<T, ComposeFileError>;

/// Where the active manifest came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSource {
    /// `-f <file>` / `--file <file>`.
    Flag,
    /// The environment override.
    Environment,
    /// A conventional name in the working directory.
    Conventional,
    /// The `.env` default.
    Default,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Flag => "-f flag",
            Self::Environment => COMPOSE_FILE_ENV,
            Self::Conventional => "working directory",
            Self::Default => "persisted default",
        };
        f.write_str(label)
    }
}

/// The compose manifest an invocation operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeManifest {
    /// Absolute, simplified path.
    pub path: PathBuf,
    /// Which rule selected it.
    pub source: ManifestSource,
}

/// Resolves the active compose manifest for `cwd`.
///
/// Priority: `-f` flag > environment override > conventional names > persisted
/// default. An explicit override that does not exist is an error on its own; it
/// never falls through to the next source. The same holds for a stale default.
pub fn resolve(
    cwd: &Path,
    flag_override: Option<&str>,
    env_override: Option<&str>,
) -> ComposeResult<ComposeManifest> {
    let explicit = flag_override
        .map(|p| (p, ManifestSource::Flag))
        .or_else(|| env_override.map(|p| (p, ManifestSource::Environment)));

    if let Some((raw, source)) = explicit {
        let path = existing_file(cwd, &expand(raw)?)?;
        log::debug!("Using compose file '{}' from {}", path.display(), source);
        return Ok(ComposeManifest { path, source });
    }

    for name in CONVENTIONAL_COMPOSE_FILES {
        let candidate = cwd.join(name);
        if candidate.is_file() {
            log::debug!("Using conventional compose file '{}'", candidate.display());
            return Ok(ComposeManifest {
                path: candidate,
                source: ManifestSource::Conventional,
            });
        }
    }

    if let Some(default) = read_default(cwd)? {
        let path = existing_file(cwd, &default)?;
        log::debug!("Using persisted default compose file '{}'", path.display());
        return Ok(ComposeManifest {
            path,
            source: ManifestSource::Default,
        });
    }

    Err(ComposeFileError::NoComposeFile)
}

/// Reads the persisted default manifest of `cwd`, if any.
pub fn read_default(cwd: &Path) -> ComposeResult<Option<String>> {
    let settings = cwd.join(SETTINGS_FILENAME);
    if !settings.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&settings)?;
    Ok(content
        .lines()
        .filter_map(parse_default_line)
        .last()
        .map(str::to_string))
}

/// Persists `file` as the default manifest of `cwd`.
///
/// Any previous default line is deleted before the new one is appended, so
/// setting the same value twice leaves exactly one line. Other lines are kept.
pub fn set_default(cwd: &Path, file: &str) -> ComposeResult<()> {
    let mut lines = settings_without_default(cwd)?;
    lines.push(format!("{}={}", DEFAULT_COMPOSE_KEY, file));
    write_settings(cwd, &lines)
}

/// Deletes the persisted default. Returns whether a line was removed.
/// A missing settings file or line is a no-op.
pub fn remove_default(cwd: &Path) -> ComposeResult<bool> {
    if read_default(cwd)?.is_none() {
        return Ok(false);
    }
    let lines = settings_without_default(cwd)?;
    write_settings(cwd, &lines)?;
    Ok(true)
}

fn parse_default_line(line: &str) -> Option<&str> {
    let (key, value) = line.split_once('=')?;
    if key.trim() != DEFAULT_COMPOSE_KEY {
        return None;
    }
    let value = value.trim().trim_matches('"').trim_matches('\'');
    (!value.is_empty()).then_some(value)
}

fn settings_without_default(cwd: &Path) -> ComposeResult<Vec<String>> {
    let settings = cwd.join(SETTINGS_FILENAME);
    if !settings.is_file() {
        return Ok(Vec::new());
    }
    Ok(fs::read_to_string(&settings)?
        .lines()
        .filter(|line| {
            line.split_once('=')
                .is_none_or(|(key, _)| key.trim() != DEFAULT_COMPOSE_KEY)
        })
        .map(str::to_string)
        .collect())
}

fn write_settings(cwd: &Path, lines: &[String]) -> ComposeResult<()> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(cwd.join(SETTINGS_FILENAME), content)?;
    Ok(())
}

fn expand(raw: &str) -> ComposeResult<String> {
    shellexpand::full(raw)
        .map(|s| s.into_owned())
        .map_err(|e| ComposeFileError::Expansion {
            path: raw.to_string(),
            reason: e.to_string(),
        })
}

fn existing_file(cwd: &Path, raw: &str) -> ComposeResult<PathBuf> {
    let path = cwd.join(raw);
    if path.is_file() {
        Ok(dunce::simplified(&path).to_path_buf())
    } else {
        Err(ComposeFileError::FileNotFound(PathBuf::from(raw)))
    }
}
