//! Optional `.env` file merging.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Conventional name of the environment file.
pub const ENV_FILE_NAME: &str = ".env";

/// Outcome of merging an env file into the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// The file was merged. `skipped` counts statements that could not be parsed.
    Loaded { path: PathBuf, skipped: usize },
    /// No file was found; nothing changed.
    NotFound,
    /// The file exists but could not be read; nothing changed.
    Unreadable(String),
}

/// Look for [`ENV_FILE_NAME`] in `start` and its ancestors.
pub fn find_env_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(ENV_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Merge `KEY=VALUE` pairs from an env file into the process environment.
///
/// With `None`, looks for `.env` in the current directory and its parents.
/// Variables already present in the process environment are never overridden.
/// Statements that fail to parse are logged and skipped; the rest still load.
/// Only `${NAME}` references are expanded, a bare `$` is kept as written.
pub fn merge_env_file(path: Option<&Path>) -> EnvFileStatus {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match env::current_dir().ok().and_then(|dir| find_env_file(&dir)) {
            Some(path) => path,
            None => {
                tracing::debug!("No environment file found, using process environment only");
                return EnvFileStatus::NotFound;
            }
        },
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No environment file at {}", path.display());
            return EnvFileStatus::NotFound;
        }
        Err(e) => {
            tracing::warn!("Cannot read environment file {}: {}", path.display(), e);
            return EnvFileStatus::Unreadable(e.to_string());
        }
    };

    let escaped = escape_bare_dollars(contents.trim_start_matches('\u{feff}'));
    let mut skipped = 0;

    for item in dotenvy::from_read_iter(escaped.as_bytes()) {
        match item {
            Ok((key, value)) => {
                if env::var_os(&key).is_none() {
                    env::set_var(&key, value);
                }
            }
            Err(dotenvy::Error::Io(e)) => {
                tracing::warn!("Stopped reading environment file {}: {}", path.display(), e);
                skipped += 1;
                break;
            }
            Err(e) => {
                tracing::warn!("Skipping statement in {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Loaded environment file {} ({} statements skipped)",
        path.display(),
        skipped
    );
    EnvFileStatus::Loaded { path, skipped }
}

/// Prefix every `$` that does not open a `${NAME}` reference with `\`, so the
/// parser keeps it literally. Single-quoted text and trailing comments are
/// copied untouched.
fn escape_bare_dollars(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    // Quote left open by a previous line (multi-line values).
    let mut open_quote: Option<char> = None;

    for line in contents.split_inclusive('\n') {
        let value = if open_quote.is_some() {
            line
        } else if line.trim_start().starts_with('#') {
            out.push_str(line);
            continue;
        } else {
            match line.find('=') {
                Some(eq) => {
                    let rest = &line[eq + 1..];
                    let value = rest.trim_start_matches([' ', '\t']);
                    out.push_str(&line[..line.len() - value.len()]);
                    value
                }
                None => {
                    out.push_str(line);
                    continue;
                }
            }
        };

        let mut chars = value.chars().peekable();
        let mut escaped = false;
        while let Some(c) = chars.next() {
            if escaped {
                escaped = false;
            } else {
                match (open_quote, c) {
                    (Some('\''), '\'') | (Some('"'), '"') => open_quote = None,
                    (Some('\''), _) => {}
                    (_, '\\') => escaped = true,
                    (_, '$') if chars.peek() != Some(&'{') => out.push('\\'),
                    (None, '\'' | '"') => open_quote = Some(c),
                    (None, ' ' | '\t') => {
                        out.push(c);
                        out.extend(chars.by_ref());
                        break;
                    }
                    _ => {}
                }
            }
            out.push(c);
        }
    }

    out
}
