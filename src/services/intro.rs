//! Loading the introduction text
//!
//! The source is either a local path or an `http(s)://` URL. Loading is
//! blocking and runs on a worker thread.

use std::path::PathBuf;
use std::time::Duration;

/// Text shown in place of the introduction when it cannot be loaded
pub const INTRO_ERROR_TEXT: &str = "Error loading introduction file.";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub trait IntroSource: Send + Sync {
    fn load(&self) -> Result<String, IntroError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroLoader {
    File(PathBuf),
    Url(String),
}

impl IntroLoader {
    pub fn from_source(source: &str) -> Self {
        let trimmed = source.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            IntroLoader::Url(trimmed.to_string())
        } else {
            IntroLoader::File(PathBuf::from(trimmed))
        }
    }
}

impl IntroSource for IntroLoader {
    fn load(&self) -> Result<String, IntroError> {
        match self {
            IntroLoader::File(path) => std::fs::read_to_string(path)
                .map_err(|e| IntroError::Io(format!("{}: {}", path.display(), e))),
            IntroLoader::Url(url) => {
                let response = match ureq::get(url).timeout(FETCH_TIMEOUT).call() {
                    Ok(resp) => resp,
                    Err(ureq::Error::Status(code, _)) => return Err(IntroError::Status(code)),
                    Err(ureq::Error::Transport(t)) => return Err(IntroError::Http(t.to_string())),
                };
                if !(200..300).contains(&response.status()) {
                    return Err(IntroError::Status(response.status()));
                }
                response
                    .into_string()
                    .map_err(|e| IntroError::Http(e.to_string()))
            }
        }
    }
}

/// The text to play back: the loaded introduction or the error line
pub fn load_or_error_text(source: &dyn IntroSource) -> String {
    match source.load() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to load introduction: {}", e);
            INTRO_ERROR_TEXT.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroError {
    Io(String),
    Http(String),
    Status(u16),
}

impl std::fmt::Display for IntroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntroError::Io(msg) => write!(f, "IO error: {msg}"),
            IntroError::Http(msg) => write!(f, "HTTP error: {msg}"),
            IntroError::Status(code) => write!(f, "Server responded with status {code}"),
        }
    }
}

impl std::error::Error for IntroError {}
