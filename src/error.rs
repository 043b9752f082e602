use std::fmt;

use chrono::NaiveDate;

#[derive(Debug)]
pub enum Error {
    /// A period whose end date precedes its start date.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Unknown session, period or candidate, or an empty selection.
    InvalidSelection(String),
    /// An optional decorative asset (the logo) could not be loaded.
    MissingAsset(String),
    /// Drawing a page failed; no partial document is returned.
    RenderingFailed(String),
    /// Malformed roster file or a rejected roster mutation.
    InvalidRoster(String),
    /// Unreadable layout options file.
    InvalidConfig(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRange { start, end } => write!(
                f,
                "invalid period: end {} precedes start {}",
                end.format("%d/%m/%Y"),
                start.format("%d/%m/%Y")
            ),
            Error::InvalidSelection(msg) => write!(f, "invalid selection: {msg}"),
            Error::MissingAsset(msg) => write!(f, "missing asset: {msg}"),
            Error::RenderingFailed(msg) => write!(f, "rendering failed: {msg}"),
            Error::InvalidRoster(msg) => write!(f, "invalid roster: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid layout options: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
