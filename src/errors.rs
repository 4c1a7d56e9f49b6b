use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Config(String),
    /// Every attempt of a logical call failed; carries the last attempt's diagnostic.
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
            Error::Http(err) => write!(f, "http error: {err}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Exhausted {
                url,
                attempts,
                last_error,
            } => write!(
                f,
                "GET {url} failed after {attempts} attempt(s): {last_error}"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Config(_) | Error::Exhausted { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
