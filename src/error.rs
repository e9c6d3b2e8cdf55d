//! Error taxonomy shared by the boundary and route components.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Well-formed request with no usable result.
    #[error("{0}")]
    NotFound(String),

    /// Provider unreachable, non-success status, or malformed response.
    ///
    /// `reachable` is true when the provider answered but signalled failure
    /// in its own payload (e.g. a directions status other than `OK`).
    #[error("{}", upstream_message(.status, .message))]
    Upstream {
        reachable: bool,
        status: Option<String>,
        message: String,
    },
}

fn upstream_message(status: &Option<String>, message: &str) -> String {
    match status {
        Some(status) if message.is_empty() => status.clone(),
        Some(status) => format!("{}: {}", status, message),
        None => message.to_string(),
    }
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    /// Transport-level failure: the provider could not be reached or did not
    /// answer with a usable document.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Error::Upstream {
            reachable: false,
            status: None,
            message: message.into(),
        }
    }

    /// The provider answered but reported failure.
    pub fn rejected(status: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            reachable: true,
            status: Some(status.into()),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream {
            reachable: false,
            status: e.status().map(|s| s.as_u16().to_string()),
            message: e.to_string(),
        }
    }
}
