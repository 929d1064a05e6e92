use thiserror::Error;

/// Failures surfaced by the gym API client and the components built on it.
#[derive(Debug, Error)]
pub enum GymError {
    /// No token was available, so the request was never sent.
    #[error("no authentication token found, please log in")]
    AuthMissing,

    /// Transport failure (connect, TLS, reset, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status.
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// A write endpoint answered with `code != 0`.
    #[error("API rejected the request with code {code}")]
    Rejected { code: i64 },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The session finished without a linked workout plan to hand off.
    #[error("workout plan id is missing, cannot show the result")]
    PlanLinkMissing,

    #[error("cannot {action} a session that is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

impl From<reqwest::Error> for GymError {
    fn from(err: reqwest::Error) -> Self {
        GymError::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GymError {
    fn from(err: serde_json::Error) -> Self {
        GymError::Decode {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GymError>;
