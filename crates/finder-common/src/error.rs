use reqwest::StatusCode;

/// Failures of a single search submission against the remote API.
///
/// None of these reach the user as an error. The caller decides what to show
/// instead (the UI substitutes its demo result set) and logs the variant.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search api returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl SubmissionError {
    /// True when the API could not be reached at all (refused, DNS, timeout).
    pub fn is_unreachable(&self) -> bool {
        match self {
            SubmissionError::Transport(e) => e.is_connect() || e.is_timeout(),
            SubmissionError::Upstream { .. } | SubmissionError::InvalidJson(_) => false,
        }
    }
}
