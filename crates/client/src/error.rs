use std::collections::BTreeMap;

/// Failures surfaced to whoever triggered a client action.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the payload; `fields` maps wire field names to messages.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never got a usable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no modal is open for this action")]
    NoActiveModal,
}
