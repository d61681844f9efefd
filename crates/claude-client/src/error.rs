use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("Anthropic API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Anthropic API error ({status}, {kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Failed to decode response: {source}\n  body: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response contained no text")]
    EmptyResponse,
}
