use thiserror::Error;

#[derive(Error, Debug)]
pub enum KagError {
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    Connection { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} without a JSON body (URL: {url})")]
    Status { status: u16, url: String },

    #[error("Failed to parse JSON from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("Failed to deserialize {type_name}: {source}")]
    Deserialization {
        type_name: &'static str,
        source: serde_json::Error,
    },

    #[error("API returned JSON that is not an object (URL: {url})")]
    UnexpectedShape { url: String },

    #[error("No such member: {name}")]
    UnknownMember { name: String },

    #[error("Unrecognized date/time: {value}")]
    DateTimeParse { value: String },

    #[error("Cannot use {segment:?} as a URL path segment")]
    InvalidPathSegment { segment: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl KagError {
    pub fn unknown_member(name: impl Into<String>) -> Self {
        Self::UnknownMember { name: name.into() }
    }

    /// Maps a transport failure the way callers usually want to branch on it.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            Self::Connection {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Http(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_unknown_member(&self) -> bool {
        matches!(self, Self::UnknownMember { .. })
    }
}
