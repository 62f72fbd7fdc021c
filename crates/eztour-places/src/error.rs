use std::fmt;

use serde_json::error::Category;
use thiserror::Error;

use crate::status::ProviderStatus;

/// Which required search input was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    PriceTier,
    Position,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::PriceTier => f.write_str("price tier"),
            MissingInput::Position => f.write_str("position"),
        }
    }
}

/// Why a provider payload could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// A field is present but has the wrong type or an invalid value.
    MalformedField,
    /// A required field is absent.
    MissingField,
    /// The body is not valid UTF-8 or not valid JSON at all.
    CorruptedPayload,
}

impl DecodeFailure {
    /// Classifies a `serde_json` error.
    #[must_use]
    pub fn classify(err: &serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => DecodeFailure::CorruptedPayload,
            Category::Data if err.to_string().starts_with("missing field") => {
                DecodeFailure::MissingField
            }
            Category::Data => DecodeFailure::MalformedField,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::MalformedField => f.write_str("malformed field"),
            DecodeFailure::MissingField => f.write_str("missing field"),
            DecodeFailure::CorruptedPayload => f.write_str("corrupted payload"),
        }
    }
}

/// Errors returned by the places client and the search engine.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A required input was absent; no request was made.
    #[error("search declined: no {0} available")]
    Precondition(MissingInput),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with anything other than HTTP 200.
    #[error("unexpected HTTP status {status} from {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// HTTP 200 whose `status` field reports a failure.
    #[error("places provider returned {status}{}", detail_suffix(.message))]
    Provider {
        status: ProviderStatus,
        message: Option<String>,
    },

    /// The body was not UTF-8.
    #[error("response body for {context} is not valid UTF-8: {source}")]
    InvalidEncoding {
        context: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The body did not match the expected shape.
    #[error("{failure} in response for {context}: {source}")]
    Decode {
        context: String,
        failure: DecodeFailure,
        #[source]
        source: serde_json::Error,
    },

    /// No `PLACES_API_KEY` was configured.
    #[error("PLACES_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid places base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

fn detail_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl SearchError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        SearchError::Decode {
            context: context.into(),
            failure: DecodeFailure::classify(&source),
            source,
        }
    }

    /// `true` when the fetch was declined before any request was made.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, SearchError::Precondition(_))
    }

    /// The decode failure category, for payload errors.
    #[must_use]
    pub fn decode_failure(&self) -> Option<DecodeFailure> {
        match self {
            SearchError::Decode { failure, .. } => Some(*failure),
            SearchError::InvalidEncoding { .. } => Some(DecodeFailure::CorruptedPayload),
            _ => None,
        }
    }
}
