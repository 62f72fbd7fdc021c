//! The provider's top-level `status` field, parsed into a tagged value
//! instead of scanning the body for error strings.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Ok,
    ZeroResults,
    RequestDenied,
    OverQuota,
    InvalidRequest,
    NotFound,
    Unknown(String),
}

impl ProviderStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => ProviderStatus::Ok,
            "ZERO_RESULTS" => ProviderStatus::ZeroResults,
            "REQUEST_DENIED" => ProviderStatus::RequestDenied,
            "OVER_QUERY_LIMIT" => ProviderStatus::OverQuota,
            "INVALID_REQUEST" => ProviderStatus::InvalidRequest,
            "NOT_FOUND" => ProviderStatus::NotFound,
            other => ProviderStatus::Unknown(other.to_string()),
        }
    }

    /// `OK` and `ZERO_RESULTS` both carry a usable (possibly empty) result list.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ProviderStatus::Ok | ProviderStatus::ZeroResults)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ProviderStatus::Ok => "OK",
            ProviderStatus::ZeroResults => "ZERO_RESULTS",
            ProviderStatus::RequestDenied => "REQUEST_DENIED",
            ProviderStatus::OverQuota => "OVER_QUERY_LIMIT",
            ProviderStatus::InvalidRequest => "INVALID_REQUEST",
            ProviderStatus::NotFound => "NOT_FOUND",
            ProviderStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
