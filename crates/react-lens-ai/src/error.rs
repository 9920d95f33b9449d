//! Remediation error taxonomy

/// Every way a remediation call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemediationError {
    #[error("GOOGLE_API_KEY is not configured.")]
    MissingApiKey,
    #[error("GOOGLE_API_KEY is invalid or unauthorized.")]
    InvalidApiKey,
    #[error("Gemini quota exceeded. Try again later or check usage limits.")]
    QuotaExceeded,
    #[error("Gemini blocked this request due to safety policies.")]
    SafetyBlocked,
    #[error("Gemini returned an empty response.")]
    EmptyResponse,
    #[error("{0}")]
    Upstream(String),
}

impl RemediationError {
    /// HTTP-style status class for callers that surface errors over a wire.
    pub fn status_code(&self) -> u16 {
        match self {
            RemediationError::MissingApiKey => 500,
            RemediationError::InvalidApiKey => 401,
            RemediationError::QuotaExceeded => 429,
            RemediationError::SafetyBlocked => 400,
            RemediationError::EmptyResponse => 502,
            RemediationError::Upstream(_) => 502,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RemediationError::MissingApiKey => "MISSING_API_KEY",
            RemediationError::InvalidApiKey => "INVALID_API_KEY",
            RemediationError::QuotaExceeded => "QUOTA_EXCEEDED",
            RemediationError::SafetyBlocked => "SAFETY_BLOCKED",
            RemediationError::EmptyResponse => "EMPTY_RESPONSE",
            RemediationError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    /// Credential and quota problems affect every later call too.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RemediationError::MissingApiKey
                | RemediationError::InvalidApiKey
                | RemediationError::QuotaExceeded
        )
    }

    /// Maps a raw provider failure message onto the taxonomy.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        if ["api key", "permission denied", "unauthorized"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            RemediationError::InvalidApiKey
        } else if ["quota", "resource_exhausted", "rate limit"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            RemediationError::QuotaExceeded
        } else if lower.contains("safety") {
            RemediationError::SafetyBlocked
        } else {
            RemediationError::Upstream(message.to_string())
        }
    }
}

/// Raw failure reported by a generation transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The requested model does not exist for this API version.
    pub fn is_model_unsupported(&self) -> bool {
        let lower = self.0.to_lowercase();
        lower.contains("not found")
            || lower.contains("404")
            || lower.contains("is not found for api version")
    }
}
