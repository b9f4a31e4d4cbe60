use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The step of the credential handshake that failed to produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStage {
    /// The cookie endpoint answered without a usable `Set-Cookie` header.
    Cookie,
    /// The crumb endpoint answered without a usable body.
    Crumb,
    /// A crumb was requested while no cookie had ever been stored.
    MissingCookie,
}

impl AuthStage {
    /// Stable label used in error messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Crumb => "crumb",
            Self::MissingCookie => "missing-cookie",
        }
    }
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the finquote workspace.
///
/// Credential failures, provider-reported errors, and transport or decoding
/// problems all surface through this enum. Nothing inside the library retries;
/// every variant reaches the caller unchanged.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinquoteError {
    /// A step of the cookie/crumb handshake did not yield a value.
    #[error("authentication failed at {stage} step: {detail}")]
    Auth {
        /// The handshake step that failed.
        stage: AuthStage,
        /// Human-readable reason.
        detail: String,
    },

    /// The provider answered with a structured error object.
    #[error("provider error {code}: {description}")]
    Api {
        /// Provider error code, e.g. "Not Found".
        code: String,
        /// Provider error description.
        description: String,
    },

    /// The transport returned no body where one was required.
    #[error("empty response: {what}")]
    EmptyResponse {
        /// Description of the request, e.g. "chart for AAPL".
        what: String,
    },

    /// A summary payload carried no result entry.
    #[error("no result: {what}")]
    EmptyResult {
        /// Description of the request, e.g. "quoteSummary for AAPL".
        what: String,
    },

    /// Non-success HTTP status without a decodable provider error.
    #[error("unexpected status {status}: {what}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Description of the request.
        what: String,
    },

    /// The HTTP transport failed before a response was available.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid input argument or configuration value.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl FinquoteError {
    /// Helper: build an `Auth` error for a handshake stage.
    pub fn auth(stage: AuthStage, detail: impl Into<String>) -> Self {
        Self::Auth {
            stage,
            detail: detail.into(),
        }
    }

    /// Helper: build an `Api` error from the provider's code and description.
    pub fn api(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            description: description.into(),
        }
    }

    /// Helper: build an `EmptyResponse` error.
    pub fn empty_response(what: impl Into<String>) -> Self {
        Self::EmptyResponse { what: what.into() }
    }

    /// Helper: build an `EmptyResult` error.
    pub fn empty_result(what: impl Into<String>) -> Self {
        Self::EmptyResult { what: what.into() }
    }

    /// Helper: build a `Status` error.
    pub fn status(status: u16, what: impl Into<String>) -> Self {
        Self::Status {
            status,
            what: what.into(),
        }
    }

    /// Returns true if the provider rejected the session credential.
    ///
    /// A crumb goes stale without notice; callers seeing this on a data call
    /// are expected to refresh the credential store and repeat the call.
    #[must_use]
    pub const fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
