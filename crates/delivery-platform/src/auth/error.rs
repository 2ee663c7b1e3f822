use thiserror::Error;

/// Why a caller was not let through.
///
/// Everything except `Forbidden` and `TokenIssue` means "no identity could be established";
/// the gateway answers all of those with 401.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; callers cannot tell which.
    #[error("invalid credentials")]
    Unauthenticated,

    #[error("malformed or missing bearer token")]
    TokenMalformed,

    #[error("token expired")]
    TokenExpired,

    #[error("token signature invalid")]
    TokenInvalidSignature,

    /// Authenticated, but the role is not allowed here.
    #[error("forbidden")]
    Forbidden,

    /// The token authority (or the user directory behind it) did not answer in time.
    #[error("authentication service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A token could not be produced for a verified credential.
    #[error("could not issue token: {0}")]
    TokenIssue(String),
}
