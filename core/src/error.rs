//! Error types for the service dispatcher and its facades.
//!
//! # Design
//! Every failure a facade caller can see is one `ServiceError` variant.
//! Authentication gets its own variant so callers can refresh credentials
//! instead of retrying; explicit backend rejections keep the backend's code
//! and message verbatim. Facades never add variants of their own beyond the
//! local presence check in `InvalidArgument`.

use thiserror::Error;

/// Errors returned by `Dispatcher::invoke` and every facade method.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The session has no token, or the backend rejected it as invalid.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The request never produced an HTTP response (connect, I/O, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A successful response body did not match the requested result type.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// The backend explicitly rejected the call.
    #[error("backend rejected call ({code}, HTTP {status}): {message}")]
    Backend {
        status: u16,
        code: String,
        message: String,
    },

    /// The invocation arguments could not be encoded to JSON.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// A required value was missing or empty; nothing was sent.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },
}

impl ServiceError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ServiceError::Authentication { .. })
    }

    /// Only transport failures are candidates for a caller-driven retry.
    /// Calls are not idempotent, so a retry may still duplicate the effect.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }

    /// The backend's error code, if this is an explicit rejection.
    pub fn backend_code(&self) -> Option<&str> {
        match self {
            ServiceError::Backend { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_is_retryable() {
        assert!(ServiceError::Transport("reset".into()).is_retryable());
        assert!(!ServiceError::Authentication {
            message: "expired".into()
        }
        .is_retryable());
        assert!(!ServiceError::Decoding("missing field".into()).is_retryable());
    }

    #[test]
    fn backend_code_exposed_verbatim() {
        let err = ServiceError::Backend {
            status: 400,
            code: "InvalidParameter".into(),
            message: "invalid recipient".into(),
        };
        assert_eq!(err.backend_code(), Some("InvalidParameter"));
        assert_eq!(
            err.to_string(),
            "backend rejected call (InvalidParameter, HTTP 400): invalid recipient"
        );
    }
}
