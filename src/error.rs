//! Error taxonomy for the article chatbot.
//!
//! Five failure kinds cross the module boundaries, each with a fixed HTTP
//! mapping applied by the transport shim: `Validation` (400), `Forbidden`
//! (403), `NotFound` (404), `Upstream` (502), and `Load`/`Config` (500,
//! startup-fatal — the process refuses to serve).

use thiserror::Error;

/// Top-level error type shared across the corpus, tool, router, and
/// transport layers.
#[derive(Debug, Error)]
pub enum Error {
    /// The corpus snapshot is malformed or violates a load invariant.
    ///
    /// Fatal at startup: the server does not begin accepting requests.
    #[error("corpus snapshot invalid: {message}")]
    Load {
        /// What made the snapshot unusable.
        message: String,
    },

    /// The request is malformed or names an unrecognized mode.
    #[error("invalid request: {message}")]
    Validation {
        /// What the caller must correct.
        message: String,
    },

    /// A tool was invoked outside its permission profile.
    ///
    /// Reported back to the model as a tool-level failure so it can retry
    /// with an allowed tool; never carries article data.
    #[error("tool '{tool}' is not permitted in {mode} mode")]
    Forbidden {
        /// The disallowed tool name.
        tool: String,
        /// The mode whose profile rejected it.
        mode: String,
    },

    /// No article with the given identifier exists in the corpus.
    #[error("article not found: {id}")]
    NotFound {
        /// The unknown article identifier.
        id: String,
    },

    /// The external semantic index or the model API is unreachable or
    /// returned an unparseable response. Never retried internally.
    #[error("upstream {service} error: {message}")]
    Upstream {
        /// Which collaborator failed (`"index"` or `"model"`).
        service: &'static str,
        /// Failure detail from the transport or parser.
        message: String,
    },

    /// Environment configuration is missing or unparseable.
    ///
    /// Fatal at startup, like [`Error::Load`].
    #[error("configuration error: {message}")]
    Config {
        /// Which setting is wrong and why.
        message: String,
    },
}

impl Error {
    /// Shorthand for a load failure.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an upstream failure against the named collaborator.
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_display() {
        let err = Error::load("missing field 'title'");
        assert_eq!(
            err.to_string(),
            "corpus snapshot invalid: missing field 'title'"
        );
    }

    #[test]
    fn test_forbidden_display() {
        let err = Error::Forbidden {
            tool: "get_full_article".to_string(),
            mode: "discovery".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tool 'get_full_article' is not permitted in discovery mode"
        );
    }

    #[test]
    fn test_upstream_display() {
        let err = Error::upstream("index", "connection refused");
        assert_eq!(err.to_string(), "upstream index error: connection refused");
    }
}
