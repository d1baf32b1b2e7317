use thiserror::Error;

/// Errors surfaced by the order-management service boundary.
///
/// Failures are terminal for the current action: there is no retry or
/// backoff, the operator decides what to do next.
#[derive(Debug, Error)]
pub enum OmsError {
    #[error(
        "missing {operation} credentials; set OMS_{env_infix}_AUTH_USERNAME and \
         OMS_{env_infix}_AUTH_PASSWORD or add them to fulfillment-console.toml"
    )]
    MissingCredentials {
        operation: &'static str,
        env_infix: &'static str,
    },

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response. The body is the service's human-readable error
    /// text and is surfaced verbatim to the operator.
    #[error("{operation} rejected with HTTP {status}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} returned an undecodable body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl OmsError {
    /// HTTP status of the rejection, if this was an API-level failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            OmsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
