//! Error taxonomy for the operation engine.
//!
//! Two layers: `ServiceError` carries a remote service's own error shape
//! (code, message, HTTP status, request id), following the wire format used
//! by AWS JSON-protocol services. `EngineError` is the engine's taxonomy —
//! binding and configuration problems abort an invocation before any remote
//! call; transport and remote faults are captured into the invocation result
//! instead of unwinding the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An error returned by (or on the way to) a remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// The service error code (e.g., "ResourceNotFoundException").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status of the failed exchange; 0 when the request never
    /// produced a response (connect/DNS/timeout failures).
    pub status_code: u16,
    /// Request ID from the response headers, when one was returned.
    pub request_id: Option<String>,
    /// The service that produced the error (e.g., "logs", "apprunner").
    pub service: String,
    /// The operation that failed, when known.
    pub operation: Option<String>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.service, self.code, self.message)?;
        if self.status_code != 0 {
            write!(f, " (HTTP {})", self.status_code)?;
        }
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn new(service: &str, code: &str, message: &str, status_code: u16) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status_code,
            request_id: None,
            service: service.to_string(),
            operation: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    /// True when the request never reached the service (no HTTP status),
    /// i.e. a transport-level fault rather than a service rejection.
    pub fn is_transport(&self) -> bool {
        self.status_code == 0
    }

    /// True for connect-phase failures, which include DNS name resolution.
    pub fn is_name_resolution(&self) -> bool {
        self.code == "ConnectError"
    }

    /// Parse a JSON error body.
    ///
    /// AWS JSON error format:
    /// ```json
    /// {
    ///   "__type": "ResourceNotFoundException",
    ///   "message": "The specified log group does not exist."
    /// }
    /// ```
    pub fn parse_json_error(service: &str, status_code: u16, body: &str) -> Self {
        if let Ok(val) = serde_json::from_str::<serde_json::Value>(body) {
            let code = val
                .get("__type")
                .or_else(|| val.get("code"))
                .or_else(|| val.get("Code"))
                .and_then(|v| v.as_str())
                .map(|s| {
                    // __type can be "com.amazonaws.logs#ResourceNotFoundException"
                    s.rsplit('#').next().unwrap_or(s).to_string()
                })
                .unwrap_or_else(|| "UnknownError".to_string());
            let message = val
                .get("message")
                .or_else(|| val.get("Message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            Self::new(service, &code, &message, status_code)
        } else {
            Self::new(
                service,
                "ParseError",
                &format!(
                    "Failed to parse error response: {}",
                    body.chars().take(200).collect::<String>()
                ),
                status_code,
            )
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_connect() {
            "ConnectError"
        } else if err.is_timeout() {
            "Timeout"
        } else {
            "HttpError"
        };
        Self {
            code: code.to_string(),
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()).unwrap_or(0),
            request_id: None,
            service: "http".to_string(),
            operation: None,
        }
    }
}

/// Engine-level error taxonomy.
///
/// `Binding` and `Configuration` abort the invocation at the boundary,
/// before any remote call. `Transport` and `Remote` are never returned
/// from the engine's entry point — they are captured into the
/// [`CmdletOutput`](crate::invoke::CmdletOutput) so scripted callers can
/// inspect per-invocation success without exception-style control flow.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// A required parameter is missing or a bound value has an
    /// incompatible type for its declaration.
    #[error("parameter '{param}': {reason}")]
    Binding { param: String, reason: String },

    /// Mutually exclusive or otherwise invalid engine configuration
    /// (e.g., an explicit -Select combined with the pass-through flag).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The request never reached the service.
    #[error("transport fault: {0}")]
    Transport(ServiceError),

    /// The service rejected the request; propagated verbatim.
    #[error("remote fault: {0}")]
    Remote(ServiceError),
}

impl EngineError {
    pub fn binding(param: &str, reason: &str) -> Self {
        Self::Binding {
            param: param.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the two variants that abort before a remote call.
    pub fn is_pre_call(&self) -> bool {
        matches!(self, Self::Binding { .. } | Self::Configuration(_))
    }
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
