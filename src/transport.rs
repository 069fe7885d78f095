//! The transport seam: the collaborator contract the engine consumes.
//!
//! `ServiceTransport` is the generic `invoke(operation, request)` contract
//! offered by the wrapped client. The bundled [`HttpTransport`] speaks the
//! JSON wire protocol (POST with an `x-amz-target` header); signing, retry,
//! and pagination are deliberately left to whatever real SDK sits behind
//! this seam.

use crate::config::SessionConfig;
use crate::error::ServiceError;
use crate::spec::OperationSpec;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// A completed exchange with a service.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: u16,
    /// Parsed response body; `{}` for empty (void) responses.
    pub body: Value,
    pub request_id: Option<String>,
}

/// Generic invoke contract: one operation, one request, one response or
/// one fault. Implementations must be safe to share across invocations.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    async fn invoke(
        &self,
        spec: &OperationSpec,
        request: &Value,
    ) -> Result<ServiceResponse, ServiceError>;
}

/// JSON-protocol HTTP transport.
pub struct HttpTransport {
    http: reqwest::Client,
    session: SessionConfig,
}

impl HttpTransport {
    pub fn new(session: SessionConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, session }
    }

    /// Endpoint this transport would call for a service.
    pub fn endpoint(&self, service: &str) -> String {
        self.session.endpoint(service)
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn invoke(
        &self,
        spec: &OperationSpec,
        request: &Value,
    ) -> Result<ServiceResponse, ServiceError> {
        let endpoint = self.session.endpoint(spec.service);
        let target = format!("{}.{}", spec.target_prefix, spec.operation);
        tracing::debug!(
            endpoint = %endpoint,
            operation = spec.operation,
            "invoking service operation"
        );

        let resp = self
            .http
            .post(&endpoint)
            .header("content-type", "application/x-amz-json-1.1")
            .header("x-amz-target", &target)
            .header("user-agent", &self.session.app_name)
            .body(request.to_string())
            .send()
            .await
            .map_err(|e| {
                ServiceError::from(e).with_operation(spec.operation)
            })?;

        let status = resp.status().as_u16();
        let request_id = resp
            .headers()
            .get("x-amzn-requestid")
            .or_else(|| resp.headers().get("x-amz-request-id"))
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = resp.text().await.map_err(ServiceError::from)?;

        if !(200..300).contains(&status) {
            let mut err = ServiceError::parse_json_error(spec.service, status, &body)
                .with_operation(spec.operation);
            if let Some(id) = request_id {
                err = err.with_request_id(id);
            }
            return Err(err);
        }

        let body = if body.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&body).map_err(|e| {
                ServiceError::new(
                    spec.service,
                    "ParseError",
                    &format!("Failed to parse response body: {}", e),
                    status,
                )
                .with_operation(spec.operation)
            })?
        };

        Ok(ServiceResponse {
            status,
            body,
            request_id,
        })
    }
}
