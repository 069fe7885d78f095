//! Service invocation: one call per invocation, faults captured.
//!
//! The invoker issues exactly one call through the transport seam — no
//! internal retry, terminal in one step: `Idle → Calling → {Succeeded,
//! Faulted}`. Name-resolution failures get a clarified message; every
//! other fault propagates unchanged. Faults land in [`CmdletOutput`]
//! instead of unwinding the caller, so batch callers can inspect
//! per-invocation success without exception-style control flow.

use crate::config::SessionConfig;
use crate::error::{EngineError, ServiceError};
use crate::spec::OperationSpec;
use crate::transport::{ServiceResponse, ServiceTransport};
use serde_json::Value;
use uuid::Uuid;

/// The invoker's state machine. The call is a single atomic
/// request/response exchange from this layer's perspective, so the
/// machine is terminal in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Calling,
    Succeeded,
    Faulted,
}

/// The result carrier of one invocation: either a projected value or a
/// captured fault — never both, and distinguishable from a successful
/// null projection.
#[derive(Debug, Clone)]
pub struct CmdletOutput {
    /// The selected projection, when the call succeeded.
    pub pipeline_output: Option<Value>,
    /// The whole service response, kept alongside the projection.
    pub service_response: Option<Value>,
    /// The captured fault, when the call failed.
    pub error: Option<EngineError>,
    /// True when the confirmation gate declined and nothing ran.
    pub skipped: bool,
}

impl CmdletOutput {
    pub fn succeeded(pipeline_output: Value, service_response: Value) -> Self {
        Self {
            pipeline_output: Some(pipeline_output),
            service_response: Some(service_response),
            error: None,
            skipped: false,
        }
    }

    pub fn faulted(error: EngineError) -> Self {
        Self {
            pipeline_output: None,
            service_response: None,
            error: Some(error),
            skipped: false,
        }
    }

    /// Output of an invocation the confirmation gate stopped.
    pub fn skipped() -> Self {
        Self {
            pipeline_output: None,
            service_response: None,
            error: None,
            skipped: true,
        }
    }

    pub fn is_fault(&self) -> bool {
        self.error.is_some()
    }
}

/// Issue the one blocking call for this invocation and normalize faults.
pub async fn call(
    transport: &dyn ServiceTransport,
    session: &SessionConfig,
    spec: &OperationSpec,
    request: &Value,
) -> Result<ServiceResponse, EngineError> {
    let invocation_id = Uuid::new_v4();
    let mut state = CallState::Idle;
    tracing::debug!(
        %invocation_id,
        command = spec.command,
        operation = spec.operation,
        ?state,
        "invocation ready"
    );

    state = CallState::Calling;
    tracing::debug!(%invocation_id, ?state, "issuing service call");
    let outcome = transport.invoke(spec, request).await;

    match outcome {
        Ok(response) => {
            state = CallState::Succeeded;
            tracing::debug!(%invocation_id, ?state, status = response.status, "call completed");
            Ok(response)
        }
        Err(err) => {
            state = CallState::Faulted;
            tracing::debug!(%invocation_id, ?state, code = %err.code, "call faulted");
            Err(normalize_fault(session, spec, err))
        }
    }
}

/// Sort a transport-or-remote fault into the engine taxonomy, rewriting
/// name-resolution failures with an actionable message.
fn normalize_fault(
    session: &SessionConfig,
    spec: &OperationSpec,
    mut err: ServiceError,
) -> EngineError {
    if err.is_transport() {
        if err.is_name_resolution() {
            err.message = format!(
                "Unable to reach the endpoint '{}' for service '{}' in region '{}'. \
                 Verify the region and any endpoint override, and that DNS \
                 resolution and network connectivity are available. ({})",
                session.endpoint(spec.service),
                spec.service,
                session.region.name,
                err.message
            );
        }
        EngineError::Transport(err)
    } else {
        // Service rejections propagate verbatim.
        EngineError::Remote(err)
    }
}
