//! The generic invocation engine.
//!
//! One pipeline for every operation in the dispatch table:
//! spec lookup → context build → confirmation gate → request assembly →
//! service invocation → output selection. Binding and configuration errors
//! abort before any remote call; transport and remote faults are captured
//! into the returned [`CmdletOutput`].

use crate::assemble::assemble;
use crate::config::SessionConfig;
use crate::confirm::{self, AutoConfirm, ConfirmHandler};
use crate::context::ContextBuilder;
use crate::error::{EngineError, EngineResult};
use crate::invoke::{self, CmdletOutput};
use crate::registry::OperationRegistry;
use crate::transport::{HttpTransport, ServiceTransport};
use serde_json::Value;
use std::sync::Arc;

/// Everything one invocation binds: the command, its parameters, and the
/// universal flags.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Verb-noun command name (or raw operation name).
    pub command: String,
    /// Named parameter bindings.
    pub bound: Vec<(String, Value)>,
    /// Positional values, bound to positional parameters in order.
    pub positional: Vec<Value>,
    /// Universal bypass flag: skip the confirmation gate.
    pub force: bool,
    /// Explicit output-selection expression.
    pub select: Option<String>,
    /// Deprecated pass-through flag.
    pub passthru: bool,
}

impl Invocation {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Self::default()
        }
    }

    pub fn bind(mut self, name: &str, value: Value) -> Self {
        self.bound.push((name.to_string(), value));
        self
    }
}

/// The engine: a dispatch table, a resolved session, a confirmation
/// handler, and (optionally) an injected transport.
pub struct Engine {
    registry: OperationRegistry,
    session: SessionConfig,
    confirm: Box<dyn ConfirmHandler>,
    transport: Option<Arc<dyn ServiceTransport>>,
}

impl Engine {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            registry: OperationRegistry::builtin(),
            session,
            confirm: Box::new(AutoConfirm),
            transport: None,
        }
    }

    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_confirm(mut self, confirm: Box<dyn ConfirmHandler>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Inject a transport. Without one, an [`HttpTransport`] is constructed
    /// lazily, per invocation, from the session.
    pub fn with_transport(mut self, transport: Arc<dyn ServiceTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run one invocation end to end.
    ///
    /// `Err` carries only pre-call failures (binding/configuration — the
    /// transport call count is zero). Transport and remote faults come back
    /// inside `Ok(CmdletOutput)` with `error` set.
    pub async fn run(&self, invocation: Invocation) -> EngineResult<CmdletOutput> {
        let spec = self.registry.find(&invocation.command).ok_or_else(|| {
            EngineError::Configuration(format!("unknown command '{}'", invocation.command))
        })?;

        // Context build: positional first, named bindings override.
        let mut builder = ContextBuilder::new(spec);
        for (index, value) in invocation.positional.iter().enumerate() {
            builder.bind_positional(index, value.clone())?;
        }
        for (name, value) in &invocation.bound {
            builder.bind(name, value.clone())?;
        }
        let ctx = builder.build(invocation.select.as_deref(), invocation.passthru)?;

        // Confirmation gate, bypassed by --force.
        if confirm::requires_confirmation(spec.confirm_impact) && !invocation.force {
            let prompt = confirm::format_confirmation(spec, &ctx);
            if !self.confirm.confirm(&prompt) {
                tracing::info!(command = spec.command, "invocation declined at confirmation");
                return Ok(CmdletOutput::skipped());
            }
        }

        let request = assemble(spec, &ctx);

        let transport: Arc<dyn ServiceTransport> = match &self.transport {
            Some(t) => Arc::clone(t),
            None => Arc::new(HttpTransport::new(self.session.clone())),
        };

        match invoke::call(transport.as_ref(), &self.session, spec, &request).await {
            Ok(response) => {
                let pipeline = ctx.selector.apply(&response.body, &ctx.values);
                Ok(CmdletOutput::succeeded(pipeline, response.body))
            }
            Err(fault) => Ok(CmdletOutput::faulted(fault)),
        }
    }
}
