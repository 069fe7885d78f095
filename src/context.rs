//! Context building: bound parameters to an invocation-owned value bag.
//!
//! The builder copies bound parameter values into an [`InvocationContext`],
//! validating value types against the operation's declarations and resolving
//! the output selector. A required parameter that was never bound is a
//! binding error; a required parameter explicitly bound to null gets a
//! non-fatal advisory and the invocation proceeds (the remote service is
//! expected to reject it — this layer does not pre-empt that).

use crate::error::{EngineError, EngineResult};
use crate::select::OutputSelector;
use crate::spec::{OperationSpec, ParamKind};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-invocation bag of resolved parameter values plus the chosen output
/// selector. Owned exclusively by one invocation and discarded after it.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Values keyed by canonical parameter name.
    pub values: BTreeMap<String, Value>,
    pub selector: OutputSelector,
}

impl InvocationContext {
    pub fn value(&self, param: &str) -> Option<&Value> {
        self.values.get(param)
    }
}

/// Builds an [`InvocationContext`] from bound parameters.
#[derive(Debug)]
pub struct ContextBuilder<'a> {
    spec: &'a OperationSpec,
    bound: BTreeMap<String, Value>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(spec: &'a OperationSpec) -> Self {
        Self {
            spec,
            bound: BTreeMap::new(),
        }
    }

    /// Bind a named parameter (canonical name or alias, any naming style).
    pub fn bind(&mut self, name: &str, value: Value) -> EngineResult<&mut Self> {
        let param = self
            .spec
            .find_param(name)
            .ok_or_else(|| EngineError::binding(name, "not a parameter of this operation"))?;
        check_kind(param.name, param.kind, &value)?;
        // Values are owned `serde_json::Value`s, so collections are
        // materialized at bind time; later caller-side mutation cannot
        // leak into the invocation.
        self.bound.insert(param.name.to_string(), value);
        Ok(self)
    }

    /// Bind a value by positional index.
    pub fn bind_positional(&mut self, index: usize, value: Value) -> EngineResult<&mut Self> {
        let param = self.spec.positional_param(index).ok_or_else(|| {
            EngineError::binding(
                &format!("position {}", index),
                "no positional parameter at this index",
            )
        })?;
        check_kind(param.name, param.kind, &value)?;
        self.bound.insert(param.name.to_string(), value);
        Ok(self)
    }

    /// Validate required parameters, resolve the selector, and produce the
    /// context. Fails before any remote call on missing required parameters
    /// or an invalid selector combination.
    pub fn build(
        self,
        select: Option<&str>,
        passthru: bool,
    ) -> EngineResult<InvocationContext> {
        for param in self.spec.required_params() {
            match self.bound.get(param.name) {
                None => {
                    return Err(EngineError::binding(
                        param.name,
                        "required parameter was not bound",
                    ));
                }
                Some(Value::Null) => {
                    // Explicitly-bound null: advisory only, the invocation
                    // proceeds and the service sees the field as absent.
                    tracing::warn!(
                        parameter = param.name,
                        command = self.spec.command,
                        "null bound to a required parameter; the remote call will \
                         likely be rejected"
                    );
                }
                Some(_) => {}
            }
        }
        let selector = OutputSelector::resolve(self.spec, select, passthru)?;
        Ok(InvocationContext {
            values: self.bound,
            selector,
        })
    }
}

fn check_kind(param: &str, kind: ParamKind, value: &Value) -> EngineResult<()> {
    // Explicit null is always bindable; requiredness handles the rest.
    if value.is_null() {
        return Ok(());
    }
    let ok = match kind {
        ParamKind::Str => value.is_string(),
        ParamKind::Int => value.is_i64() || value.is_u64(),
        ParamKind::Bool => value.is_boolean(),
        ParamKind::StrList => value
            .as_array()
            .is_some_and(|a| a.iter().all(Value::is_string)),
        ParamKind::JsonList => value.is_array(),
        ParamKind::Map => value
            .as_object()
            .is_some_and(|m| m.values().all(Value::is_string)),
    };
    if ok {
        Ok(())
    } else {
        Err(EngineError::binding(
            param,
            &format!("incompatible value type, expected {:?}", kind),
        ))
    }
}
