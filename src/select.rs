//! Output selection: what part of a response becomes the visible result.
//!
//! The selector is resolved once, at configuration time, into a tagged
//! union. The legacy pass-through flag and an explicit select expression
//! are mutually exclusive; combining them is a configuration error caught
//! before any remote call.

use crate::error::{EngineError, EngineResult};
use crate::spec::OperationSpec;
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolved projection from a response (and the original context) to the
/// externally visible result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSelector {
    /// Pass the whole response through.
    WholeResponse,
    /// Project a named response field, dot-separated for nesting.
    Field(String),
    /// Echo the value bound to an input parameter (legacy pass-through).
    EchoParam(String),
}

impl OutputSelector {
    /// Resolve the selector for one invocation.
    ///
    /// `select` is the explicit select expression, if any; `passthru` is the
    /// deprecated pass-through flag. Exactly one source wins: explicit
    /// expression, else pass-through, else the operation's default.
    pub fn resolve(
        spec: &OperationSpec,
        select: Option<&str>,
        passthru: bool,
    ) -> EngineResult<Self> {
        if passthru {
            if select.is_some() {
                return Err(EngineError::Configuration(
                    "the pass-through flag cannot be used when an explicit select \
                     expression is specified"
                        .to_string(),
                ));
            }
            let param = spec.passthru_param.ok_or_else(|| {
                EngineError::Configuration(format!(
                    "{} does not support the pass-through flag",
                    spec.command
                ))
            })?;
            return Ok(Self::EchoParam(param.to_string()));
        }
        Self::parse(spec, select.unwrap_or(spec.default_select))
    }

    /// Parse a select expression: `*`, a response field path, or
    /// `^ParameterName`.
    pub fn parse(spec: &OperationSpec, expr: &str) -> EngineResult<Self> {
        let expr = expr.trim();
        if expr.is_empty() || expr == "*" {
            return Ok(Self::WholeResponse);
        }
        if let Some(param) = expr.strip_prefix('^') {
            let spec_param = spec.find_param(param).ok_or_else(|| {
                EngineError::Configuration(format!(
                    "select expression '^{}' does not name a parameter of {}",
                    param, spec.command
                ))
            })?;
            return Ok(Self::EchoParam(spec_param.name.to_string()));
        }
        Ok(Self::Field(expr.to_string()))
    }

    /// Apply the selector to a completed response.
    ///
    /// Field projection matches each path segment case-insensitively; a
    /// missing field projects to null (a successful null result, distinct
    /// from a fault).
    pub fn apply(&self, response: &Value, values: &BTreeMap<String, Value>) -> Value {
        match self {
            Self::WholeResponse => response.clone(),
            Self::Field(path) => project_field(response, path),
            Self::EchoParam(name) => values.get(name).cloned().unwrap_or(Value::Null),
        }
    }
}

fn project_field(response: &Value, path: &str) -> Value {
    let mut current = response;
    for segment in path.split('.') {
        let Some(obj) = current.as_object() else {
            return Value::Null;
        };
        let found = obj
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(segment))
            .map(|(_, v)| v);
        match found {
            Some(v) => current = v,
            None => return Value::Null,
        }
    }
    current.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OperationRegistry;
    use serde_json::json;

    fn spec() -> &'static OperationSpec {
        OperationRegistry::builtin().find("Get-LogGroupField").unwrap()
    }

    #[test]
    fn resolve_default_is_named_field() {
        let sel = OutputSelector::resolve(spec(), None, false).unwrap();
        assert_eq!(sel, OutputSelector::Field("LogGroupFields".to_string()));
    }

    #[test]
    fn resolve_star_is_whole_response() {
        let sel = OutputSelector::resolve(spec(), Some("*"), false).unwrap();
        assert_eq!(sel, OutputSelector::WholeResponse);
    }

    #[test]
    fn resolve_caret_echoes_parameter() {
        let sel = OutputSelector::resolve(spec(), Some("^LogGroupName"), false).unwrap();
        assert_eq!(sel, OutputSelector::EchoParam("LogGroupName".to_string()));
    }

    #[test]
    fn resolve_caret_unknown_parameter_rejected() {
        let err = OutputSelector::resolve(spec(), Some("^Nope"), false).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn resolve_select_and_passthru_conflict() {
        let err = OutputSelector::resolve(spec(), Some("*"), true).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn resolve_passthru_uses_designated_param() {
        let sel = OutputSelector::resolve(spec(), None, true).unwrap();
        assert_eq!(sel, OutputSelector::EchoParam("LogGroupName".to_string()));
    }

    #[test]
    fn field_projection_is_case_insensitive() {
        let response = json!({ "logGroupFields": [{ "name": "@message", "percent": 100 }] });
        let sel = OutputSelector::Field("LogGroupFields".to_string());
        let out = sel.apply(&response, &BTreeMap::new());
        assert_eq!(out, json!([{ "name": "@message", "percent": 100 }]));
    }

    #[test]
    fn field_projection_nested_path() {
        let response = json!({ "service": { "serviceName": "svc-A" } });
        let sel = OutputSelector::Field("Service.ServiceName".to_string());
        assert_eq!(sel.apply(&response, &BTreeMap::new()), json!("svc-A"));
    }

    #[test]
    fn field_projection_missing_is_null() {
        let sel = OutputSelector::Field("absent".to_string());
        assert_eq!(sel.apply(&json!({}), &BTreeMap::new()), Value::Null);
    }

    #[test]
    fn echo_param_returns_bound_value() {
        let mut values = BTreeMap::new();
        values.insert("LogGroupName".to_string(), json!("/app/prod"));
        let sel = OutputSelector::EchoParam("LogGroupName".to_string());
        assert_eq!(sel.apply(&json!({}), &values), json!("/app/prod"));
    }
}
