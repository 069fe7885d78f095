//! Command-line surface.
//!
//! The CLI is a thin shell over the engine: a `list` subcommand that prints
//! the dispatch table, and an external-subcommand catch-all that treats the
//! first free token as a command name and the rest as parameter bindings.
//! Parameter values are coerced by the declared [`ParamKind`], so the shell
//! never needs per-operation argument definitions.

use crate::engine::Invocation;
use crate::error::{EngineError, EngineResult};
use crate::spec::{OperationSpec, ParamKind};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Debug, Parser)]
#[command(
    name = "opshell",
    version,
    about = "Table-driven shell for remote service operations"
)]
pub struct Cli {
    /// Region to resolve service endpoints in.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Endpoint URL override (local stacks, test doubles).
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Verbose diagnostic logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered operations.
    List,

    /// Invoke an operation: `opshell <Command> [--Param value]...`
    #[command(external_subcommand)]
    Invoke(Vec<String>),
}

/// Parse an invoke token vector (command name first) into an [`Invocation`].
///
/// Universal flags (`--force`, `--select`, `--pass-thru`) are peeled off
/// here; everything else is either `--Name value` (coerced by the declared
/// kind) or a free token bound positionally. The literal `null` binds an
/// explicit null.
pub fn parse_invocation(spec: &OperationSpec, tokens: &[String]) -> EngineResult<Invocation> {
    let mut invocation = Invocation::new(spec.command);
    let mut iter = tokens.iter().peekable();
    let mut next_position = 0usize;

    while let Some(token) = iter.next() {
        if let Some(name) = token.strip_prefix("--") {
            match name.to_ascii_lowercase().as_str() {
                "force" => {
                    invocation.force = true;
                    continue;
                }
                "pass-thru" | "passthru" => {
                    invocation.passthru = true;
                    continue;
                }
                "select" => {
                    let expr = iter.next().ok_or_else(|| {
                        EngineError::Configuration("--select requires an expression".to_string())
                    })?;
                    invocation.select = Some(expr.clone());
                    continue;
                }
                _ => {}
            }

            let kind = spec.find_param(name).map(|p| p.kind);
            let value = match kind {
                // A bool parameter with no following value is a switch.
                Some(ParamKind::Bool)
                    if iter
                        .peek()
                        .map_or(true, |t| t.starts_with("--")) =>
                {
                    Value::Bool(true)
                }
                _ => {
                    let raw = iter.next().ok_or_else(|| {
                        EngineError::binding(name, "expected a value after this parameter")
                    })?;
                    // Unknown names coerce as plain strings; the binder
                    // rejects them with the proper error.
                    coerce(name, kind.unwrap_or(ParamKind::Str), raw)?
                }
            };
            invocation.bound.push((name.to_string(), value));
        } else {
            let kind = spec
                .positional_param(next_position)
                .map(|p| p.kind)
                .unwrap_or(ParamKind::Str);
            invocation
                .positional
                .push(coerce(&format!("position {}", next_position), kind, token)?);
            next_position += 1;
        }
    }
    Ok(invocation)
}

/// Coerce one raw CLI token to the declared kind.
fn coerce(param: &str, kind: ParamKind, raw: &str) -> EngineResult<Value> {
    if raw == "null" {
        return Ok(Value::Null);
    }
    match kind {
        ParamKind::Str => Ok(Value::String(raw.to_string())),
        ParamKind::Int => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| EngineError::binding(param, &format!("'{}' is not an integer", raw))),
        ParamKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(EngineError::binding(
                param,
                &format!("'{}' is not a boolean", raw),
            )),
        },
        ParamKind::StrList => Ok(Value::Array(
            raw.split(',')
                .map(|s| Value::String(s.trim().to_string()))
                .collect(),
        )),
        ParamKind::JsonList => {
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| EngineError::binding(param, &format!("invalid JSON: {}", e)))?;
            match value {
                Value::Array(_) => Ok(value),
                // A single object is accepted as a one-element list.
                Value::Object(_) => Ok(Value::Array(vec![value])),
                _ => Err(EngineError::binding(
                    param,
                    "expected a JSON array or object",
                )),
            }
        }
        ParamKind::Map => {
            if raw.trim_start().starts_with('{') {
                return serde_json::from_str(raw)
                    .map_err(|e| EngineError::binding(param, &format!("invalid JSON: {}", e)));
            }
            let mut map = Map::new();
            for pair in raw.split(',') {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    EngineError::binding(param, &format!("'{}' is not Key=Value", pair))
                })?;
                map.insert(
                    key.trim().to_string(),
                    Value::String(value.trim().to_string()),
                );
            }
            Ok(Value::Object(map))
        }
    }
}
