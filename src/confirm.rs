//! Confirmation gate for mutating operations.
//!
//! Operations with `Medium` or higher impact prompt before the remote call;
//! the universal bypass flag (`--force`) skips the prompt. Prompt delivery
//! goes through a trait so the CLI can use stdin while tests inject
//! auto-approve/deny handlers.

use crate::context::InvocationContext;
use crate::spec::{ConfirmImpact, OperationSpec};
use serde_json::Value;
use std::io::{BufRead, Write};

/// Answers confirmation prompts.
pub trait ConfirmHandler: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Interactive confirmation on stdin/stderr.
pub struct StdinConfirm;

impl ConfirmHandler for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut err = std::io::stderr();
        let _ = write!(err, "{} [y/N] ", prompt);
        let _ = err.flush();
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Approves everything. Non-interactive default for library callers.
pub struct AutoConfirm;

impl ConfirmHandler for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Whether this operation's impact level prompts at all.
pub fn requires_confirmation(impact: ConfirmImpact) -> bool {
    impact >= ConfirmImpact::Medium
}

/// Build the prompt text, naming the operation and the resource
/// identifier(s) it acts on.
pub fn format_confirmation(spec: &OperationSpec, ctx: &InvocationContext) -> String {
    let identifiers: Vec<String> = spec
        .confirm_params
        .iter()
        .map(|name| {
            let rendered = match ctx.value(name) {
                Some(Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
                None => "<unbound>".to_string(),
            };
            format!("{}='{}'", name, rendered)
        })
        .collect();
    format!(
        "Performing the operation \"{} ({})\" on target {}.",
        spec.command,
        spec.operation,
        identifiers.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::registry::OperationRegistry;
    use serde_json::json;

    #[test]
    fn impact_gating() {
        assert!(requires_confirmation(ConfirmImpact::Medium));
        assert!(requires_confirmation(ConfirmImpact::High));
        assert!(!requires_confirmation(ConfirmImpact::Low));
        assert!(!requires_confirmation(ConfirmImpact::None));
    }

    #[test]
    fn prompt_names_operation_and_identifiers() {
        let spec = OperationRegistry::builtin().find("Write-MetricFilter").unwrap();
        let mut b = ContextBuilder::new(spec);
        b.bind("LogGroupName", json!("/app/prod")).unwrap();
        b.bind("FilterName", json!("errors")).unwrap();
        b.bind("FilterPattern", json!("ERROR")).unwrap();
        b.bind("MetricTransformation", json!([{ "metricName": "ErrorCount" }]))
            .unwrap();
        let ctx = b.build(None, false).unwrap();
        let prompt = format_confirmation(spec, &ctx);
        assert!(prompt.contains("Write-MetricFilter"));
        assert!(prompt.contains("PutMetricFilter"));
        assert!(prompt.contains("LogGroupName='/app/prod'"));
        assert!(prompt.contains("FilterName='errors'"));
    }

    #[test]
    fn prompt_marks_unbound_identifier() {
        let spec = OperationRegistry::builtin().find("Get-LogGroupField").unwrap();
        let mut b = ContextBuilder::new(spec);
        b.bind("LogGroupName", Value::Null).unwrap();
        let ctx = b.build(None, false).unwrap();
        let prompt = format_confirmation(spec, &ctx);
        assert!(prompt.contains("LogGroupName='null'"));
    }
}
