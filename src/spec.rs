//! Static operation metadata.
//!
//! An [`OperationSpec`] is the declarative description of one remote call:
//! its verb-noun command name, the wire operation it maps to, its ordered
//! parameter list, its default output selector, and its confirmation impact.
//! Specs are defined once, at build time, and never mutated — the engine is
//! the single consumer.

use serde::Serialize;

/// The shape a bound parameter value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    /// A single string value.
    Str,
    /// A single integer value.
    Int,
    /// A boolean switch or value.
    Bool,
    /// A list of strings.
    StrList,
    /// A list of structured objects, supplied as JSON.
    JsonList,
    /// A string-to-string map.
    Map,
}

/// Declaration of one command parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    /// Canonical parameter name, grouped-prefix style
    /// (e.g. "HealthCheckConfiguration_Path").
    pub name: &'static str,
    pub kind: ParamKind,
    /// Required parameters must be bound before assembly.
    pub required: bool,
    /// Positional binding index, when the parameter accepts positional input.
    pub position: Option<usize>,
    /// Alternate names accepted at binding time.
    pub aliases: &'static [&'static str],
    /// Dot-separated request field path this parameter maps onto
    /// (e.g. "healthCheckConfiguration.path").
    pub target: &'static str,
}

impl ParamSpec {
    /// Whether `candidate` names this parameter, by canonical name or alias.
    /// Matching ignores case and the `-`/`_` separators so shell-style
    /// spellings (`--health-check-configuration-path`) bind cleanly.
    pub fn matches(&self, candidate: &str) -> bool {
        let norm = normalize_name(candidate);
        if normalize_name(self.name) == norm {
            return true;
        }
        self.aliases.iter().any(|a| normalize_name(a) == norm)
    }
}

/// Confirmation impact of an operation, highest first wins prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ConfirmImpact {
    None,
    Low,
    Medium,
    High,
}

/// Immutable description of one remote call.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSpec {
    /// Verb-noun command name (e.g. "Update-AppService").
    pub command: &'static str,
    /// Wire operation name (e.g. "UpdateService").
    pub operation: &'static str,
    /// Service identifier used for endpoint resolution (e.g. "apprunner").
    pub service: &'static str,
    /// JSON-protocol target prefix; the transport sends
    /// `x-amz-target: {prefix}.{operation}`.
    pub target_prefix: &'static str,
    /// Ordered parameter declarations.
    pub params: &'static [ParamSpec],
    /// Default output-selector expression: "*" for the whole response or a
    /// response field name.
    pub default_select: &'static str,
    pub confirm_impact: ConfirmImpact,
    /// The parameter echoed by the deprecated pass-through flag.
    pub passthru_param: Option<&'static str>,
    /// Parameters whose values identify the acted-upon resource in
    /// confirmation prompts.
    pub confirm_params: &'static [&'static str],
}

impl OperationSpec {
    /// Look up a parameter by name or alias.
    pub fn find_param(&self, candidate: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.matches(candidate))
    }

    /// Look up a parameter by positional index.
    pub fn positional_param(&self, index: usize) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.position == Some(index))
    }

    /// Required parameters, in declaration order.
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// Lowercase and strip `-`/`_` so naming-style variants compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
