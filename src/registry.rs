//! The operation dispatch table.
//!
//! Dispatch is table-driven: one [`OperationSpec`] per remote operation,
//! keyed by verb-noun command name (or raw operation name), consumed by the
//! single generic engine. Adding an operation means adding a table entry,
//! not writing a mapping body.

use crate::spec::{ConfirmImpact, OperationSpec, ParamKind, ParamSpec};

/// Built-in operation table.
///
/// Four operations across three services, covering the pattern's corners:
/// nested optional groups (`Update-DomainName`), groups of groups
/// (`Update-AppService`), a named-field default selector
/// (`Get-LogGroupField`), and a void-response mutation (`Write-MetricFilter`).
pub const BUILTIN_OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        command: "Update-DomainName",
        operation: "UpdateDomainName",
        service: "apigateway",
        target_prefix: "ApiGatewayV2",
        params: &[
            ParamSpec {
                name: "DomainName",
                kind: ParamKind::Str,
                required: true,
                position: Some(0),
                aliases: &[],
                target: "domainName",
            },
            ParamSpec {
                name: "DomainNameConfiguration",
                kind: ParamKind::JsonList,
                required: false,
                position: None,
                aliases: &["DomainNameConfigurations"],
                target: "domainNameConfigurations",
            },
            ParamSpec {
                name: "MutualTlsAuthentication_TruststoreUri",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "mutualTlsAuthentication.truststoreUri",
            },
            ParamSpec {
                name: "MutualTlsAuthentication_TruststoreVersion",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "mutualTlsAuthentication.truststoreVersion",
            },
        ],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
        passthru_param: Some("DomainName"),
        confirm_params: &["DomainName"],
    },
    OperationSpec {
        command: "Update-AppService",
        operation: "UpdateService",
        service: "apprunner",
        target_prefix: "AppRunner",
        params: &[
            ParamSpec {
                name: "ServiceArn",
                kind: ParamKind::Str,
                required: true,
                position: Some(0),
                aliases: &[],
                target: "serviceArn",
            },
            ParamSpec {
                name: "AutoScalingConfigurationArn",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "autoScalingConfigurationArn",
            },
            ParamSpec {
                name: "InstanceConfiguration_Cpu",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &["Cpu"],
                target: "instanceConfiguration.cpu",
            },
            ParamSpec {
                name: "InstanceConfiguration_Memory",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &["Memory"],
                target: "instanceConfiguration.memory",
            },
            ParamSpec {
                name: "InstanceConfiguration_InstanceRoleArn",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "instanceConfiguration.instanceRoleArn",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_Path",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &["HealthCheckPath"],
                target: "healthCheckConfiguration.path",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_Protocol",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &["HealthCheckProtocol"],
                target: "healthCheckConfiguration.protocol",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_Interval",
                kind: ParamKind::Int,
                required: false,
                position: None,
                aliases: &[],
                target: "healthCheckConfiguration.interval",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_Timeout",
                kind: ParamKind::Int,
                required: false,
                position: None,
                aliases: &[],
                target: "healthCheckConfiguration.timeout",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_HealthyThreshold",
                kind: ParamKind::Int,
                required: false,
                position: None,
                aliases: &[],
                target: "healthCheckConfiguration.healthyThreshold",
            },
            ParamSpec {
                name: "HealthCheckConfiguration_UnhealthyThreshold",
                kind: ParamKind::Int,
                required: false,
                position: None,
                aliases: &[],
                target: "healthCheckConfiguration.unhealthyThreshold",
            },
            ParamSpec {
                name: "SourceConfiguration_AutoDeploymentsEnabled",
                kind: ParamKind::Bool,
                required: false,
                position: None,
                aliases: &["AutoDeploymentsEnabled"],
                target: "sourceConfiguration.autoDeploymentsEnabled",
            },
            ParamSpec {
                name: "CodeRepository_RepositoryUrl",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &["RepositoryUrl"],
                target: "sourceConfiguration.codeRepository.repositoryUrl",
            },
            ParamSpec {
                name: "SourceCodeVersion_Type",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "sourceConfiguration.codeRepository.sourceCodeVersion.type",
            },
            ParamSpec {
                name: "SourceCodeVersion_Value",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "sourceConfiguration.codeRepository.sourceCodeVersion.value",
            },
            ParamSpec {
                name: "CodeConfiguration_ConfigurationSource",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target: "sourceConfiguration.codeRepository.codeConfiguration.configurationSource",
            },
            ParamSpec {
                name: "CodeConfigurationValues_Runtime",
                kind: ParamKind::Str,
                required: false,
                position: None,
                aliases: &[],
                target:
                    "sourceConfiguration.codeRepository.codeConfiguration.codeConfigurationValues.runtime",
            },
            ParamSpec {
                name: "CodeConfigurationValues_RuntimeEnvironmentVariable",
                kind: ParamKind::Map,
                required: false,
                position: None,
                aliases: &["RuntimeEnvironmentVariables"],
                target:
                    "sourceConfiguration.codeRepository.codeConfiguration.codeConfigurationValues.runtimeEnvironmentVariables",
            },
        ],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
        passthru_param: Some("ServiceArn"),
        confirm_params: &["ServiceArn"],
    },
    OperationSpec {
        command: "Get-LogGroupField",
        operation: "GetLogGroupFields",
        service: "logs",
        target_prefix: "Logs_20140328",
        params: &[
            ParamSpec {
                name: "LogGroupName",
                kind: ParamKind::Str,
                required: true,
                position: Some(0),
                aliases: &[],
                target: "logGroupName",
            },
            ParamSpec {
                name: "Time",
                kind: ParamKind::Int,
                required: false,
                position: None,
                aliases: &[],
                target: "time",
            },
        ],
        default_select: "LogGroupFields",
        confirm_impact: ConfirmImpact::None,
        passthru_param: Some("LogGroupName"),
        confirm_params: &["LogGroupName"],
    },
    OperationSpec {
        command: "Write-MetricFilter",
        operation: "PutMetricFilter",
        service: "logs",
        target_prefix: "Logs_20140328",
        params: &[
            ParamSpec {
                name: "LogGroupName",
                kind: ParamKind::Str,
                required: true,
                position: Some(0),
                aliases: &[],
                target: "logGroupName",
            },
            ParamSpec {
                name: "FilterName",
                kind: ParamKind::Str,
                required: true,
                position: Some(1),
                aliases: &[],
                target: "filterName",
            },
            ParamSpec {
                name: "FilterPattern",
                kind: ParamKind::Str,
                required: true,
                position: None,
                aliases: &[],
                target: "filterPattern",
            },
            ParamSpec {
                name: "MetricTransformation",
                kind: ParamKind::JsonList,
                required: true,
                position: None,
                aliases: &["MetricTransformations"],
                target: "metricTransformations",
            },
        ],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
        passthru_param: Some("LogGroupName"),
        confirm_params: &["LogGroupName", "FilterName"],
    },
];

/// Lookup over a set of operation specs.
pub struct OperationRegistry {
    ops: &'static [OperationSpec],
}

impl OperationRegistry {
    /// Registry over the built-in table.
    pub fn builtin() -> Self {
        Self {
            ops: BUILTIN_OPERATIONS,
        }
    }

    /// Registry over a caller-supplied table.
    pub fn new(ops: &'static [OperationSpec]) -> Self {
        Self { ops }
    }

    /// Find an operation by command name or wire operation name,
    /// case-insensitively.
    pub fn find(&self, name: &str) -> Option<&'static OperationSpec> {
        self.ops.iter().find(|op| {
            op.command.eq_ignore_ascii_case(name) || op.operation.eq_ignore_ascii_case(name)
        })
    }

    /// All registered operations, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &'static OperationSpec> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_command_name() {
        let reg = OperationRegistry::builtin();
        let op = reg.find("Update-AppService").unwrap();
        assert_eq!(op.operation, "UpdateService");
        assert_eq!(op.service, "apprunner");
    }

    #[test]
    fn find_by_operation_name_case_insensitive() {
        let reg = OperationRegistry::builtin();
        let op = reg.find("getloggroupfields").unwrap();
        assert_eq!(op.command, "Get-LogGroupField");
    }

    #[test]
    fn find_unknown_is_none() {
        let reg = OperationRegistry::builtin();
        assert!(reg.find("Remove-Everything").is_none());
    }

    #[test]
    fn builtin_table_has_required_identifiers() {
        for op in OperationRegistry::builtin().iter() {
            // Each operation names at least one resource identifier for
            // confirmation prompts, and it must exist in the param table.
            assert!(!op.confirm_params.is_empty(), "{}", op.command);
            for name in op.confirm_params {
                assert!(op.find_param(name).is_some(), "{}: {}", op.command, name);
            }
            if let Some(p) = op.passthru_param {
                assert!(op.find_param(p).is_some());
            }
        }
    }

    #[test]
    fn builtin_positions_are_dense_from_zero() {
        for op in OperationRegistry::builtin().iter() {
            let mut positions: Vec<usize> =
                op.params.iter().filter_map(|p| p.position).collect();
            positions.sort_unstable();
            for (i, pos) in positions.iter().enumerate() {
                assert_eq!(i, *pos, "{}: positional gap", op.command);
            }
        }
    }

    #[test]
    fn alias_resolution_in_table() {
        let reg = OperationRegistry::builtin();
        let op = reg.find("Write-MetricFilter").unwrap();
        let p = op.find_param("metric-transformations").unwrap();
        assert_eq!(p.name, "MetricTransformation");
    }
}
