//! Request assembly: context values onto the nested request tree.
//!
//! Each parameter declares a dot-separated field path; assembly copies every
//! present (non-null) value to its path, building intermediate groups on
//! demand. A final bottom-up pass collapses optional groups whose leaves all
//! ended up absent — the remote service must see `absent`, never a
//! zero-valued struct, or it would interpret the group as an intentional
//! update. A group with a mix of set and unset leaves is kept, with the
//! unset leaves absent (partial-update semantics).

use crate::context::InvocationContext;
use crate::spec::OperationSpec;
use serde_json::{Map, Value};

/// Assemble the request tree for one invocation.
///
/// Deterministic: the same context always produces the same request.
/// Explicitly-null and unbound parameters both map to "absent".
pub fn assemble(spec: &OperationSpec, ctx: &InvocationContext) -> Value {
    let mut root = Value::Object(Map::new());
    for param in spec.params {
        if let Some(value) = ctx.value(param.name) {
            if !value.is_null() {
                insert_path(&mut root, param.target, value.clone());
            }
        }
    }
    collapse_empty_groups(&mut root);
    root
}

/// Read a leaf back out of an assembled request. Used by round-trip tests
/// and by callers that need to inspect the request they are about to send.
pub fn leaf<'a>(request: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = request;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn insert_path(root: &mut Value, path: &str, value: Value) {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Some(obj) = current.as_object_mut() else {
            // A leaf already occupies an ancestor of this path. Spec tables
            // declare disjoint paths, so there is nothing sane to merge.
            tracing::warn!(path, "field path collides with an existing leaf; skipping");
            return;
        };
        if segments.peek().is_none() {
            obj.insert(segment.to_string(), value);
            return;
        }
        current = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Bottom-up removal of empty object groups, recursively: a group whose
/// children all collapsed away collapses itself.
fn collapse_empty_groups(value: &mut Value) {
    if let Value::Object(map) = value {
        for child in map.values_mut() {
            collapse_empty_groups(child);
        }
        map.retain(|_, v| !matches!(v, Value::Object(m) if m.is_empty()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::registry::OperationRegistry;
    use serde_json::json;

    fn ctx(command: &str, binds: &[(&str, Value)]) -> (&'static OperationSpec, InvocationContext) {
        let spec = OperationRegistry::builtin().find(command).unwrap();
        let mut b = ContextBuilder::new(spec);
        for (name, value) in binds {
            b.bind(name, value.clone()).unwrap();
        }
        (spec, b.build(None, false).unwrap())
    }

    #[test]
    fn leaves_copy_and_absent_stays_absent() {
        let (spec, ctx) = ctx(
            "Get-LogGroupField",
            &[("LogGroupName", json!("/app/prod"))],
        );
        let request = assemble(spec, &ctx);
        assert_eq!(request, json!({ "logGroupName": "/app/prod" }));
        assert!(leaf(&request, "time").is_none());
    }

    #[test]
    fn unset_group_collapses_to_absent() {
        let (spec, ctx) = ctx(
            "Update-AppService",
            &[
                ("ServiceArn", json!("arn:aws:apprunner:eu-west-1:123:service/svc-A")),
                ("InstanceConfiguration_Cpu", json!("1 vCPU")),
            ],
        );
        let request = assemble(spec, &ctx);
        assert_eq!(
            request,
            json!({
                "serviceArn": "arn:aws:apprunner:eu-west-1:123:service/svc-A",
                "instanceConfiguration": { "cpu": "1 vCPU" },
            })
        );
        // The health-check group had no set leaves: absent, not {}.
        assert!(leaf(&request, "healthCheckConfiguration").is_none());
    }

    #[test]
    fn partially_set_group_keeps_set_leaves_only() {
        let (spec, ctx) = ctx(
            "Update-AppService",
            &[
                ("ServiceArn", json!("arn:svc-A")),
                ("HealthCheckConfiguration_Path", json!("/health")),
            ],
        );
        let request = assemble(spec, &ctx);
        assert_eq!(
            leaf(&request, "healthCheckConfiguration.path"),
            Some(&json!("/health"))
        );
        assert!(leaf(&request, "healthCheckConfiguration.protocol").is_none());
        assert!(leaf(&request, "healthCheckConfiguration.interval").is_none());
    }

    #[test]
    fn groups_of_groups_collapse_recursively() {
        // Only a leaf three groups deep is set; every ancestor group must
        // materialize, and no sibling group may appear.
        let (spec, ctx) = ctx(
            "Update-AppService",
            &[
                ("ServiceArn", json!("arn:svc-A")),
                ("CodeConfigurationValues_Runtime", json!("PYTHON_3")),
            ],
        );
        let request = assemble(spec, &ctx);
        assert_eq!(
            leaf(
                &request,
                "sourceConfiguration.codeRepository.codeConfiguration.codeConfigurationValues.runtime"
            ),
            Some(&json!("PYTHON_3"))
        );
        assert!(leaf(&request, "healthCheckConfiguration").is_none());
        assert!(leaf(&request, "sourceConfiguration.codeRepository.sourceCodeVersion").is_none());
    }

    #[test]
    fn deep_groups_collapse_when_nothing_is_set() {
        let (spec, ctx) = ctx("Update-AppService", &[("ServiceArn", json!("arn:svc-A"))]);
        let request = assemble(spec, &ctx);
        assert_eq!(request, json!({ "serviceArn": "arn:svc-A" }));
    }

    #[test]
    fn explicit_null_maps_to_absent() {
        let (spec, ctx) = ctx(
            "Update-AppService",
            &[
                ("ServiceArn", json!("arn:svc-A")),
                ("HealthCheckConfiguration_Path", Value::Null),
            ],
        );
        let request = assemble(spec, &ctx);
        assert!(leaf(&request, "healthCheckConfiguration").is_none());
    }

    #[test]
    fn nested_sibling_groups_are_independent() {
        let (spec, ctx) = ctx(
            "Update-DomainName",
            &[
                ("DomainName", json!("api.example.com")),
                ("MutualTlsAuthentication_TruststoreUri", json!("s3://bucket/truststore.pem")),
            ],
        );
        let request = assemble(spec, &ctx);
        assert_eq!(
            request,
            json!({
                "domainName": "api.example.com",
                "mutualTlsAuthentication": { "truststoreUri": "s3://bucket/truststore.pem" },
            })
        );
    }

    #[test]
    fn fully_populated_context_round_trips_leaf_values() {
        let spec = OperationRegistry::builtin().find("Update-AppService").unwrap();
        let mut b = ContextBuilder::new(spec);
        b.bind("ServiceArn", json!("arn:svc-A")).unwrap();
        b.bind("AutoScalingConfigurationArn", json!("arn:asc-1")).unwrap();
        b.bind("InstanceConfiguration_Cpu", json!("1 vCPU")).unwrap();
        b.bind("InstanceConfiguration_Memory", json!("2 GB")).unwrap();
        b.bind("InstanceConfiguration_InstanceRoleArn", json!("arn:role-1")).unwrap();
        b.bind("HealthCheckConfiguration_Path", json!("/health")).unwrap();
        b.bind("HealthCheckConfiguration_Protocol", json!("HTTP")).unwrap();
        b.bind("HealthCheckConfiguration_Interval", json!(10)).unwrap();
        b.bind("HealthCheckConfiguration_Timeout", json!(5)).unwrap();
        b.bind("HealthCheckConfiguration_HealthyThreshold", json!(2)).unwrap();
        b.bind("HealthCheckConfiguration_UnhealthyThreshold", json!(3)).unwrap();
        b.bind("SourceConfiguration_AutoDeploymentsEnabled", json!(true)).unwrap();
        b.bind("CodeRepository_RepositoryUrl", json!("https://github.com/org/app")).unwrap();
        b.bind("SourceCodeVersion_Type", json!("BRANCH")).unwrap();
        b.bind("SourceCodeVersion_Value", json!("main")).unwrap();
        b.bind("CodeConfiguration_ConfigurationSource", json!("API")).unwrap();
        b.bind("CodeConfigurationValues_Runtime", json!("PYTHON_3")).unwrap();
        b.bind(
            "CodeConfigurationValues_RuntimeEnvironmentVariable",
            json!({ "STAGE": "prod" }),
        )
        .unwrap();
        let ctx = b.build(None, false).unwrap();
        let request = assemble(spec, &ctx);

        // Every bound leaf is recoverable, unchanged, at its declared path.
        for param in spec.params {
            assert_eq!(
                leaf(&request, param.target),
                ctx.value(param.name),
                "lossy mapping for {}",
                param.name
            );
        }
    }
}
