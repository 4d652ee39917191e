// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `Build` custom resource

use super::condition::Status;
use super::resource::BuildResource;
use super::source::SourceConfig;
use k8s_openapi::api::core::v1::{ContainerState, EnvVar, ResourceRequirements};
use kube::core::GroupVersionKind;
use kube::{CustomResource, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single build invocation, created by a higher level orchestrator and
/// driven to completion by the build controller.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "build.pivotal.io",
    version = "v1alpha1",
    kind = "Build",
    plural = "builds",
    namespaced,
    status = "BuildStatus",
    derive = "PartialEq",
    derive = "Default",
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".status.latestImage"}"#,
    printcolumn = r#"{"name":"Succeeded","type":"string","jsonPath":".status.conditions[?(@.type==\"Succeeded\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    pub tag: String,

    pub builder_ref: String,

    #[serde(default)]
    pub service_account: String,

    pub source: SourceConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_name: Option<String>,

    #[serde(default)]
    pub additional_image_names: Vec<String>,

    #[serde(default)]
    pub env: Vec<EnvVar>,

    #[serde(default)]
    pub resources: ResourceRequirements,
}

/// Observed state written by the build controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    #[serde(flatten)]
    pub status: Status,

    #[serde(default)]
    pub build_metadata: BuildpackMetadataList,

    #[serde(default)]
    pub latest_image: String,

    #[serde(default)]
    pub pod_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub step_states: Vec<ContainerState>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps_completed: Vec<String>,

    #[serde(default)]
    pub builder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildpackMetadata {
    pub id: String,
    pub version: String,
}

pub type BuildpackMetadataList = Vec<BuildpackMetadata>;

impl Build {
    pub fn group_version_kind() -> GroupVersionKind {
        GroupVersionKind::gvk(&Self::group(&()), &Self::version(&()), &Self::kind(&()))
    }

    pub fn service_account(&self) -> &str {
        &self.spec.service_account
    }

    pub fn tag(&self) -> &str {
        &self.spec.tag
    }

    /// Builds always carry registry credentials through their service account.
    pub fn has_secret(&self) -> bool {
        true
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or("")
    }
}

impl BuildResource for Build {
    fn build_status(&self) -> Option<&BuildStatus> {
        self.status.as_ref()
    }

    fn build_status_mut(&mut self) -> &mut BuildStatus {
        self.status.get_or_insert_with(BuildStatus::default)
    }

    fn source_config(&self) -> &SourceConfig {
        &self.spec.source
    }

    fn target_image(&self) -> &str {
        &self.spec.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::condition::{Condition, ConditionStatus};
    use k8s_openapi::api::core::v1::{ContainerStateTerminated, Pod, PodStatus};
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use std::collections::BTreeMap;

    fn sample_build() -> Build {
        let mut build = Build::new(
            "app-build-1",
            BuildSpec {
                tag: "registry.example.com/acme/app:latest".to_string(),
                builder_ref: "cnb-builder".to_string(),
                service_account: "builder-sa".to_string(),
                source: SourceConfig::git("https://github.com/acme/app", "main"),
                cache_name: Some("app-cache".to_string()),
                additional_image_names: vec!["registry.example.com/acme/app:v1".to_string()],
                env: vec![EnvVar {
                    name: "BP_JAVA_VERSION".to_string(),
                    value: Some("17".to_string()),
                    ..Default::default()
                }],
                resources: ResourceRequirements {
                    limits: Some(BTreeMap::from([(
                        "memory".to_string(),
                        Quantity("1Gi".to_string()),
                    )])),
                    ..Default::default()
                },
            },
        );
        build.metadata.namespace = Some("ci".to_string());
        build
    }

    fn with_succeeded(mut build: Build, status: ConditionStatus) -> Build {
        build
            .build_status_mut()
            .status
            .set_condition(Condition::new("Succeeded", status));
        build
    }

    #[test]
    fn test_group_version_kind() {
        let gvk = Build::group_version_kind();
        assert_eq!(gvk.group, "build.pivotal.io");
        assert_eq!(gvk.version, "v1alpha1");
        assert_eq!(gvk.kind, "Build");
    }

    #[test]
    fn test_spec_accessors() {
        let build = sample_build();
        assert_eq!(build.tag(), "registry.example.com/acme/app:latest");
        assert_eq!(build.service_account(), "builder-sa");
        assert_eq!(build.namespace(), "ci");
        assert_eq!(build.build_ref(), "app-build-1");
        assert!(build.has_secret());
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let mut build = sample_build();
        {
            let status = build.build_status_mut();
            status.status.observed_generation = Some(2);
            // Time serializes with second precision
            let mut condition = Condition::new("Succeeded", ConditionStatus::True);
            condition.last_transition_time =
                Some(Time(chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap()));
            status.status.set_condition(condition);
            status.build_metadata = vec![BuildpackMetadata {
                id: "io.buildpacks.java".to_string(),
                version: "1.2.3".to_string(),
            }];
            status.latest_image = "registry.example.com/acme/app@sha256:abc".to_string();
            status.pod_name = "app-build-1-build-pod".to_string();
            status.step_states = vec![ContainerState {
                terminated: Some(ContainerStateTerminated {
                    exit_code: 0,
                    ..Default::default()
                }),
                ..Default::default()
            }];
            status.steps_completed = vec!["prepare".to_string(), "build".to_string()];
            status.builder = "registry.example.com/builder@sha256:def".to_string();
        }

        let json = serde_json::to_string(&build).unwrap();
        let decoded: Build = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, build);
    }

    #[test]
    fn test_json_uses_camel_case_and_inline_status() {
        let build = with_succeeded(sample_build(), ConditionStatus::Unknown);
        let value = serde_json::to_value(&build).unwrap();

        assert_eq!(value["apiVersion"], "build.pivotal.io/v1alpha1");
        assert_eq!(value["kind"], "Build");
        assert_eq!(value["spec"]["builderRef"], "cnb-builder");
        assert_eq!(value["spec"]["serviceAccount"], "builder-sa");
        assert_eq!(value["spec"]["cacheName"], "app-cache");
        assert_eq!(value["spec"]["additionalImageNames"][0], "registry.example.com/acme/app:v1");
        assert_eq!(value["status"]["conditions"][0]["type"], "Succeeded");
        // Empty step lists are omitted
        assert!(value["status"].get("stepStates").is_none());
        assert!(value["status"].get("stepsCompleted").is_none());
    }

    #[test]
    fn test_finished_only_when_succeeded_is_known() {
        let build = sample_build();
        assert!(!build.finished());
        assert!(build.is_running());

        let running = with_succeeded(sample_build(), ConditionStatus::Unknown);
        assert!(!running.finished());
        assert!(running.is_running());

        let succeeded = with_succeeded(sample_build(), ConditionStatus::True);
        assert!(succeeded.finished());
        assert!(succeeded.is_success());
        assert!(!succeeded.is_failure());

        let failed = with_succeeded(sample_build(), ConditionStatus::False);
        assert!(failed.finished());
        assert!(failed.is_failure());
        assert!(!failed.is_running());
    }

    #[test]
    fn test_built_image_only_on_success() {
        let mut build = with_succeeded(sample_build(), ConditionStatus::False);
        build.build_status_mut().latest_image = "registry.example.com/acme/app@sha256:1".to_string();
        assert_eq!(build.built_image(), "");

        let mut build = with_succeeded(sample_build(), ConditionStatus::True);
        build.build_status_mut().latest_image = "registry.example.com/acme/app@sha256:1".to_string();
        assert_eq!(build.built_image(), "registry.example.com/acme/app@sha256:1");
    }

    #[test]
    fn test_pod_name_derived_from_build_name() {
        assert_eq!(sample_build().pod_name(), "app-build-1-build-pod");
    }

    #[test]
    fn test_metadata_ready_requires_succeeded_pod() {
        let pod = |phase: &str| Pod {
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let running = with_succeeded(sample_build(), ConditionStatus::Unknown);
        assert!(running.metadata_ready(&pod("Succeeded")));
        assert!(!running.metadata_ready(&pod("Running")));
        assert!(!running.metadata_ready(&Pod::default()));

        let done = with_succeeded(sample_build(), ConditionStatus::True);
        assert!(!done.metadata_ready(&pod("Succeeded")));
    }

    #[test]
    fn test_build_env_vars_follow_source() {
        let vars = sample_build().build_env_vars().unwrap();
        assert_eq!(vars[0].name, "GIT_URL");

        let mut build = sample_build();
        build.spec.source = SourceConfig::default();
        assert!(build.build_env_vars().is_err());
        assert!(build.image_pull_secrets_volume().is_err());
    }

    #[test]
    fn test_controller_owner_reference() {
        let mut build = sample_build();
        build.metadata.uid = Some("1234".to_string());
        let owner = build.owner_reference().unwrap();
        assert_eq!(owner.kind, "Build");
        assert_eq!(owner.name, "app-build-1");
        assert_eq!(owner.controller, Some(true));
    }
}
