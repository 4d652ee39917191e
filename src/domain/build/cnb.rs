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

//! The `CNBBuild` custom resource: a build run directly against a
//! Cloud Native Buildpacks builder image.

use super::resource::BuildResource;
use super::source::SourceConfig;
use super::types::BuildStatus;
use k8s_openapi::api::core::v1::{EnvVar, ResourceRequirements};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "build.pivotal.io",
    version = "v1alpha1",
    kind = "CNBBuild",
    root = "CnbBuild",
    plural = "cnbbuilds",
    shortname = "cnbb",
    namespaced,
    status = "BuildStatus",
    derive = "PartialEq",
    derive = "Default",
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".status.latestImage"}"#,
    printcolumn = r#"{"name":"Succeeded","type":"string","jsonPath":".status.conditions[?(@.type==\"Succeeded\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CnbBuildSpec {
    pub image: String,

    /// Builder image reference
    pub builder: String,

    #[serde(default)]
    pub service_account: String,

    pub source: SourceConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_name: Option<String>,

    #[serde(default)]
    pub env: Vec<EnvVar>,

    #[serde(default)]
    pub resources: ResourceRequirements,
}

impl CnbBuild {
    pub fn image(&self) -> &str {
        &self.spec.image
    }

    pub fn service_account(&self) -> &str {
        &self.spec.service_account
    }
}

impl BuildResource for CnbBuild {
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
        &self.spec.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::Resource;

    #[test]
    fn test_cnb_build_resource_identity() {
        assert_eq!(CnbBuild::kind(&()), "CNBBuild");
        assert_eq!(CnbBuild::plural(&()), "cnbbuilds");
        assert_eq!(CnbBuild::api_version(&()), "build.pivotal.io/v1alpha1");
    }

    #[test]
    fn test_cnb_build_shares_build_accessors() {
        let mut cnb = CnbBuild::new(
            "app-cnb-1",
            CnbBuildSpec {
                image: "registry.example.com/acme/app".to_string(),
                builder: "cloudfoundry/cnb:bionic".to_string(),
                source: SourceConfig::blob("https://storage.example.com/app.tgz"),
                ..Default::default()
            },
        );

        assert!(cnb.is_running());
        assert_eq!(cnb.target_image(), "registry.example.com/acme/app");
        assert_eq!(cnb.pod_name(), "app-cnb-1-build-pod");

        cnb.build_status_mut()
            .status
            .mark_succeeded("app-cnb-1", "", "")
            .unwrap();
        cnb.build_status_mut().latest_image = "registry.example.com/acme/app@sha256:1".to_string();
        assert!(cnb.finished());
        assert_eq!(cnb.built_image(), "registry.example.com/acme/app@sha256:1");
    }

    #[test]
    fn test_cnb_build_deserializes_from_yaml() {
        let yaml = r#"
apiVersion: build.pivotal.io/v1alpha1
kind: CNBBuild
metadata:
  name: petclinic
  namespace: apps
spec:
  image: registry.example.com/apps/petclinic
  builder: cloudfoundry/cnb:bionic
  serviceAccount: builder
  source:
    git:
      url: https://github.com/spring-projects/spring-petclinic
      revision: main
"#;
        let cnb: CnbBuild = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cnb.metadata.name.as_deref(), Some("petclinic"));
        assert_eq!(cnb.service_account(), "builder");
        assert_eq!(cnb.image(), "registry.example.com/apps/petclinic");
        assert!(cnb.status.is_none());
        assert_eq!(cnb.build_env_vars().unwrap().len(), 2);
    }
}
