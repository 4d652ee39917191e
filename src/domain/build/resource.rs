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

use super::condition::ConditionStatus;
use super::naming::child_name;
use super::source::SourceConfig;
use super::types::BuildStatus;
use crate::infrastructure::constants::{BUILD_POD_SUFFIX, POD_PHASE_SUCCEEDED};
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::core::v1::{EnvVar, Pod, Volume};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Behavior shared by every resource that runs a build and reports a
/// `Succeeded` condition.
pub trait BuildResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    fn build_status(&self) -> Option<&BuildStatus>;

    fn build_status_mut(&mut self) -> &mut BuildStatus;

    fn source_config(&self) -> &SourceConfig;

    /// Image reference the build pushes to
    fn target_image(&self) -> &str;

    fn succeeded(&self) -> ConditionStatus {
        self.build_status()
            .map(|s| s.status.succeeded())
            .unwrap_or_default()
    }

    fn is_running(&self) -> bool {
        self.succeeded() == ConditionStatus::Unknown
    }

    fn is_success(&self) -> bool {
        self.succeeded() == ConditionStatus::True
    }

    fn is_failure(&self) -> bool {
        self.succeeded() == ConditionStatus::False
    }

    fn finished(&self) -> bool {
        self.succeeded().is_terminal()
    }

    fn build_ref(&self) -> String {
        self.meta().name.clone().unwrap_or_default()
    }

    fn built_image(&self) -> String {
        if !self.is_success() {
            return String::new();
        }
        self.build_status()
            .map(|s| s.latest_image.clone())
            .unwrap_or_default()
    }

    fn pod_name(&self) -> String {
        child_name(&self.build_ref(), BUILD_POD_SUFFIX)
    }

    /// The pod has exited cleanly but the build has not yet recorded success,
    /// so buildpack metadata can be collected.
    fn metadata_ready(&self, pod: &Pod) -> bool {
        let pod_succeeded = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(|phase| phase == POD_PHASE_SUCCEEDED)
            .unwrap_or(false);

        !self.is_success() && pod_succeeded
    }

    fn build_env_vars(&self) -> Result<Vec<EnvVar>> {
        self.source_config()
            .source()
            .map(|s| s.build_env_vars())
            .ok_or_else(|| self.missing_source())
    }

    fn image_pull_secrets_volume(&self) -> Result<Volume> {
        self.source_config()
            .source()
            .map(|s| s.image_pull_secrets_volume())
            .ok_or_else(|| self.missing_source())
    }

    fn owner_reference(&self) -> Option<OwnerReference> {
        self.controller_owner_ref(&())
    }

    #[doc(hidden)]
    fn missing_source(&self) -> KubeError {
        KubeError::InvalidResource(format!(
            "{} '{}' has no source configured",
            Self::kind(&()),
            self.build_ref()
        ))
    }
}
