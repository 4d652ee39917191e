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

/// API group and version served by the build service CRDs
pub const API_GROUP: &str = "build.pivotal.io";
pub const API_VERSION: &str = "v1alpha1";

/// Resource plurals
pub const BUILD_PLURAL: &str = "builds";
pub const CNB_BUILD_PLURAL: &str = "cnbbuilds";

/// Kinds
pub const BUILD_KIND: &str = "Build";
pub const CNB_BUILD_KIND: &str = "CNBBuild";

/// Subresources
pub const SUBRESOURCE_STATUS: &str = "status";

/// Condition type that decides terminality
pub const CONDITION_SUCCEEDED: &str = "Succeeded";

/// Child resource naming
pub const BUILD_POD_SUFFIX: &str = "-build-pod";
pub const MAX_NAME_LENGTH: usize = 63;
pub const NAME_DIGEST_LENGTH: usize = 32;

/// Pod phase reported once all build steps exited cleanly
pub const POD_PHASE_SUCCEEDED: &str = "Succeeded";

/// Source environment variables
pub const ENV_GIT_URL: &str = "GIT_URL";
pub const ENV_GIT_REVISION: &str = "GIT_REVISION";
pub const ENV_BLOB_URL: &str = "BLOB_URL";
pub const ENV_REGISTRY_IMAGE: &str = "REGISTRY_IMAGE";

/// Volume holding registry credentials for the source fetch step
pub const VOLUME_NAME_IMAGE_PULL_SECRETS: &str = "image-pull-secrets-dir";

/// Defaults
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";
pub const DEFAULT_FIELD_MANAGER: &str = "build-kube";
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_WAIT_POLL_INTERVAL_MS: u64 = 2000;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::{Build, CnbBuild};
    use kube::Resource;

    // The CRD derives take literals, keep them in sync with the constants.
    #[test]
    fn test_constants_match_resource_definitions() {
        assert_eq!(Build::group(&()), API_GROUP);
        assert_eq!(Build::version(&()), API_VERSION);
        assert_eq!(Build::plural(&()), BUILD_PLURAL);
        assert_eq!(Build::kind(&()), BUILD_KIND);
        assert_eq!(CnbBuild::group(&()), API_GROUP);
        assert_eq!(CnbBuild::plural(&()), CNB_BUILD_PLURAL);
        assert_eq!(CnbBuild::kind(&()), CNB_BUILD_KIND);
    }
}
