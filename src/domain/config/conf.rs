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

//! Configuration file for the build-kube CLI

use crate::infrastructure::constants::{
    DEFAULT_FIELD_MANAGER, DEFAULT_NAMESPACE, DEFAULT_WAIT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::shared::error::{KubeError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::time::Duration;

// ============================================================================
// Main configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildKubeConf {
    pub kubernetes: KubernetesConf,
    pub wait: WaitConf,
}

impl BuildKubeConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            KubeError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let conf: Self = toml::from_str(content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kubernetes.namespace.is_empty() {
            return Err(KubeError::config_error("kubernetes.namespace must not be empty"));
        }
        if self.kubernetes.field_manager.is_empty() {
            return Err(KubeError::config_error(
                "kubernetes.field_manager must not be empty",
            ));
        }
        if self.wait.poll_interval_ms == 0 {
            return Err(KubeError::config_error("wait.poll_interval_ms must be > 0"));
        }
        if self.wait.poll_interval_ms > self.wait.timeout_secs.saturating_mul(1000) {
            return Err(KubeError::config_error(
                "wait.poll_interval_ms must not exceed wait.timeout_secs",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Kubernetes connection
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConf {
    pub namespace: String,
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
    pub field_manager: String,
}

impl Default for KubernetesConf {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            kubeconfig: None,
            context: None,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }
}

// ============================================================================
// Wait behavior
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConf {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitConf {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_WAIT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
