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

use crate::domain::config::BuildKubeConf;
use crate::shared::error::{KubeError, Result};
use std::collections::HashMap;
use tracing::warn;

/// Parse `-D key=value` properties into a map
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let (key, value) = config.split_once('=').ok_or_else(|| {
            KubeError::ConfigError(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(KubeError::ConfigError(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_conf(configs: &HashMap<String, String>, conf: &mut BuildKubeConf) {
    if let Some(namespace) = configs.get("kubernetes.namespace") {
        conf.kubernetes.namespace = namespace.clone();
    }

    if let Some(context) = configs.get("kubernetes.context") {
        conf.kubernetes.context = Some(context.clone());
    }

    if let Some(path) = configs.get("kubernetes.config.file") {
        conf.kubernetes.kubeconfig = Some(path.clone());
    }

    if let Some(manager) = configs.get("kubernetes.field-manager") {
        conf.kubernetes.field_manager = manager.clone();
    }

    if let Some(timeout_str) = configs.get("wait.timeout") {
        match timeout_str.parse::<u64>() {
            Ok(secs) => conf.wait.timeout_secs = secs,
            Err(_) => warn!(value = %timeout_str, "ignoring non-numeric wait.timeout"),
        }
    }

    if let Some(interval_str) = configs.get("wait.poll-interval") {
        match interval_str.parse::<u64>() {
            Ok(ms) => conf.wait.poll_interval_ms = ms,
            Err(_) => warn!(value = %interval_str, "ignoring non-numeric wait.poll-interval"),
        }
    }
}
