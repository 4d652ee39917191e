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

//! Source fetch configuration for builds

use crate::infrastructure::constants::{
    ENV_BLOB_URL, ENV_GIT_REVISION, ENV_GIT_URL, ENV_REGISTRY_IMAGE,
    VOLUME_NAME_IMAGE_PULL_SECRETS,
};
use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, EnvVar, SecretVolumeSource, Volume};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Behavior every source kind provides to the build pod
pub trait Source: Send + Sync {
    fn kind(&self) -> &'static str;

    fn build_env_vars(&self) -> Vec<EnvVar>;

    fn image_pull_secrets_volume(&self) -> Volume;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<Git>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Blob>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<Registry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

impl SourceConfig {
    pub fn git(url: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            git: Some(Git {
                url: url.into(),
                revision: revision.into(),
            }),
            ..Default::default()
        }
    }

    pub fn blob(url: impl Into<String>) -> Self {
        Self {
            blob: Some(Blob { url: url.into() }),
            ..Default::default()
        }
    }

    pub fn registry(image: impl Into<String>) -> Self {
        Self {
            registry: Some(Registry {
                image: image.into(),
                image_pull_secrets: Vec::new(),
            }),
            ..Default::default()
        }
    }

    /// The configured source, in git > blob > registry order.
    pub fn source(&self) -> Option<&dyn Source> {
        if let Some(git) = &self.git {
            return Some(git as &dyn Source);
        }
        if let Some(blob) = &self.blob {
            return Some(blob as &dyn Source);
        }
        self.registry.as_ref().map(|r| r as &dyn Source)
    }

    /// Number of source kinds set. A valid config has exactly one.
    pub fn configured_count(&self) -> usize {
        [
            self.git.is_some(),
            self.blob.is_some(),
            self.registry.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Git {
    pub url: String,
    pub revision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub image: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<SecretReference>,
}

/// Name of a secret in the build's namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SecretReference {
    pub name: String,
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn empty_dir_volume() -> Volume {
    Volume {
        name: VOLUME_NAME_IMAGE_PULL_SECRETS.to_string(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    }
}

impl Source for Git {
    fn kind(&self) -> &'static str {
        "git"
    }

    fn build_env_vars(&self) -> Vec<EnvVar> {
        vec![
            env_var(ENV_GIT_URL, &self.url),
            env_var(ENV_GIT_REVISION, &self.revision),
        ]
    }

    fn image_pull_secrets_volume(&self) -> Volume {
        empty_dir_volume()
    }
}

impl Source for Blob {
    fn kind(&self) -> &'static str {
        "blob"
    }

    fn build_env_vars(&self) -> Vec<EnvVar> {
        vec![env_var(ENV_BLOB_URL, &self.url)]
    }

    fn image_pull_secrets_volume(&self) -> Volume {
        empty_dir_volume()
    }
}

impl Source for Registry {
    fn kind(&self) -> &'static str {
        "registry"
    }

    fn build_env_vars(&self) -> Vec<EnvVar> {
        vec![env_var(ENV_REGISTRY_IMAGE, &self.image)]
    }

    fn image_pull_secrets_volume(&self) -> Volume {
        // Only the first pull secret is mounted
        match self.image_pull_secrets.first() {
            Some(secret) => Volume {
                name: VOLUME_NAME_IMAGE_PULL_SECRETS.to_string(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(secret.name.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            None => empty_dir_volume(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_env_vars() {
        let config = SourceConfig::git("https://github.com/acme/app", "main");
        let source = config.source().unwrap();
        assert_eq!(source.kind(), "git");

        let vars = source.build_env_vars();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "GIT_URL");
        assert_eq!(vars[0].value.as_deref(), Some("https://github.com/acme/app"));
        assert_eq!(vars[1].name, "GIT_REVISION");
        assert_eq!(vars[1].value.as_deref(), Some("main"));

        let volume = source.image_pull_secrets_volume();
        assert_eq!(volume.name, "image-pull-secrets-dir");
        assert!(volume.empty_dir.is_some());
    }

    #[test]
    fn test_blob_env_vars() {
        let config = SourceConfig::blob("https://storage.example.com/app.tgz");
        let vars = config.source().unwrap().build_env_vars();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "BLOB_URL");
    }

    #[test]
    fn test_registry_volume_uses_first_pull_secret() {
        let mut config = SourceConfig::registry("registry.example.com/app-source");
        config.registry.as_mut().unwrap().image_pull_secrets = vec![
            SecretReference {
                name: "regcred".to_string(),
            },
            SecretReference {
                name: "other".to_string(),
            },
        ];

        let volume = config.source().unwrap().image_pull_secrets_volume();
        assert_eq!(volume.name, "image-pull-secrets-dir");
        assert_eq!(
            volume.secret.unwrap().secret_name.as_deref(),
            Some("regcred")
        );
        assert!(volume.empty_dir.is_none());
    }

    #[test]
    fn test_registry_without_secret_uses_empty_dir() {
        let config = SourceConfig::registry("registry.example.com/app-source");
        let volume = config.source().unwrap().image_pull_secrets_volume();
        assert!(volume.empty_dir.is_some());
        assert_eq!(
            config.source().unwrap().build_env_vars()[0].name,
            "REGISTRY_IMAGE"
        );
    }

    #[test]
    fn test_empty_source_config() {
        let config = SourceConfig::default();
        assert!(config.source().is_none());
        assert_eq!(config.configured_count(), 0);
    }

    #[test]
    fn test_source_config_json_shape() {
        let mut config = SourceConfig::git("https://github.com/acme/app", "v1");
        config.sub_path = Some("services/api".to_string());
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["git"]["url"], "https://github.com/acme/app");
        assert_eq!(value["subPath"], "services/api");
        assert!(value.get("blob").is_none());
    }
}
