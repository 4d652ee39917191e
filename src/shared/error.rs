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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, KubeError>;

#[derive(Error, Debug)]
pub enum KubeError {
    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Conflict on {resource_type} '{name}' in namespace '{namespace}': {message}")]
    Conflict {
        resource_type: String,
        name: String,
        namespace: String,
        message: String,
    },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Build '{name}' already finished with Succeeded={status}")]
    TerminalState { name: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<kube::Error> for KubeError {
    fn from(err: kube::Error) -> Self {
        KubeError::KubeError(err.to_string())
    }
}

impl KubeError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Classify an API error for a named object. 404 and the two kinds of 409
    /// get their own variants, everything else is passed through as text.
    pub fn from_api(
        err: kube::Error,
        resource_type: &str,
        name: &str,
        namespace: &str,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => {
                Self::not_found(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
                Self::already_exists(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 409 => Self::Conflict {
                resource_type: resource_type.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: ae.message,
            },
            kube::Error::Api(ae) => Self::KubeError(ae.message),
            e => Self::KubeError(e.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("status {}", code),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_from_api_classifies_not_found() {
        let err = KubeError::from_api(api_error(404, "NotFound"), "CNBBuild", "demo", "default");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Resource not found: CNBBuild 'demo' in namespace 'default'"
        );
    }

    #[test]
    fn test_from_api_classifies_already_exists() {
        let err = KubeError::from_api(api_error(409, "AlreadyExists"), "Build", "demo", "ci");
        assert!(matches!(err, KubeError::AlreadyExists { .. }));
    }

    #[test]
    fn test_from_api_keeps_conflict_message() {
        let err = KubeError::from_api(api_error(409, "Conflict"), "Build", "demo", "ci");
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Conflict on Build 'demo' in namespace 'ci': status 409"
        );
    }

    #[test]
    fn test_from_api_passes_other_codes_through() {
        let err = KubeError::from_api(api_error(500, "InternalError"), "Build", "demo", "ci");
        match err {
            KubeError::KubeError(msg) => assert_eq!(msg, "status 500"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
