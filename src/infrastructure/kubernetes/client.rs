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

use crate::domain::build::{Build, CnbBuild};
use crate::infrastructure::constants::{DEFAULT_FIELD_MANAGER, SUBRESOURCE_STATUS};
use crate::shared::error::KubeError;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{
    DeleteParams, GetParams, ListParams, ObjectList, Patch, PatchParams, PostParams, WatchEvent,
    WatchParams,
};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

/// Typed operations against one namespaced resource kind.
///
/// Every method issues exactly one request. Nothing here retries, caches
/// or reorders calls.
#[async_trait::async_trait]
pub trait ResourceInterface<K: Clone>: Send + Sync {
    async fn get(&self, name: &str, params: &GetParams) -> Result<K, KubeError>;

    async fn list(&self, params: &ListParams) -> Result<ObjectList<K>, KubeError>;

    /// Raw watch starting after `resource_version` ("0" for any).
    async fn watch(
        &self,
        params: &WatchParams,
        resource_version: &str,
    ) -> Result<BoxStream<'static, Result<WatchEvent<K>, KubeError>>, KubeError>;

    async fn create(&self, obj: &K) -> Result<K, KubeError>;

    async fn update(&self, obj: &K) -> Result<K, KubeError>;

    async fn update_status(&self, obj: &K) -> Result<K, KubeError>;

    async fn delete(&self, name: &str, params: &DeleteParams) -> Result<(), KubeError>;

    async fn delete_collection(
        &self,
        delete_params: &DeleteParams,
        list_params: &ListParams,
    ) -> Result<(), KubeError>;

    async fn patch(
        &self,
        name: &str,
        patch: &Patch<serde_json::Value>,
        subresource: Option<&str>,
    ) -> Result<K, KubeError>;

    fn namespace(&self) -> &str;
}

pub type CnbBuildInterface = dyn ResourceInterface<CnbBuild>;
pub type BuildInterface = dyn ResourceInterface<Build>;

pub type CnbBuildClient = ResourceClient<CnbBuild>;
pub type BuildClient = ResourceClient<Build>;

pub trait CnbBuildsGetter {
    fn cnb_builds(&self, namespace: &str) -> Box<CnbBuildInterface>;
}

pub trait BuildsGetter {
    fn builds(&self, namespace: &str) -> Box<BuildInterface>;
}

pub struct ResourceClient<K> {
    api: Api<K>,
    namespace: String,
    field_manager: String,
}

impl<K> ResourceClient<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
{
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }

    pub fn with_field_manager(mut self, field_manager: impl Into<String>) -> Self {
        self.field_manager = field_manager.into();
        self
    }

    fn kind() -> String {
        K::kind(&()).to_string()
    }

    fn plural() -> String {
        K::plural(&()).to_string()
    }

    fn object_name(&self, obj: &K) -> Result<String, KubeError> {
        obj.meta().name.clone().ok_or_else(|| {
            KubeError::InvalidResource(format!("{} name is required", Self::kind()))
        })
    }

    fn map_err(&self, err: kube::Error, name: &str) -> KubeError {
        KubeError::from_api(err, &Self::kind(), name, &self.namespace)
    }
}

#[async_trait::async_trait]
impl<K> ResourceInterface<K> for ResourceClient<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    async fn get(&self, name: &str, params: &GetParams) -> Result<K, KubeError> {
        debug!(verb = "GET", resource = %Self::plural(), namespace = %self.namespace, name, "get");
        self.api
            .get_with(name, params)
            .await
            .map_err(|e| self.map_err(e, name))
    }

    async fn list(&self, params: &ListParams) -> Result<ObjectList<K>, KubeError> {
        debug!(
            verb = "GET",
            resource = %Self::plural(),
            namespace = %self.namespace,
            label_selector = ?params.label_selector,
            "list"
        );
        self.api
            .list(params)
            .await
            .map_err(|e| self.map_err(e, ""))
    }

    async fn watch(
        &self,
        params: &WatchParams,
        resource_version: &str,
    ) -> Result<BoxStream<'static, Result<WatchEvent<K>, KubeError>>, KubeError> {
        debug!(
            verb = "WATCH",
            resource = %Self::plural(),
            namespace = %self.namespace,
            resource_version,
            "watch"
        );
        let stream = self.api.watch(params, resource_version).await?;
        Ok(stream.map_err(KubeError::from).boxed())
    }

    async fn create(&self, obj: &K) -> Result<K, KubeError> {
        let name = obj.meta().name.clone().unwrap_or_default();
        debug!(verb = "POST", resource = %Self::plural(), namespace = %self.namespace, name = %name, "create");
        self.api
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| self.map_err(e, &name))
    }

    async fn update(&self, obj: &K) -> Result<K, KubeError> {
        let name = self.object_name(obj)?;
        debug!(verb = "PUT", resource = %Self::plural(), namespace = %self.namespace, name = %name, "update");
        self.api
            .replace(&name, &PostParams::default(), obj)
            .await
            .map_err(|e| self.map_err(e, &name))
    }

    async fn update_status(&self, obj: &K) -> Result<K, KubeError> {
        let name = self.object_name(obj)?;
        debug!(
            verb = "PUT",
            resource = %Self::plural(),
            subresource = SUBRESOURCE_STATUS,
            namespace = %self.namespace,
            name = %name,
            "update status"
        );
        let data = serde_json::to_vec(obj)?;
        self.api
            .replace_status(&name, &PostParams::default(), data)
            .await
            .map_err(|e| self.map_err(e, &name))
    }

    async fn delete(&self, name: &str, params: &DeleteParams) -> Result<(), KubeError> {
        debug!(verb = "DELETE", resource = %Self::plural(), namespace = %self.namespace, name, "delete");
        self.api
            .delete(name, params)
            .await
            .map(|_| ())
            .map_err(|e| self.map_err(e, name))
    }

    async fn delete_collection(
        &self,
        delete_params: &DeleteParams,
        list_params: &ListParams,
    ) -> Result<(), KubeError> {
        debug!(
            verb = "DELETE",
            resource = %Self::plural(),
            namespace = %self.namespace,
            label_selector = ?list_params.label_selector,
            "delete collection"
        );
        self.api
            .delete_collection(delete_params, list_params)
            .await
            .map(|_| ())
            .map_err(|e| self.map_err(e, ""))
    }

    async fn patch(
        &self,
        name: &str,
        patch: &Patch<serde_json::Value>,
        subresource: Option<&str>,
    ) -> Result<K, KubeError> {
        debug!(
            verb = "PATCH",
            resource = %Self::plural(),
            subresource = ?subresource,
            namespace = %self.namespace,
            name,
            "patch"
        );
        let params = if matches!(patch, Patch::Apply(_)) {
            PatchParams::apply(&self.field_manager).force()
        } else {
            PatchParams::default()
        };

        let result = match subresource {
            Some(sub) => self.api.patch_subresource(sub, name, &params, patch).await,
            None => self.api.patch(name, &params, patch).await,
        };
        result.map_err(|e| self.map_err(e, name))
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Client set for the `build.pivotal.io/v1alpha1` group
#[derive(Clone)]
pub struct BuildV1alpha1Client {
    client: Client,
    field_manager: String,
}

impl BuildV1alpha1Client {
    pub async fn new() -> Result<Self, KubeError> {
        let client = Client::try_default().await.map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, KubeError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                KubeError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::from_client(client))
    }

    pub fn with_field_manager(mut self, field_manager: impl Into<String>) -> Self {
        self.field_manager = field_manager.into();
        self
    }

    pub fn cnb_build_client(&self, namespace: &str) -> CnbBuildClient {
        ResourceClient::new(self.client.clone(), namespace)
            .with_field_manager(self.field_manager.clone())
    }

    pub fn build_client(&self, namespace: &str) -> BuildClient {
        ResourceClient::new(self.client.clone(), namespace)
            .with_field_manager(self.field_manager.clone())
    }
}

impl CnbBuildsGetter for BuildV1alpha1Client {
    fn cnb_builds(&self, namespace: &str) -> Box<CnbBuildInterface> {
        Box::new(self.cnb_build_client(namespace))
    }
}

impl BuildsGetter for BuildV1alpha1Client {
    fn builds(&self, namespace: &str) -> Box<BuildInterface> {
        Box::new(self.build_client(namespace))
    }
}
