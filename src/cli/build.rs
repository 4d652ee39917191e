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

//! Build resource commands

use crate::cli::display::{BuildDetail, BuildRow, TableRenderer};
use crate::domain::build::{Build, BuildResource, CnbBuild, Defaultable, Validatable};
use crate::domain::config::{apply_to_conf, parse_dynamic_configs, BuildKubeConf};
use crate::infrastructure::kubernetes::{
    wait_for_completion, BuildV1alpha1Client, BuildsGetter, CnbBuildsGetter, ResourceInterface,
    WaitConfig,
};
use clap::{Args, Parser, ValueEnum};
use futures::TryStreamExt;
use kube::api::{DeleteParams, GetParams, ListParams, WatchEvent, WatchParams};
use kube::CustomResourceExt;
use std::time::Duration;
use tracing::{debug, info};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Build,
    CnbBuild,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

/// Connection and configuration flags shared by every cluster command
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Kubernetes namespace (overrides kubernetes.namespace)
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Path to build-kube configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Keys: kubernetes.namespace, kubernetes.context, kubernetes.config.file,
    /// kubernetes.field-manager, wait.timeout (seconds), wait.poll-interval (ms)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Resource kind to operate on
    #[arg(long, value_enum, default_value_t = ResourceKind::Build)]
    pub kind: ResourceKind,
}

impl ConnectionArgs {
    /// Priority: command line > -D properties > config file > defaults
    pub fn resolve_conf(&self) -> anyhow::Result<BuildKubeConf> {
        let mut conf = match &self.config {
            Some(path) => BuildKubeConf::from(path)?,
            None => BuildKubeConf::default(),
        };

        if !self.properties.is_empty() {
            let dynamic = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_conf(&dynamic, &mut conf);
        }

        if let Some(namespace) = &self.namespace {
            conf.kubernetes.namespace = namespace.clone();
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            conf.kubernetes.kubeconfig = Some(kubeconfig.clone());
        }
        if let Some(context) = &self.context {
            conf.kubernetes.context = Some(context.clone());
        }

        conf.validate()?;
        Ok(conf)
    }
}

pub async fn connect(conf: &BuildKubeConf) -> anyhow::Result<BuildV1alpha1Client> {
    let kube_conf = &conf.kubernetes;
    let client = if kube_conf.kubeconfig.is_none() && kube_conf.context.is_none() {
        BuildV1alpha1Client::new().await
    } else {
        BuildV1alpha1Client::new_with_config(kube_conf.kubeconfig.clone(), kube_conf.context.clone())
            .await
    }
    .map_err(|e| anyhow::anyhow!("Failed to connect to Kubernetes: {}", e))?;

    Ok(client.with_field_manager(kube_conf.field_manager.clone()))
}

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Label selector (e.g. app=petclinic)
    #[arg(long, short = 'l')]
    pub selector: Option<String>,
}

impl ListCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;

        let mut params = ListParams::default();
        if let Some(selector) = &self.selector {
            params = params.labels(selector);
        }

        let output = match self.conn.kind {
            ResourceKind::Build => list_builds(&*clientset.builds(namespace), &params).await?,
            ResourceKind::CnbBuild => {
                list_builds(&*clientset.cnb_builds(namespace), &params).await?
            }
        };
        println!("{}", output);
        Ok(())
    }
}

async fn list_builds<K: BuildResource>(
    client: &dyn ResourceInterface<K>,
    params: &ListParams,
) -> anyhow::Result<String> {
    let list = client.list(params).await?;
    let rows: Vec<BuildRow> = list.items.iter().map(BuildRow::from_resource).collect();
    Ok(TableRenderer::new().render_build_list(&K::kind(&()), &rows))
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    /// Resource name
    pub name: String,

    #[command(flatten)]
    pub conn: ConnectionArgs,

    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl GetCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;

        let output = match self.conn.kind {
            ResourceKind::Build => {
                show_build(&*clientset.builds(namespace), &self.name, self.output).await?
            }
            ResourceKind::CnbBuild => {
                show_build(&*clientset.cnb_builds(namespace), &self.name, self.output).await?
            }
        };
        println!("{}", output);
        Ok(())
    }
}

async fn show_build<K: BuildResource>(
    client: &dyn ResourceInterface<K>,
    name: &str,
    output: OutputFormat,
) -> anyhow::Result<String> {
    let obj = client.get(name, &GetParams::default()).await?;
    let rendered = match output {
        OutputFormat::Table => {
            TableRenderer::new().render_build_detail(&BuildDetail::from_resource(&obj))
        }
        OutputFormat::Yaml => serde_yaml::to_string(&obj)?,
        OutputFormat::Json => serde_json::to_string_pretty(&obj)?,
    };
    Ok(rendered)
}

#[derive(Parser, Debug)]
pub struct CreateCommand {
    /// YAML manifest of the resource to create
    #[arg(long, short = 'f', value_name = "PATH")]
    pub filename: String,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

impl CreateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;

        let name = match self.conn.kind {
            ResourceKind::Build => {
                create_from_file(&*clientset.builds(namespace), &self.filename).await?
            }
            ResourceKind::CnbBuild => {
                create_from_file(&*clientset.cnb_builds(namespace), &self.filename).await?
            }
        };
        println!("{} created in namespace {}", name, namespace);
        Ok(())
    }
}

/// Parse, default, validate and submit a manifest. Returns `kind/name`.
pub async fn create_from_file<K>(client: &dyn ResourceInterface<K>, path: &str) -> anyhow::Result<String>
where
    K: BuildResource + Defaultable + Validatable,
{
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read manifest {}: {}", path, e))?;
    let mut obj: K = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse manifest {}: {}", path, e))?;

    obj.set_defaults();
    obj.validate()?;

    let namespace = client.namespace().to_string();
    if let Some(ns) = obj.meta().namespace.as_deref() {
        if ns != namespace {
            anyhow::bail!(
                "manifest namespace '{}' does not match target namespace '{}'",
                ns,
                namespace
            );
        }
    }
    obj.meta_mut().namespace = Some(namespace);

    let created = client.create(&obj).await?;
    info!(kind = %K::kind(&()), name = %created.build_ref(), "resource created");
    Ok(format!("{}/{}", K::kind(&()), created.build_ref()))
}

#[derive(Parser, Debug)]
pub struct DeleteCommand {
    /// Resource name
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,

    /// Delete every resource of the kind in the namespace (narrowed by --selector)
    #[arg(long, conflicts_with = "name")]
    pub all: bool,

    /// Label selector used with --all
    #[arg(long, short = 'l', requires = "all")]
    pub selector: Option<String>,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

impl DeleteCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;
        let target = self.target()?;

        let message = match self.conn.kind {
            ResourceKind::Build => delete_builds(&*clientset.builds(namespace), &target).await?,
            ResourceKind::CnbBuild => {
                delete_builds(&*clientset.cnb_builds(namespace), &target).await?
            }
        };
        println!("{}", message);
        Ok(())
    }

    fn target(&self) -> anyhow::Result<DeleteTarget> {
        match (&self.name, self.all) {
            (Some(name), false) => Ok(DeleteTarget::Named(name.clone())),
            (None, true) => Ok(DeleteTarget::Collection(self.selector.clone())),
            _ => anyhow::bail!("specify either a resource name or --all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Named(String),
    Collection(Option<String>),
}

async fn delete_builds<K: BuildResource>(
    client: &dyn ResourceInterface<K>,
    target: &DeleteTarget,
) -> anyhow::Result<String> {
    let kind = K::kind(&());
    match target {
        DeleteTarget::Named(name) => {
            client.delete(name, &DeleteParams::default()).await?;
            Ok(format!("{} {} deleted", kind, name))
        }
        DeleteTarget::Collection(selector) => {
            let mut params = ListParams::default();
            if let Some(selector) = selector {
                params = params.labels(selector);
            }
            client
                .delete_collection(&DeleteParams::default(), &params)
                .await?;
            Ok(format!(
                "{} resources deleted from namespace {}",
                kind,
                client.namespace()
            ))
        }
    }
}

#[derive(Parser, Debug)]
pub struct WatchCommand {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Label selector
    #[arg(long, short = 'l')]
    pub selector: Option<String>,

    /// Resource version to start watching from
    #[arg(long, default_value = "0")]
    pub resource_version: String,
}

impl WatchCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;

        let mut params = WatchParams::default();
        if let Some(selector) = &self.selector {
            params = params.labels(selector);
        }

        match self.conn.kind {
            ResourceKind::Build => {
                watch_builds(&*clientset.builds(namespace), &params, &self.resource_version)
                    .await
            }
            ResourceKind::CnbBuild => {
                watch_builds(&*clientset.cnb_builds(namespace), &params, &self.resource_version)
                    .await
            }
        }
    }
}

async fn watch_builds<K: BuildResource>(
    client: &dyn ResourceInterface<K>,
    params: &WatchParams,
    resource_version: &str,
) -> anyhow::Result<()> {
    let renderer = TableRenderer::new();
    let mut events = client.watch(params, resource_version).await?;

    while let Some(event) = events.try_next().await? {
        match event {
            WatchEvent::Added(obj) => {
                println!("{}", renderer.render_event("ADDED", &BuildRow::from_resource(&obj)))
            }
            WatchEvent::Modified(obj) => {
                println!("{}", renderer.render_event("MODIFIED", &BuildRow::from_resource(&obj)))
            }
            WatchEvent::Deleted(obj) => {
                println!("{}", renderer.render_event("DELETED", &BuildRow::from_resource(&obj)))
            }
            WatchEvent::Bookmark(bookmark) => {
                debug!(resource_version = %bookmark.metadata.resource_version, "bookmark");
            }
            WatchEvent::Error(err) => {
                anyhow::bail!("watch failed: {} ({})", err.message, err.code);
            }
        }
    }

    info!(namespace = client.namespace(), "watch closed by server");
    Ok(())
}

#[derive(Parser, Debug)]
pub struct WaitCommand {
    /// Resource name
    pub name: String,

    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Seconds to wait before giving up (overrides wait.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl WaitCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.conn.resolve_conf()?;
        let clientset = connect(&conf).await?;
        let namespace = &conf.kubernetes.namespace;

        let mut wait_config = WaitConfig::from(&conf.wait);
        if let Some(secs) = self.timeout {
            wait_config.timeout = Duration::from_secs(secs);
        }

        let message = match self.conn.kind {
            ResourceKind::Build => {
                wait_build(&*clientset.builds(namespace), &self.name, &wait_config).await?
            }
            ResourceKind::CnbBuild => {
                wait_build(&*clientset.cnb_builds(namespace), &self.name, &wait_config).await?
            }
        };
        println!("{}", message);
        Ok(())
    }
}

async fn wait_build<K: BuildResource>(
    client: &dyn ResourceInterface<K>,
    name: &str,
    config: &WaitConfig,
) -> anyhow::Result<String> {
    let obj = wait_for_completion(client, name, config).await?;
    if obj.is_failure() {
        anyhow::bail!("{} {} failed", K::kind(&()), name);
    }
    Ok(format!("{} {} succeeded: {}", K::kind(&()), name, obj.built_image()))
}

#[derive(Parser, Debug)]
pub struct CrdCommand {
    /// Only print the definition for this kind
    #[arg(long, value_enum)]
    pub kind: Option<ResourceKind>,
}

impl CrdCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        println!("{}", render_crds(self.kind)?);
        Ok(())
    }
}

/// CustomResourceDefinition manifests as a multi-document YAML stream
pub fn render_crds(kind: Option<ResourceKind>) -> anyhow::Result<String> {
    let crds = match kind {
        Some(ResourceKind::Build) => vec![Build::crd()],
        Some(ResourceKind::CnbBuild) => vec![CnbBuild::crd()],
        None => vec![Build::crd(), CnbBuild::crd()],
    };

    let documents = crds
        .iter()
        .map(serde_yaml::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents.join("---\n"))
}
