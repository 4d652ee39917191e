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

// CLI command definitions

use super::build::{
    CrdCommand, CreateCommand, DeleteCommand, GetCommand, ListCommand, WaitCommand, WatchCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "build-kube",
    version,
    about = "Manage Build and CNBBuild resources on Kubernetes",
    long_about = "A CLI for creating, inspecting and waiting on build.pivotal.io/v1alpha1 Build and CNBBuild resources"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List builds in a namespace
    List(ListCommand),

    /// Show a single build with its conditions
    Get(GetCommand),

    /// Create a build from a YAML manifest (defaulted and validated first)
    Create(CreateCommand),

    /// Delete a build, or every build matching a selector with --all
    Delete(DeleteCommand),

    /// Stream build events
    Watch(WatchCommand),

    /// Block until a build finishes; exits non-zero if it failed
    Wait(WaitCommand),

    /// Print the CustomResourceDefinition manifests
    Crd(CrdCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build::{OutputFormat, ResourceKind};

    #[test]
    fn test_parse_get() {
        let args = CliArgs::parse_from([
            "build-kube", "get", "app-1", "-n", "ci", "--kind", "cnb-build", "-o", "yaml",
        ]);
        match args.command {
            Commands::Get(cmd) => {
                assert_eq!(cmd.name, "app-1");
                assert_eq!(cmd.conn.namespace.as_deref(), Some("ci"));
                assert_eq!(cmd.conn.kind, ResourceKind::CnbBuild);
                assert_eq!(cmd.output, OutputFormat::Yaml);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_wait_and_create() {
        let args = CliArgs::parse_from(["build-kube", "wait", "app-1", "--timeout", "30"]);
        assert!(matches!(args.command, Commands::Wait(ref cmd) if cmd.timeout == Some(30)));

        let args = CliArgs::parse_from(["build-kube", "create", "-f", "build.yaml"]);
        assert!(matches!(args.command, Commands::Create(ref cmd) if cmd.filename == "build.yaml"));

        assert!(CliArgs::try_parse_from(["build-kube", "create"]).is_err());
    }

    #[test]
    fn test_parse_crd() {
        let args = CliArgs::parse_from(["build-kube", "crd", "--kind", "build"]);
        assert!(matches!(args.command, Commands::Crd(ref cmd) if cmd.kind == Some(ResourceKind::Build)));
    }
}
