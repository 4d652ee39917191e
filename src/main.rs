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

use build_service_kube::cli::{CliArgs, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity, warnings only by default
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Commands::List(cmd) => cmd.execute().await,
        Commands::Get(cmd) => cmd.execute().await,
        Commands::Create(cmd) => cmd.execute().await,
        Commands::Delete(cmd) => cmd.execute().await,
        Commands::Watch(cmd) => cmd.execute().await,
        Commands::Wait(cmd) => cmd.execute().await,
        Commands::Crd(cmd) => cmd.execute().await,
    }
}
