//! Build automation for build-kube
//!
//! Usage: cargo xtask <command>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "build-kube";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for build-kube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests; --cluster also runs the ignored tests that need a live cluster
    Test {
        #[arg(long)]
        cluster: bool,
    },
    /// Regenerate the CustomResourceDefinition manifests
    Crds {
        #[arg(long, default_value = "deploy/crds.yaml")]
        output: String,
    },
    /// Create a release tarball
    Dist {
        /// Target triple (e.g., x86_64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { cluster } => test(&sh, cluster),
        Commands::Crds { output } => crds(&sh, &output),
        Commands::Dist { target } => dist(&sh, target),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building {}...", BIN);

    if release {
        cmd!(sh, "cargo build --release --bin {BIN}").run()?;
        println!("✅ Release build completed: target/release/{}", BIN);
    } else {
        cmd!(sh, "cargo build --bin {BIN}").run()?;
        println!("✅ Debug build completed: target/debug/{}", BIN);
    }

    Ok(())
}

fn test(sh: &Shell, cluster: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if cluster {
        cmd!(sh, "cargo test --all -- --include-ignored").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn render_crds(sh: &Shell) -> Result<String> {
    cmd!(sh, "cargo run --quiet --bin {BIN} -- crd")
        .read()
        .context("Failed to render CRDs")
}

fn crds(sh: &Shell, output: &str) -> Result<()> {
    let yaml = render_crds(sh)?;
    if let Some(parent) = Path::new(output).parent() {
        sh.create_dir(parent)?;
    }
    sh.write_file(output, format!("{}\n", yaml))?;
    println!("✅ CRDs written to {}", output);
    Ok(())
}

fn dist(sh: &Shell, target: Option<String>) -> Result<()> {
    println!("📦 Creating distribution package...");

    let root = project_root()?;
    let binary_src = if let Some(ref target_triple) = target {
        cmd!(sh, "cargo build --release --target {target_triple}").run()?;
        root.join(format!("target/{}/release/{}", target_triple, BIN))
    } else {
        cmd!(sh, "cargo build --release").run()?;
        root.join(format!("target/release/{}", BIN))
    };

    let dist_dir = root.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(&binary_src, dist_dir.join(BIN))?;
    sh.write_file(dist_dir.join("crds.yaml"), render_crds(sh)?)?;

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = match target {
        Some(t) => format!("{}-{}.tar.gz", BIN, t),
        None => format!("{}-{}.tar.gz", BIN, version),
    };

    cmd!(sh, "tar -czf {archive_name} -C dist {BIN} crds.yaml")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
