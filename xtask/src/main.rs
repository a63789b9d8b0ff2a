use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};
use zip::ZipArchive;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Check that a template archive carries the entries generated packages rely on
    VerifyTemplate {
        /// Path to the template zip
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::VerifyTemplate { path } => verify_template(path)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn verify_template(path: PathBuf) -> Result<()> {
    let file = File::open(&path)?;
    let archive = ZipArchive::new(file)?;

    let names: Vec<&str> = archive.file_names().collect();
    println!("{}: {} entries", path.display(), names.len());

    // The intro page references this placeholder by name; a template without
    // it renders a broken background until an image is uploaded.
    let expected = ["content/images/file-_jmSDW4b9EawjImv.png"];
    let mut missing = Vec::new();
    for name in expected {
        if !names.contains(&name) {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        println!("template looks usable");
        Ok(())
    } else {
        anyhow::bail!("template is missing expected entries: {missing:?}")
    }
}
