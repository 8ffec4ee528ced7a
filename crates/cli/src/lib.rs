use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use specmap_indexer::{RunStats, SpecMapConfig, SpecMapGenerator};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "specmap")]
#[command(about = "Index spec-linked tests into testsMap.json and sectionsMap.json", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Repository root all configured paths are relative to
    #[arg(long)]
    root: Option<PathBuf>,

    /// TOML config file (default: specmap.toml in the root when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let stats = run(&cli)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

/// Resolve the root and config, then regenerate every map.
pub fn run(cli: &Cli) -> Result<RunStats> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    let config = load_config(cli.config.as_deref(), &root)?;

    let generator = SpecMapGenerator::new(&root, config)
        .with_context(|| format!("Cannot generate spec maps for {}", root.display()))?;
    generator
        .generate()
        .with_context(|| format!("Spec map generation failed for {}", root.display()))
}

fn load_config(path: Option<&Path>, root: &Path) -> Result<SpecMapConfig> {
    SpecMapConfig::resolve(path, root).with_context(|| match path {
        Some(path) => format!("Invalid config {}", path.display()),
        None => format!("Invalid config in {}", root.display()),
    })
}
