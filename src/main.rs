//! suitekit CLI
//!
//! Entry point for the `suitekit` command-line tool.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use suitekit::config::{
    parse_overrides, user_config_path, EffectiveConfig, PlatformKind, ToolConfig,
    PROJECT_CONFIG_FILE,
};
use suitekit::suite::full_name;
use suitekit::{batches, logging, merge_layers, to_file_path, Task};

#[derive(Parser)]
#[command(name = "suitekit")]
#[command(about = "Config merging, suite batching and module path resolution", version)]
struct Cli {
    /// Path to project config file (default: suitekit.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Override a config value (e.g. --set sequence.concurrent=true)
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deep-merge config files (first is base, later files win)
    Merge {
        /// Base file (TOML, or JSON with a .json extension)
        base: PathBuf,

        /// Override files applied in order
        #[arg(required = true)]
        overrides: Vec<PathBuf>,
    },

    /// Split a suite's children into sequential/concurrent batches
    Partition {
        /// Suite tree as JSON
        suite: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Canonicalize module ids into file paths
    Resolve {
        /// Module ids to resolve
        #[arg(required = true)]
        ids: Vec<String>,

        /// Project root (default: from config)
        #[arg(long)]
        root: Option<String>,

        /// Path conventions: auto, posix or windows (default: from config)
        #[arg(long)]
        platform: Option<PlatformKind>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where it came from
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    match cli.command {
        Commands::Merge { base, overrides } => {
            run_merge(&base, &overrides);
        }
        Commands::Partition { suite, json } => {
            let config = load_config(&config_path, &cli.overrides);
            run_partition(&suite, &config, json);
        }
        Commands::Resolve {
            ids,
            root,
            platform,
            json,
        } => {
            let config = load_config(&config_path, &cli.overrides);
            run_resolve(&ids, root, platform, &config, json);
        }
        Commands::Config { json } => {
            run_config(&config_path, &cli.overrides, json);
        }
    }
}

fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    tracing::error!(%error, "{}", context);
    eprintln!("{}: {}", context, error);
    process::exit(1);
}

fn build_effective(config_path: &Path, overrides: &[String]) -> EffectiveConfig {
    let cli_layer = match parse_overrides(overrides) {
        Ok(layer) => layer,
        Err(e) => fail("Invalid --set override", e),
    };

    let user_path = user_config_path();
    match EffectiveConfig::build(user_path.as_deref(), Some(config_path), cli_layer) {
        Ok(config) => config,
        Err(e) => fail("Error loading config", e),
    }
}

fn load_config(config_path: &Path, overrides: &[String]) -> ToolConfig {
    match build_effective(config_path, overrides).settings() {
        Ok(settings) => settings,
        Err(e) => fail("Error loading config", e),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error serializing output", e),
    }
}

fn run_merge(base: &Path, overrides: &[PathBuf]) {
    let mut layers = Vec::with_capacity(overrides.len() + 1);
    for path in std::iter::once(base).chain(overrides.iter().map(PathBuf::as_path)) {
        match EffectiveConfig::load_file(path) {
            Ok((value, _digest)) => layers.push(value),
            Err(e) => fail(&format!("Error reading {}", path.display()), e),
        }
    }

    match merge_layers(layers) {
        Ok(merged) => print_json(&merged),
        Err(e) => fail("Error merging", e),
    }
}

fn run_partition(suite_path: &Path, config: &ToolConfig, json_output: bool) {
    let contents = match fs::read_to_string(suite_path) {
        Ok(c) => c,
        Err(e) => fail(&format!("Error reading {}", suite_path.display()), e),
    };
    let mut suite: Task = match serde_json::from_str(&contents) {
        Ok(s) => s,
        Err(e) => fail("Error parsing suite", e),
    };

    // The suite itself has no siblings here; its flag only seeds children
    suite.inherit_concurrency(config.sequence.concurrent);
    let batches = batches(&suite);

    if json_output {
        print_json(&batches);
        return;
    }

    if batches.is_empty() {
        println!("Suite '{}' has no tasks.", suite.name);
        return;
    }

    println!(
        "Suite '{}': {} task(s), {} test(s) in {} batch(es)\n",
        suite.name,
        suite.tasks.len(),
        suite.test_count(),
        batches.len()
    );
    for (index, batch) in batches.iter().enumerate() {
        let mode = if batch.concurrent { "concurrent" } else { "sequential" };
        println!("  Batch {} ({}, {} task(s))", index + 1, mode, batch.len());
        for task in &batch.tasks {
            println!("    {} [{}]", full_name(&[suite.name.as_str(), task.name.as_str()]), task.kind);
        }
    }
}

fn run_resolve(
    ids: &[String],
    root: Option<String>,
    platform: Option<PlatformKind>,
    config: &ToolConfig,
    json_output: bool,
) {
    let root = root.unwrap_or_else(|| config.root.clone());
    let platform = match platform.unwrap_or(config.platform).platform() {
        Ok(p) => p,
        Err(e) => fail("Error reading working directory", e),
    };

    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        match to_file_path(id, &root, &platform) {
            Ok(path) => resolved.push((id.as_str(), path)),
            Err(e) => fail("Error resolving module id", e),
        }
    }

    if json_output {
        let output: Vec<serde_json::Value> = resolved
            .iter()
            .map(|(id, path)| serde_json::json!({"id": id, "path": path}))
            .collect();
        print_json(&output);
    } else {
        for (_, path) in resolved {
            println!("{}", path);
        }
    }
}

fn run_config(config_path: &Path, overrides: &[String], json_output: bool) {
    let effective = build_effective(config_path, overrides);

    if json_output {
        match effective.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        }
        return;
    }

    let settings = match effective.settings() {
        Ok(s) => s,
        Err(e) => fail("Error loading config", e),
    };

    println!("Effective configuration:\n");
    println!("  Root: {}", settings.root);
    println!("  Platform: {}", settings.platform);
    println!("  Concurrent by default: {}", settings.sequence.concurrent);
    println!("  Shuffle: {}", settings.sequence.shuffle);
    println!("  Test timeout: {} ms", settings.test_timeout_ms);
    println!("  Hook timeout: {} ms", settings.hook_timeout_ms);
    println!("  Reporters: {}", settings.reporters.join(", "));
    println!();
    println!("Sources (lowest precedence first):");
    for source in &effective.sources {
        match (&source.path, &source.digest) {
            (Some(path), Some(digest)) => println!("  {:?}: {} (sha256 {})", source.origin, path, digest),
            _ => println!("  {:?}", source.origin),
        }
    }
}
