//! Refit CLI - dependency-aware package format post-processor
//!
//! `refit compile` transforms pending module formats in dependency order,
//! `refit list` shows entry points and their marker state, and
//! `refit clean` removes processed markers.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use refit::config::{Config, ConfigWarning};
use refit::domain::services::PropertyStatus;
use refit::FormatProperty;

/// Refit - dependency-aware package format post-processor
#[derive(Parser, Debug)]
#[command(name = "refit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./refit.toml, then user config)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct CompileArgs {
    /// Package root to process
    #[arg(short, long, default_value = "node_modules")]
    source: PathBuf,

    /// Format properties to process (all recognized when omitted)
    #[arg(short, long, value_delimiter = ',')]
    properties: Vec<FormatProperty>,

    /// Compile only this entry point directory and its dependencies
    #[arg(long)]
    target: Option<PathBuf>,

    /// Worker threads for independent entry points
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Version token recorded in processed markers
    #[arg(long)]
    compiler_version: Option<String>,

    /// Dry run - report pending work without writing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile pending module formats, dependencies first
    Compile(CompileArgs),

    /// Show entry points in compilation order with marker state
    List {
        /// Package root to scan
        #[arg(short, long, default_value = "node_modules")]
        source: PathBuf,
    },

    /// Remove processed markers so the next compile starts fresh
    Clean {
        /// Package root to scan
        #[arg(short, long, default_value = "node_modules")]
        source: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => {
            cmd_compile(args, cli.config.as_deref(), cli.json, cli.verbose)
        }
        Commands::List { source } => cmd_list(&source, cli.config.as_deref(), cli.json),
        Commands::Clean { source } => cmd_clean(&source, cli.config.as_deref(), cli.json),
    }
}

fn cmd_compile(args: CompileArgs, config_path: Option<&Path>, json: bool, verbose: u8) -> Result<()> {
    use refit::application::compile::{CompileOptions, CompileUseCase};
    use refit::domain::ports::CompileEventSink;
    use refit::infrastructure::events::{ConsoleEventSink, JsonEventSink};
    use refit::infrastructure::fs::LocalFileSystem;
    use refit::infrastructure::lock::RunLock;
    use refit::infrastructure::repositories::ManifestRepository;
    use refit::infrastructure::scanner::EntryPointScanner;
    use refit::infrastructure::transform::BannerTransformer;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let source = expand_home(&args.source);
    let (config, warnings) = load_config(config_path, &source)?;
    print_config_warnings(&warnings, json);

    // CLI flags override config file values
    let properties = if args.properties.is_empty() {
        config.compile.properties.clone()
    } else {
        args.properties
    };
    let jobs = args.jobs.unwrap_or(config.compile.jobs);
    let compiler_version = args
        .compiler_version
        .unwrap_or_else(|| refit::VERSION.to_string());

    if !json {
        println!("📦 Refit Compile");
        println!("Source: {}", source.display());
        if let Some(target) = &args.target {
            println!("Target: {}", target.display());
        }
        if jobs > 1 {
            println!("Jobs: {}", jobs);
        }
        if args.dry_run {
            println!("Mode: Dry run");
        }
    }

    let _lock = RunLock::acquire(&source)?;

    // Ctrl+C stops dispatch of new entry points; in-flight ones finish
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let event_sink: Arc<dyn CompileEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::new(verbose > 0))
    };

    let mut options = CompileOptions::new(source.clone())
        .with_properties(properties)
        .with_jobs(jobs)
        .with_compiler_version(compiler_version.clone())
        .with_dry_run(args.dry_run);
    if let Some(target) = args.target {
        options = options.with_target(expand_home(&target));
    }

    let fs = LocalFileSystem;
    let scanner = EntryPointScanner::with_ignore_globs(&fs, config.scan.ignore.clone());
    let manifests = ManifestRepository::new(&fs);
    let transformer = BannerTransformer::new(compiler_version);
    let use_case = CompileUseCase::new(scanner, manifests, &fs, transformer);

    let report = use_case.execute_interruptible(&options, event_sink, running)?;

    if args.dry_run && !json {
        if report.compiled.is_empty() {
            println!("\nNothing to compile.");
        } else {
            println!("\nWould compile:");
            for ep in &report.compiled {
                let props: Vec<&str> = ep.properties.iter().map(|p| p.as_str()).collect();
                println!("  - {} [{}]", ep.name, props.join(", "));
            }
        }
    }

    if report.interrupted {
        std::process::exit(130);
    }
    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list(source: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    use is_terminal::IsTerminal;
    use refit::application::list::{ListOptions, ListUseCase};
    use refit::infrastructure::fs::LocalFileSystem;
    use refit::infrastructure::scanner::EntryPointScanner;

    let source = expand_home(source);
    let (config, warnings) = load_config(config_path, &source)?;
    print_config_warnings(&warnings, json);

    if !json {
        println!("📦 Refit List");
        println!("Source: {}", source.display());
        println!();
    }

    let fs = LocalFileSystem;
    let scanner = EntryPointScanner::with_ignore_globs(&fs, config.scan.ignore.clone());
    let use_case = ListUseCase::new(scanner);
    let report = use_case.execute(&ListOptions::new(source))?;

    if json {
        for ep in &report.entry_points {
            let properties: serde_json::Map<String, serde_json::Value> = ep
                .properties
                .iter()
                .map(|listing| {
                    (
                        listing.property.as_str().to_string(),
                        serde_json::Value::String(status_label(&listing.status)),
                    )
                })
                .collect();
            let output = serde_json::json!({
                "event": "entry_point",
                "command": "list",
                "name": ep.name,
                "path": ep.path.display().to_string(),
                "properties": properties,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        let output = serde_json::json!({
            "event": "complete",
            "command": "list",
            "entry_points": report.entry_points.len(),
            "excluded": report.excluded.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        if std::io::stdout().is_terminal() {
            for ep in &report.entry_points {
                println!("┌─ {}", ep.name);
                println!("│  Path: {}", ep.path.display());
                for listing in &ep.properties {
                    println!("│  {}: {}", listing.property, status_label(&listing.status));
                }
                println!("└─");
            }
        } else {
            // Plain rows when piped, one entry point per line
            for ep in &report.entry_points {
                let props: Vec<String> = ep
                    .properties
                    .iter()
                    .map(|listing| format!("{} {}", listing.property, status_label(&listing.status)))
                    .collect();
                println!("{}: {}", ep.name, props.join(", "));
            }
        }

        if !report.excluded.is_empty() {
            println!("\n⚠ Excluded ({}):", report.excluded.len());
            for excluded in &report.excluded {
                println!("  - {}: {}", excluded.path.display(), excluded.reason);
            }
        }

        let processed = report
            .entry_points
            .iter()
            .filter(|ep| ep.is_fully_processed())
            .count();
        println!(
            "\nSummary: {} entry points, {} fully processed",
            report.entry_points.len(),
            processed
        );
    }

    Ok(())
}

fn cmd_clean(source: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    use refit::application::clean::{CleanOptions, CleanUseCase};
    use refit::infrastructure::fs::LocalFileSystem;
    use refit::infrastructure::lock::RunLock;
    use refit::infrastructure::repositories::ManifestRepository;
    use refit::infrastructure::scanner::EntryPointScanner;

    let source = expand_home(source);
    let (config, warnings) = load_config(config_path, &source)?;
    print_config_warnings(&warnings, json);

    if !json {
        println!("🧹 Refit Clean");
        println!("Source: {}", source.display());
    }

    let _lock = RunLock::acquire(&source)?;

    let fs = LocalFileSystem;
    let scanner = EntryPointScanner::with_ignore_globs(&fs, config.scan.ignore.clone());
    let manifests = ManifestRepository::new(&fs);
    let use_case = CleanUseCase::new(scanner, manifests);
    let report = use_case.execute(&CleanOptions::new(source))?;

    if json {
        let output = serde_json::json!({
            "event": "complete",
            "command": "clean",
            "cleaned": report.cleaned.len(),
            "unmarked": report.unmarked.len(),
            "excluded": report.excluded.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Clean Results:");
        if !report.cleaned.is_empty() {
            println!("  ✓ Markers removed: {}", report.cleaned.len());
            for name in &report.cleaned {
                println!("    - {}", name);
            }
        }
        if !report.unmarked.is_empty() {
            println!("  = Already clean: {}", report.unmarked.len());
        }
        if !report.excluded.is_empty() {
            println!("  ⚠ Excluded: {}", report.excluded.len());
        }
        println!();
    }

    Ok(())
}

/// Expand a leading `~` to the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Explicit --config is authoritative; otherwise search next to the
/// source tree, then the user config directory.
fn load_config(explicit: Option<&Path>, source: &Path) -> Result<(Config, Vec<ConfigWarning>)> {
    match explicit {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)?;
            Ok((config.with_env_overrides(), warnings))
        }
        None => Ok((Config::load_or_default(source.parent()), Vec::new())),
    }
}

fn print_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        if json {
            let output = serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "location": location,
                "suggestion": warning.suggestion,
            });
            println!("{}", output);
        } else {
            match &warning.suggestion {
                Some(suggestion) => println!(
                    "⚠ Unknown config key '{}' at {} (did you mean '{}'?)",
                    warning.key, location, suggestion
                ),
                None => println!("⚠ Unknown config key '{}' at {}", warning.key, location),
            }
        }
    }
}

fn status_label(status: &PropertyStatus) -> String {
    match status {
        PropertyStatus::UpToDate => "processed".to_string(),
        PropertyStatus::Pending => "pending".to_string(),
        PropertyStatus::Stale { recorded } => format!("stale (was {recorded})"),
        PropertyStatus::Undeclared => "undeclared".to_string(),
    }
}
