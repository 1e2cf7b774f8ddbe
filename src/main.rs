//! artifact-report CLI

use anyhow::{Context, Result};
use artifact_report::assembler::ReportAssembler;
use artifact_report::catalog::ArtifactCatalog;
use artifact_report::config::{load_config, Config, RunSettings, CONFIG_FILENAME};
use artifact_report::reporter::{write_report, ConsoleReporter, JsonReporter};
use artifact_report::scaffold::{scaffold, sorted_listing};
use artifact_report::watcher::ArtifactWatcher;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Render a directory of CI/CD scan logs into a browsable HTML report
#[derive(Parser, Debug)]
#[command(name = "artifact-report")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the artifact .txt files (omit when using a subcommand)
    #[arg(required = true)]
    dir: Option<PathBuf>,

    /// Directory the report is written to (default: processed_artifacts)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Path to config file (default: search .artifactrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report title shown after the directory name
    #[arg(long)]
    title: Option<String>,

    /// Print the assembled document as JSON instead of writing HTML
    #[arg(long, short)]
    json: bool,

    /// With --json, leave out the rendered log content
    #[arg(long, requires = "json")]
    no_content: bool,

    /// Quiet mode (print only the report path)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (timestamps and digests)
    #[arg(long, short)]
    verbose: bool,

    /// Watch the directory and regenerate on changes
    #[arg(long)]
    watch: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pre-create an empty artifact directory for a project
    Scaffold {
        /// Project name (becomes the directory name)
        project: String,

        /// Parent directory (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .artifactrc.json with the built-in artifact groups
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args = Args::parse();
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Some(cmd) = args.command.take() {
        return match cmd {
            Commands::Scaffold {
                project,
                dir,
                config,
            } => run_scaffold(&cwd, &project, dir.as_deref(), config.as_deref()),
            Commands::Init { dir } => run_init(dir.as_deref().unwrap_or(&cwd)),
        };
    }

    let dir = args
        .dir
        .clone()
        .context("an artifact directory is required")?;

    let config = load_config(&cwd, args.config.as_deref())?
        .merge_with_cli(args.title.clone(), args.output_dir.as_deref());
    // Startup self-check: every artifact id must compile to a valid pattern.
    let settings = RunSettings::from_config(&config)?;

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    generate(&args, &dir, &settings)?;

    if args.watch {
        return run_watch(&args, &dir, &settings);
    }
    Ok(ExitCode::SUCCESS)
}

/// One full pass: scan, assemble, then print JSON or write the HTML report
fn generate(args: &Args, dir: &Path, settings: &RunSettings) -> Result<()> {
    let doc = ReportAssembler::new(&settings.catalog)
        .with_ignore(settings.ignore.as_ref())
        .with_title(settings.title.as_str())
        .assemble(dir)?;

    if args.json {
        let mut reporter = JsonReporter::new().pretty();
        if args.no_content {
            reporter = reporter.without_content();
        }
        println!("{}", reporter.report(&doc));
        return Ok(());
    }

    let path = write_report(&doc, &settings.output_dir)?;
    if args.quiet {
        ConsoleReporter::new().report_quiet(&path);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&doc, &path);
    }
    Ok(())
}

fn run_watch(args: &Args, dir: &Path, settings: &RunSettings) -> Result<ExitCode> {
    let watcher = ArtifactWatcher::watch(dir).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let paths = watcher.next_changes();
        if paths.is_empty() {
            continue;
        }
        if !args.quiet {
            for path in &paths {
                eprintln!("{}: {} changed", "Info".blue(), path.display());
            }
        }
        if let Err(e) = generate(args, dir, settings) {
            eprintln!("{}: {:#}", "Error".red(), e);
        }
    }
}

fn run_scaffold(
    cwd: &Path,
    project: &str,
    parent: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let config = load_config(cwd, config_path)?;
    let catalog = ArtifactCatalog::from_groups(&config.group_specs())?;
    let parent = parent.unwrap_or(cwd);

    let report = scaffold(parent, project, &catalog)?;
    println!("{}: {}", "Directory".bold(), report.dir.display());

    for group in catalog.groups() {
        println!("\nSetting up {} artifacts:", group.id);
        for definition in &group.members {
            let name = definition.canonical_file_name();
            if report.skipped.contains(&name) {
                println!("  {} {} already exists, skipping", "!".yellow(), name);
            } else {
                println!("  {} Created {}", "✓".green(), name);
            }
        }
    }

    println!(
        "\n{}: {} created, {} skipped",
        "Done".green().bold(),
        report.created.len(),
        report.skipped.len()
    );
    println!("\n{}/", project);
    for name in sorted_listing(&report.dir)? {
        println!("  └─ {}", name);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(dir: &Path) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let catalog = ArtifactCatalog::builtin().context("Built-in catalog failed self-check")?;
    let config = Config {
        title: Some(artifact_report::config::DEFAULT_TITLE.to_string()),
        output_dir: Some(PathBuf::from(artifact_report::config::DEFAULT_OUTPUT_DIR)),
        groups: Some(catalog.to_specs()),
        ..Config::default()
    };
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;

    std::fs::write(&config_path, json + "\n")
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with {} artifact groups",
        "Done".green().bold(),
        config_path.display(),
        catalog.groups().len()
    );
    Ok(ExitCode::SUCCESS)
}
