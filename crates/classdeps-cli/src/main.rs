//! CLI binary for classdeps: index a project and extract class dependency trees.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classdeps_core::config::{ClassDepsConfig, FuzzyScope};
use classdeps_core::model::FileEntry;
use classdeps_core::report::{ReportShape, to_json};
use classdeps_core::source::read_source;
use classdeps_core::storage;
use classdeps_nav::fuzzy::NameMatcher;
use classdeps_nav::index::{NameIndex, ScanOptions, collect_files};
use classdeps_nav::interfaces::ImplementationResolver;
use classdeps_nav::predicate::PathRule;
use classdeps_nav::report::generate_report;
use classdeps_nav::tree::{TreeBuilder, TreeOptions};
use classdeps_parser::condense::condense;
use classdeps_parser::{ReferenceScanner, RegexScanner};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "classdeps",
    about = "Extract class dependency trees from legacy codebases"
)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the project's file index ({file_name, path} records)
    Index {
        /// Write the index to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the dependency report for a root file
    Tree {
        /// Root source file
        root: PathBuf,

        /// Use a saved file index instead of walking the project
        #[arg(long)]
        index: Option<PathBuf>,

        /// Maximum traversal depth
        #[arg(long)]
        depth: Option<usize>,

        /// Naming-convention keyword a dependency path must contain (repeatable)
        #[arg(short, long)]
        keyword: Vec<String>,

        /// Report shape: tree, grouped, flat
        #[arg(long)]
        shape: Option<ReportShape>,

        /// Fuzzy matching scope: off, root, all
        #[arg(long)]
        fuzzy: Option<FuzzyScope>,

        /// Also expand implementations of interface dependencies
        #[arg(long)]
        interfaces: bool,

        /// JSON file mapping file paths to method names
        #[arg(long)]
        methods: Option<PathBuf>,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank indexed files by name similarity to a query
    Similar {
        /// File or class name to match
        query: String,

        /// Use a saved file index instead of walking the project
        #[arg(long)]
        index: Option<PathBuf>,

        /// Minimum similarity score (0-100)
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum number of matches
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List classes implementing an interface
    Implementations {
        /// Interface name, e.g. IOrderBusiness
        interface: String,

        /// Use a saved file index instead of walking the project
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Show the primary class and classified references of one file
    Refs {
        /// Source file
        file: PathBuf,
    },

    /// Print a source file without usings, comments or redundant whitespace
    Condense {
        /// Source file
        file: PathBuf,
    },
}

/// Absolute project root, so indexed paths stay valid wherever they are read.
fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => std::path::absolute(p)
            .with_context(|| format!("failed to resolve project root {}", p.display())),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Index { output } => cmd_index(&project_root, output.as_deref()),
        Commands::Tree {
            root,
            index,
            depth,
            keyword,
            shape,
            fuzzy,
            interfaces,
            methods,
            output,
        } => cmd_tree(
            &project_root,
            &root,
            &TreeArgs {
                index,
                depth,
                keywords: keyword,
                shape,
                fuzzy,
                interfaces,
                methods,
                output,
            },
        ),
        Commands::Similar {
            query,
            index,
            threshold,
            limit,
        } => cmd_similar(&project_root, &query, index.as_deref(), threshold, limit),
        Commands::Implementations { interface, index } => {
            cmd_implementations(&project_root, &interface, index.as_deref())
        }
        Commands::Refs { file } => cmd_refs(&project_root, &file),
        Commands::Condense { file } => cmd_condense(&project_root, &file),
    }
}

/// Relative paths are taken relative to the project root.
fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

/// Walk the project for source files, with a spinner on stderr.
fn scan_files(project_root: &Path, config: &ClassDepsConfig) -> Result<Vec<FileEntry>> {
    let spinner = spinner("Scanning files...")?;
    let files = collect_files(project_root, &ScanOptions::from_config(&config.scan));
    spinner.finish_and_clear();
    files.with_context(|| format!("failed to scan {}", project_root.display()))
}

/// File list from a saved index when given, otherwise from a project walk.
fn load_files(
    project_root: &Path,
    config: &ClassDepsConfig,
    index_file: Option<&Path>,
) -> Result<Vec<FileEntry>> {
    match index_file {
        Some(path) => storage::load_index(&resolve_path(project_root, path)),
        None => scan_files(project_root, config),
    }
}

fn load_name_index(
    project_root: &Path,
    config: &ClassDepsConfig,
    index_file: Option<&Path>,
) -> Result<NameIndex> {
    let files = load_files(project_root, config, index_file)?;
    let spinner = spinner("Resolving class names...")?;
    let index = NameIndex::from_files_in(project_root, files, &RegexScanner);
    spinner.finish_and_clear();
    Ok(index)
}

/// Print JSON to stdout, or write it to `output`.
fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_index(project_root: &Path, output: Option<&Path>) -> Result<()> {
    let config = ClassDepsConfig::load(project_root)?;
    let files = scan_files(project_root, &config)?;

    match output {
        Some(path) => {
            let path = resolve_path(project_root, path);
            storage::save_index(&path, &files)?;
            eprintln!("Indexed {} files", files.len());
            eprintln!("  Saved to: {}", path.display());
        }
        None => {
            let json =
                serde_json::to_string_pretty(&files).context("failed to serialize file index")?;
            println!("{}", json);
        }
    }
    Ok(())
}

struct TreeArgs {
    index: Option<PathBuf>,
    depth: Option<usize>,
    keywords: Vec<String>,
    shape: Option<ReportShape>,
    fuzzy: Option<FuzzyScope>,
    interfaces: bool,
    methods: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn cmd_tree(project_root: &Path, root: &Path, args: &TreeArgs) -> Result<()> {
    let mut config = ClassDepsConfig::load(project_root)?;
    if let Some(depth) = args.depth {
        config.tree.max_depth = depth;
    }
    if !args.keywords.is_empty() {
        config.tree.keywords = args.keywords.clone();
    }
    if let Some(fuzzy) = args.fuzzy {
        config.tree.fuzzy = fuzzy;
    }
    if args.interfaces {
        config.tree.expand_interfaces = true;
    }
    let shape = args.shape.unwrap_or(config.tree.shape);

    let methods = args
        .methods
        .as_deref()
        .map(|path| storage::load_methods(&resolve_path(project_root, path)))
        .transpose()?;

    let index = load_name_index(project_root, &config, args.index.as_deref())?;
    let rule = PathRule::from_config(&config.tree);
    let matcher = NameMatcher::from_config(&config.matching);
    let builder = TreeBuilder::new(
        &index,
        &RegexScanner,
        &rule,
        TreeOptions::from_config(&config.tree),
    )
    .with_matcher(&matcher);

    let root = resolve_path(project_root, root);
    let report = generate_report(&builder, &root, shape, methods.as_ref());

    let output = args
        .output
        .as_deref()
        .map(|path| resolve_path(project_root, path));
    emit(&to_json(&report)?, output.as_deref())
}

fn cmd_similar(
    project_root: &Path,
    query: &str,
    index_file: Option<&Path>,
    threshold: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let mut config = ClassDepsConfig::load(project_root)?;
    if let Some(threshold) = threshold {
        config.matching.threshold = threshold;
    }
    if let Some(limit) = limit {
        config.matching.limit = limit;
    }
    config.validate()?;

    let files = load_files(project_root, &config, index_file)?;
    let matcher = NameMatcher::from_config(&config.matching);
    let matches = matcher.matches_for(query, &files);
    if matches.is_empty() {
        eprintln!(
            "No files scored at least {} against: {}",
            config.matching.threshold, query
        );
    }
    let json = serde_json::to_string_pretty(&matches).context("failed to serialize matches")?;
    println!("{}", json);
    Ok(())
}

fn cmd_implementations(
    project_root: &Path,
    interface: &str,
    index_file: Option<&Path>,
) -> Result<()> {
    let config = ClassDepsConfig::load(project_root)?;
    let index = load_name_index(project_root, &config, index_file)?;

    let mut resolver = ImplementationResolver::new(&index, &RegexScanner);
    let implementations = resolver.find_implementations(interface);
    if implementations.is_empty() {
        eprintln!("No implementations found for: {}", interface);
    }
    let json = serde_json::to_string_pretty(&implementations)
        .context("failed to serialize implementations")?;
    println!("{}", json);
    Ok(())
}

fn cmd_refs(project_root: &Path, file: &Path) -> Result<()> {
    let path = resolve_path(project_root, file);
    let content = read_source(&path)?;
    let scan = RegexScanner.scan(&content);

    let value = serde_json::json!({
        "file": path.display().to_string(),
        "primary_type": scan.primary_type,
        "references": scan.references,
    });
    let json = serde_json::to_string_pretty(&value).context("failed to serialize references")?;
    println!("{}", json);
    Ok(())
}

fn cmd_condense(project_root: &Path, file: &Path) -> Result<()> {
    let path = resolve_path(project_root, file);
    let content = read_source(&path)?;
    println!("{}", condense(&content));
    Ok(())
}
