//! API Description Analyzer CLI
//!
//! Command-line interface for analyzing API description documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use apispec_analyzer::{
    load_config, load_context, load_document_auto, AnalysisContext, AnalysisModel, Analyzer,
    AnalyzerConfig, Root,
};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "apispec-analyzer")]
#[command(about = "Analyze API description documents into a capability model")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document and print the model as JSON
    Analyze {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Analyzer settings (JSON); omitted fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Context snapshot file (JSON with environment and roots)
        #[arg(long)]
        context: Option<PathBuf>,

        /// Runtime environment (e.g. production)
        #[arg(long)]
        environment: Option<String>,

        /// Workspace root as NAME or NAME=URI (repeatable)
        #[arg(long = "root")]
        roots: Vec<String>,
    },

    /// Print a human-readable summary of the analysis
    Summary {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Analyzer settings (JSON); omitted fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            source,
            output,
            pretty,
            config,
            context,
            environment,
            roots,
        } => run_analyze(AnalyzeArgs {
            source,
            output,
            pretty,
            config,
            context,
            environment,
            roots,
        }),

        Commands::Summary { source, config } => run_summary(&source, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Logs go to stderr so JSON on stdout stays clean.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct AnalyzeArgs {
    source: String,
    output: Option<PathBuf>,
    pretty: bool,
    config: Option<PathBuf>,
    context: Option<PathBuf>,
    environment: Option<String>,
    roots: Vec<String>,
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), u8> {
    let AnalyzeArgs {
        source,
        output,
        pretty,
        config,
        context,
        environment,
        roots,
    } = args;

    let analyzer = build_analyzer(config.as_deref())?;
    let document = load_document_auto(&source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let mut snapshot = match &context {
        Some(path) => load_context(path).map_err(|e| {
            eprintln!("Error loading context: {}", e);
            e.exit_code() as u8
        })?,
        None => AnalysisContext::default(),
    };
    // Flags take precedence over the snapshot file
    if environment.is_some() {
        snapshot.environment = environment;
    }
    snapshot.roots.extend(roots.iter().map(|r| parse_root(r)));

    let model = if context.is_some() || snapshot != AnalysisContext::default() {
        analyzer.analyze_with_context(&document, &snapshot)
    } else {
        analyzer.analyze(&document)
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&model)
    } else {
        serde_json::to_string(&model)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_summary(source: &str, config: Option<&Path>) -> Result<(), u8> {
    let analyzer = build_analyzer(config)?;
    let document = load_document_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    let model = analyzer.analyze(&document).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    print_summary(&model);
    Ok(())
}

fn build_analyzer(config: Option<&Path>) -> Result<Analyzer, u8> {
    let config = match config {
        Some(path) => load_config(path).map_err(|e| {
            eprintln!("Error loading config: {}", e);
            e.exit_code() as u8
        })?,
        None => AnalyzerConfig::default(),
    };
    Ok(Analyzer::new(config))
}

/// `NAME` or `NAME=URI`.
fn parse_root(arg: &str) -> Root {
    match arg.split_once('=') {
        Some((name, uri)) => Root {
            uri: uri.to_string(),
            name: Some(name.to_string()),
        },
        None => Root {
            uri: arg.to_string(),
            name: Some(arg.to_string()),
        },
    }
}

fn print_summary(model: &AnalysisModel) {
    let actions = model.endpoints.iter().filter(|e| e.is_action).count();
    let readable = model.endpoints.iter().filter(|e| e.is_resource).count();
    let core = model.resources.iter().filter(|r| r.is_core).count();
    let recoverable = model.error_patterns.iter().filter(|p| p.recoverable).count();

    println!(
        "Endpoints:      {} ({} actions, {} resources)",
        model.endpoints.len(),
        actions,
        readable
    );
    println!("Resources:      {} ({} core)", model.resources.len(), core);
    println!("Relationships:  {}", model.relationships.len());
    println!("Workflows:      {}", model.workflows.len());
    for workflow in &model.workflows {
        println!(
            "  - {} ({}, {} steps)",
            workflow.name,
            workflow.workflow_type.as_str(),
            workflow.steps.len()
        );
    }
    println!(
        "Error patterns: {} ({} recoverable)",
        model.error_patterns.len(),
        recoverable
    );

    let caps = &model.capabilities;
    println!("\nCapabilities:");
    print_flag("pagination", caps.has_pagination);
    print_flag("batch operations", caps.has_batch_operations);
    print_flag("webhooks", caps.has_webhooks);
    print_flag("async operations", caps.has_async_operations);
    print_flag("authentication", caps.has_authentication);
    print_flag("rate limiting", caps.has_rate_limiting);

    let features = &model.features;
    println!("\nFeatures:");
    print_flag("tools", features.has_tools);
    print_flag("resources", features.has_resources);
    print_flag("prompts", features.has_prompts);
    print_flag("sampling", features.requires_sampling);
    print_flag("context management", features.requires_context_management);
    print_flag("error intelligence", features.requires_error_intelligence);
}

fn print_flag(name: &str, value: bool) {
    println!("  {:<20}{}", name, if value { "yes" } else { "no" });
}
