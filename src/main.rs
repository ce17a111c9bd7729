//! openchj: Command-line interface for OpenCHJ corpus annotation

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use openchj::annotator::Annotator;
use openchj::batch::{annotate_file, read_text_file, write_text_file, BatchOutcome, BatchRunner};
use openchj::config::{path_resolver, AppConfig, ConfigOverrides};
use openchj::output::OutputFormat;
use openchj::tokenizer::open_session;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Path Resolution Helper
// ============================================================================

/// Resolve a path using the path_resolver module
fn resolve_path(path: &str) -> PathBuf {
    path_resolver::resolve_path(path).unwrap_or_else(|_| PathBuf::from(path))
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// openchj: morphological annotation in the OpenCHJ corpus format
#[derive(Parser)]
#[command(name = "openchj")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: $XDG_CONFIG_HOME/openchj/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize openchj configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Annotate a single text file
    Analyze {
        /// Input text file
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: tsv, csv, or json
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Subcorpus name written in every row
        #[arg(short, long)]
        subcorpus: Option<String>,

        /// User dictionary (Lindera CSV or .bin)
        #[arg(short, long)]
        user_dict: Option<String>,
    },
    /// Annotate every .txt file in a folder
    Batch {
        /// Input folder
        input: String,

        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Base output directory (default: config, then Downloads)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: tsv, csv, or json
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Subcorpus name written in every row
        #[arg(short, long)]
        subcorpus: Option<String>,

        /// User dictionary (Lindera CSV or .bin)
        #[arg(short, long)]
        user_dict: Option<String>,
    },
    /// Show the formatted text and the special tags found in a file
    Preview {
        /// Input text file
        input: String,
    },
}

/// Config file, then environment, then command-line flags
fn load_config(path: Option<&str>, cli: &ConfigOverrides) -> Result<AppConfig> {
    let file_config = match path {
        Some(p) => AppConfig::load(Some(&resolve_path(p)))?,
        None => AppConfig::load(None)?,
    };
    Ok(file_config
        .with_overrides(&ConfigOverrides::from_env())
        .with_overrides(cli))
}

fn cli_overrides(
    format: Option<OutputFormat>,
    subcorpus: Option<String>,
    user_dictionary: Option<String>,
) -> ConfigOverrides {
    ConfigOverrides {
        output_format: format,
        subcorpus_name: subcorpus,
        user_dictionary_path: user_dictionary,
        ..ConfigOverrides::default()
    }
}

fn run_init(force: bool) -> Result<()> {
    let config_dir = path_resolver::get_config_dir();
    let config_path = config_dir.join("config.toml");

    eprintln!("Initializing openchj configuration...");
    eprintln!("Config directory: {}", config_dir.display());

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        eprintln!("Created config directory");
    }

    if config_path.exists() && !force {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite");
        return Ok(());
    }

    let toml_content = AppConfig::default().to_toml()?;
    std::fs::write(&config_path, &toml_content)?;

    eprintln!("Created configuration file: {}", config_path.display());
    eprintln!("\nConfiguration initialized successfully!");
    eprintln!("Edit {} to customize settings.", config_path.display());
    Ok(())
}

fn run_analyze(config: &AppConfig, input: &str, output: Option<String>) -> Result<()> {
    let input_path = resolve_path(input);
    let tokenizer = open_session(&config.session_options())?;
    let annotator = Annotator::from_config(config);

    let content = annotate_file(
        &tokenizer,
        &annotator,
        &input_path,
        config.subcorpus_name(),
        config.output().format,
    )
    .with_context(|| format!("Failed to annotate {}", input_path.display()))?;

    match output {
        Some(out) => {
            let out_path = resolve_path(&out);
            write_text_file(&content, &out_path)?;
            eprintln!("Wrote {}", out_path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn run_batch(config: &AppConfig, input: &str, output: Option<String>) -> Result<()> {
    let input_dir = resolve_path(input);
    if !input_dir.is_dir() {
        return Err(anyhow!("Input folder not found: {}", input_dir.display()));
    }

    let output_base = match output.or_else(|| config.output().output_directory.clone()) {
        Some(dir) => resolve_path(&dir),
        None => path_resolver::get_default_output_dir(),
    };

    let tokenizer = open_session(&config.session_options())?;
    let annotator = Annotator::from_config(config);
    let runner = BatchRunner::new(&tokenizer, &annotator, config);

    eprintln!("Annotating files in {}", input_dir.display());
    let report = runner.run_directory(&input_dir, &output_base, |step, total, name| {
        eprintln!("[{}/{}] {}", step, total, name);
    })?;

    for item in &report.items {
        match &item.outcome {
            BatchOutcome::Written(path) => println!("OK    {}", path.display()),
            BatchOutcome::Failed(reason) => {
                println!("FAIL  {}: {}", item.input.display(), reason)
            }
        }
    }

    eprintln!(
        "\nBatch complete: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(())
}

fn run_preview(config: &AppConfig, input: &str) -> Result<()> {
    let input_path = resolve_path(input);
    let text = read_text_file(&input_path)?;
    let preview = Annotator::from_config(config).preview(&text);

    println!("{}", preview.formatted_text);
    if !preview.tags.is_empty() {
        println!("\nSpecial tags ({}):", preview.tags.len());
        for tag in &preview.tags {
            println!(
                "  [{}-{}] {} -> {} ({})",
                tag.char_start, tag.char_end, tag.original_tag_text, tag.surface_form, tag.pos
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr so stdout carries only results)
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Init { force } => run_init(force),
        Commands::Analyze {
            input,
            output,
            format,
            subcorpus,
            user_dict,
        } => {
            let overrides = cli_overrides(format, subcorpus, user_dict);
            let config = load_config(cli.config.as_deref(), &overrides)?;
            config.validate()?;
            run_analyze(&config, &input, output)
        }
        Commands::Batch {
            input,
            recursive,
            output,
            format,
            subcorpus,
            user_dict,
        } => {
            let mut overrides = cli_overrides(format, subcorpus, user_dict);
            if recursive {
                overrides.include_subfolders = Some(true);
            }
            let config = load_config(cli.config.as_deref(), &overrides)?;
            config.validate()?;
            run_batch(&config, &input, output)
        }
        Commands::Preview { input } => {
            let config = load_config(cli.config.as_deref(), &ConfigOverrides::default())?;
            config.validate()?;
            run_preview(&config, &input)
        }
    }
}
