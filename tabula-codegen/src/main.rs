//! CLI entry point for tabula

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabula_codegen::config::CodegenConfig;
use tabula_codegen::schema::{Schema, Subject};
use tabula_codegen::seed::{preprocess, RawSeedInput};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Generate TypeScript declarations and ordered seed data from relational schema metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to schema file, JSON model or SQL DDL (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript declarations
    Generate,
    /// Inspect schema (show parsed entities for debugging)
    Inspect,
    /// Order and resolve seed data, printing the result as JSON
    Seed {
        /// Raw seed input (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = match &cli.config {
        Some(config_path) => CodegenConfig::from_file(config_path)?,
        None => CodegenConfig::load(None)?,
    };

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        match &cli.command {
            Some(Commands::Inspect) => inspect_schema(&config).await,
            Some(Commands::Seed { input }) => seed(&config, input).await,
            Some(Commands::Generate) | None => generate(&config).await,
        }
    })
}

async fn generate(config: &CodegenConfig) -> Result<()> {
    info!("Generating code from schema: {:?}", config.schema_file);

    let rendered = tabula_codegen::generate(config).await?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
        for path in rendered.paths() {
            println!("  {}", config.output_dir.join(path).display());
        }
        return Ok(());
    }

    info!("Code generation completed successfully");
    Ok(())
}

async fn seed(config: &CodegenConfig, input: &Path) -> Result<()> {
    let schemas = tabula_codegen::load_schemas(config).await?;
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read seed input {}", input.display()))?;
    let raw: RawSeedInput = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse seed input {}", input.display()))?;

    let seed = preprocess(&raw, &schemas)?;
    println!("{}", serde_json::to_string_pretty(&seed)?);
    Ok(())
}

async fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let schemas = tabula_codegen::load_schemas(config).await?;
    let filter = config.entity_filter();

    for schema in &schemas {
        println!("Schema: {}\n", schema.name);
        for subject in schema.subjects() {
            if filter.as_ref().is_some_and(|accepts| !accepts(&subject)) {
                continue;
            }
            print_subject(schema, subject);
        }
    }

    Ok(())
}

fn print_subject(schema: &Schema, subject: Subject<'_>) {
    println!("{}", subject);
    match subject {
        Subject::Entity(entity) => {
            println!("  Columns:");
            for col in &entity.columns {
                let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
                let array = if col.is_array { "[]" } else { "" };
                let generated = if col.generated { " GENERATED" } else { "" };
                println!(
                    "    - {} {}{} {}{}",
                    col.name, col.type_name, array, nullable, generated
                );
                if let Some(default_value) = &col.default_value {
                    println!("      DEFAULT {}", default_value);
                }
                for index in &col.indices {
                    let primary = if index.is_primary { "PRIMARY " } else { "" };
                    println!("      {}INDEX {}", primary, index.name);
                }
                for reference in &col.references {
                    println!(
                        "      -> {}.{}.{}",
                        reference.schema_or(&schema.name),
                        reference.table,
                        reference.column
                    );
                }
            }
        }
        Subject::Enum(enum_type) => {
            println!("  Values: {:?}", enum_type.values);
        }
        Subject::Domain(domain) => {
            println!("  Base type: {}", domain.base_type);
        }
    }
    println!();
}
