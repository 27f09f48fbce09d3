//! Ecore Toolkit CLI
//!
//! Loads `.ecore` documents, resolves them together and generates Rust code,
//! lints the result, or dumps the resolved model as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ecore_schemas::loader;
use ecore_schemas::{generate_rust, ElementId, Model, ModelLinter, ToolkitConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecore-gen")]
#[command(about = "Resolve Ecore models and generate Rust code")]
#[command(version)]
struct Cli {
    /// Explicit configuration file (in addition to ecore.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust code for every loaded root package
    Generate {
        /// `.ecore` file or directory of documents
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only generate the root package with this name
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Lint the loaded packages
    Check {
        /// `.ecore` file or directory of documents
        input: PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Dump the resolved model as JSON
    Dump {
        /// `.ecore` file or directory of documents
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Load a file or a directory and resolve every root
fn load(input: &Path, config: &ToolkitConfig) -> Result<(Model, Vec<ElementId>)> {
    if input.is_dir() {
        return loader::load_and_resolve(input, &config.loader, &config.parser)
            .with_context(|| format!("failed to load {}", input.display()));
    }
    let mut model = Model::new();
    let root = loader::load_file(&mut model, input, &config.parser)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    loader::resolve_all(&mut model, &[root])
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    Ok((model, vec![root]))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✅ Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = ToolkitConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            package,
        } => {
            let (model, roots) = load(&input, &config)?;
            let selected: Vec<ElementId> = match &package {
                Some(name) => roots.into_iter().filter(|&r| model.name(r) == name).collect(),
                None => roots,
            };
            if selected.is_empty() {
                bail!("no root package named '{}'", package.unwrap_or_default());
            }

            let mut code = String::new();
            let mut type_count = 0;
            for root in selected {
                let generated = generate_rust(&model, root, &config.codegen)
                    .with_context(|| format!("failed to generate {}", model.name(root)))?;
                code.push_str(&generated.code);
                code.push('\n');
                type_count += generated.type_count;
            }
            eprintln!("📦 Generated {} types", type_count);
            write_output(output.as_deref(), &code)
        }

        Commands::Check { input, strict } => {
            let (model, roots) = load(&input, &config)?;
            let mut linter = ModelLinter::new();
            let mut errors = 0;
            let mut warnings = 0;

            for root in roots {
                let result = linter.lint(&model, root)?;
                for error in &result.errors {
                    println!("❌ [{}] {}: {}", error.code, error.path, error.message);
                }
                for warning in &result.warnings {
                    warn!(code = warning.code, path = %warning.path, "{}", warning.message);
                    println!("⚠️  [{}] {}: {}", warning.code, warning.path, warning.message);
                }
                if result.is_clean() && !result.has_warnings() {
                    println!("✅ {} - clean", result.package);
                }
                errors += result.errors.len();
                warnings += result.warnings.len();
            }

            if errors > 0 || (strict && warnings > 0) {
                bail!("{} error(s), {} warning(s)", errors, warnings);
            }
            Ok(())
        }

        Commands::Dump { input, output } => {
            let (model, _) = load(&input, &config)?;
            let json = serde_json::to_string_pretty(&model).context("failed to serialize model")?;
            write_output(output.as_deref(), &json)
        }
    }
}
