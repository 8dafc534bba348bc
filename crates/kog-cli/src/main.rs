use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use kog_core::config::{self, CONFIG_FILE_NAME, KogConfig};
use kog_core::ir::{ApiSpec, Model};
use kog_core::parse::{self, document::Document};
use kog_core::transform::{self, TransformOptions};
use kog_core::{CodeGenerator, GeneratedFile};
use kog_kotlin::KotlinGenerator;

#[derive(Parser)]
#[command(name = "kog", about = "OpenAPI 3.x to Kotlin client generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Kotlin client from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the sources are written under
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Kotlin package of the generated client
        #[arg(long)]
        package: Option<String>,

        /// Name of the aggregator interface
        #[arg(long)]
        root_name: Option<String>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the resolved models and route groups of an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new kog configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            package,
            root_name,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if let Some(input) = input {
                cfg.input = input.display().to_string();
            }
            if let Some(output) = output {
                cfg.output = output.display().to_string();
            }
            if let Some(package) = package {
                cfg.package_name = package;
            }
            if let Some(root_name) = root_name {
                cfg.root_name = root_name;
            }
            cmd_generate(&cfg)
        }

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "kog", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<KogConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Parse a spec file, choosing JSON or YAML by extension.
fn read_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(parsed)
}

fn load_spec(path: &Path, cfg: &KogConfig) -> Result<ApiSpec> {
    let parsed = read_document(path)?;
    let options = TransformOptions::from(&cfg.naming);
    let api = transform::transform_with_options(&parsed, &options)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(api)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Lower a resolved spec into Kotlin sources without touching the disk.
fn render(api: &ApiSpec, cfg: &KogConfig, input: &Path) -> Result<Vec<GeneratedFile>> {
    KotlinGenerator
        .generate(api, &cfg.target())
        .with_context(|| format!("failed to generate a client for {}", input.display()))
}

/// Run the whole pipeline, then write. Nothing touches the disk if any step fails.
fn generate(cfg: &KogConfig) -> Result<Vec<GeneratedFile>> {
    let input = Path::new(&cfg.input);
    let api = load_spec(input, cfg)?;
    let files = render(&api, cfg, input)?;
    write_files(Path::new(&cfg.output), &files)?;
    Ok(files)
}

fn cmd_generate(cfg: &KogConfig) -> Result<()> {
    eprintln!("Generating {} → {}", cfg.input, cfg.output);
    let files = generate(cfg)?;
    eprintln!(
        "Generated {} files in package {} under {}",
        files.len(),
        cfg.package_name,
        cfg.output
    );
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    validate(input, &cfg)
}

/// Resolve and lower the spec with the project's naming options, writing nothing.
fn validate(input: &Path, cfg: &KogConfig) -> Result<()> {
    let parsed = read_document(input)?;

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());
    eprintln!("  Schemas: {}", parsed.components.schemas.len());

    let options = TransformOptions::from(&cfg.naming);
    let api = transform::transform_with_options(&parsed, &options)
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    eprintln!("  Models: {}", api.registry.len());
    eprintln!("  Groups: {}", api.groups.len());

    // Some constructs only fail once routes are lowered.
    let files = render(&api, cfg, input)?;
    eprintln!("  Files: {}", files.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let api = load_spec(input, &cfg)?;

    let summary = build_inspect_summary(&api);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(api: &ApiSpec) -> serde_json::Value {
    let models: Vec<serde_json::Value> = api
        .all_models()
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.context.flatten(),
                "kind": match &m.model {
                    Model::Primitive { .. } | Model::FreeFormJson | Model::OctetStream
                    | Model::Collection { .. } => "alias",
                    Model::Object(_) => "object",
                    Model::Enum(e) if e.is_open() => "open_enum",
                    Model::Enum(_) => "enum",
                    Model::Union(_) => "union",
                    Model::Reference { .. } => "reference",
                },
            })
        })
        .collect();

    let groups: Vec<serde_json::Value> = api
        .groups
        .iter()
        .flat_map(|g| g.flatten_groups())
        .map(|g| {
            let routes: Vec<serde_json::Value> = g
                .routes
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.function_name,
                        "method": r.method.as_str(),
                        "path": r.path,
                    })
                })
                .collect();
            serde_json::json!({ "name": g.flat_name(), "routes": routes })
        })
        .collect();

    serde_json::json!({
        "info": api.info,
        "models": models,
        "groups": groups,
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
