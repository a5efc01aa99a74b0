//! Groundwork - layered stack configuration for provisioning
//!
//! Inspect merged stack configuration, provider status, and credential
//! resolution from the command line.
//!
//! This is the main entry point for the Groundwork CLI.

mod cli;

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use clap_complete::Shell;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, ConfigCommand, CredentialsArgs, DumpFormat, GetArgs};
use groundwork::coerce::{convert, PrimitiveKind, TypeDescriptor};
use groundwork::config::{ConfigLoader, FileSource, StackConfig};
use groundwork::credentials::{credential_fields, redact_tree, CredentialBag, CredentialSource};
use groundwork::providers::Provider;

/// Starter stack configuration written by `groundwork init`.
const STARTER_STACK: &str = r#"# Groundwork stack configuration
#
# Values here override the built-in defaults. Credentials may be placed in
# a provider block, but environment variables always win (for AWS:
# AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY).

project:
  name: my-stack
  environment: dev

logging:
  level: info
  format: pretty

aws:
  enabled: false
  region: us-west-2

azure:
  enabled: false
  location: eastus

gcp:
  enabled: false
  region: us-central1

openstack:
  enabled: false
  region: RegionOne

kubernetes:
  enabled: false
  context: default
"#;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration (never fails; degrades to defaults). Logging is
    // configured from the merged tree, so the first load runs before any
    // subscriber exists and its warnings go nowhere. Load again once logging
    // is up so a degraded stack file is reported on stderr.
    let loader = ConfigLoader::new(FileSource::discover(&cli.stack));
    init_logging(cli.verbosity(), cli.no_color, &loader.load_config());
    let config = loader.load_config();

    // Display version if verbose
    if cli.verbosity() >= 2 {
        eprintln!("{}", groundwork::version_info());
    }

    // Execute the appropriate command
    let exit_code = match &cli.command {
        Commands::Init(args) => run_init(&cli.stack, args.force)?,
        Commands::Config(ConfigCommand::Dump(args)) => run_config_dump(&config, args.format)?,
        Commands::Config(ConfigCommand::Get(args)) => run_config_get(&config, args)?,
        Commands::Providers => run_providers(&config)?,
        Commands::Credentials(args) => run_credentials(&config, args)?,
        Commands::Completions(args) => run_completions(args.shell)?,
    };

    std::process::exit(exit_code);
}

/// Initialize logging from the verbosity flags and the merged logging section.
///
/// `RUST_LOG` wins when set; `-v` flags override the configured level. Log
/// lines go to stderr so stdout stays clean for `config dump` pipelines.
fn init_logging(verbosity: u8, no_color: bool, config: &StackConfig) {
    let filter = match verbosity {
        0 => config.log_level().to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if config.log_format() == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(verbosity >= 3)
                    .with_ansi(!no_color)
                    .with_writer(io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

/// Write a starter stack configuration file.
fn run_init(stack_path: &Path, force: bool) -> Result<i32> {
    if stack_path.exists() && !force {
        eprintln!(
            "{} {} already exists (pass --force to overwrite)",
            "error:".red().bold(),
            stack_path.display()
        );
        return Ok(1);
    }

    fs::write(stack_path, STARTER_STACK)?;
    println!("{} {}", "Created".green().bold(), stack_path.display());
    Ok(0)
}

/// Print the merged configuration with sensitive values redacted.
fn run_config_dump(config: &StackConfig, format: DumpFormat) -> Result<i32> {
    let redacted = redact_tree(config.tree());
    let rendered = match format {
        DumpFormat::Yaml => serde_yaml::to_string(&redacted)?,
        DumpFormat::Json => serde_json::to_string_pretty(&redacted)?,
    };
    println!("{}", rendered.trim_end());
    Ok(0)
}

/// Look up one value by dotted path, optionally coerced to a primitive.
fn run_config_get(config: &StackConfig, args: &GetArgs) -> Result<i32> {
    let Some(value) = config.get_path(&args.path) else {
        eprintln!(
            "{} no value at path '{}'",
            "error:".red().bold(),
            args.path
        );
        return Ok(2);
    };

    let output = match &args.coerce_to {
        Some(type_name) => {
            let kind: PrimitiveKind = type_name.parse()?;
            let descriptor = TypeDescriptor::Primitive(kind);
            match convert(value, &descriptor) {
                Some(converted) => converted.to_string(),
                None => {
                    eprintln!(
                        "{} value at '{}' cannot be converted to {}",
                        "error:".red().bold(),
                        args.path,
                        descriptor
                    );
                    return Ok(2);
                }
            }
        }
        None => value.to_string(),
    };

    println!("{output}");
    Ok(0)
}

/// Show each provider's enabled status.
fn run_providers(config: &StackConfig) -> Result<i32> {
    println!(
        "Providers for {} ({})",
        config.project_name().bold(),
        config.environment()
    );
    for provider in Provider::ALL {
        let status = if config.provider_enabled(provider) {
            "enabled".green().bold()
        } else {
            "disabled".dimmed()
        };
        println!("  {:<12} {}", provider.display_name(), status);
    }
    Ok(0)
}

/// Show how each credential field of a provider resolved. Field names only,
/// never values.
fn run_credentials(config: &StackConfig, args: &CredentialsArgs) -> Result<i32> {
    let provider: Provider = args.provider.parse()?;
    let bag = CredentialBag::assemble(provider, config);

    println!("Credentials for {}", provider.display_name().bold());
    for field in credential_fields(provider) {
        let status = match bag.source(field.name) {
            Some(CredentialSource::Env) => format!("env ({})", field.env_var).green().to_string(),
            Some(CredentialSource::Config) => "config".cyan().to_string(),
            None if field.required => "missing".red().bold().to_string(),
            None => "not set".dimmed().to_string(),
        };
        println!("  {:<20} {}", field.name, status);
    }

    if let Err(err) = bag.validate() {
        eprintln!("{} {}", "error:".red().bold(), err);
        return Ok(3);
    }
    Ok(0)
}

/// Generate shell completions on stdout.
fn run_completions(shell: Shell) -> Result<i32> {
    cli::generate_completions(shell);
    Ok(0)
}
