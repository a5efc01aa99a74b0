//! CLI module for Groundwork
//!
//! Argument parsing for the `groundwork` binary: global stack-file and
//! verbosity options plus the inspection subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Groundwork - layered stack configuration for provisioning
///
/// Inspect the merged configuration, provider status, and credential
/// resolution for a stack.
#[derive(Parser, Debug, Clone)]
#[command(name = "groundwork")]
#[command(author = "Groundwork Contributors")]
#[command(version = groundwork::version())]
#[command(about = "Layered stack configuration for provisioning", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the stack configuration file
    #[arg(
        short = 's',
        long,
        global = true,
        default_value = "stack.yaml",
        env = "GROUNDWORK_STACK"
    )]
    pub stack: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter stack configuration file
    Init(InitArgs),

    /// Inspect the merged configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show per-provider enabled status
    Providers,

    /// Show credential resolution for a provider (names only, never values)
    Credentials(CredentialsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Configuration inspection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the merged configuration with secrets redacted
    Dump(DumpArgs),

    /// Look up a single value by dotted path
    Get(GetArgs),
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing stack file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config dump
#[derive(Parser, Debug, Clone)]
pub struct DumpArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = DumpFormat::Yaml)]
    pub format: DumpFormat,
}

/// Arguments for config get
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Dotted path into the merged tree, e.g. aws.region
    pub path: String,

    /// Coerce the value to a primitive type before printing
    #[arg(long = "as", value_name = "TYPE")]
    pub coerce_to: Option<String>,
}

/// Arguments for the credentials command
#[derive(Parser, Debug, Clone)]
pub struct CredentialsArgs {
    /// Provider to resolve credentials for
    pub provider: String,
}

/// Arguments for the completions command
#[derive(Parser, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for config dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// YAML output
    Yaml,
    /// JSON output for scripting
    Json,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}

/// Generate shell completions and write to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "groundwork", &mut io::stdout());
}

/// Get completions as a string
#[cfg(test)]
fn get_completions(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "groundwork", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}
