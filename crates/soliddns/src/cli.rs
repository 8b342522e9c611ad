//! Clap derive structures for the `soliddns` CLI.
//!
//! Defines the command tree, global flags, and shared types. Compiled into
//! `build.rs` as well, so it depends on clap and std only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// soliddns -- reconcile DNS records and IPv6 aliases on SOLIDserver
#[derive(Debug, Parser)]
#[command(
    name = "soliddns",
    version,
    about = "Manage SOLIDserver DNS records and IPv6 aliases from the command line",
    long_about = "Create, read, update and delete SOLIDserver objects through the\n\
        appliance REST API. Human-readable names (IP spaces, addresses) are\n\
        resolved to appliance ids on every call.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "SOLIDDNS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance URL (overrides profile)
    #[arg(long, short = 'a', env = "SOLIDDNS_APPLIANCE", global = true)]
    pub appliance: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', env = "SOLIDDNS_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SOLIDDNS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SOLIDDNS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SOLIDDNS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an object on the appliance
    #[command(alias = "add")]
    Create(ResourceArgs),

    /// Read an object back from the appliance
    #[command(alias = "get")]
    Read(ResourceArgs),

    /// Change the mutable fields of an object
    Update(ResourceArgs),

    /// Delete an object from the appliance
    #[command(alias = "rm")]
    Delete(ResourceArgs),

    /// List the supported resource types and their fields
    Resources,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resource Arguments ───────────────────────────────────────────────

/// Arguments shared by every lifecycle command.
#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource type (e.g. dns-rr, ip6-alias, solidserver_dns_rr)
    pub resource: String,

    /// Appliance identifier of an existing object
    #[arg(long)]
    pub id: Option<String>,

    /// Field value, repeatable (e.g. -f name=www.example.com)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Read fields from a JSON object file (flags override file values)
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

/// Parse a `key=value` pair.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (passwords redacted)
    Show,

    /// List configured profiles
    Profiles,

    /// Add or replace a profile from --appliance and --username
    SetProfile {
        /// Profile name
        name: String,

        /// Path to a PEM CA certificate
        #[arg(long)]
        ca_cert: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
