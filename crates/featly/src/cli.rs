//! Clap derive structures for the `featly` CLI.
//!
//! Kept free of workspace crate types so `build.rs` can include it
//! directly for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// featly -- browse and edit a feature items collection
#[derive(Debug, Parser)]
#[command(
    name = "featly",
    version,
    about = "Manage feature items from the command line",
    long_about = "List, inspect, create, update, and delete feature items\n\
        served by a /api/features REST endpoint.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "FEATLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "FEATLY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API key sent as X-API-KEY
    #[arg(long, env = "FEATLY_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "FEATLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

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
    #[arg(long, short = 'k', env = "FEATLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FEATLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, and edit feature items
    #[command(alias = "i")]
    Items(ItemsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Items ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ItemsArgs {
    #[command(subcommand)]
    pub command: ItemsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List one page of items
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single item
    Get {
        /// Item id
        id: String,
    },

    /// Create an item
    Create(FormArgs),

    /// Replace an item's title and description
    Update {
        /// Item id
        id: String,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item id
        id: String,
    },
}

/// Search, sort, and pagination for `items list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text to match in title or description
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Field to sort by
    #[arg(long)]
    pub sort_by: Option<SortField>,

    /// Sort direction
    #[arg(long, short = 'd')]
    pub direction: Option<Direction>,

    /// Page number (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortField {
    CreatedAt,
    Title,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
}

/// Item fields for create and update.
#[derive(Debug, Args)]
pub struct FormArgs {
    /// Item title
    #[arg(long, short = 't', conflicts_with = "from_file")]
    pub title: Option<String>,

    /// Item description
    #[arg(long, conflicts_with = "from_file")]
    pub description: Option<String>,

    /// Read `{ "title", "description" }` from a JSON file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the effective configuration (secrets masked)
    Show,

    /// Add or replace a profile
    SetProfile {
        /// Profile name
        name: String,

        /// API base URL
        #[arg(long = "url")]
        url: String,

        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,

        /// Page size for list requests
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: Option<u32>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
