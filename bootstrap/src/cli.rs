//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Cache bootstrap - establish the cache connection and exercise it
#[derive(Parser, Debug)]
#[command(name = "cache-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Environment profile, `dev` or `prod` (default: read ENV_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Connection attempts before giving up (overrides REDIS_MAX_RETRIES)
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Prefix added to every key
    #[arg(long, global = true, env = "CACHE_NAMESPACE")]
    pub namespace: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Establish the connection and report the handle state
    Check(CheckArgs),

    /// Read a JSON value
    Get(KeyArgs),

    /// Write a value (JSON, or a plain string if it does not parse)
    Set(SetArgs),

    /// Delete a key
    Del(KeyArgs),

    /// Write, read back and delete a test record
    Selftest,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for commands addressing one key
#[derive(Parser, Debug)]
pub struct KeyArgs {
    pub key: String,
}

/// Arguments for the set command
#[derive(Parser, Debug)]
pub struct SetArgs {
    pub key: String,

    pub value: String,

    /// Expiry in seconds
    #[arg(long)]
    pub ttl: Option<u64>,
}
