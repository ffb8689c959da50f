//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for empower-chat
#[derive(Parser, Debug)]
#[command(name = "empower-chat")]
#[command(author, version, about = "Terminal chat client for the Empower knowledge-base assistant")]
#[command(long_about = r#"
Empower Chat opens a terminal chat session with the knowledge-base assistant.
Every turn sends the whole conversation to POST {base_url}/chat; rating the
session with Ctrl+F sends it to POST {base_url}/review and starts over.

The session lives in memory only and starts empty on every launch.

Configuration files are loaded from (in priority order):
1. EMPOWER_API_URL     Environment override for the base URL
2. --config <path>     Explicit config file
3. ./empower.toml      Project-level config
4. ~/.config/empower-chat/config.toml   Global config

Example:
  empower-chat
  EMPOWER_API_URL=https://chat.example.edu/api empower-chat
  empower-chat --no-timeout -vv
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Wait for replies indefinitely instead of timing out
    #[arg(long)]
    pub no_timeout: bool,

    /// Write diagnostic logs to this file instead of the data directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
