//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use colored::Colorize;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "EMPOWER_API_URL";

const PROJECT_FILES: [&str; 2] = ["empower.toml", ".empower.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `EMPOWER_API_URL` (base URL only)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./empower.toml` or `./.empower.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/empower-chat/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Load defaults plus the environment override (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        figment.merge(
            Env::raw()
                .only(&[API_URL_ENV])
                .map(|_| "api.base_url".into()),
        )
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/empower-chat/config.toml if set,
    /// otherwise the platform config directory equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("empower-chat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources() {
        let found = "[FOUND]".green();
        let missing = "[     ]".dimmed();

        println!("Configuration sources (in priority order):");

        if std::env::var_os(API_URL_ENV).is_some() {
            println!("  {} Env:     {}", found, API_URL_ENV);
        } else {
            println!("  {} Env:     {}", missing, API_URL_ENV);
        }

        if let Some(path) = Self::project_config_path() {
            println!("  {} Project: {}", found, path.display());
        } else {
            println!("  {} Project: ./empower.toml or ./.empower.toml", missing);
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { &found } else { &missing };
            println!("  {} Global:  {}", marker, path.display());
        }

        println!("  {} Default: built-in defaults", missing);
    }
}
