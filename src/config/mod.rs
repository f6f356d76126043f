pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::AttachmentMode;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub use toml_config::PreviewConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ModeArg {
    Map,
    Legend,
}

#[cfg(feature = "cli")]
impl From<ModeArg> for AttachmentMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Map => AttachmentMode::Map,
            ModeArg::Legend => AttachmentMode::LegendGraphic,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "wms-preview")]
#[command(about = "List and attach map or legend URLs from a WMS GetCapabilities document")]
pub struct CliConfig {
    /// WMS GetCapabilities URL
    pub url: String,

    #[arg(long, value_enum, default_value = "map")]
    pub mode: ModeArg,

    /// Attach the choice at this (0-based) index instead of listing all choices
    #[arg(long)]
    pub select: Option<usize>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override http.timeout_seconds from the config
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Allow plain http:// capabilities URLs
    #[arg(long)]
    pub allow_insecure: bool,

    /// Print choices and attachments as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines instead of the compact format
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies command-line overrides on top of a loaded (or default) config.
    pub fn apply_overrides(&self, config: &mut PreviewConfig) {
        if let Some(timeout) = self.timeout_seconds {
            config.http.timeout_seconds = Some(timeout);
        }
        if self.allow_insecure {
            config.http.require_https = Some(false);
        }
    }
}
