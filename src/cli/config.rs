use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::extract::extractor::ExtractOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-schema",
    version,
    about = "Extract a normalized field schema from a rendered HTML form"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-schema.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the field schema of a rendered HTML document
    Extract {
        /// Rendered HTML document
        #[arg(long)]
        html: String,

        /// JSON object mapping control id (or name) to a visibility flag
        #[arg(long)]
        visibility: Option<String>,

        /// Output file (default from config, else backend/schema/formSchema.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the schema to stdout instead of writing a file
        #[arg(long, default_value_t = false)]
        stdout: bool,

        /// Append a JSONL trace record to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Validate submitted values against an exported schema
    Validate {
        /// Exported schema JSON
        #[arg(long)]
        schema: String,

        /// JSON object of submitted values keyed by field name
        #[arg(long)]
        values: String,

        /// Only check fields of this step
        #[arg(long)]
        step: Option<u32>,
    },

    /// Print the camelCase identifier for free text
    Normalize {
        /// Text to normalize
        text: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-schema.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_container_tokens")]
    pub container_tokens: Vec<String>,

    #[serde(default = "default_step_one_keywords")]
    pub step_one_keywords: Vec<String>,

    #[serde(default = "default_step_two_keywords")]
    pub step_two_keywords: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            container_tokens: default_container_tokens(),
            step_one_keywords: default_step_one_keywords(),
            step_two_keywords: default_step_two_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,

    pub trace: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            trace: None,
        }
    }
}

pub const DEFAULT_OUTPUT_PATH: &str = "backend/schema/formSchema.json";

// Serde default helpers
fn default_container_tokens() -> Vec<String> { ExtractOptions::default().container_tokens }
fn default_step_one_keywords() -> Vec<String> { ExtractOptions::default().step_one_keywords }
fn default_step_two_keywords() -> Vec<String> { ExtractOptions::default().step_two_keywords }
fn default_output_path() -> String { DEFAULT_OUTPUT_PATH.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-schema.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build ExtractOptions from the config file section.
pub fn build_extract_options(config: &ExtractConfig) -> ExtractOptions {
    ExtractOptions {
        container_tokens: config.container_tokens.clone(),
        step_one_keywords: config.step_one_keywords.clone(),
        step_two_keywords: config.step_two_keywords.clone(),
    }
}

/// CLI value if given, else the config value.
pub fn resolve_output<'a>(cli: Option<&'a str>, config: &'a OutputConfig) -> &'a str {
    cli.unwrap_or(&config.path)
}

/// Map `-v` count to a default tracing filter directive.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
