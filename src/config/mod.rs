pub mod cli;
pub mod file_config;

use crate::domain::model::{FileFormat, ImportMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use file_config::FileConfig;

const DEFAULT_API_BASE: &str = "http://localhost:3000";
const DEFAULT_OUTPUT_PATH: &str = "./output";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-import")]
#[command(about = "Import and export product catalogs through the admin API")]
pub struct CliConfig {
    /// Base URL of the admin API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Directory for downloaded export files
    #[arg(long)]
    pub output_path: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import products from a JSON or CSV file
    Import {
        /// Input file (.json or .csv)
        file: String,

        #[arg(long, value_enum, default_value_t = ImportMode::Upsert)]
        mode: ImportMode,

        /// Parse and preview only, do not submit
        #[arg(long)]
        dry_run: bool,
    },
    /// Download a server-rendered product export
    Export {
        #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
        format: FileFormat,

        /// Restrict the export to one category id
        #[arg(long)]
        category: Option<String>,
    },
    /// Download an import template file
    Template {
        #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
        format: FileFormat,
    },
}

impl CliConfig {
    /// Fill unset values from the config file (when given) and then
    /// from built-in defaults. Explicit flags always win.
    pub fn load(mut self) -> Result<Self> {
        let file = match &self.config {
            Some(path) => Some(FileConfig::from_file(path)?),
            None => None,
        };

        if self.api_base.is_none() {
            self.api_base = file.as_ref().and_then(|f| f.api.base_url.clone());
        }
        if self.output_path.is_none() {
            self.output_path = file.as_ref().and_then(|f| f.export.output_path.clone());
        }
        if self.request_timeout_secs.is_none() {
            self.request_timeout_secs = file.as_ref().and_then(|f| f.api.timeout_seconds);
        }

        Ok(self)
    }
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", self.api_base())?;
        validate_path("output_path", self.output_path())?;
        validate_positive_number(
            "request_timeout_secs",
            self.request_timeout_secs() as usize,
            1,
        )?;

        if let Command::Import { file, .. } = &self.command {
            validate_file_extensions("file", std::slice::from_ref(file), &["csv", "json"])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(command: Command) -> CliConfig {
        CliConfig {
            api_base: None,
            output_path: None,
            request_timeout_secs: None,
            config: None,
            verbose: false,
            command,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = config_with(Command::Template {
            format: FileFormat::Csv,
        });

        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.request_timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn import_command_rejects_unsupported_input_files() {
        let config = config_with(Command::Import {
            file: "products.xlsx".to_string(),
            mode: ImportMode::Upsert,
            dry_run: false,
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        let mut config = config_with(Command::Export {
            format: FileFormat::Json,
            category: None,
        });
        config.api_base = Some("not a url".to_string());

        assert!(config.validate().is_err());
    }
}
