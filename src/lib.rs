pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::HttpProductApi;
pub use config::{cli::LocalStorage, CliConfig};
pub use crate::core::session::{ImportSession, ImportState};
pub use utils::error::{PipelineError, Result};
