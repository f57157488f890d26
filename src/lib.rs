pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{AppConfig, Credentials};
pub use core::{
    assistant::Assistant, classify::ClassificationPipeline, objectives::ObjectivePipeline,
};
pub use utils::error::{AssistError, Result};
