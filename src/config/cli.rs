use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::toml_config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Clone, Parser)]
#[command(name = "objective-assist")]
#[command(about = "Trademark class suggestions and company objective drafting backed by hosted AI APIs")]
#[command(version)]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Suggest the best trademark class for an objective
    Classify {
        /// Objective text; reads stdin when omitted or "-"
        objective: Option<String>,
    },

    /// Draft company objectives from "<NIC code> - <description>" lines
    Objectives {
        /// File with one entry per line; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also write the generated text to this file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the web forms
    Serve {
        /// Override server.bind from the config file
        #[arg(long)]
        bind: Option<String>,
    },
}
