use clap::Parser;
use objective_assist::config::load_dotenv;
use objective_assist::utils::logger::{self, LogFormat};
use objective_assist::utils::validation::Validate;
use objective_assist::{server, AppConfig, AssistError, Assistant, CliConfig, Command, Credentials};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let dotenv_path = load_dotenv();
    let cli = CliConfig::parse();

    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML or remove it to use the defaults");
            std::process::exit(1);
        }
    };

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        config.logging.log_format()
    };
    logger::init_logger(cli.verbose, &config.logging.level, format);

    tracing::debug!("CLI arguments: {:?}", cli);
    match &dotenv_path {
        Some(path) => tracing::debug!("Loaded environment from {}", path.display()),
        None => tracing::debug!("No .env file found, using the process environment"),
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let credentials = Credentials::from_env(&config);
    let assistant = match Assistant::new(&config, credentials) {
        Ok(assistant) => Arc::new(assistant),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(cli.command, &config, assistant).await {
        tracing::error!("Command failed ({:?}): {}", e.category(), e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Command, config: &AppConfig, assistant: Arc<Assistant>) -> Result<(), AssistError> {
    match command {
        Command::Classify { objective } => {
            let objective = match objective {
                Some(text) if text != "-" => text,
                _ => read_stdin()?,
            };

            let answer = assistant.classifier().run(&objective).await?;
            println!("{}", answer);
        }
        Command::Objectives { input, output } => {
            let entries = match input {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_stdin()?,
            };

            let writer = assistant.objectives();
            let outcome = writer.run(&entries).await?;
            for skipped in &outcome.skipped {
                eprintln!(
                    "⚠️  Skipped line {}: {} ({})",
                    skipped.line_number, skipped.text, skipped.reason
                );
            }
            println!("{}", outcome.text);

            if let Some(path) = output {
                let path = download_path(&path, writer.download_filename());
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, &outcome.text)?;
                tracing::info!("Objectives saved to {}", path.display());
            }
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            server::run_server(assistant, &bind).await?;
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String, AssistError> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// A directory gets the configured download filename appended.
fn download_path(path: &Path, filename: &str) -> PathBuf {
    if path.is_dir() {
        path.join(filename)
    } else {
        path.to_path_buf()
    }
}
