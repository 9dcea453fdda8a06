use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use medconnect_assistant::{Assistant, MemoryForm};
use medconnect_cli::config::{self, BASE_URL_ENV, MedConnectConfig};
use medconnect_cli::{form_file, session};
use medconnect_copilot::HttpCopilot;

#[derive(Parser)]
#[command(name = "medconnect")]
#[command(about = "MedConnect clinical copilot assistant")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dashboard base URL, overriding config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Clinical form as a JSON object of element id → value
    #[arg(long, global = true)]
    form: Option<PathBuf>,
    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat {
        /// Analyse automatically when the form settles
        #[arg(long)]
        auto: bool,
        /// Send non-command messages to the copilot chat
        #[arg(long)]
        chat_fallback: bool,
    },
    /// Send a single message and print the reply
    Ask {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = config::load_or_default(&config_path)?;
    config.override_base_url(std::env::var(BASE_URL_ENV).ok());
    config.override_base_url(cli.base_url.clone());

    init_tracing(cli.json_logs || config.json_logs);

    match cli.command {
        Commands::Chat {
            auto,
            chat_fallback,
        } => {
            config.auto_mode |= auto;
            config.chat_fallback |= chat_fallback;
            let form = Arc::new(load_form(cli.form.as_deref())?);
            let assistant = build_assistant(&config, form.clone())?;
            session::run_chat(assistant, form).await?;
        }
        Commands::Ask { message } => {
            let form = Arc::new(load_form(cli.form.as_deref())?);
            let assistant = build_assistant(&config, form)?;
            for reply in session::ask(&assistant, &message.join(" ")).await {
                println!("{}\n", session::format_message(&reply));
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("# {}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    return Err(eyre::eyre!(
                        "config already exists at {} (use --force to overwrite)",
                        config_path.display()
                    ));
                }
                config::save_config(&config_path, &MedConnectConfig {
                    base_url: config.base_url.clone(),
                    ..MedConnectConfig::default()
                })?;
                println!("wrote {}", config_path.display());
            }
        },
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so they never interleave with chat output on stdout.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_form(path: Option<&std::path::Path>) -> Result<MemoryForm> {
    match path {
        Some(path) => form_file::load_form(path),
        None => Ok(MemoryForm::new()),
    }
}

fn build_assistant(config: &MedConnectConfig, form: Arc<MemoryForm>) -> Result<Assistant> {
    let backend = HttpCopilot::new(&config.base_url, Some(config.request_timeout()))?;
    tracing::info!(base_url = %backend.base_url(), "copilot backend configured");
    Ok(Assistant::new(
        Arc::new(backend),
        form,
        config.assistant_options(),
    ))
}
