use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagehook")]
#[command(about = "Messenger webhook receiver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook server (GET/POST /webhook). Credentials come from the config file, then VERIFY_TOKEN / PAGE_ACCESS_TOKEN.
    Serve {
        /// Config file path (default: PAGEHOOK_CONFIG_PATH or ~/.pagehook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from PORT, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Fetch a user's first and last name from the Graph API and print them as JSON.
    Profile {
        /// Page-scoped user id
        user_id: String,

        /// Config file path (default: PAGEHOOK_CONFIG_PATH or ~/.pagehook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Send one text message to a user through the Send API.
    Send {
        /// Page-scoped user id of the recipient
        recipient_id: String,

        /// Message text
        text: String,

        /// Config file path (default: PAGEHOOK_CONFIG_PATH or ~/.pagehook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("pagehook {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("server failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Profile { user_id, config }) => {
            if let Err(e) = run_profile(config, &user_id).await {
                log::error!("profile failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            recipient_id,
            text,
            config,
        }) => {
            if let Err(e) = run_send(config, &recipient_id, &text).await {
                log::error!("send failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, path) = pagehook::config::load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }
    log::debug!("config loaded from {}", path.display());
    pagehook::server::run_server(config).await
}

fn messenger_client(config_path: Option<PathBuf>) -> anyhow::Result<pagehook::messenger::MessengerClient> {
    let (config, _) = pagehook::config::load_config(config_path)?;
    if config.messenger.placeholder_credentials().contains(&"PAGE_ACCESS_TOKEN") {
        log::warn!("PAGE_ACCESS_TOKEN is not set; the Graph API will reject this call");
    }
    Ok(pagehook::messenger::MessengerClient::new(&config.messenger))
}

async fn run_profile(config_path: Option<PathBuf>, user_id: &str) -> anyhow::Result<()> {
    let client = messenger_client(config_path)?;
    let profile = client.get_user_profile(user_id).await?;
    match profile.display_name() {
        Some(name) => log::info!("profile {}: {}", user_id, name),
        None => log::info!("profile {} has no name fields", user_id),
    }
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

async fn run_send(config_path: Option<PathBuf>, recipient_id: &str, text: &str) -> anyhow::Result<()> {
    let client = messenger_client(config_path)?;
    client.send_text_message(recipient_id, text).await?;
    println!("sent to {}", recipient_id);
    Ok(())
}
