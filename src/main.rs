//! CLI for chathub
//!
//! Subcommands:
//! - `server`: run the WebSocket broadcast hub
//! - `client`: connect, send a few messages and print what comes back
//! - `register` / `login`: manage accounts in the credential store

use std::process::ExitCode;
use std::time::Duration;

use chathub::client::exchange;
use chathub::config::{Settings, load_config};
use chathub::hub::Hub;
use chathub::persistence::UserStore;
use chathub::transport::start_websocket_server;
use chathub::utils::logging;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chathub", about = "WebSocket broadcast hub")]
enum Command {
    /// Start the WebSocket server
    Server,
    /// Run a one-shot client against a running server
    Client {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        /// Text message to send; repeat for several
        #[arg(short, long = "message")]
        messages: Vec<String>,
        /// Stop after this many seconds without incoming frames
        #[arg(long, default_value_t = 2)]
        idle_secs: u64,
    },
    /// Create an account in the credential store
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Check a username and password against the credential store
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = Command::parse();

    // a missing .env is fine
    let _ = dotenvy::dotenv();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&settings.log.level);

    let result = match cmd {
        Command::Server => run_server(&settings).await,
        Command::Client {
            url,
            messages,
            idle_secs,
        } => run_client(&url, &messages, idle_secs).await,
        Command::Register { username, password } => run_register(&settings, &username, &password),
        Command::Login { username, password } => run_login(&settings, &username, &password),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings.listen_addr();
    let hub = Hub::start(&settings.hub);

    tokio::select! {
        result = start_websocket_server(&addr, hub) => {
            result?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }

    Ok(())
}

async fn run_client(url: &str, messages: &[String], idle_secs: u64) -> Result<(), Box<dyn std::error::Error>> {
    let received = exchange(url, messages, Duration::from_secs(idle_secs)).await?;
    for text in received {
        println!("{text}");
    }
    Ok(())
}

fn run_register(settings: &Settings, username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = UserStore::open(&settings.storage.path)?;
    let user = store.register(username, password)?;
    println!("created user {} (id {})", user.username, user.id);
    Ok(())
}

fn run_login(settings: &Settings, username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = UserStore::open(&settings.storage.path)?;
    let user = store.login(username, password)?;
    println!("login ok for {} (id {})", user.username, user.id);
    Ok(())
}
