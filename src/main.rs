use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use qr_bot::application::errors::BotError;
use qr_bot::application::messaging::{Dispatcher, MessageParser};
use qr_bot::application::services::QrRenderer;
use qr_bot::domain::entities::{ColorChoice, Sender};
use qr_bot::domain::traits::{Bot, Store};
use qr_bot::infrastructure::adapters::console::CONSOLE_CHAT;
use qr_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use qr_bot::infrastructure::config::Config;
use qr_bot::infrastructure::database::PgStore;
use qr_bot::infrastructure::storage::MemoryStore;

/// Back-off after a failed getUpdates call
const POLL_RETRY_SECS: u64 = 5;

#[derive(Parser)]
#[command(name = "qr-bot")]
#[command(about = "Telegram bot that turns text into QR codes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, env = "QR_BOT_CONFIG", default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (default)
    Run,
    /// Chat with the bot in the terminal, without Telegram or Postgres
    Console {
        /// Where generated images are written
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Render a single QR code to a PNG file
    Render {
        /// Text or link to encode
        data: String,
        #[arg(long, default_value = "black")]
        fill: String,
        #[arg(long, default_value = "white")]
        bg: String,
        #[arg(short, long, default_value = "qr.png")]
        out: PathBuf,
    },
    /// Print the default config
    InitConfig,
    /// Show version
    Version,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_env(&cli.config);
    if let Some(token) = cli.token {
        config.telegram.token = Some(token);
    }

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => block_on(run_bot(config)),
        Commands::Console { out_dir } => block_on(run_console_bot(config, out_dir)),
        Commands::Render { data, fill, bg, out } => {
            render_to_file(&config, &data, ColorChoice::new(fill, bg), &out)
        }
        Commands::InitConfig => init_config(),
        Commands::Version => {
            println!("qr-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn block_on<F>(future: F) -> Result<(), BotError>
where
    F: std::future::Future<Output = Result<(), BotError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    let credentials = config.credentials()?;
    tracing::info!("Starting {}", config.bot.name);

    let store = PgStore::connect(&credentials.database_url, &config.database).await?;
    store.init_schema().await?;
    tracing::info!("Database initialized");

    let mut bot = TelegramAdapter::with_api_base(credentials.token, &config.telegram.api_base);
    bot.fetch_bot_info().await?;
    tracing::info!("Bot started: {}", bot.describe());

    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let dispatcher = Dispatcher::new(
        bot,
        store,
        QrRenderer::new(config.qr_style()),
        config.dispatcher_settings(),
    );

    run_telegram_bot(&dispatcher, config.telegram.poll_timeout).await;
    Ok(())
}

async fn run_telegram_bot<S: Store>(
    dispatcher: &Dispatcher<TelegramAdapter, S>,
    timeout_seconds: u64,
) {
    let mut offset: i64 = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!("Starting message loop...");

    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, stopping message loop");
                return;
            }
            result = dispatcher.bot().get_updates(offset, timeout_seconds) => result,
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                for update in &updates {
                    let Some(message) = dispatcher.bot().to_message(update) else {
                        tracing::debug!("Skipping update {}", update.update_id);
                        continue;
                    };

                    let chat_id = message.chat_id;
                    if let Err(e) = dispatcher.handle(message).await {
                        tracing::error!("Failed to handle update {} in chat {}: {}", update.update_id, chat_id, e);
                    }
                }

                if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
                    offset = next;
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(POLL_RETRY_SECS)).await;
            }
        }
    }
}

async fn run_console_bot(config: Config, out_dir: PathBuf) -> Result<(), BotError> {
    let bot = ConsoleAdapter::new(out_dir);
    let dispatcher = Dispatcher::new(
        bot,
        MemoryStore::new(),
        QrRenderer::new(config.qr_style()),
        config.dispatcher_settings(),
    );

    let info = dispatcher.bot().bot_info();
    tracing::info!("Bot started: @{} (console mode)", info.username);
    println!("Type text to get a QR code, /start for the menu, #<data> to press a button.");

    let parser = MessageParser::default();
    let sender = Sender::new(CONSOLE_CHAT).with_first_name("console");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut presses = 0u64;

    // Main loop (for console mode)
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(e.to_string()))?
    {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let message = if let Some(data) = input.strip_prefix('#') {
            presses += 1;
            let origin = dispatcher.bot().last_message();
            Some(parser.parse_callback(format!("console-{}", presses), data, sender.clone(), origin))
        } else {
            parser.parse(CONSOLE_CHAT, input, sender.clone())
        };

        if let Some(message) = message {
            if let Err(e) = dispatcher.handle(message).await {
                println!("[ERROR] {}", e);
            }
        }
    }

    Ok(())
}

fn render_to_file(
    config: &Config,
    data: &str,
    colors: ColorChoice,
    out: &Path,
) -> Result<(), BotError> {
    let png = QrRenderer::new(config.qr_style()).render(data, &colors)?;
    std::fs::write(out, png)
        .map_err(|e| BotError::Internal(format!("Cannot write {}: {}", out.display(), e)))?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
