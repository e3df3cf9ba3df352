use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::time::sleep;

use catalogbot::cli::{self, Cli, Commands};
use catalogbot::core::{config, init_logger, install_panic_hook, log_startup_configuration};
use catalogbot::navigation::{Navigator, SessionStore};
use catalogbot::storage::CatalogStore;
use catalogbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, catalog document, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    install_panic_hook();
    init_logger(&config::LOG_FILE_PATH)?;

    let catalog_path = cli.catalog.unwrap_or_else(|| config::CATALOG_PATH.clone());

    match cli.command {
        Some(Commands::Run) => run_bot(catalog_path).await,
        Some(Commands::Tree { images }) => run_tree(catalog_path, images).await,
        Some(Commands::Check) => run_check(catalog_path).await,
        None => {
            // No command specified - default to running the bot
            log::info!("No command specified, running bot in default mode");
            run_bot(catalog_path).await
        }
    }
}

/// Print the catalog tree
async fn run_tree(catalog_path: String, images: bool) -> Result<()> {
    let catalog = CatalogStore::load_existing(&catalog_path).await?;
    print!("{}", cli::render_tree(&catalog, images));
    Ok(())
}

/// Validate the catalog document
async fn run_check(catalog_path: String) -> Result<()> {
    let catalog = CatalogStore::load_existing(&catalog_path).await?;
    println!("✅ {}: {}", catalog_path, cli::summary(&catalog));
    Ok(())
}

async fn run_bot(catalog_path: String) -> Result<()> {
    let bot_init_start = std::time::Instant::now();
    log::info!("Starting bot...");
    log_startup_configuration();

    let bot = create_bot()?;

    let me = bot.get_me().await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    setup_bot_commands(&bot).await?;

    let store = Arc::new(CatalogStore::open(&catalog_path).await?);
    let initial = store.load().await?;
    log::info!(
        "Catalog loaded from {}: {} categories, {} images",
        catalog_path,
        initial.len(),
        initial.image_count()
    );

    let sessions = SessionStore::new(config::session::ttl());
    let _session_cleanup = sessions.spawn_cleanup_task(config::session::cleanup_interval());

    let handler_deps = HandlerDeps::new(Navigator::new(store, sessions));
    let handler = schema(handler_deps);

    log::info!("Starting bot in long polling mode");
    log::info!("================================================");
    log::info!("🎉 Bot initialization complete in {:.2}s", bot_init_start.elapsed().as_secs_f64());
    log::info!("📡 Ready to receive updates!");
    log::info!("================================================");

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    // Run the dispatcher with retry logic
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // Create the dispatcher in a separate task to isolate panics
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            // Create polling listener that drops pending updates on start
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .error_handler(LoggingErrorHandler::with_custom_text("An error from a handler"))
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);

                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                log::info!(
                    "Retrying dispatcher connection after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                sleep(config::retry::backoff(retry_count)).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }

        sleep(config::retry::dispatcher_delay()).await;
    }

    Ok(())
}
