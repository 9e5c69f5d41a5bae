//! Pocketshop storefront - interactive widget session.
//!
//! Loads the catalog, restores the cart from the local store and then reads
//! commands from stdin, one per line. Type `help` for the command list.
//!
//! # Architecture
//!
//! - Catalog API over HTTP for product pages and detail
//! - Askama templates for the widget fragments
//! - JSON files under `POCKETSHOP_STORAGE_DIR` for the persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use pocketshop_storefront::catalog::{CatalogApi, CatalogClient};
use pocketshop_storefront::config::StorefrontConfig;
use pocketshop_storefront::session::{self, Command, HELP};
use pocketshop_storefront::storage::{FileStore, LocalStore};
use pocketshop_storefront::widget::Storefront;
use sentry::integrations::tracing as sentry_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so they don't interleave with the rendered widget
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocketshop_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let catalog = CatalogClient::new(&config.catalog).expect("Failed to build catalog client");
    let store = FileStore::open(&config.storage_dir).expect("Failed to open local store");
    tracing::info!(
        catalog = %config.catalog.base_url,
        storage = %config.storage_dir.display(),
        "Starting storefront session"
    );

    let mut shop = Storefront::new(Arc::new(catalog), store, config.paging);
    if let Err(e) = shop.start() {
        e.report("start");
    }

    println!("{HELP}");
    print_status(&shop);
    run_session(&mut shop).await;
}

/// Read commands until `quit`, end of input or a shutdown signal.
async fn run_session<C: CatalogApi, S: LocalStore>(shop: &mut Storefront<C, S>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(Command::Event(event)) => {
                        shop.dispatch(event);
                        print_status(shop);
                    }
                    Ok(Command::Show) => match shop.surface().render() {
                        Ok(html) => println!("{html}"),
                        Err(e) => tracing::error!(error = %e, "Failed to render widget"),
                    },
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Quit) => break,
                    Err(e) => println!("{e} (type `help` for commands)"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            Some(result) = shop.next_completion(), if shop.in_flight() > 0 => {
                if let Err(e) = result {
                    e.report("apply_completion");
                }
                print_status(shop);
            }
            () = &mut shutdown => break,
        }
    }

    shop.shutdown().await;
    tracing::info!("Storefront session ended");
}

fn print_status<C: CatalogApi, S: LocalStore>(shop: &Storefront<C, S>) {
    println!(
        "{}",
        session::status_line(shop.state(), shop.surface(), shop.in_flight())
    );
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, aborting in-flight requests");
}
