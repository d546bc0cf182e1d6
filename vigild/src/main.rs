//! Vigil pipeline daemon.
//!
//! Each consumer is its own subcommand so deployments can run them as
//! separate services; `run` hosts both in one process for small setups.
//! Either way a consumer owns its durable files exclusively, and the only
//! shared resource is the fact store itself.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_config::Config;
use vigil_core::runtime;
use vigil_core::{ActionConsumer, DerivationConsumer, HttpFactStore};

#[derive(Debug, Parser)]
#[command(name = "vigild", version, about = "Vigil security-operations pipeline daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the derivation consumer (scan facts -> alerts).
    Derive,
    /// Run the action consumer (alerts -> policy responses).
    Respond,
    /// Run both consumers in this process.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigild=info,vigil_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.ensure_directories()?;

    let store = Arc::new(HttpFactStore::new(
        config.store.base_url.clone(),
        config.store.timeout,
    )?);
    info!(store = %config.store.base_url, "vigild starting");

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    match cli.command {
        Command::Derive => {
            runtime::run(
                derivation(&config, Arc::clone(&store)),
                config.derivation.poll_interval,
                shutdown,
            )
            .await;
        }
        Command::Respond => {
            runtime::run(
                responder(&config, Arc::clone(&store))?,
                config.responder.poll_interval,
                shutdown,
            )
            .await;
        }
        Command::Run => {
            let derive_task = tokio::spawn(runtime::run(
                derivation(&config, Arc::clone(&store)),
                config.derivation.poll_interval,
                shutdown.clone(),
            ));
            let respond_task = tokio::spawn(runtime::run(
                responder(&config, Arc::clone(&store))?,
                config.responder.poll_interval,
                shutdown,
            ));
            let _ = derive_task.await;
            let _ = respond_task.await;
        }
    }

    info!("vigild stopped");
    Ok(())
}

fn derivation(config: &Config, store: Arc<HttpFactStore>) -> DerivationConsumer<HttpFactStore> {
    DerivationConsumer::new(
        store,
        config.derivation.handoff_log(),
        config.derivation.audit_log(),
    )
}

fn responder(
    config: &Config,
    store: Arc<HttpFactStore>,
) -> anyhow::Result<ActionConsumer<HttpFactStore>> {
    Ok(ActionConsumer::new(
        store,
        &config.responder.policy_path,
        config.responder.checkpoint_path.clone(),
        config.responder.handoff_log.clone(),
        config.responder.response_log(),
    )?)
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });
}
