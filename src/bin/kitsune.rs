use std::sync::Arc;

use clap::Parser;
use kitsune::server::{self, ServerConfig};
use kitsune::{Broker, BrokerConfig, SubscriptionScope};

#[derive(Parser)]
#[command(name = "kitsune", version, about = "In-memory pub/sub message broker")]
struct Cli {
    #[command(flatten)]
    server: ServerConfig,

    /// Scoping of subscription names: "per-topic" or "global".
    #[arg(long, default_value_t = SubscriptionScope::PerTopic, env = "KITSUNE_SUBSCRIPTION_SCOPE")]
    subscription_scope: SubscriptionScope,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = BrokerConfig {
        subscription_scope: cli.subscription_scope,
    };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        subscription_scope = %config.subscription_scope,
        "starting broker"
    );
    let broker = Arc::new(Broker::new(config));

    if let Err(e) = server::run(&cli.server, broker).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }

    tracing::info!("broker stopped");
}
