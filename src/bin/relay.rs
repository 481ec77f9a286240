use iam_backend::config::RelayConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// One cooperative scheduler for the subscriber, the accept loop and every
// connection task.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iam_backend=debug,iam_relay=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env();
    info!(
        addr = %config.bind_addr,
        channel = %config.broker.channel,
        "Starting notification relay"
    );

    iam_backend::relay::server::run(config).await?;
    Ok(())
}
