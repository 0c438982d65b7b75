use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_dashboard::{api, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("task_dashboard=info,tower_http=info")),
        )
        .with(fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting task-dashboard v{} (session ttl {}h, account '{}')",
        env!("CARGO_PKG_VERSION"),
        config.auth.session_ttl_hours,
        config.auth.account.username
    );

    api::serve(config).await
}
