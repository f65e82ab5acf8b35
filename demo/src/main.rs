use clap::Parser;
use meridian_demo::Database;
use meridian_hyper::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "meridian-demo")]
#[command(about = "Serve a todo list API", long_about = None)]
struct Cli {
    /// The address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// The path the todo routes are served under
    #[arg(long, default_value = "/todos")]
    prefix: String,

    /// The maximum request body size, in bytes
    #[arg(long, default_value_t = 2_097_152)]
    max_body: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::default()
        .addr(cli.addr.as_str())?
        .max_body(cli.max_body);

    tracing::info!(prefix = %cli.prefix, max_body = config.max_body, "starting todo API");

    let router = meridian_demo::router(Database::new(), &cli.prefix);

    meridian_hyper::serve_with_shutdown(router, config, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for shutdown signal");
        }
    })
    .await?;

    tracing::info!("shut down");
    Ok(())
}
