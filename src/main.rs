use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use campground_api::cli::{Cli, Commands, SeedArgs, ServeArgs};
use campground_api::config::{self, AppConfig};
use campground_api::state::AppState;
use campground_api::{database, is_production, seed};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    init_tracing(config);
    info!("Starting campground-api in {:?} mode", config.environment);

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Seed(args)) => run_seed(config, args).await,
        Some(Commands::Serve(args)) => serve(config, args).await,
        None => serve(config, ServeArgs::default()).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve(config: &AppConfig, args: ServeArgs) -> Result<()> {
    if is_production!() && config.database.url.is_none() {
        warn!("Production mode without DATABASE_URL; data will not survive a restart");
    }

    let store = database::connect(&config.database)
        .await
        .context("failed to open resource store")?;
    let state = AppState::new(store);

    if let Some(count) = args.seed {
        let author = args
            .seed_author
            .context("--seed requires --seed-author")?;
        if let Some(password) = args.seed_password {
            if state.store.find_user_by_username(&author).await?.is_none() {
                state.identity.register(&author, None, &password).await?;
            }
        }
        seed::seed(state.store.as_ref(), &author, count)
            .await
            .with_context(|| format!("failed to seed campgrounds for '{}'", author))?;
    }

    let app = campground_api::app(state, config);

    let mut bind_addr = config.bind_addr();
    if let Some(port) = args.port {
        bind_addr = format!("{}:{}", config.server.host, port);
    }
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("campground-api listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn run_seed(config: &AppConfig, args: SeedArgs) -> Result<()> {
    let store = database::connect(&config.database)
        .await
        .context("failed to open resource store")?;
    if config.database.url.is_none() {
        warn!("Seeding the in-memory store; the data is discarded when this command exits");
    }
    let count = seed::seed(store.as_ref(), &args.author, args.count)
        .await
        .with_context(|| format!("failed to seed campgrounds for '{}'", args.author))?;
    info!("Seeded {} campgrounds", count);
    Ok(())
}
