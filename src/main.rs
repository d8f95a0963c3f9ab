//! casino_events - Casino Event Processing Service
//!
//! Reads raw player-activity events (newline-delimited JSON on stdin),
//! enriches them, routes them through RabbitMQ and serves live aggregate
//! statistics over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casino_events::cache::RedisCache;
use casino_events::enrichment::{CurrencyConverter, EnrichmentPipeline, PlayerContextResolver};
use casino_events::players::PgPlayerRepository;
use casino_events::queue::RabbitQueue;
use casino_events::rates::HttpRateSource;
use casino_events::{api, db, workers, AppError, AppResult, Config, Materializer};

/// Raw events buffered between stdin and the producer
const SOURCE_BUFFER: usize = 1024;

/// Initialize tracing/logging
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "casino_events=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connections opened at startup
struct Dependencies {
    pool: PgPool,
    cache: RedisCache,
    queue: Arc<RabbitQueue>,
}

/// Connect to Postgres, Redis and RabbitMQ; any failure is fatal
async fn connect_dependencies(config: &Config) -> AppResult<Dependencies> {
    tracing::info!("Connecting to database...");
    let pool = db::connect(&config.database_url, config.database_max_connections).await?;
    if let Some(table) = db::missing_table(&pool).await? {
        return Err(AppError::SchemaIncomplete(table.to_string()));
    }

    tracing::info!("Connecting to Redis...");
    let cache = RedisCache::connect(&config.redis_url).await?;

    tracing::info!("Connecting to RabbitMQ...");
    let queue = RabbitQueue::connect(&config.rabbitmq_url).await?;

    Ok(Dependencies {
        pool,
        cache,
        queue: Arc::new(queue),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(
        environment = %config.environment,
        production = config.is_production(),
        "Starting casino_events"
    );

    let deps = tokio::time::timeout(config.startup_timeout, connect_dependencies(&config))
        .await
        .map_err(|_| AppError::StartupTimeout(config.startup_timeout.as_secs()))??;

    tracing::info!("All dependencies connected");

    // Enrichment: currency -> player -> description
    let rates = HttpRateSource::new(&config.exchange_rate_api_url)?;
    let converter = CurrencyConverter::new(Arc::new(deps.cache.clone()), Arc::new(rates))
        .with_ttl(config.exchange_rate_ttl);
    let players = PlayerContextResolver::new(Arc::new(PgPlayerRepository::new(deps.pool.clone())));
    let pipeline = EnrichmentPipeline::new(converter, players);

    let materializer = Arc::new(Materializer::new());
    let (trigger, shutdown) = workers::shutdown_channel();
    let (tx, rx) = mpsc::channel(SOURCE_BUFFER);

    let input = tokio::spawn(workers::read_events(BufReader::new(tokio::io::stdin()), tx));
    let producer = tokio::spawn(workers::run_producer(
        rx,
        pipeline.clone(),
        deps.queue.clone(),
        config.event_queue.clone(),
        shutdown.clone(),
    ));
    let consumer = tokio::spawn(workers::run_consumer(
        deps.queue.clone(),
        config.event_queue.clone(),
        materializer.clone(),
        shutdown.clone(),
    ));

    // Reporting surface
    let app = api::create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(materializer);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let mut server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.wait().await })
            .await
    });

    shutdown_signal().await;
    trigger.trigger();

    // stdin reads do not observe the shutdown signal
    input.abort();

    match producer.await {
        Ok(report) => tracing::info!(?report, "Producer finished"),
        Err(e) => tracing::error!(error = %e, "Producer task failed"),
    }
    match consumer.await {
        Ok(Ok(report)) => tracing::info!(?report, "Consumer finished"),
        Ok(Err(e)) => tracing::error!(error = %e, "Consumer could not start"),
        Err(e) => tracing::error!(error = %e, "Consumer task failed"),
    }
    server.await??;

    // Cleanup
    tracing::info!("Shutting down...");
    pipeline.close().await;
    deps.queue.close().await;
    // The multiplexed Redis connection ends once its last handle is gone
    drop(pipeline);
    drop(deps.cache);
    tracing::info!("Connections closed. Goodbye!");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
