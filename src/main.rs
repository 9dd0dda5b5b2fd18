mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::{database, middleware};
use crate::features::kodepos::{
    routes as kodepos_routes, KodeposRepository, KodeposState, LocationService,
    PgKodeposRepository,
};
use crate::features::sitemap::{routes as sitemap_routes, SitemapService};
use crate::shared::templates::TemplateRenderer;
use crate::shared::types::SiteInfo;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SITEMAP_DIR: &str = "public";

enum Command {
    Serve,
    /// Write the sitemap files into a directory and exit
    GenerateSitemap(PathBuf),
}

impl Command {
    fn from_args() -> anyhow::Result<Self> {
        let mut args = std::env::args().skip(1);
        match args.next().as_deref() {
            None | Some("serve") => Ok(Command::Serve),
            Some("generate-sitemap") => Ok(Command::GenerateSitemap(
                args.next()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SITEMAP_DIR)),
            )),
            Some(other) => Err(anyhow::anyhow!(
                "Unknown command '{}'. Usage: kodepos-web [serve | generate-sitemap [DIR]]",
                other
            )),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let command = Command::from_args()?;

    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(command, worker_threads))
}

async fn async_main(command: Command, worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    let repository: Arc<dyn KodeposRepository> = Arc::new(PgKodeposRepository::new(
        pool,
        config.database.retry,
    ));
    let renderer = Arc::new(
        TemplateRenderer::new().map_err(|e| anyhow::anyhow!("Failed to load templates: {}", e))?,
    );
    let site = Arc::new(SiteInfo::new(config.app.base_url.clone()));
    tracing::info!(
        "Template renderer initialized with {} templates",
        renderer.list_templates().len()
    );

    let sitemap_service = Arc::new(SitemapService::new(
        Arc::clone(&repository),
        Arc::clone(&renderer),
        Arc::clone(&site),
        config.sitemap.lastmod,
    ));

    if let Command::GenerateSitemap(dir) = command {
        let pages = sitemap_service
            .write_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("Sitemap generation failed: {}", e))?;
        tracing::info!("Sitemap generated in {} ({} chunks)", dir.display(), pages);
        return Ok(());
    }

    let location_service = Arc::new(LocationService::new(Arc::clone(&repository)));
    tracing::info!("Location service initialized");

    let kodepos_state = KodeposState {
        service: location_service,
        renderer: Arc::clone(&renderer),
        site: Arc::clone(&site),
    };

    let app = Router::new()
        .merge(sitemap_routes::routes(sitemap_service))
        .merge(kodepos_routes::routes(kodepos_state))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{} ({})", addr, site.base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
