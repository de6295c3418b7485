use axum::{
    Router,
    routing::{get, post},
};
use dotenvy::dotenv;
use recipe_backend_client::{BackendClient, load_config};
use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod banner;
mod errors;
mod form;
mod handlers;
mod navigation;
mod orchestrator;
mod render;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use banner::{ASSETS_ROUTE, BANNER_IMAGES, BannerTicker, ROTATION_PERIOD, RotatingBanner};
use errors::Result;
use orchestrator::Orchestrator;
use state::AppState;
use store::Store;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

fn build_router(app_state: Arc<AppState>, assets_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/state", get(handlers::client_state))
        .route("/ingredients", post(handlers::add_ingredient))
        .route(
            "/ingredients/{index}/remove",
            post(handlers::remove_ingredient),
        )
        .route("/preferences/{tag}", post(handlers::toggle_preference))
        .route("/options", post(handlers::update_options))
        .route("/tabs/{tab}", post(handlers::select_tab))
        .route("/menu", post(handlers::toggle_menu))
        .route("/generate/recipe", post(handlers::generate_recipe))
        .route("/generate/meal-plan", post(handlers::generate_meal_plan))
        .route("/notice/dismiss", post(handlers::dismiss_notice))
        .nest_service(ASSETS_ROUTE, ServeDir::new(assets_dir))
        .layer(cors)
        .with_state(app_state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();

    info!("Starting YummyTool Web Client...");

    let config = load_config()?;
    info!("Recipe backend URL: {}", config.base_url);
    let backend = BackendClient::new(&config)?;

    let store = Store::default();
    let orchestrator = Orchestrator::new(store.clone(), backend);
    let banner = Arc::new(RotatingBanner::new(BANNER_IMAGES.len()));
    let ticker = BannerTicker::spawn(banner.clone(), ROTATION_PERIOD);
    info!("Banner rotation started ({:?} period).", ROTATION_PERIOD);

    let initial_load = orchestrator.clone();
    tokio::spawn(async move {
        let outcome = initial_load.refresh_saved_recipes().await;
        info!("Initial saved recipes load: {:?}", outcome);
    });

    let app_state = Arc::new(AppState {
        store,
        orchestrator,
        banner,
    });
    let assets_dir = env::var("YUMMY_ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSETS_DIR));
    info!("Serving {} from {}", ASSETS_ROUTE, assets_dir.display());
    for image in BANNER_IMAGES {
        let file = image.trim_start_matches(ASSETS_ROUTE).trim_start_matches('/');
        if !assets_dir.join(file).is_file() {
            warn!("Banner image {} not found in {}", file, assets_dir.display());
        }
    }

    let app = build_router(app_state, &assets_dir);
    info!("Axum router configured.");

    let port_str = env::var("YUMMY_WEB_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let port = port_str.parse::<u16>().unwrap_or_else(|e| {
        error!(
            "Invalid YUMMY_WEB_PORT '{}': {}. Using default {}.",
            port_str, e, DEFAULT_PORT
        );
        DEFAULT_PORT
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("YummyTool Web Client listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.stop().await;
    info!("YummyTool Web Client stopped.");
    Ok(())
}
