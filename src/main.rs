//! Cue Timer - A countdown timer service with audible cues
//!
//! This is the main entry point for the cue-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cue_timer::{
    api::create_router,
    config::Config,
    services::{AudioCuePlayer, CuePlayer, MutedCuePlayer},
    state::AppState,
    tasks::{console_view_task, IntervalScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cue_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cue-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, duration={}s, sounds={}",
        config.host,
        config.port,
        config.duration,
        config.sounds_dir.display()
    );

    let cues: Arc<dyn CuePlayer> = if config.mute {
        info!("Sound cues muted");
        Arc::new(MutedCuePlayer)
    } else {
        if !config.sounds_dir.is_dir() {
            warn!(
                "Sounds directory {} does not exist, cues will be skipped",
                config.sounds_dir.display()
            );
        }
        Arc::new(AudioCuePlayer::spawn(config.sounds_dir.clone())?)
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.duration,
        Arc::new(IntervalScheduler::new()),
        cues,
    ));

    // Follow the countdown on the console
    tokio::spawn(console_view_task(state.subscribe()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control panel on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start               - Start or resume the countdown");
    info!("  POST /pause               - Pause the countdown");
    info!("  POST /stop                - Stop and reset to zero");
    info!("  POST /skip                - Skip to zero");
    info!("  PUT  /duration            - Set duration {{\"seconds\": n}}");
    info!("  POST /duration/increment  - Duration +5s");
    info!("  POST /duration/decrement  - Duration -5s");
    info!("  GET  /status              - Time display and status");
    info!("  GET  /events              - Time display as server-sent events");
    info!("  GET  /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
