use chat_server::{build_router, idle, logger, metrics};

use chat_config::Config;
use chat_ws::{
    AppState, BroadcastConfig, Broadcaster, ConnectionConfig, Metrics, ShutdownCoordinator,
};

use std::error::Error;

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(parent) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(
        config.logging.level,
        logger::LogTarget::new(log_file_path, config.logging.colored),
    )?;

    info!("Starting chat-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = metrics::install_recorder()?;
    tokio::spawn(metrics::run_upkeep(prometheus.clone()));

    let ws_metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    // Single control loop owning all membership
    let (broadcaster, control_loop) = Broadcaster::new(
        BroadcastConfig {
            join_capacity: config.broadcaster.join_queue_capacity,
            leave_capacity: config.broadcaster.leave_queue_capacity,
            forward_capacity: config.broadcaster.forward_queue_capacity,
        },
        ws_metrics.clone(),
    );
    let control_loop = tokio::spawn(control_loop.run(shutdown.subscribe_guard()));

    let connection_config = ConnectionConfig {
        mailbox_capacity: config.websocket.mailbox_capacity,
        read_buffer_size: config.websocket.read_buffer_size,
        write_buffer_size: config.websocket.write_buffer_size,
        max_message_size: config.websocket.max_message_size,
    };

    let app_state = AppState {
        broadcaster: broadcaster.clone(),
        metrics: ws_metrics,
        shutdown: shutdown.clone(),
        config: connection_config,
    };

    let app = build_router(app_state, Some(prometheus));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    // Actual bound address (port 0 is auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Subscribed before anything can trigger shutdown
    let mut server_guard = shutdown.subscribe_guard();

    spawn_signal_handler(shutdown.clone());

    if config.server.idle_shutdown_secs > 0 {
        idle::spawn_idle_monitor(
            config.server.idle_shutdown_secs,
            broadcaster.clone(),
            shutdown.clone(),
        );
    }

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            server_guard.wait().await;
            info!("HTTP server draining connections");
        })
        .await?;

    // Stops the loop too when serve ended for any other reason
    shutdown.shutdown();
    match control_loop.await {
        Ok(stats) => info!(
            "Shutdown complete: {} joins, {} leaves, {} messages forwarded, {} slow peers dropped",
            stats.joins, stats.leaves, stats.forwards, stats.dropped
        ),
        Err(e) => error!("Broadcaster control loop panicked: {e}"),
    }

    Ok(())
}

fn spawn_signal_handler(shutdown: ShutdownCoordinator) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown.shutdown();
            }
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    });
}
