use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use device_bridge::api::{routes::create_router, state::AppState};
use device_bridge::device::desktop::{DesktopCapture, DesktopSession};
use device_bridge::device::{host_capture_slot, host_session_slot, DefaultTreeParser};
use device_bridge::{Capabilities, Config, OperationSerializer, ToolDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Attach the desktop backends to the host slots
    let sessions = host_session_slot();
    let captures = host_capture_slot();
    if config.desktop_session {
        sessions.attach(Arc::new(DesktopSession::new()));
        tracing::info!("Desktop automation session attached");
    }
    let desktop_capture = config.capture_enabled.then(|| {
        let capture = Arc::new(DesktopCapture::new(config.jpeg_quality));
        captures.attach(capture.clone());
        tracing::info!("Desktop capture session attached");
        capture
    });

    let capabilities = Capabilities::from_sessions(
        sessions.clone(),
        captures.clone(),
        Arc::new(DefaultTreeParser::new(config.tree_max_depth)),
    );
    let serializer = Arc::new(OperationSerializer::new(
        config.lock_timeout,
        config.execution_affinity,
    )?);
    let dispatcher = Arc::new(ToolDispatcher::with_default_tools(capabilities, serializer));

    let addr = config.bind_address();
    tracing::info!(
        affinity = %config.execution_affinity,
        lock_timeout_ms = config.lock_timeout.as_millis() as u64,
        "Device bridge starting on {}",
        addr
    );

    // Build router
    let state = Arc::new(AppState::new(dispatcher, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(desktop_capture))
        .await?;

    sessions.detach();
    captures.detach();
    tracing::info!("Device bridge stopped");
    Ok(())
}

/// Resolves on ctrl-c. Screen capture stops before in-flight requests drain.
async fn shutdown_signal(capture: Option<Arc<DesktopCapture>>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    if let Some(capture) = capture {
        capture.set_active(false);
    }
}
