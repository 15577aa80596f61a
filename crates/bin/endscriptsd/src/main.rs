//! # endscriptsd — end scripts daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Open the JSON settings file and construct the device adapter
//! - Initialize the `EndScripts` aggregate, injecting adapters via port traits
//! - Run the lifecycle event pump in the background
//! - Build the axum router, bind to a TCP port and serve
//! - On ctrl-c: abort queued scripts, end open event streams, then drain
//!   the remaining connections
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use endscripts_adapter_http_axum::state::{AppState, SharedEndScripts};
use endscripts_adapter_settings_json::JsonFileSettings;
use endscripts_adapter_virtual::VirtualPrinter;
use endscripts_app::end_scripts::EndScripts;
use endscripts_app::event_pump;
use endscripts_app::notification_bus::InProcessNotifier;
use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::lifecycle::LifecycleEvent;

/// Lifecycle events buffered between the HTTP intake and the pump.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.log_filter);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Adapters
    let settings = JsonFileSettings::open(&config.settings_path).await?;
    let printer = Arc::new(VirtualPrinter::default());
    let notifier = Arc::new(InProcessNotifier::new(config.notification_capacity));

    // Aggregate
    let end_scripts = EndScripts::initialize(settings, Arc::clone(&printer), Arc::clone(&notifier)).await?;
    let end_scripts = Arc::new(Mutex::new(end_scripts));

    // Lifecycle events
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let observed = Arc::clone(&printer);
    let pump = tokio::spawn(event_pump::run(
        events_rx,
        Arc::clone(&end_scripts),
        move |event| observed.observe(event),
    ));

    // HTTP
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState::new(Arc::clone(&end_scripts), notifier, events_tx, shutdown_rx);
    let app = endscripts_adapter_http_axum::router::build(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        settings = %config.settings_path.display(),
        "endscriptsd listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            stop(&end_scripts, pump, &shutdown_tx).await;
        })
        .await?;
    tracing::info!("endscriptsd stopped");

    Ok(())
}

/// Abort the queue before the server drains its connections, so a client
/// holding an event stream open cannot keep deferred scripts alive.
async fn stop<S, D>(end_scripts: &SharedEndScripts<S, D>, pump: JoinHandle<()>, shutdown: &watch::Sender<bool>)
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    pump.abort();
    end_scripts
        .lock()
        .await
        .handle_event(LifecycleEvent::Shutdown)
        .await;
    let _ = shutdown.send(true);
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
