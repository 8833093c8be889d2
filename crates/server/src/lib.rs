#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Web server for the AstraHeritage financial checkup.

pub mod api;
pub mod app;
pub mod assets;
pub mod session;
pub mod views;

use std::sync::Arc;

use advice::AdviceClient;
use app::AppState;
use config::Config;
use error_stack::{Result, ResultExt};
use session::cleanup::SessionCleanupManager;
use tokio::{
    net::TcpListener,
    signal::{
        self,
        unix::{Signal, SignalKind},
    },
    sync::broadcast,
    task::JoinHandle,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Drop this when quit starts
pub type ServerQuitHandle = broadcast::Sender<()>;

/// Use resubscribe() for cloning.
pub type ServerQuitWatcher = broadcast::Receiver<()>;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Signal handler creation failed")]
    SignalHandler,
    #[error("HTTP client creation failed")]
    HttpClient,
    #[error("Socket binding failed")]
    Bind,
}

pub struct AstraHeritageServer {
    config: Arc<Config>,
}

impl AstraHeritageServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: config.into(),
        }
    }

    pub async fn run(self) -> Result<(), ServerError> {
        self.init_logging();

        info!("AstraHeritage version: {}", self.config.semver_version());

        if self.config.debug_mode() {
            warn!("Debug mode is enabled");
        }

        let mut terminate_signal = signal::unix::signal(SignalKind::terminate())
            .change_context(ServerError::SignalHandler)?;

        let (server_quit_handle, server_quit_watcher) = broadcast::channel(1);

        let http_client = reqwest::Client::builder()
            .build()
            .change_context(ServerError::HttpClient)?;
        let state = AppState::new(
            self.config.clone(),
            AdviceClient::from_config(&self.config, http_client),
        );

        let session_cleanup_quit_handle = SessionCleanupManager::new_manager(
            state.sessions_arc(),
            self.config.session_idle_timeout(),
            self.config.session_cleanup_interval(),
            server_quit_watcher.resubscribe(),
        );

        let server_task = self
            .create_public_api_server_task(state, server_quit_watcher.resubscribe())
            .await?;

        Self::wait_quit_signal(&mut terminate_signal).await;
        info!("Server quit signal received");

        info!("Server quit started");

        drop(server_quit_handle);

        // Wait until all tasks quit
        if let Err(e) = server_task.await {
            error!("Public API server task panic detected. Error: {}", e);
        }
        session_cleanup_quit_handle.wait_quit().await;

        info!("Server quit done");

        Ok(())
    }

    fn init_logging(&self) {
        let log_with_timestamp_layer = if self.config.log_timestamp() {
            Some(tracing_subscriber::fmt::layer().with_filter(env_filter()))
        } else {
            None
        };

        let log_without_timestamp_layer = if self.config.log_timestamp() {
            None
        } else {
            Some(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_filter(env_filter()),
            )
        };

        tracing_subscriber::registry()
            .with(log_with_timestamp_layer)
            .with(log_without_timestamp_layer)
            .init();
    }

    pub async fn wait_quit_signal(terminate_signal: &mut Signal) {
        tokio::select! {
            _ = terminate_signal.recv() => {}
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => (),
                    Err(e) => error!("Failed to listen CTRL+C. Error: {}", e),
                }
            }
        }
    }

    /// Public API. This can have WAN access.
    pub async fn create_public_api_server_task(
        &self,
        state: AppState,
        mut quit_notification: ServerQuitWatcher,
    ) -> Result<JoinHandle<()>, ServerError> {
        let addr = self.config.public_api();
        let listener = TcpListener::bind(addr)
            .await
            .change_context(ServerError::Bind)
            .attach_printable(addr)?;
        info!("Public API is available on http://{}", addr);

        let router = app::create_router(state);

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = quit_notification.recv().await;
                })
                .await;

            match result {
                Ok(()) => info!("Public API server quit"),
                Err(e) => error!("Public API server error: {}", e),
            }
        });

        Ok(task)
    }
}

/// `RUST_LOG` or `info` level when it is not set.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
