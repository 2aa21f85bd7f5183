//! # OGS Hub Server
//!
//! Boots the after-school care backend: connects `SurrealDB`, initializes every feature
//! slice through the [`ogs`] facade and serves the REST API over HTTP or HTTPS.
//!
//! ```no_run
//! use ogs_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder().port(8080).build().await?.run().await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow, bail};
use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use ogs::domain::config::{ApiConfig, SslConfig};
use ogs::kernel::server::ApiState;
use ogs_database::Database;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Configures and assembles a [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    async fn connect(&self) -> Result<Database> {
        let settings = &self.cfg.database;
        let mut builder =
            Database::builder().url(&settings.url).session(&settings.namespace, &settings.database);
        if let Some(credentials) = &settings.credentials {
            builder = builder.auth(&credentials.username, &credentials.password);
        }
        builder.init().await.context("Failed to establish database connection")
    }

    /// Connects the database, applies migrations and registers every feature slice.
    ///
    /// # Errors
    /// Fails when the configured TLS files are missing, the database is unreachable or its
    /// migrations drifted, or a slice cannot be initialized.
    pub async fn build(self) -> Result<Server> {
        if let Some(ssl) = &self.cfg.server.ssl {
            check_tls_files(ssl)?;
        }

        let db = self.connect().await?;
        let slices =
            ogs::init(&self.cfg, &db).map_err(|e| anyhow!("Platform bootstrap failed: {e}"))?;

        let state = ApiState::builder()
            .config(self.cfg)
            .db(db)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;
        info!(slices = ?state.slice_names().collect::<Vec<_>>(), "API state ready");

        Ok(Server { state })
    }
}

fn check_tls_files(ssl: &SslConfig) -> Result<()> {
    if !ssl.cert.exists() {
        bail!("SSL certificate not found at: {}", ssl.cert.display());
    }
    if !ssl.key.exists() {
        bail!("SSL key not found at: {}", ssl.key.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = ssl.key.metadata()?.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(key = %ssl.key.display(), "SSL private key is readable by others (expected 600)");
        }
    }
    Ok(())
}

/// An initialized server; [`Server::run`] starts listening.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves until SIGINT or SIGTERM, then drains open connections.
    ///
    /// # Errors
    /// Fails when the address cannot be bound or the TLS material cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let server = &self.state.config.server;
        let address = SocketAddr::new(server.address, server.port);
        let app = self.router().into_make_service();

        let handle = Handle::<SocketAddr>::new();
        let on_signal = handle.clone();
        tokio::spawn(async move {
            match shutdown_signal().await {
                Ok(()) => {
                    info!("Shutdown signal received, draining connections");
                    on_signal.graceful_shutdown(Some(SHUTDOWN_GRACE));
                },
                Err(e) => error!("Error while waiting for shutdown signal: {e}"),
            }
        });

        match &server.ssl {
            Some(ssl) => {
                let tls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load SSL/TLS certificates")?;
                info!("Listening on https://{address}");
                axum_server::bind_rustls(address, tls)
                    .handle(handle)
                    .serve(app)
                    .await
                    .context("HTTPS server failed")?;
            },
            None => {
                info!("Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(app)
                    .await
                    .context("HTTP server failed")?;
            },
        }

        info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// The complete HTTP application over this server's state.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
