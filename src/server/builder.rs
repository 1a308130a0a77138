//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::ShippingConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::service::{LocationService, ShippingCatalog};
use crate::storage::in_memory;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the shipping HTTP server
///
/// Reference data comes from the registered configurations unless a
/// location service or a catalog is supplied explicitly.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ShippingConfig::from_yaml_file("config/shipping.yaml")?)
///     .with_permissive_cors()
///     .build()?;
/// ```
pub struct ServerBuilder {
    configs: Vec<ShippingConfig>,
    location_service: Option<Arc<dyn LocationService>>,
    catalog: Option<Arc<dyn ShippingCatalog>>,
    clock: Option<Arc<dyn Clock>>,
    custom_routes: Vec<Router>,
    permissive_cors: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            location_service: None,
            catalog: None,
            clock: None,
            custom_routes: Vec::new(),
            permissive_cors: false,
        }
    }

    /// Register a configuration
    ///
    /// Configurations are merged in registration order when the host is
    /// built; later ones win on conflicting provinces or providers.
    pub fn with_config(mut self, config: ShippingConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Load and register a YAML configuration file
    pub fn with_config_file(self, path: &str) -> Result<Self> {
        let config = ShippingConfig::from_yaml_file(path)?;
        Ok(self.with_config(config))
    }

    /// Use this location service instead of the configured locations
    pub fn with_location_service(mut self, service: impl LocationService + 'static) -> Self {
        self.location_service = Some(Arc::new(service));
        self
    }

    /// Use this catalog instead of the configured providers
    pub fn with_catalog(mut self, catalog: impl ShippingCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Set the time source (wall clock by default)
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{Router, routing::get};
    ///
    /// let admin = Router::new().route("/admin/ping", get(|| async { "pong" }));
    ///
    /// ServerBuilder::new()
    ///     .with_config(config)
    ///     .with_custom_routes(admin)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Allow cross-origin requests from any origin
    pub fn with_permissive_cors(mut self) -> Self {
        self.permissive_cors = true;
        self
    }

    /// Build the transport-agnostic host
    ///
    /// Merges and validates every registered configuration, then falls back
    /// to in-memory services seeded from it for anything not supplied.
    pub fn build_host(mut self) -> Result<ServerHost> {
        if self.configs.is_empty() && (self.location_service.is_none() || self.catalog.is_none()) {
            anyhow::bail!(
                "Shipping reference data is required. Call .with_config() or provide both \
                 .with_location_service() and .with_catalog()"
            );
        }

        let merged_config = ShippingConfig::merge(std::mem::take(&mut self.configs));
        merged_config.validate()?;

        let (default_locations, default_catalog) = in_memory::from_config(&merged_config);
        let locations = self
            .location_service
            .take()
            .unwrap_or_else(|| Arc::new(default_locations));
        let catalog = self
            .catalog
            .take()
            .unwrap_or_else(|| Arc::new(default_catalog));
        let clock = self.clock.take().unwrap_or_else(|| Arc::new(SystemClock));

        tracing::debug!(
            provinces = merged_config.locations.len(),
            providers = merged_config.providers.len(),
            "shipping host configured"
        );

        let host = ServerHost::from_builder_components(
            merged_config.estimator_settings(),
            merged_config.currency(),
            locations,
            catalog,
            clock,
        )
        .with_permissive_cors(self.permissive_cors);

        Ok(host)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C.
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_config(config)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
