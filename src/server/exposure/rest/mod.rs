//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the health
//! routes, the shipping routes and any custom routes.

use super::super::host::ServerHost;
use crate::server::router::build_shipping_routes;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Shipping routes
    /// - Custom routes
    ///
    /// Every route is wrapped in a `TraceLayer`, plus a permissive
    /// `CorsLayer` when the host asks for it.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let shipping_routes = build_shipping_routes(host.shipping_state());

        let mut app = Self::health_routes().merge(shipping_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        if host.permissive_cors {
            app = app.layer(CorsLayer::permissive());
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "shipquote"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShippingConfig;
    use crate::server::ServerBuilder;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn host(permissive_cors: bool) -> Arc<ServerHost> {
        let host = ServerBuilder::new()
            .with_config(ShippingConfig::default_config())
            .build_host()
            .unwrap()
            .with_permissive_cors(permissive_cors);
        Arc::new(host)
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = RestExposure::build_router(host(false), vec![]).unwrap();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_custom_routes_are_merged() {
        let custom = Router::new().route("/ping", get(|| async { "pong" }));
        let app = RestExposure::build_router(host(false), vec![custom]).unwrap();

        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_permissive_cors_answers_preflight() {
        let app = RestExposure::build_router(host(true), vec![]).unwrap();

        let response = app
            .oneshot(
                Request::options("/shipping/estimate")
                    .header(header::ORIGIN, "https://shop.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_no_cors_headers_by_default() {
        let app = RestExposure::build_router(host(false), vec![]).unwrap();

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://shop.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
