//! Router builder utilities for shipping routes

use crate::shipping::handlers::{
    ShippingState, estimate_shipping, list_delivery_types, list_providers, list_zones,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the shipping routes
///
/// - POST /shipping/estimate - Estimate the shipping cost of a cart
/// - GET /shipping/providers - List providers
/// - GET /shipping/providers/{provider_id}/zones - Zones and their service areas
/// - GET /shipping/providers/{provider_id}/delivery-types - Configured delivery types
pub fn build_shipping_routes(state: ShippingState) -> Router {
    Router::new()
        .route("/shipping/estimate", post(estimate_shipping))
        .route("/shipping/providers", get(list_providers))
        .route("/shipping/providers/{provider_id}/zones", get(list_zones))
        .route(
            "/shipping/providers/{provider_id}/delivery-types",
            get(list_delivery_types),
        )
        .with_state(state)
}
