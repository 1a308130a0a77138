//! End-to-end tests of the REST exposure
//!
//! Boots the router from the default configuration with a fixed clock and
//! drives it through `axum_test::TestServer`.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::TimeZone;
use serde_json::{Value, json};
use shipquote::prelude::*;

// =============================================================================
// Helper function to create test server
// =============================================================================

/// Monday 09:00 in UTC+7
fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap()
}

fn create_test_server_at(now: DateTime<Utc>) -> TestServer {
    let app = ServerBuilder::new()
        .with_config(ShippingConfig::default_config())
        .with_clock(FixedClock(now))
        .build()
        .expect("Failed to build app");

    TestServer::try_new(app).expect("Failed to create test server")
}

fn create_test_server() -> TestServer {
    create_test_server_at(morning())
}

fn estimate_body(to_address: Value, delivery_type: &str) -> Value {
    json!({
        "provider_id": "ghn",
        "from_address": {
            "street": "12 Hai Bà Trưng",
            "province_code": "79",
            "district_code": "760",
            "ward_code": "26734"
        },
        "to_address": to_address,
        "items": [{"product_id": "paint-001", "quantity": 2, "unit_weight": 2.5}],
        "delivery_type": delivery_type
    })
}

fn thu_duc() -> Value {
    json!({"street": "1 Võ Văn Ngân", "province_code": "79", "district_code": "769"})
}

// =============================================================================
// Health Check Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = create_test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "shipquote");
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let server = create_test_server();

        let response = server.get("/healthz").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

// =============================================================================
// Estimate Tests
// =============================================================================

mod estimate_tests {
    use super::*;

    #[tokio::test]
    async fn test_express_estimate() {
        let server = create_test_server();

        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(thu_duc(), "EXPRESS"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);

        let quote = &body["data"];
        assert_eq!(quote["provider_id"], "ghn");
        assert_eq!(quote["zone_id"], "hcm-inner");
        assert_eq!(quote["currency"], "VND");
        assert_eq!(quote["total_weight"], 5.0);
        assert_eq!(quote["distance_km"], 2.0);
        assert_eq!(quote["distance_source"], "administrative_proxy");
        assert_eq!(quote["base_shipping_cost"], 18000.0);
        assert_eq!(quote["weight_cost"], 2000.0);
        assert_eq!(quote["distance_cost"], 2000.0);
        assert_eq!(quote["subtotal"], 22000.0);
        assert_eq!(quote["total_shipping_cost"], 38000.0);
        assert_eq!(quote["delivery_days"], 1);
        assert_eq!(quote["estimated_delivery_date"], "2025-06-03T02:00:00Z");
        assert_eq!(quote["estimated_delivery_day"], "2025-06-03");
        assert_eq!(quote["to_address"]["district"]["name"], "Thành phố Thủ Đức");
        assert!(quote["quote_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_ward_area_takes_precedence() {
        let server = create_test_server();

        let to_address = json!({"province_code": "79", "district_code": "760", "ward_code": "26740"});
        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(to_address, "STANDARD"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["zone_id"], "ben-nghe");
        // 15000 + 5 kg * 400 + 1 km * 1000
        assert_eq!(body["data"]["total_shipping_cost"], 18000.0);
    }

    #[tokio::test]
    async fn test_delivery_type_defaults_to_standard() {
        let server = create_test_server();

        let mut body = estimate_body(thu_duc(), "STANDARD");
        body.as_object_mut().unwrap().remove("delivery_type");

        let response = server.post("/shipping/estimate").json(&body).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["delivery_type"], "STANDARD");
        assert_eq!(body["data"]["total_shipping_cost"], 22000.0);
    }

    #[tokio::test]
    async fn test_same_day_before_cutoff() {
        let server = create_test_server();

        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(thu_duc(), "SAME_DAY"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["total_shipping_cost"], 54000.0);
        assert_eq!(body["data"]["delivery_days"], 0);
    }

    #[tokio::test]
    async fn test_same_day_after_cutoff_is_conflict() {
        // 15:00 local
        let server = create_test_server_at(Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap());

        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(thu_duc(), "SAME_DAY"))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DELIVERY_TYPE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_same_day_outside_available_areas_is_conflict() {
        let server = create_test_server();

        let to_address = json!({"province_code": "01", "district_code": "001"});
        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(to_address, "SAME_DAY"))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["code"], "DELIVERY_TYPE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_unserved_province_is_not_found() {
        let server = create_test_server();

        let to_address = json!({"province_code": "48", "district_code": "490"});
        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(to_address, "STANDARD"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NO_SERVICEABLE_ZONE");
    }
}

// =============================================================================
// Error Envelope Tests
// =============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider() {
        let server = create_test_server();

        let mut body = estimate_body(thu_duc(), "STANDARD");
        body["provider_id"] = json!("ghtk");

        let response = server.post("/shipping/estimate").json(&body).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "PROVIDER_NOT_FOUND");
        assert!(body["message"].as_str().unwrap().contains("ghtk"));
    }

    #[tokio::test]
    async fn test_empty_items_is_invalid_shipment() {
        let server = create_test_server();

        let mut body = estimate_body(thu_duc(), "STANDARD");
        body["items"] = json!([]);

        let response = server.post("/shipping/estimate").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_SHIPMENT");
    }

    #[tokio::test]
    async fn test_negative_quantity_is_invalid_shipment() {
        let server = create_test_server();

        let mut body = estimate_body(thu_duc(), "STANDARD");
        body["items"][0]["quantity"] = json!(-1);

        let response = server.post("/shipping/estimate").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_SHIPMENT");
    }

    #[tokio::test]
    async fn test_unknown_district_is_address_unresolved() {
        let server = create_test_server();

        let to_address = json!({"province_code": "79", "district_code": "999"});
        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(to_address, "STANDARD"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "ADDRESS_UNRESOLVED");
        assert_eq!(body["details"]["address"], "destination");
        assert_eq!(body["details"]["level"], "district");
    }

    #[tokio::test]
    async fn test_malformed_code_is_validation_error() {
        let server = create_test_server();

        let to_address = json!({"province_code": "7 9", "district_code": "769"});
        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(to_address, "STANDARD"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "to_address.province_code");
    }

    #[tokio::test]
    async fn test_unknown_delivery_type_is_rejected() {
        let server = create_test_server();

        let response = server
            .post("/shipping/estimate")
            .json(&estimate_body(thu_duc(), "DRONE"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let server = create_test_server();

        let response = server
            .post("/shipping/estimate")
            .text("{\"provider_id\": ")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

// =============================================================================
// Reference Data Tests
// =============================================================================

mod reference_data_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_providers() {
        let server = create_test_server();

        let response = server.get("/shipping/providers").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"],
            json!([{"id": "ghn", "name": "Giao Hàng Nhanh"}])
        );
    }

    #[tokio::test]
    async fn test_list_zones_with_service_areas() {
        let server = create_test_server();

        let response = server.get("/shipping/providers/ghn/zones").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let zones = body["data"].as_array().unwrap();
        assert_eq!(zones.len(), 4);

        let inner = zones.iter().find(|z| z["id"] == "hcm-inner").unwrap();
        assert_eq!(inner["base_rate"], 18000.0);
        assert_eq!(inner["service_areas"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_delivery_types_is_ordered() {
        let server = create_test_server();

        let response = server.get("/shipping/providers/ghn/delivery-types").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let types: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["delivery_type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["STANDARD", "EXPRESS", "SAME_DAY", "WEEKEND"]);
        assert_eq!(body["data"][2]["minimum_delivery_days"], 0);
        assert_eq!(body["data"][1]["surcharge"], 5000.0);
    }

    #[tokio::test]
    async fn test_zones_of_unknown_provider() {
        let server = create_test_server();

        let response = server.get("/shipping/providers/ghtk/zones").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "PROVIDER_NOT_FOUND");
    }
}
