//! Typed error handling for shipquote
//!
//! This module provides the error hierarchy shared by the estimator, the
//! configuration loader and the HTTP exposure, so callers can match on the
//! exact failure instead of inspecting an opaque `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EstimationError`]: Failures of a single shipping estimate
//! - [`CatalogError`]: Reference-data lookups (unknown provider, store failure)
//! - [`ConfigError`]: Configuration parsing and reference-data invariants
//! - [`ValidationError`]: Request payload validation
//!
//! # Example
//!
//! ```rust,ignore
//! use shipquote::prelude::*;
//!
//! match estimator.estimate(request) {
//!     Ok(calculation) => println!("total: {}", calculation.total_shipping_cost),
//!     Err(EstimationError::NoServiceableZone { province, .. }) => {
//!         println!("we do not ship to {}", province);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use crate::core::location::UnresolvedLocation;
use crate::shipping::DeliveryType;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for shipquote
#[derive(Debug)]
pub enum ShipError {
    /// A shipping estimate could not be produced
    Estimation(EstimationError),

    /// Reference-data lookup errors
    Catalog(CatalogError),

    /// Configuration errors
    Config(ConfigError),

    /// Request validation errors
    Validation(ValidationError),
}

impl fmt::Display for ShipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipError::Estimation(e) => write!(f, "{}", e),
            ShipError::Catalog(e) => write!(f, "{}", e),
            ShipError::Config(e) => write!(f, "{}", e),
            ShipError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ShipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShipError::Estimation(e) => Some(e),
            ShipError::Catalog(e) => Some(e),
            ShipError::Config(e) => Some(e),
            ShipError::Validation(e) => Some(e),
        }
    }
}

/// Error envelope returned by every HTTP endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShipError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShipError::Estimation(e) => e.status_code(),
            ShipError::Catalog(e) => e.status_code(),
            ShipError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShipError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShipError::Estimation(e) => e.error_code(),
            ShipError::Catalog(e) => e.error_code(),
            ShipError::Config(_) => "CONFIG_ERROR",
            ShipError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShipError::Estimation(EstimationError::AddressUnresolved { role, source }) => {
                Some(serde_json::json!({
                    "address": role.to_string(),
                    "level": source.level,
                    "code": source.code,
                }))
            }
            ShipError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShipError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Estimation Errors
// =============================================================================

/// Which side of the shipment an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    Origin,
    Destination,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressRole::Origin => write!(f, "origin"),
            AddressRole::Destination => write!(f, "destination"),
        }
    }
}

/// Failures of a single estimate
///
/// All variants are terminal: the estimator is a pure function, so the same
/// inputs always fail the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// Empty item list, zero quantity or an invalid weight
    #[error("Invalid shipment: {reason}")]
    InvalidShipment { reason: String },

    /// An address code is missing from the location reference data
    #[error("Could not resolve {role} address: {source}")]
    AddressUnresolved {
        role: AddressRole,
        #[source]
        source: UnresolvedLocation,
    },

    /// No active service area covers the destination
    #[error("No shipping zone serves province '{province}' (district '{district}')")]
    NoServiceableZone { province: String, district: String },

    /// The requested delivery type cannot be used for this shipment
    #[error("Delivery type {delivery_type} is not available in zone '{zone_id}': {reason}")]
    DeliveryTypeUnavailable {
        delivery_type: DeliveryType,
        zone_id: String,
        reason: String,
    },
}

impl EstimationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EstimationError::InvalidShipment { .. } => StatusCode::BAD_REQUEST,
            EstimationError::AddressUnresolved { .. } => StatusCode::BAD_REQUEST,
            EstimationError::NoServiceableZone { .. } => StatusCode::NOT_FOUND,
            EstimationError::DeliveryTypeUnavailable { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EstimationError::InvalidShipment { .. } => "INVALID_SHIPMENT",
            EstimationError::AddressUnresolved { .. } => "ADDRESS_UNRESOLVED",
            EstimationError::NoServiceableZone { .. } => "NO_SERVICEABLE_ZONE",
            EstimationError::DeliveryTypeUnavailable { .. } => "DELIVERY_TYPE_UNAVAILABLE",
        }
    }

    pub(crate) fn invalid_shipment(reason: impl Into<String>) -> Self {
        EstimationError::InvalidShipment {
            reason: reason.into(),
        }
    }
}

impl From<EstimationError> for ShipError {
    fn from(err: EstimationError) -> Self {
        ShipError::Estimation(err)
    }
}

// =============================================================================
// Catalog Errors
// =============================================================================

/// Errors raised while fetching reference data
#[derive(Debug)]
pub enum CatalogError {
    /// No provider with this identifier
    ProviderNotFound { provider_id: String },

    /// The backing store failed
    Unavailable { message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::ProviderNotFound { provider_id } => {
                write!(f, "Shipping provider '{}' not found", provider_id)
            }
            CatalogError::Unavailable { message } => {
                write!(f, "Shipping catalog unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::ProviderNotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Unavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::ProviderNotFound { .. } => "PROVIDER_NOT_FOUND",
            CatalogError::Unavailable { .. } => "CATALOG_UNAVAILABLE",
        }
    }
}

impl From<CatalogError> for ShipError {
    fn from(err: CatalogError) -> Self {
        ShipError::Catalog(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// The same identifier is declared twice
    DuplicateId { kind: String, id: String },

    /// An identifier points at something that does not exist
    UnknownReference {
        kind: String,
        id: String,
        context: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::DuplicateId { kind, id } => {
                write!(f, "Duplicate {} id '{}'", kind, id)
            }
            ConfigError::UnknownReference { kind, id, context } => {
                write!(f, "Unknown {} '{}' referenced by {}", kind, id, context)
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ShipError {
    fn from(err: ConfigError) -> Self {
        ShipError::Config(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed validation
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON or does not match the expected shape
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ShipError {
    fn from(err: ValidationError) -> Self {
        ShipError::Validation(err)
    }
}

/// Flatten nested `validator` errors into dotted field paths
impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for ShipError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShipError::Validation(errors.into())
    }
}

fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ShipError {
    fn from(err: serde_json::Error) -> Self {
        ShipError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ShipError {
    fn from(err: std::io::Error) -> Self {
        ShipError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ShipError {
    fn from(err: serde_yaml::Error) -> Self {
        ShipError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Service traits return `anyhow::Result`; keep typed errors when possible
impl From<anyhow::Error> for ShipError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CatalogError>() {
            Ok(catalog) => ShipError::Catalog(catalog),
            Err(err) => ShipError::Catalog(CatalogError::Unavailable {
                message: err.to_string(),
            }),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for shipquote operations
pub type ShipResult<T> = Result<T, ShipError>;
