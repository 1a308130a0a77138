//! Axum extractor for validated JSON payloads

use crate::core::error::{ShipError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn estimate_shipping(
///     ValidatedJson(payload): ValidatedJson<EstimateShippingRequest>,
/// ) -> Result<Json<ApiResponse<ShippingQuote>>, ShipError> {
///     // payload passed every #[validate] rule
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ShipError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::InvalidJson {
                message: rejection.body_text(),
            })?;

        payload.validate()?;

        Ok(ValidatedJson(payload))
    }
}
