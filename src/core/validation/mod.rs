//! Request validation
//!
//! Payloads derive `validator::Validate`; [`ValidatedJson`] runs the checks
//! before the body reaches a handler and reports failures as a
//! [`ValidationError`](crate::core::error::ValidationError).

pub mod extractor;
pub mod validators;

pub use extractor::ValidatedJson;
pub use validators::{validate_code, validate_coordinates};
