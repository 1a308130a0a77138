//! Server module for building the shipping HTTP server
//!
//! `ServerBuilder` merges configurations, wires the reference-data services
//! and exposes them through REST.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
