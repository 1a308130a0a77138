//! Core module containing the fundamental types shared by the estimator and
//! the HTTP exposure

pub mod clock;
pub mod error;
pub mod location;
pub mod money;
pub mod service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    AddressRole, CatalogError, ConfigError, EstimationError, ShipError, ShipResult,
    ValidationError,
};
pub use location::{
    Address, AddressInput, AdministrativeLevel, AdministrativeUnit, Coordinates, District,
    LocationDirectory, Province, UnresolvedLocation, Ward,
};
pub use money::{Currency, Money};
pub use service::{LocationService, ShippingCatalog};
