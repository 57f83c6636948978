#![deny(missing_docs)]
//! Shipyard core library.
//!
//! Domain types, validation, rating derivation, query filters and the CRUD
//! service behind the Shipyard HTTP server.

pub mod calendar;
pub mod domain;
pub mod error;
pub mod filter;
pub mod memory;
pub mod rating;
pub mod repository;
pub mod service;
pub mod validation;

pub use domain::{NewShip, Ship, ShipOrder, ShipPayload, ShipType};
pub use error::{Result, ShipyardError};
pub use filter::{PageRequest, ShipCriteria, ShipFilter, ShipFilterBuilder, ShipPredicate};
pub use memory::InMemoryShipRepository;
pub use rating::{compute_rating, round_hundredths};
pub use repository::ShipRepository;
pub use service::ShipService;
pub use validation::{ValidationError, is_valid_ship, parse_ship_id, validate_ship};
