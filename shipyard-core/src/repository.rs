//! Persistence abstraction for ships.

use std::sync::Arc;

use crate::domain::{NewShip, Ship, ShipOrder};
use crate::error::Result;
use crate::filter::{PageRequest, ShipFilter};

/// Generic CRUD plus filtered queries over stored ships.
///
/// Each call is a single unit of work; implementations provide their own
/// per-call consistency.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRepository: Send + Sync {
    /// Ships matching `filter`, sorted ascending by `order` (ties by id), and
    /// limited to `page` when one is given.
    fn find(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Ship>>;
    /// Number of ships matching `filter`.
    fn count(&self, filter: &ShipFilter) -> Result<u64>;
    /// Ship stored under `id`, if any.
    fn get(&self, id: i64) -> Result<Option<Ship>>;
    /// Whether a ship is stored under `id`.
    fn exists(&self, id: i64) -> Result<bool>;
    /// Store a new ship and return it with its assigned id.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite a stored ship and return the stored state.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove the ship under `id`; returns whether one was removed.
    fn delete(&self, id: i64) -> Result<bool>;
}

impl<T: ShipRepository + ?Sized> ShipRepository for Arc<T> {
    fn find(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Ship>> {
        (**self).find(filter, order, page)
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        (**self).count(filter)
    }

    fn get(&self, id: i64) -> Result<Option<Ship>> {
        (**self).get(id)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        (**self).exists(id)
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        (**self).delete(id)
    }
}
