//! Ship CRUD orchestration.

use log::{debug, error, info};

use crate::domain::{NewShip, Ship, ShipOrder, ShipPayload};
use crate::error::{Result, ShipyardError};
use crate::filter::{PageRequest, ShipCriteria, ShipFilter};
use crate::repository::ShipRepository;
use crate::validation::{ValidationError, parse_ship_id, validate_ship};

/// Validates requests, derives ratings, and delegates storage to a repository.
#[derive(Debug, Clone)]
pub struct ShipService<R> {
    repository: R,
}

impl<R: ShipRepository> ShipService<R> {
    /// Create a service over the repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Ships matching `criteria`, sorted by `order`, optionally paged.
    pub fn list(
        &self,
        criteria: &ShipCriteria,
        order: ShipOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Ship>> {
        let filter = ShipFilter::from_criteria(criteria)?;
        self.repository
            .find(&filter, order, page)
            .inspect_err(log_storage_error)
    }

    /// Number of ships matching `criteria`, ignoring paging.
    pub fn count(&self, criteria: &ShipCriteria) -> Result<u64> {
        let filter = ShipFilter::from_criteria(criteria)?;
        self.repository
            .count(&filter)
            .inspect_err(log_storage_error)
    }

    /// Validate a complete payload and store it as a new ship.
    pub fn create(&self, payload: ShipPayload) -> Result<Ship> {
        validate_ship(Some(&payload), true).map_err(reject_ship)?;
        let ship = NewShip::from_payload(payload)
            .ok_or(ShipyardError::InvalidShip(ValidationError::MissingPayload))?;
        let stored = self
            .repository
            .insert(ship)
            .inspect_err(log_storage_error)?;
        info!("created ship {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    /// Fetch one ship by its raw path identifier.
    pub fn get(&self, raw_id: &str) -> Result<Ship> {
        let id = parse_id(raw_id)?;
        self.repository
            .get(id)
            .inspect_err(log_storage_error)?
            .ok_or(ShipyardError::NotFound(id))
    }

    /// Overwrite the fields present in `payload` and re-derive the rating.
    ///
    /// A payload that changes nothing returns the stored ship untouched.
    pub fn update(&self, raw_id: &str, payload: Option<&ShipPayload>) -> Result<Ship> {
        let id = parse_id(raw_id)?;
        validate_ship(payload, false).map_err(reject_ship)?;
        let payload = payload.ok_or(ShipyardError::InvalidShip(ValidationError::MissingPayload))?;

        let mut ship = self
            .repository
            .get(id)
            .inspect_err(log_storage_error)?
            .ok_or(ShipyardError::NotFound(id))?;
        if !ship.apply(payload) {
            debug!("update of ship {id} changed nothing");
            return Ok(ship);
        }
        ship.recalculate();
        let saved = self
            .repository
            .save(&ship)
            .inspect_err(log_storage_error)?;
        info!("updated ship {id}");
        Ok(saved)
    }

    /// Remove one ship by its raw path identifier.
    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let id = parse_id(raw_id)?;
        if !self.repository.exists(id).inspect_err(log_storage_error)? {
            return Err(ShipyardError::NotFound(id));
        }
        if !self.repository.delete(id).inspect_err(log_storage_error)? {
            return Err(ShipyardError::NotFound(id));
        }
        info!("deleted ship {id}");
        Ok(())
    }
}

fn parse_id(raw_id: &str) -> Result<i64> {
    parse_ship_id(raw_id).map_err(|err| {
        debug!("rejected ship id: {err}");
        ShipyardError::InvalidId(err)
    })
}

fn reject_ship(err: ValidationError) -> ShipyardError {
    debug!("rejected ship payload: {err}");
    ShipyardError::InvalidShip(err)
}

fn log_storage_error(err: &ShipyardError) {
    if let ShipyardError::Storage(message) = err {
        error!("ship storage failed: {message}");
    }
}
