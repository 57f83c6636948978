//! Database models for Shipyard server.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shipyard_core::{NewShip, Ship, ShipType, ShipyardError};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type name.
    pub ship_type: String,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = ShipyardError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type = record
            .ship_type
            .parse::<ShipType>()
            .map_err(ShipyardError::Storage)?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date,
            used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ships)]
/// Insertable ship record.
pub struct NewShipRecord<'a> {
    /// Ship name.
    pub name: &'a str,
    /// Home planet.
    pub planet: &'a str,
    /// Ship type name.
    pub ship_type: &'static str,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl<'a> From<&'a NewShip> for NewShipRecord<'a> {
    fn from(ship: &'a NewShip) -> Self {
        Self {
            name: &ship.name,
            planet: &ship.planet,
            ship_type: ship.ship_type.as_str(),
            prod_date: ship.prod_date,
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ships)]
/// Full overwrite of a stored ship's mutable columns.
pub struct ShipChangeset<'a> {
    /// Ship name.
    pub name: &'a str,
    /// Home planet.
    pub planet: &'a str,
    /// Ship type name.
    pub ship_type: &'static str,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl<'a> From<&'a Ship> for ShipChangeset<'a> {
    fn from(ship: &'a Ship) -> Self {
        Self {
            name: &ship.name,
            planet: &ship.planet,
            ship_type: ship.ship_type.as_str(),
            prod_date: ship.prod_date,
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}
