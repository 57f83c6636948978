//! Domain entities for Shipyard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::rating::{compute_rating, round_hundredths};

/// Class of a ship.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipType {
    /// Cargo hauler.
    Transport,
    /// Warship.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Textual name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TRANSPORT" => Ok(ShipType::Transport),
            "MILITARY" => Ok(ShipType::Military),
            "MERCHANT" => Ok(ShipType::Merchant),
            other => Err(format!("unknown ship type: {other}")),
        }
    }
}

/// Sort key for ship listings. Sorting is always ascending.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipOrder {
    /// Order by identifier.
    #[default]
    Id,
    /// Order by speed.
    Speed,
    /// Order by production date.
    Date,
    /// Order by rating.
    Rating,
}

impl ShipOrder {
    /// Name of the ship attribute the order sorts on.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
        }
    }
}

/// A stored ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Server-generated identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production timestamp, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship is second-hand.
    pub used: bool,
    /// Speed, two decimal places.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating, two decimal places.
    pub rating: f64,
}

impl Ship {
    /// Round speed and recompute the rating from the current field values.
    pub fn recalculate(&mut self) {
        self.speed = round_hundredths(self.speed);
        self.rating = compute_rating(self.speed, self.used, self.prod_date);
    }

    /// Overwrite the fields present in `payload`.
    ///
    /// `used` is only taken when every other business field is present in the
    /// payload itself. Returns whether anything was overwritten.
    pub fn apply(&mut self, payload: &ShipPayload) -> bool {
        let mut changed = false;
        if let Some(name) = &payload.name {
            self.name = name.clone();
            changed = true;
        }
        if let Some(planet) = &payload.planet {
            self.planet = planet.clone();
            changed = true;
        }
        if let Some(ship_type) = payload.ship_type {
            self.ship_type = ship_type;
            changed = true;
        }
        if let Some(prod_date) = payload.prod_date {
            self.prod_date = prod_date;
            changed = true;
        }
        if let Some(used) = payload.used {
            if payload.is_complete() {
                self.used = used;
                changed = true;
            }
        }
        if let Some(speed) = payload.speed {
            self.speed = speed;
            changed = true;
        }
        if let Some(crew_size) = payload.crew_size {
            self.crew_size = crew_size;
            changed = true;
        }
        changed
    }
}

/// Client-supplied ship fields for create and partial update.
///
/// An absent field and an explicit `null` are both `None`. Client-sent `id`
/// and `rating` are not part of the payload and are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipPayload {
    /// Ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production timestamp in epoch milliseconds.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship is second-hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
    /// Speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

impl ShipPayload {
    /// Whether all six business fields (everything but `used`) are present.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// First absent business field, by JSON name.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.is_none() {
            Some("name")
        } else if self.planet.is_none() {
            Some("planet")
        } else if self.ship_type.is_none() {
            Some("shipType")
        } else if self.prod_date.is_none() {
            Some("prodDate")
        } else if self.speed.is_none() {
            Some("speed")
        } else if self.crew_size.is_none() {
            Some("crewSize")
        } else {
            None
        }
    }
}

/// A fully specified ship that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship is second-hand.
    pub used: bool,
    /// Speed, rounded to two decimal places.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Build from a complete payload, rounding speed and deriving the rating.
    ///
    /// Returns `None` when a business field is missing.
    pub fn from_payload(payload: ShipPayload) -> Option<Self> {
        let speed = round_hundredths(payload.speed?);
        let prod_date = payload.prod_date?;
        let used = payload.used.unwrap_or(false);
        Some(Self {
            name: payload.name?,
            planet: payload.planet?,
            ship_type: payload.ship_type?,
            prod_date,
            used,
            speed,
            crew_size: payload.crew_size?,
            rating: compute_rating(speed, used, prod_date),
        })
    }

    /// Attach a storage identifier.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}
