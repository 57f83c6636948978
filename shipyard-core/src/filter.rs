//! Ship query criteria and the predicate builder.
//!
//! Criteria arrive as a flat set of optional parameters. [`ShipFilterBuilder`]
//! turns each present parameter into a [`ShipPredicate`]; the resulting
//! [`ShipFilter`] is the conjunction of those predicates. Stores either
//! evaluate predicates directly with [`ShipPredicate::matches`] or translate
//! them into their own query language.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::IntoParams;

use crate::calendar::start_of_local_year;
use crate::domain::{Ship, ShipType};
use crate::error::{Result, ShipyardError};

/// Optional filter parameters accepted by list and count queries.
///
/// A parameter sent with an empty value (`?minSpeed=`) is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipCriteria {
    /// Substring of the ship name (case-sensitive).
    pub name: Option<String>,
    /// Substring of the planet (case-sensitive).
    pub planet: Option<String>,
    /// Exact ship type.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub ship_type: Option<ShipType>,
    /// Produced in or after the year of this epoch-millisecond timestamp.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub after: Option<i64>,
    /// Produced in or before the year of this epoch-millisecond timestamp.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub before: Option<i64>,
    /// Exact used flag.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_used: Option<bool>,
    /// Inclusive lower speed bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_speed: Option<f64>,
    /// Inclusive upper speed bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_speed: Option<f64>,
    /// Inclusive lower crew size bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_crew_size: Option<i32>,
    /// Inclusive upper crew size bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_crew_size: Option<i32>,
    /// Inclusive lower rating bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_rating: Option<f64>,
    /// Inclusive upper rating bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_rating: Option<f64>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// A single condition on a ship.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipPredicate {
    /// Name contains the text.
    NameContains(String),
    /// Planet contains the text.
    PlanetContains(String),
    /// Ship type equals.
    ShipTypeIs(ShipType),
    /// Used flag equals.
    UsedIs(bool),
    /// Production date at or after the instant.
    ProducedFrom(DateTime<Utc>),
    /// Production date at or before the instant.
    ProducedUntil(DateTime<Utc>),
    /// Crew size at least.
    CrewSizeAtLeast(i32),
    /// Crew size at most.
    CrewSizeAtMost(i32),
    /// Speed at least.
    SpeedAtLeast(f64),
    /// Speed at most.
    SpeedAtMost(f64),
    /// Rating at least.
    RatingAtLeast(f64),
    /// Rating at most.
    RatingAtMost(f64),
}

impl ShipPredicate {
    /// Evaluate the predicate against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Self::NameContains(text) => ship.name.contains(text.as_str()),
            Self::PlanetContains(text) => ship.planet.contains(text.as_str()),
            Self::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Self::UsedIs(used) => ship.used == *used,
            Self::ProducedFrom(start) => ship.prod_date >= *start,
            Self::ProducedUntil(end) => ship.prod_date <= *end,
            Self::CrewSizeAtLeast(min) => ship.crew_size >= *min,
            Self::CrewSizeAtMost(max) => ship.crew_size <= *max,
            Self::SpeedAtLeast(min) => ship.speed >= *min,
            Self::SpeedAtMost(max) => ship.speed <= *max,
            Self::RatingAtLeast(min) => ship.rating >= *min,
            Self::RatingAtMost(max) => ship.rating <= *max,
        }
    }
}

/// Conjunction of ship predicates. An empty filter matches every ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    predicates: Vec<ShipPredicate>,
}

impl ShipFilter {
    /// Start an empty builder.
    pub fn builder() -> ShipFilterBuilder {
        ShipFilterBuilder::default()
    }

    /// Build the filter for a set of criteria.
    pub fn from_criteria(criteria: &ShipCriteria) -> Result<Self> {
        Ok(Self::builder()
            .name_contains(criteria.name.clone())
            .planet_contains(criteria.planet.clone())
            .ship_type(criteria.ship_type)
            .used(criteria.is_used)
            .produced_after(criteria.after)?
            .produced_before(criteria.before)?
            .crew_size_between(criteria.min_crew_size, criteria.max_crew_size)
            .speed_between(criteria.min_speed, criteria.max_speed)
            .rating_between(criteria.min_rating, criteria.max_rating)
            .build())
    }

    /// Accumulated predicates, in insertion order.
    pub fn predicates(&self) -> &[ShipPredicate] {
        &self.predicates
    }

    /// Whether every predicate holds for the ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(ship))
    }
}

/// Accumulates predicates for a [`ShipFilter`]. `None` arguments add nothing.
#[derive(Debug, Clone, Default)]
pub struct ShipFilterBuilder {
    predicates: Vec<ShipPredicate>,
}

impl ShipFilterBuilder {
    fn push(mut self, predicate: Option<ShipPredicate>) -> Self {
        if let Some(predicate) = predicate {
            self.predicates.push(predicate);
        }
        self
    }

    /// Require the name to contain `text`.
    pub fn name_contains(self, text: Option<String>) -> Self {
        self.push(text.map(ShipPredicate::NameContains))
    }

    /// Require the planet to contain `text`.
    pub fn planet_contains(self, text: Option<String>) -> Self {
        self.push(text.map(ShipPredicate::PlanetContains))
    }

    /// Require an exact ship type.
    pub fn ship_type(self, ship_type: Option<ShipType>) -> Self {
        self.push(ship_type.map(ShipPredicate::ShipTypeIs))
    }

    /// Require an exact used flag.
    pub fn used(self, used: Option<bool>) -> Self {
        self.push(used.map(ShipPredicate::UsedIs))
    }

    /// Require production on or after January 1st of the local year of `millis`.
    pub fn produced_after(self, millis: Option<i64>) -> Result<Self> {
        let bound = millis.map(year_start).transpose()?;
        Ok(self.push(bound.map(ShipPredicate::ProducedFrom)))
    }

    /// Require production on or before January 1st of the local year of `millis`.
    pub fn produced_before(self, millis: Option<i64>) -> Result<Self> {
        let bound = millis.map(year_start).transpose()?;
        Ok(self.push(bound.map(ShipPredicate::ProducedUntil)))
    }

    /// Require an inclusive crew size range.
    pub fn crew_size_between(self, min: Option<i32>, max: Option<i32>) -> Self {
        self.push(min.map(ShipPredicate::CrewSizeAtLeast))
            .push(max.map(ShipPredicate::CrewSizeAtMost))
    }

    /// Require an inclusive speed range.
    pub fn speed_between(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.push(min.map(ShipPredicate::SpeedAtLeast))
            .push(max.map(ShipPredicate::SpeedAtMost))
    }

    /// Require an inclusive rating range.
    pub fn rating_between(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.push(min.map(ShipPredicate::RatingAtLeast))
            .push(max.map(ShipPredicate::RatingAtMost))
    }

    /// Finish the filter.
    pub fn build(self) -> ShipFilter {
        ShipFilter {
            predicates: self.predicates,
        }
    }
}

fn year_start(millis: i64) -> Result<DateTime<Utc>> {
    start_of_local_year(millis)
        .ok_or_else(|| ShipyardError::InvalidQuery(format!("timestamp {millis} is out of range")))
}

/// Offset/limit page selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub number: u32,
    /// Ships per page.
    pub size: u32,
}

impl PageRequest {
    /// Create a page request; the size must be positive.
    pub fn new(number: u32, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(ShipyardError::InvalidQuery(
                "page size must be positive".to_string(),
            ));
        }
        Ok(Self { number, size })
    }

    /// Number of ships skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }

    /// Select this page from an already sorted sequence.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(offset)
            .take(self.size as usize)
            .collect()
    }
}
