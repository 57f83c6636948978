//! Field validation for ship payloads and identifiers.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::calendar::local_year;
use crate::domain::ShipPayload;

/// Longest accepted name or planet, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = 3019;
/// Slowest accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;

/// Reason a payload or identifier was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No payload was supplied.
    MissingPayload,
    /// A mandatory field was absent.
    MissingField(&'static str),
    /// A text field is empty or whitespace.
    BlankText(&'static str),
    /// A text field is longer than [`MAX_TEXT_LEN`].
    TextTooLong(&'static str),
    /// The production year falls outside the accepted window.
    ProdYearOutOfRange(i32),
    /// Speed falls outside the accepted range.
    SpeedOutOfRange(f64),
    /// Crew size falls outside the accepted range.
    CrewSizeOutOfRange(i32),
    /// An identifier is not a plain integer.
    MalformedId(String),
    /// An identifier is zero or negative.
    NonPositiveId(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPayload => write!(f, "request body is required"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::BlankText(field) => write!(f, "{field} must not be blank"),
            Self::TextTooLong(field) => {
                write!(f, "{field} must be at most {MAX_TEXT_LEN} characters")
            }
            Self::ProdYearOutOfRange(year) => write!(
                f,
                "production year {year} is outside {MIN_PROD_YEAR}..={MAX_PROD_YEAR}"
            ),
            Self::SpeedOutOfRange(speed) => {
                write!(f, "speed {speed} is outside {MIN_SPEED}..={MAX_SPEED}")
            }
            Self::CrewSizeOutOfRange(size) => write!(
                f,
                "crew size {size} is outside {MIN_CREW_SIZE}..={MAX_CREW_SIZE}"
            ),
            Self::MalformedId(raw) => write!(f, "'{raw}' is not an integer id"),
            Self::NonPositiveId(id) => write!(f, "id {id} must be positive"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a ship payload.
///
/// With `mandatory` set every business field except `used` must be present.
/// Present fields are always checked against their own rule.
pub fn validate_ship(
    payload: Option<&ShipPayload>,
    mandatory: bool,
) -> Result<(), ValidationError> {
    let payload = payload.ok_or(ValidationError::MissingPayload)?;
    if mandatory {
        if let Some(field) = payload.missing_field() {
            return Err(ValidationError::MissingField(field));
        }
    }
    if let Some(name) = &payload.name {
        validate_text("name", name)?;
    }
    if let Some(planet) = &payload.planet {
        validate_text("planet", planet)?;
    }
    if let Some(prod_date) = payload.prod_date {
        validate_prod_date(prod_date)?;
    }
    if let Some(speed) = payload.speed {
        validate_speed(speed)?;
    }
    if let Some(crew_size) = payload.crew_size {
        validate_crew_size(crew_size)?;
    }
    Ok(())
}

/// Boolean form of [`validate_ship`].
pub fn is_valid_ship(payload: Option<&ShipPayload>, mandatory: bool) -> bool {
    validate_ship(payload, mandatory).is_ok()
}

fn validate_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::BlankText(field));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TextTooLong(field));
    }
    Ok(())
}

fn validate_prod_date(prod_date: DateTime<Utc>) -> Result<(), ValidationError> {
    let year = local_year(prod_date);
    if (MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::ProdYearOutOfRange(year))
    }
}

fn validate_speed(speed: f64) -> Result<(), ValidationError> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(())
    } else {
        Err(ValidationError::SpeedOutOfRange(speed))
    }
}

fn validate_crew_size(crew_size: i32) -> Result<(), ValidationError> {
    if (MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        Ok(())
    } else {
        Err(ValidationError::CrewSizeOutOfRange(crew_size))
    }
}

/// Parse a ship identifier from a path segment.
///
/// Text containing a decimal separator is rejected even when a numeric parse
/// could truncate it.
pub fn parse_ship_id(raw: &str) -> Result<i64, ValidationError> {
    if raw.contains(['.', ',']) {
        return Err(ValidationError::MalformedId(raw.to_string()));
    }
    let id = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::MalformedId(raw.to_string()))?;
    if id <= 0 {
        return Err(ValidationError::NonPositiveId(id));
    }
    Ok(id)
}
