//! Error types for Shipyard core.

use std::{error::Error, fmt};

use crate::validation::ValidationError;

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipyardError {
    /// The ship identifier in a request path is malformed.
    InvalidId(ValidationError),
    /// A ship payload failed field validation.
    InvalidShip(ValidationError),
    /// Query criteria or paging parameters are unusable.
    InvalidQuery(String),
    /// No ship is stored under the identifier.
    NotFound(i64),
    /// The persistence layer failed.
    Storage(String),
}

impl ShipyardError {
    /// Whether the error was caused by malformed client input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::InvalidShip(_) | Self::InvalidQuery(_)
        )
    }

    /// Wrap any displayable persistence failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "invalid ship id: {err}"),
            Self::InvalidShip(err) => write!(f, "invalid ship: {err}"),
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;

#[cfg(test)]
mod tests {
    use super::ShipyardError;
    use crate::validation::ValidationError;

    #[test]
    fn not_found_formats_message() {
        let error = ShipyardError::NotFound(42);
        assert_eq!(format!("{error}"), "ship 42 not found");
    }

    #[test]
    fn storage_error_wraps_display() {
        let error = ShipyardError::storage("connection refused");
        assert_eq!(format!("{error}"), "storage error: connection refused");
        assert!(!error.is_client_error());
    }

    #[test]
    fn validation_variants_are_client_errors() {
        let id = ShipyardError::InvalidId(ValidationError::MalformedId("5.0".to_string()));
        let ship = ShipyardError::InvalidShip(ValidationError::MissingField("name"));
        let query = ShipyardError::InvalidQuery("page size must be positive".to_string());
        assert!(id.is_client_error());
        assert!(ship.is_client_error());
        assert!(query.is_client_error());
        assert!(!ShipyardError::NotFound(1).is_client_error());
    }
}
