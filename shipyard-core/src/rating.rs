//! Ship rating derivation.

use chrono::{DateTime, Utc};

use crate::calendar::local_year;

/// Reference year the rating formula measures age against.
pub const RATING_REFERENCE_YEAR: i32 = 3019;

const USED_COEFFICIENT: f64 = 0.5;
const NEW_COEFFICIENT: f64 = 1.0;

/// Round half away from zero to two decimal places.
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rating of a ship: `80 * speed * k / (3019 - year + 1)`, two decimals.
///
/// `k` is 0.5 for used ships and 1 otherwise; `year` is the local-calendar
/// production year.
pub fn compute_rating(speed: f64, used: bool, prod_date: DateTime<Utc>) -> f64 {
    let recency = if used {
        USED_COEFFICIENT
    } else {
        NEW_COEFFICIENT
    };
    let age = f64::from(RATING_REFERENCE_YEAR - local_year(prod_date) + 1);
    round_hundredths(80.0 * speed * recency / age)
}

#[cfg(test)]
mod tests {
    use super::{compute_rating, round_hundredths};
    use chrono::{TimeZone, Utc};

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_hundredths(0.125), 0.13);
        assert_eq!(round_hundredths(0.994), 0.99);
        assert_eq!(round_hundredths(3.0), 3.0);
    }

    #[test]
    fn newest_ship_scores_highest() {
        let prod_date = Utc.with_ymd_and_hms(3019, 5, 10, 0, 0, 0).unwrap();
        assert_eq!(compute_rating(0.5, false, prod_date), 40.0);
        assert_eq!(compute_rating(0.5, true, prod_date), 20.0);
    }

    #[test]
    fn old_ship_rating_is_rounded() {
        let prod_date = Utc.with_ymd_and_hms(2900, 6, 1, 0, 0, 0).unwrap();
        // 80 * 0.33 / 120 = 0.22
        assert_eq!(compute_rating(0.33, false, prod_date), 0.22);
        // 80 * 0.33 * 0.5 / 120 = 0.11
        assert_eq!(compute_rating(0.33, true, prod_date), 0.11);
    }
}
