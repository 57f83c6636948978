//! PostgreSQL-backed ship repository.

use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use shipyard_core::{
    NewShip, PageRequest, Ship, ShipFilter, ShipOrder, ShipPredicate, ShipRepository,
    ShipyardError,
};

use crate::db::DbPool;
use crate::models::{NewShipRecord, ShipChangeset, ShipRecord};
use crate::schema::ships;

type Conn = PooledConnection<ConnectionManager<PgConnection>>;

/// Ship repository over a pooled PostgreSQL connection.
#[derive(Clone)]
pub struct PgShipRepository {
    pool: DbPool,
}

impl PgShipRepository {
    /// Wrap an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> shipyard_core::Result<Conn> {
        self.pool.get().map_err(ShipyardError::storage)
    }
}

/// Escape LIKE wildcards so user text matches literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Translate a filter into a boxed `WHERE` clause over `ships`.
fn filtered(filter: &ShipFilter) -> ships::BoxedQuery<'static, Pg> {
    let mut query = ships::table.into_boxed();
    for predicate in filter.predicates() {
        query = match predicate {
            ShipPredicate::NameContains(text) => {
                query.filter(ships::name.like(contains_pattern(text)).escape('\\'))
            }
            ShipPredicate::PlanetContains(text) => {
                query.filter(ships::planet.like(contains_pattern(text)).escape('\\'))
            }
            ShipPredicate::ShipTypeIs(ship_type) => {
                query.filter(ships::ship_type.eq(ship_type.as_str()))
            }
            ShipPredicate::UsedIs(used) => query.filter(ships::is_used.eq(*used)),
            ShipPredicate::ProducedFrom(start) => query.filter(ships::prod_date.ge(*start)),
            ShipPredicate::ProducedUntil(end) => query.filter(ships::prod_date.le(*end)),
            ShipPredicate::CrewSizeAtLeast(min) => query.filter(ships::crew_size.ge(*min)),
            ShipPredicate::CrewSizeAtMost(max) => query.filter(ships::crew_size.le(*max)),
            ShipPredicate::SpeedAtLeast(min) => query.filter(ships::speed.ge(*min)),
            ShipPredicate::SpeedAtMost(max) => query.filter(ships::speed.le(*max)),
            ShipPredicate::RatingAtLeast(min) => query.filter(ships::rating.ge(*min)),
            ShipPredicate::RatingAtMost(max) => query.filter(ships::rating.le(*max)),
        };
    }
    query
}

fn into_ships(records: Vec<ShipRecord>) -> shipyard_core::Result<Vec<Ship>> {
    records.into_iter().map(Ship::try_from).collect()
}

impl ShipRepository for PgShipRepository {
    fn find(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: Option<PageRequest>,
    ) -> shipyard_core::Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let mut query = match order {
            ShipOrder::Id => filtered(filter).order(ships::id.asc()),
            ShipOrder::Speed => filtered(filter).order((ships::speed.asc(), ships::id.asc())),
            ShipOrder::Date => filtered(filter).order((ships::prod_date.asc(), ships::id.asc())),
            ShipOrder::Rating => filtered(filter).order((ships::rating.asc(), ships::id.asc())),
        };
        if let Some(page) = page {
            let offset = i64::try_from(page.offset()).map_err(ShipyardError::storage)?;
            query = query.offset(offset).limit(i64::from(page.size));
        }
        let records = query
            .load::<ShipRecord>(&mut conn)
            .map_err(ShipyardError::storage)?;
        into_ships(records)
    }

    fn count(&self, filter: &ShipFilter) -> shipyard_core::Result<u64> {
        let mut conn = self.conn()?;
        let total = filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(ShipyardError::storage)?;
        u64::try_from(total).map_err(ShipyardError::storage)
    }

    fn get(&self, id: i64) -> shipyard_core::Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .first::<ShipRecord>(&mut conn)
            .optional()
            .map_err(ShipyardError::storage)?
            .map(Ship::try_from)
            .transpose()
    }

    fn exists(&self, id: i64) -> shipyard_core::Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(ships::table.find(id)))
            .get_result::<bool>(&mut conn)
            .map_err(ShipyardError::storage)
    }

    fn insert(&self, ship: NewShip) -> shipyard_core::Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(&NewShipRecord::from(&ship))
            .get_result::<ShipRecord>(&mut conn)
            .map_err(ShipyardError::storage)?;
        Ship::try_from(record)
    }

    fn save(&self, ship: &Ship) -> shipyard_core::Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::update(ships::table.find(ship.id))
            .set(&ShipChangeset::from(ship))
            .get_result::<ShipRecord>(&mut conn)
            .optional()
            .map_err(ShipyardError::storage)?
            .ok_or(ShipyardError::NotFound(ship.id))?;
        Ship::try_from(record)
    }

    fn delete(&self, id: i64) -> shipyard_core::Result<bool> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(ShipyardError::storage)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{PgShipRepository, contains_pattern};
    use crate::db::TestDatabase;
    use chrono::{TimeZone, Utc};
    use shipyard_core::{
        NewShip, PageRequest, ShipCriteria, ShipFilter, ShipOrder, ShipRepository, ShipType,
    };

    fn new_ship(name: &str, speed: f64) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Kepler-22b".to_string(),
            ship_type: ShipType::Military,
            prod_date: Utc.with_ymd_and_hms(3001, 8, 8, 0, 0, 0).unwrap(),
            used: false,
            speed,
            crew_size: 40,
            rating: 1.0,
        }
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ab"), "%ab%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    #[ignore = "requires PostgreSQL via TEST_DATABASE_URL or DATABASE_URL"]
    fn crud_round_trip_against_postgres() {
        let mut test_db = TestDatabase::new();
        let repo = PgShipRepository::new(test_db.pool());

        let mut ship = repo.insert(new_ship("Aurora", 0.4)).expect("insert");
        assert!(repo.exists(ship.id).expect("exists"));
        assert_eq!(repo.get(ship.id).expect("get"), Some(ship.clone()));

        ship.crew_size = 41;
        assert_eq!(repo.save(&ship).expect("save").crew_size, 41);

        assert!(repo.delete(ship.id).expect("delete"));
        assert!(!repo.delete(ship.id).expect("second delete"));
        assert_eq!(repo.get(ship.id).expect("get"), None);
    }

    #[test]
    #[ignore = "requires PostgreSQL via TEST_DATABASE_URL or DATABASE_URL"]
    fn filters_sort_and_page_in_sql() {
        let mut test_db = TestDatabase::new();
        let repo = PgShipRepository::new(test_db.pool());
        for (index, speed) in [0.9, 0.1, 0.5, 0.7].into_iter().enumerate() {
            repo.insert(new_ship(&format!("Ship_{index}"), speed))
                .expect("insert");
        }
        repo.insert(new_ship("Ship%", 0.2)).expect("insert");

        let fast = ShipFilter::from_criteria(&ShipCriteria {
            min_speed: Some(0.5),
            ..ShipCriteria::default()
        })
        .expect("filter");
        assert_eq!(repo.count(&fast).expect("count"), 3);

        let speeds: Vec<f64> = repo
            .find(&fast, ShipOrder::Speed, Some(PageRequest::new(0, 2).expect("page")))
            .expect("find")
            .into_iter()
            .map(|ship| ship.speed)
            .collect();
        assert_eq!(speeds, vec![0.5, 0.7]);

        let literal = ShipFilter::builder()
            .name_contains(Some("%".to_string()))
            .build();
        assert_eq!(repo.count(&literal).expect("count"), 1);
    }
}
