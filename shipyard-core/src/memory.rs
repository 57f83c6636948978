//! In-memory ship repository for development and tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{NewShip, Ship, ShipOrder};
use crate::error::{Result, ShipyardError};
use crate::filter::{PageRequest, ShipFilter};
use crate::repository::ShipRepository;

/// Ships kept in a map keyed by id; ids are assigned from a counter starting at 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShipRepository {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Debug, Default)]
struct MemoryData {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

impl InMemoryShipRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryData>> {
        self.data
            .read()
            .map_err(|_| ShipyardError::Storage("ship store unavailable".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryData>> {
        self.data
            .write()
            .map_err(|_| ShipyardError::Storage("ship store unavailable".to_string()))
    }
}

fn compare(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    let primary = match order {
        ShipOrder::Id => Ordering::Equal,
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
    };
    primary.then(left.id.cmp(&right.id))
}

impl ShipRepository for InMemoryShipRepository {
    fn find(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Ship>> {
        let data = self.read()?;
        let mut ships: Vec<Ship> = data
            .ships
            .values()
            .filter(|ship| filter.matches(ship))
            .cloned()
            .collect();
        ships.sort_by(|left, right| compare(order, left, right));
        Ok(match page {
            Some(page) => page.slice(ships),
            None => ships,
        })
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        let data = self.read()?;
        Ok(data.ships.values().filter(|ship| filter.matches(ship)).count() as u64)
    }

    fn get(&self, id: i64) -> Result<Option<Ship>> {
        Ok(self.read()?.ships.get(&id).cloned())
    }

    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.read()?.ships.contains_key(&id))
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut data = self.write()?;
        data.last_id += 1;
        let stored = ship.with_id(data.last_id);
        data.ships.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut data = self.write()?;
        match data.ships.get_mut(&ship.id) {
            Some(slot) => {
                *slot = ship.clone();
                Ok(ship.clone())
            }
            None => Err(ShipyardError::NotFound(ship.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.ships.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryShipRepository;
    use crate::domain::{NewShip, ShipOrder, ShipType};
    use crate::filter::{PageRequest, ShipFilter};
    use crate::repository::ShipRepository;
    use chrono::{TimeZone, Utc};

    fn new_ship(name: &str, speed: f64, rating: f64) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(3000, 6, 1, 0, 0, 0).unwrap(),
            used: false,
            speed,
            crew_size: 5,
            rating,
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let repo = InMemoryShipRepository::new();
        let first = repo.insert(new_ship("A", 0.1, 0.4)).expect("insert");
        let second = repo.insert(new_ship("B", 0.2, 0.8)).expect("insert");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(repo.exists(2).expect("exists"));
        assert_eq!(repo.get(1).expect("get"), Some(first));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let repo = InMemoryShipRepository::new();
        repo.insert(new_ship("A", 0.1, 0.4)).expect("insert");
        assert!(repo.delete(1).expect("delete"));
        assert!(!repo.delete(1).expect("second delete"));
        let next = repo.insert(new_ship("B", 0.2, 0.8)).expect("insert");
        assert_eq!(next.id, 2);
    }

    #[test]
    fn find_sorts_and_pages() {
        let repo = InMemoryShipRepository::new();
        repo.insert(new_ship("A", 0.9, 3.6)).expect("insert");
        repo.insert(new_ship("B", 0.1, 0.4)).expect("insert");
        repo.insert(new_ship("C", 0.5, 2.0)).expect("insert");

        let by_speed = repo
            .find(&ShipFilter::default(), ShipOrder::Speed, None)
            .expect("find");
        let names: Vec<&str> = by_speed.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);

        let page = repo
            .find(
                &ShipFilter::default(),
                ShipOrder::Rating,
                Some(PageRequest::new(1, 2).expect("page")),
            )
            .expect("find");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "A");
    }

    #[test]
    fn save_requires_existing_ship() {
        let repo = InMemoryShipRepository::new();
        let mut ship = repo.insert(new_ship("A", 0.1, 0.4)).expect("insert");
        ship.name = "Renamed".to_string();
        assert_eq!(repo.save(&ship).expect("save").name, "Renamed");

        repo.delete(ship.id).expect("delete");
        assert!(repo.save(&ship).is_err());
    }
}
