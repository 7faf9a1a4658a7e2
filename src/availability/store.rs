use std::collections::HashMap;

use crate::error::{AvailabilityError, Result};
use super::time_utils::format_minutes;
use super::types::{DayAvailability, DayOfWeek, Minutes, UserProfile};

/// Read side of the store consumed by the aggregation engine.
///
/// The engine never touches the store directly, only this snapshot view, so
/// tests can drive it with fixed interval lists.
pub trait AvailabilityRepository {
    /// Available intervals for one day, one per available user. Order is
    /// unspecified; the engine must not depend on it.
    fn list_available_intervals(&self, day: DayOfWeek) -> Vec<(Minutes, Minutes)>;

    /// Count of distinct registered users.
    fn total_user_count(&self) -> usize;
}

/// In-memory store of registered users and their per-day availability.
///
/// Every registered user holds exactly one `DayAvailability` per day of the
/// week; registration seeds all seven days as `Unavailable` and upserts
/// replace without history.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    profiles: HashMap<String, UserProfile>,
    availability: HashMap<String, HashMap<DayOfWeek, DayAvailability>>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, or updates the profile of an existing one.
    ///
    /// New users get `Unavailable` seeded for every day. Re-registration
    /// keeps any availability already set (only missing days are seeded).
    pub fn register_user(&mut self, user_id: &str, profile: UserProfile) {
        self.profiles.insert(user_id.to_string(), profile);
        let week = self.availability.entry(user_id.to_string()).or_default();
        for day in DayOfWeek::ALL {
            week.entry(day).or_insert(DayAvailability::Unavailable);
        }
    }

    /// Replaces a user's availability for one day.
    ///
    /// `None` is the unavailable sentinel: both `None` marks the day
    /// unavailable, exactly one `None` is rejected, and two real times must
    /// satisfy `start < end`. Nothing is written on failure.
    pub fn set_availability(
        &mut self,
        user_id: &str,
        day: DayOfWeek,
        start: Option<Minutes>,
        end: Option<Minutes>,
    ) -> Result<()> {
        if !self.profiles.contains_key(user_id) {
            return Err(AvailabilityError::UnknownUser(user_id.to_string()));
        }

        let entry = match (start, end) {
            (None, None) => DayAvailability::Unavailable,
            (Some(start), Some(end)) => {
                if start >= end {
                    return Err(AvailabilityError::InvalidRange {
                        start: format_minutes(start),
                        end: format_minutes(end),
                    });
                }
                DayAvailability::Available { start, end }
            }
            _ => return Err(AvailabilityError::InconsistentSentinel),
        };

        self.availability
            .entry(user_id.to_string())
            .or_default()
            .insert(day, entry);
        Ok(())
    }

    /// Deletes a user's profile and every availability entry.
    pub fn remove_user(&mut self, user_id: &str) -> Result<()> {
        if self.profiles.remove(user_id).is_none() {
            return Err(AvailabilityError::UnknownUser(user_id.to_string()));
        }
        self.availability.remove(user_id);
        Ok(())
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    /// A user's availability for every day, in week order.
    pub fn week(&self, user_id: &str) -> Result<Vec<(DayOfWeek, DayAvailability)>> {
        let week = self
            .availability
            .get(user_id)
            .ok_or_else(|| AvailabilityError::UnknownUser(user_id.to_string()))?;
        Ok(DayOfWeek::ALL
            .iter()
            .map(|&day| {
                (
                    day,
                    week.get(&day).copied().unwrap_or(DayAvailability::Unavailable),
                )
            })
            .collect())
    }
}

impl AvailabilityRepository for AvailabilityStore {
    fn list_available_intervals(&self, day: DayOfWeek) -> Vec<(Minutes, Minutes)> {
        self.availability
            .values()
            .filter_map(|week| match week.get(&day) {
                Some(DayAvailability::Available { start, end }) => Some((*start, *end)),
                _ => None,
            })
            .collect()
    }

    fn total_user_count(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            preferred_name: name.to_string(),
            email: format!("{}@example.edu", name),
            phone_number: "555-0100".to_string(),
            degree_major: "Computer Science".to_string(),
        }
    }

    #[test]
    fn registration_seeds_all_days_unavailable() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));

        assert_eq!(store.total_user_count(), 1);
        let week = store.week("1").unwrap();
        assert_eq!(week.len(), 7);
        assert!(week.iter().all(|(_, a)| *a == DayAvailability::Unavailable));
    }

    #[test]
    fn reregistration_keeps_existing_availability() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));
        store
            .set_availability("1", DayOfWeek::Monday, Some(540), Some(600))
            .unwrap();

        store.register_user("1", profile("alice-renamed"));
        assert_eq!(store.total_user_count(), 1);
        assert_eq!(store.profile("1").unwrap().preferred_name, "alice-renamed");
        assert_eq!(
            store.week("1").unwrap()[0].1,
            DayAvailability::Available { start: 540, end: 600 }
        );
    }

    #[test]
    fn upsert_replaces_prior_entry() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));
        store
            .set_availability("1", DayOfWeek::Monday, Some(540), Some(600))
            .unwrap();
        store
            .set_availability("1", DayOfWeek::Monday, Some(600), Some(660))
            .unwrap();

        assert_eq!(
            store.list_available_intervals(DayOfWeek::Monday),
            vec![(600, 660)]
        );
    }

    #[test]
    fn rejects_one_sided_sentinel() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));
        store
            .set_availability("1", DayOfWeek::Monday, Some(540), Some(600))
            .unwrap();

        let err = store
            .set_availability("1", DayOfWeek::Monday, Some(540), None)
            .unwrap_err();
        assert_eq!(err, AvailabilityError::InconsistentSentinel);
        // Failed write leaves the prior entry in place
        assert_eq!(
            store.list_available_intervals(DayOfWeek::Monday),
            vec![(540, 600)]
        );
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));

        assert_eq!(
            store.set_availability("1", DayOfWeek::Monday, Some(600), Some(600)),
            Err(AvailabilityError::InvalidRange {
                start: "10:00".to_string(),
                end: "10:00".to_string(),
            })
        );
        assert!(store
            .set_availability("1", DayOfWeek::Monday, Some(660), Some(600))
            .is_err());
        assert!(store.list_available_intervals(DayOfWeek::Monday).is_empty());
    }

    #[test]
    fn rejects_unknown_user() {
        let mut store = AvailabilityStore::new();
        assert_eq!(
            store.set_availability("404", DayOfWeek::Monday, None, None),
            Err(AvailabilityError::UnknownUser("404".to_string()))
        );
        assert_eq!(
            store.remove_user("404"),
            Err(AvailabilityError::UnknownUser("404".to_string()))
        );
    }

    #[test]
    fn snapshot_omits_unavailable_users() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));
        store.register_user("2", profile("bob"));
        store
            .set_availability("1", DayOfWeek::Tuesday, Some(540), Some(600))
            .unwrap();

        let mut intervals = store.list_available_intervals(DayOfWeek::Tuesday);
        intervals.sort();
        assert_eq!(intervals, vec![(540, 600)]);
        assert_eq!(store.total_user_count(), 2);
    }

    #[test]
    fn remove_user_drops_all_entries() {
        let mut store = AvailabilityStore::new();
        store.register_user("1", profile("alice"));
        store
            .set_availability("1", DayOfWeek::Monday, Some(540), Some(600))
            .unwrap();

        store.remove_user("1").unwrap();
        assert_eq!(store.total_user_count(), 0);
        assert!(store.profile("1").is_none());
        assert!(store.list_available_intervals(DayOfWeek::Monday).is_empty());
    }
}
