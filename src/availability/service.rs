use log::info;

use crate::error::Result;
use super::cache::CommonAvailabilityCache;
use super::engine::CommonAvailabilityEngine;
use super::store::{AvailabilityRepository, AvailabilityStore};
use super::time_utils::{format_minutes, parse_time_literal};
use super::types::{CommonSlot, DayAvailability, DayOfWeek, UserProfile};

/// Ties the store, engine, and cache together behind the text-literal API
/// used by the web and CLI surfaces.
///
/// All mutation goes through here so the cache always reflects the current
/// store contents: a write to one day recomputes that day, a population
/// change (register/remove) recomputes the whole week because it moves every
/// day's threshold. Holds no locks itself; callers serialize access (the web
/// layer wraps the whole service in one `Mutex`).
#[derive(Debug)]
pub struct AvailabilityService {
    store: AvailabilityStore,
    engine: CommonAvailabilityEngine,
    cache: CommonAvailabilityCache,
}

impl AvailabilityService {
    pub fn new() -> Self {
        Self::with_engine(CommonAvailabilityEngine::new())
    }

    pub fn with_engine(engine: CommonAvailabilityEngine) -> Self {
        Self {
            store: AvailabilityStore::new(),
            engine,
            cache: CommonAvailabilityCache::new(),
        }
    }

    /// Registers a user (or updates their profile) and refreshes the cache
    /// for every day, since the threshold depends on the population.
    pub fn register(&mut self, user_id: &str, profile: UserProfile) {
        self.store.register_user(user_id, profile);
        info!("registered user {}", user_id);
        self.recompute_week();
    }

    /// Sets a user's availability for one day from `HH:MM` / `N/A` literals
    /// and recomputes that day's common slots.
    pub fn set_availability(
        &mut self,
        user_id: &str,
        day: DayOfWeek,
        start_literal: &str,
        end_literal: &str,
    ) -> Result<()> {
        let start = parse_time_literal(start_literal)?;
        let end = parse_time_literal(end_literal)?;
        self.store.set_availability(user_id, day, start, end)?;
        info!("availability set for user {} on {}", user_id, day);
        self.recompute_day(day);
        Ok(())
    }

    /// Removes a user entirely and refreshes every day's cache.
    pub fn remove_user(&mut self, user_id: &str) -> Result<()> {
        self.store.remove_user(user_id)?;
        info!("removed user {}", user_id);
        self.recompute_week();
        Ok(())
    }

    /// Common slots for one day as `(start, end)` literals, sorted by start.
    pub fn common_availability(&self, day: DayOfWeek) -> Vec<(String, String)> {
        self.cache
            .day(day)
            .iter()
            .map(|slot| (format_minutes(slot.start), format_minutes(slot.end)))
            .collect()
    }

    /// Every day's common slots as literals, in fixed week order.
    pub fn all_common_availability(&self) -> Vec<(DayOfWeek, Vec<(String, String)>)> {
        DayOfWeek::ALL
            .iter()
            .map(|&day| (day, self.common_availability(day)))
            .collect()
    }

    /// Raw cached slots for one day.
    pub fn common_slots(&self, day: DayOfWeek) -> &[CommonSlot] {
        self.cache.day(day)
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.store.profile(user_id)
    }

    /// A user's own week, in week order.
    pub fn week(&self, user_id: &str) -> Result<Vec<(DayOfWeek, DayAvailability)>> {
        self.store.week(user_id)
    }

    pub fn total_user_count(&self) -> usize {
        self.store.total_user_count()
    }

    fn recompute_day(&mut self, day: DayOfWeek) {
        let slots = self.engine.compute_day(&self.store, day);
        self.cache.replace_day(day, slots);
    }

    fn recompute_week(&mut self) {
        for day in DayOfWeek::ALL {
            self.recompute_day(day);
        }
    }
}

impl Default for AvailabilityService {
    fn default() -> Self {
        Self::new()
    }
}
