use std::collections::HashMap;

use super::types::{CommonSlot, DayOfWeek};

/// Last computed common slots per day of the week.
///
/// The engine replaces a day wholesale after each recompute; everything else
/// only reads. Slots are never edited in place.
#[derive(Debug, Default)]
pub struct CommonAvailabilityCache {
    slots: HashMap<DayOfWeek, Vec<CommonSlot>>,
}

impl CommonAvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached slots for one day.
    pub fn replace_day(&mut self, day: DayOfWeek, slots: Vec<CommonSlot>) {
        self.slots.insert(day, slots);
    }

    /// Cached slots for one day; empty if the day was never computed.
    pub fn day(&self, day: DayOfWeek) -> &[CommonSlot] {
        self.slots.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Snapshot of every day's slots, in fixed week order.
    pub fn all(&self) -> Vec<(DayOfWeek, Vec<CommonSlot>)> {
        DayOfWeek::ALL
            .iter()
            .map(|&day| (day, self.day(day).to_vec()))
            .collect()
    }
}
