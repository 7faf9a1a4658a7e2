use super::store::AvailabilityRepository;
use super::types::{CommonSlot, DayOfWeek, Minutes};

/// Fraction of the registered users that must be simultaneously free for a
/// moment to count as common.
pub const DEFAULT_FRACTION: f64 = 0.75;

/// Interval boundary event. `Start` sorts before `End`, so at equal
/// timestamps an opening interval is counted before a closing one is retired.
/// A back-to-back abutting pair therefore overlaps for one instant at the
/// boundary; see `compute_day` for how the degenerate window is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Start,
    End,
}

/// Computes common availability windows from per-day interval snapshots.
///
/// Pure and synchronous: the only inputs are the repository snapshot and the
/// configured fraction, so recomputing with unchanged data always yields the
/// same slots.
#[derive(Debug, Clone, Copy)]
pub struct CommonAvailabilityEngine {
    fraction: f64,
}

impl CommonAvailabilityEngine {
    pub fn new() -> Self {
        Self::with_fraction(DEFAULT_FRACTION)
    }

    pub fn with_fraction(fraction: f64) -> Self {
        Self { fraction }
    }

    /// Minimum number of concurrently available users required, given the
    /// current total population. Always at least 1 for a non-empty
    /// population, so a zero fraction never marks the whole day common.
    pub fn threshold(&self, total_users: usize) -> usize {
        ((self.fraction * total_users as f64).ceil() as usize).max(1)
    }

    /// Recomputes the common slots for one day from the repository snapshot.
    ///
    /// Sweep over sorted interval boundary events, maintaining the count of
    /// open intervals: a window opens when the count first reaches the
    /// threshold and closes on the end event that would drop it below.
    /// Emitted windows are maximal, sorted, and pairwise disjoint by
    /// construction.
    pub fn compute_day(
        &self,
        repo: &dyn AvailabilityRepository,
        day: DayOfWeek,
    ) -> Vec<CommonSlot> {
        let total_users = repo.total_user_count();
        if total_users == 0 {
            return Vec::new();
        }
        let required = self.threshold(total_users);

        let intervals = repo.list_available_intervals(day);
        let mut events: Vec<(Minutes, EventKind)> = Vec::with_capacity(intervals.len() * 2);
        for (start, end) in intervals {
            events.push((start, EventKind::Start));
            events.push((end, EventKind::End));
        }
        events.sort();

        let mut slots = Vec::new();
        let mut active = 0usize;
        let mut open_at: Option<Minutes> = None;
        for (time, kind) in events {
            match kind {
                EventKind::Start => {
                    active += 1;
                    if active >= required && open_at.is_none() {
                        open_at = Some(time);
                    }
                }
                EventKind::End => {
                    // Close only when this end drops the count below the
                    // threshold; an end that leaves the count at or above it
                    // must not split the window.
                    if active == required {
                        if let Some(start) = open_at.take() {
                            // The start-before-end tie-break can open and
                            // close at the same instant on abutting
                            // intervals; slots are half-open minute ranges,
                            // so that zero-length window is dropped.
                            if start < time {
                                slots.push(CommonSlot { day, start, end: time });
                            }
                        }
                    }
                    active -= 1;
                }
            }
        }

        slots
    }
}

impl Default for CommonAvailabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
