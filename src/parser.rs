use csv::Reader;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityService, DayOfWeek, UserProfile, UNAVAILABLE_LITERAL};

/// One roster row: a user's contact details plus their raw start/end time
/// literals for every day of the week. Times stay as text here; validation
/// happens when the row is applied to a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: String,
    pub profile: UserProfile,
    /// (day, start literal, end literal), one per day in week order.
    pub times: Vec<(DayOfWeek, String, String)>,
}

/// Loads a roster from a CSV file.
///
/// Expected columns: `user_id`, `preferred_name`, `email`, `phone_number`,
/// `degree_major`, then `<day>_start` / `<day>_end` pairs (e.g.
/// `monday_start`). Missing time cells default to `N/A`. Duplicate user IDs
/// are merged with the last row winning, so a re-submission lower in the
/// file replaces the original.
pub fn load_roster<P: AsRef<Path>>(
    csv_path: P,
) -> Result<Vec<RosterEntry>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(csv_path)?;

    let headers = reader.headers()?.clone();
    let find = |needle: &str| -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(needle))
    };

    let id_col = find("user_id").ok_or("missing user_id column")?;
    let name_col = find("preferred_name").ok_or("missing preferred_name column")?;
    let email_col = find("email").ok_or("missing email column")?;
    let phone_col = find("phone_number").ok_or("missing phone_number column")?;
    let major_col = find("degree_major").ok_or("missing degree_major column")?;

    // (day, start column, end column); a day with no columns reads as N/A
    let day_cols: Vec<(DayOfWeek, Option<usize>, Option<usize>)> = DayOfWeek::ALL
        .iter()
        .map(|&day| {
            let lower = day.name().to_lowercase();
            (
                day,
                find(&format!("{}_start", lower)),
                find(&format!("{}_end", lower)),
            )
        })
        .collect();

    let mut entries_map: HashMap<String, RosterEntry> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for result in reader.records() {
        let record = result?;

        let user_id = record.get(id_col).unwrap_or("").trim().to_string();
        let preferred_name = record.get(name_col).unwrap_or("").trim().to_string();
        if user_id.is_empty() || preferred_name.is_empty() {
            continue; // Skip incomplete rows
        }

        let cell = |col: Option<usize>| -> String {
            let value = col
                .and_then(|c| record.get(c))
                .map(str::trim)
                .unwrap_or("");
            if value.is_empty() {
                UNAVAILABLE_LITERAL.to_string()
            } else {
                value.to_string()
            }
        };

        let times = day_cols
            .iter()
            .map(|&(day, start_col, end_col)| (day, cell(start_col), cell(end_col)))
            .collect();

        let entry = RosterEntry {
            user_id: user_id.clone(),
            profile: UserProfile {
                preferred_name,
                email: record.get(email_col).unwrap_or("").trim().to_string(),
                phone_number: record.get(phone_col).unwrap_or("").trim().to_string(),
                degree_major: record.get(major_col).unwrap_or("").trim().to_string(),
            },
            times,
        };

        if entries_map.insert(user_id.clone(), entry).is_none() {
            order.push(user_id);
        }
    }

    // Preserve first-seen order so output is stable across runs
    Ok(order
        .into_iter()
        .filter_map(|id| entries_map.remove(&id))
        .collect())
}

/// Builds a service from roster entries.
///
/// Registration always succeeds; each bad time pair is skipped and reported,
/// leaving that user unavailable for the day (matching the per-write
/// validation of the live API).
pub fn service_from_entries(entries: &[RosterEntry]) -> (AvailabilityService, Vec<String>) {
    let mut service = AvailabilityService::new();
    let mut problems = Vec::new();

    for entry in entries {
        service.register(&entry.user_id, entry.profile.clone());
    }
    for entry in entries {
        for (day, start, end) in &entry.times {
            if let Err(err) = service.set_availability(&entry.user_id, *day, start, end) {
                problems.push(format!("user {} on {}: {}", entry.user_id, day, err));
            }
        }
    }

    (service, problems)
}
