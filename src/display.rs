use std::fs::File;
use std::io::Write;

use chrono::Utc;

use crate::availability::{AvailabilityService, DayOfWeek};
use crate::parser::RosterEntry;

/// Formats a user's display name with their degree major as a tag.
pub fn format_user_name(degree_major: &str, preferred_name: &str) -> String {
    if degree_major.is_empty() {
        preferred_name.to_string()
    } else {
        format!("[{}] {}", degree_major, preferred_name)
    }
}

/// Formats one common slot as a time range, e.g. "10:00 - 10:30".
pub fn format_slot(start_literal: &str, end_literal: &str) -> String {
    format!("{} - {}", start_literal, end_literal)
}

/// Prints the loaded roster, one user per line.
pub fn print_roster(entries: &[RosterEntry]) {
    println!("\n=== Roster ===");
    for entry in entries {
        let formatted_name =
            format_user_name(&entry.profile.degree_major, &entry.profile.preferred_name);
        println!("  {} (ID: {})", formatted_name, entry.user_id);
    }
}

/// Prints the week's common availability in a readable format.
pub fn print_week_overview(service: &AvailabilityService) {
    println!("\n=== Common Availability ===");
    println!("Registered users: {}", service.total_user_count());

    for (day, slots) in service.all_common_availability() {
        if slots.is_empty() {
            println!("  {}: No common slots", day);
        } else {
            let times: Vec<String> = slots
                .iter()
                .map(|(start, end)| format_slot(start, end))
                .collect();
            println!("  {}: {}", day, times.join(", "));
        }
    }
}

/// Writes the week's common availability to a file, one day per line.
pub fn write_week_to_file(
    service: &AvailabilityService,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Common Availability **")?;
    writeln!(file, "Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC"))?;

    for day in DayOfWeek::ALL {
        let slots = service.common_availability(day);
        if slots.is_empty() {
            writeln!(file, "{}: No common slots", day)?;
        } else {
            let times: Vec<String> = slots
                .iter()
                .map(|(start, end)| format_slot(start, end))
                .collect();
            writeln!(file, "{}: {}", day, times.join(", "))?;
        }
    }

    Ok(())
}
