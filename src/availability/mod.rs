pub mod cache;
pub mod engine;
pub mod service;
pub mod store;
pub mod time_utils;
pub mod types;

pub use cache::CommonAvailabilityCache;
pub use engine::CommonAvailabilityEngine;
pub use service::AvailabilityService;
pub use store::{AvailabilityRepository, AvailabilityStore};
pub use time_utils::{format_minutes, parse_time_literal, UNAVAILABLE_LITERAL};
pub use types::{CommonSlot, DayAvailability, DayOfWeek, UserProfile};
