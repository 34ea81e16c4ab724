#![forbid(unsafe_code)]

//! Core domain model and scheduling logic for the gym split scheduler.
//!
//! This crate provides:
//! - Domain types (templates, exercises, progression snapshot, events)
//! - The built-in workout plan
//! - Class-conflict detection and the time-slot decision table
//! - The month schedule generator
//! - Persistence helpers (snapshot, events file, run log, CSV export)

pub mod types;
pub mod error;
pub mod plan;
pub mod config;
pub mod logging;
pub mod classes;
pub mod slots;
pub mod progression;
pub mod engine;
pub mod state;
pub mod events;
pub mod runlog;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use plan::default_plan;
pub use config::Config;
pub use classes::{ClassMatcher, ClassWindow};
pub use slots::{Slot, SlotTable};
pub use progression::{next_prescription, suggested_update, Prescription};
pub use engine::{generate_month, Month, MonthSchedule, ScheduleContext};
pub use events::load_existing_events;
pub use runlog::{RunLog, RunRecord};
