//! Core domain types for the gym split scheduler.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout templates and exercise specifications
//! - Progression snapshot (weights, reps, deload boundary)
//! - Existing calendar events and generated schedule events
//! - Run summary and the suggested state update

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Template Types
// ============================================================================

/// Progression rule class for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressionRule {
    /// Fixed sets x reps target; weight steps up once the rep target is hit
    Linear {
        sets: u32,
        base_reps: u32,
        target_reps: u32,
        weight_step_lbs: f64,
    },
    /// Per-set weight ladder; the whole ladder steps up every N occurrences
    /// of the owning template
    Ramping {
        base_reps: u32,
        default_ramp: Vec<f64>,
        step_lbs: f64,
        step_every: u32,
    },
}

/// A single exercise within a workout template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSpec {
    /// Key into `ProgressionSnapshot::exercise_state`
    pub id: String,
    pub name: String,
    pub equipment: String,
    pub rest_seconds: u32,
    pub notes: String,
    pub rule: ProgressionRule,
}

/// Warmup block at the top of a full workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WarmupSpec {
    pub duration_minutes: u32,
    pub exercises: Vec<String>,
}

/// Cardio tail of a workout (or the whole of a cardio-only session)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardioSpec {
    pub kind: String,
    pub duration_minutes: u32,
    pub intensity: String,
    pub notes: String,
}

/// Cooldown block at the end of a full workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CooldownSpec {
    pub duration_minutes: u32,
    pub notes: String,
}

/// One of the four rotation workouts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Stable key, e.g. "upper_push"
    pub id: String,
    /// Calendar event title, e.g. "Upper Push"
    pub title: String,
    pub focus: String,
    pub duration_minutes: u32,
    pub warmup: WarmupSpec,
    pub exercises: Vec<ExerciseSpec>,
    pub cardio: CardioSpec,
    pub cooldown: CooldownSpec,
}

/// The short post-class session that does not advance the rotation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardioOnlySession {
    pub title: String,
    pub description: String,
    pub cardio: CardioSpec,
}

/// The complete workout plan: the fixed rotation plus the cardio-only session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub rotation: Vec<WorkoutTemplate>,
    pub cardio_only: CardioOnlySession,
}

// ============================================================================
// Progression Snapshot Types
// ============================================================================

/// Per-exercise stored progression values
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseState {
    Linear {
        current_weight_lbs: f64,
        current_reps: u32,
    },
    Ramping {
        current_ramp: Vec<f64>,
        current_reps: u32,
    },
}

/// Immutable snapshot of the user's progression, loaded once per run.
///
/// The authoritative copy lives on disk and is edited by the user after
/// completing workouts; the engine reads it and never writes it back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    #[serde(default)]
    pub per_template_count: HashMap<String, u32>,

    #[serde(default)]
    pub total_full_workouts: u32,

    /// Threshold on `total_full_workouts`; always a multiple-of-8 boundary
    /// past the last deload point
    #[serde(default = "default_next_deload_at")]
    pub next_deload_at: u32,

    #[serde(default)]
    pub exercise_state: HashMap<String, ExerciseState>,
}

fn default_next_deload_at() -> u32 {
    8
}

impl Default for ProgressionSnapshot {
    fn default() -> Self {
        Self {
            per_template_count: HashMap::new(),
            total_full_workouts: 0,
            next_deload_at: default_next_deload_at(),
            exercise_state: HashMap::new(),
        }
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// An event already on the calendar, as fetched by the external source.
///
/// Timestamps are civil local time in the configured zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExistingEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Kind of generated event
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FullWorkout,
    CardioOnly,
}

/// A fully timestamped event to be created by the external sink
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub kind: EventKind,
    /// Template id for full workouts, `None` for cardio-only sessions
    pub template_id: Option<String>,
    pub title: String,
    pub description: String,
}

// ============================================================================
// Output Types
// ============================================================================

/// Counts and diagnostics for one generation run
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSummary {
    pub full_workouts: usize,
    pub cardio_sessions: usize,
    pub total: usize,
    pub classes_detected: usize,
    /// Non-fatal anomalies (e.g. exercises missing progression state)
    pub warnings: Vec<String>,
}

/// Explicit, not-auto-applied record of what the snapshot would look like
/// once every scheduled full workout has been completed.
///
/// The user folds this into the authoritative snapshot by hand; the engine
/// never mutates shared persisted state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestedUpdate {
    pub per_template_increment: HashMap<String, u32>,
    pub total_full_workouts: u32,
    pub next_deload_at: u32,
}
