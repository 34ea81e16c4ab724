//! Schedule generator: one pass over every day of the target month.
//!
//! The generator is a pure function of (month, existing events, plan,
//! progression snapshot): it never performs I/O and never mutates persisted
//! state. Regenerating with identical inputs produces identical output;
//! duplicate suppression on the calendar is the external sink's job
//! (delete-then-recreate, driven by the plan's title markers).

use crate::classes::ClassMatcher;
use crate::config::ProgressionConfig;
use crate::progression::{deload_pending, next_prescription, suggested_update, Prescription};
use crate::slots::SlotTable;
use crate::types::*;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Month
// ============================================================================

/// A validated target month (`YYYY-MM`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// Construct a month, failing on out-of-range values
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| Error::InvalidMonth(format!("{:04}-{:02}", year, month)))
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Every calendar day of the month, in date order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.first.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    /// Number of calendar days in the month
    pub fn days(&self) -> u32 {
        self.dates().count() as u32
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Month::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Inputs for one generation run
#[derive(Clone, Debug)]
pub struct ScheduleContext<'a> {
    pub month: Month,
    pub existing_events: &'a [ExistingEvent],
    pub snapshot: &'a ProgressionSnapshot,
    pub matcher: &'a ClassMatcher,
    pub slots: &'a SlotTable,
    pub progression: &'a ProgressionConfig,
}

/// The full output of one generation run
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MonthSchedule {
    pub month: Month,
    pub events: Vec<ScheduledEvent>,
    pub summary: ScheduleSummary,
    pub suggested: SuggestedUpdate,
}

/// Generate the workout schedule for one month.
///
/// Walks every calendar day in order: classify the day's classes, resolve
/// the time slot, and for full workouts pick the next rotation template and
/// compute its prescription. The rotation pointer is a local counter seeded
/// from the snapshot's `total_full_workouts` and advanced only by full
/// workouts scheduled in this run, never recomputed from calendar contents.
pub fn generate_month(plan: &WorkoutPlan, ctx: &ScheduleContext<'_>) -> Result<MonthSchedule> {
    if ctx.progression.deload_every == 0 {
        return Err(Error::Config(
            "deload_every must be greater than zero".to_string(),
        ));
    }

    let plan_errors = plan.validate(ctx.matcher);
    if !plan_errors.is_empty() {
        return Err(Error::PlanValidation(plan_errors.join("; ")));
    }

    let mut events = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut classes_detected = 0usize;
    let mut local_total = ctx.snapshot.total_full_workouts;

    for date in ctx.month.dates() {
        let windows = ctx.matcher.classes_on(date, ctx.existing_events);
        classes_detected += windows.len();

        let slot = ctx.slots.decide(date, &windows)?;

        match slot.kind {
            EventKind::FullWorkout => {
                let template = plan.rotation_template(local_total);
                let is_deload = deload_pending(local_total, ctx.snapshot.next_deload_at);
                let prescription =
                    next_prescription(template, ctx.snapshot, is_deload, ctx.progression);

                for warning in &prescription.warnings {
                    if !warnings.contains(warning) {
                        warnings.push(warning.clone());
                    }
                }

                tracing::info!(
                    "Scheduled full workout '{}' on {} at {}{}",
                    template.title,
                    date,
                    slot.start.time(),
                    if is_deload { " (deload)" } else { "" }
                );

                events.push(ScheduledEvent {
                    date,
                    start: slot.start,
                    duration_minutes: template.duration_minutes,
                    kind: EventKind::FullWorkout,
                    template_id: Some(template.id.clone()),
                    title: template.title.clone(),
                    description: render_full_description(template, &prescription),
                });

                local_total += 1;
            }

            EventKind::CardioOnly => {
                tracing::info!(
                    "Scheduled cardio-only session on {} at {}",
                    date,
                    slot.start.time()
                );

                events.push(ScheduledEvent {
                    date,
                    start: slot.start,
                    duration_minutes: ctx.slots.cardio_only_minutes,
                    kind: EventKind::CardioOnly,
                    template_id: None,
                    title: plan.cardio_only.title.clone(),
                    description: render_cardio_description(&plan.cardio_only),
                });
            }
        }
    }

    let full_workouts = events
        .iter()
        .filter(|e| e.kind == EventKind::FullWorkout)
        .count();
    let cardio_sessions = events.len() - full_workouts;

    let suggested = suggested_update(ctx.snapshot, &events, ctx.progression);

    tracing::info!(
        "Generated schedule for {}: {} full workouts + {} cardio sessions = {} events",
        ctx.month,
        full_workouts,
        cardio_sessions,
        events.len()
    );

    Ok(MonthSchedule {
        month: ctx.month,
        summary: ScheduleSummary {
            full_workouts,
            cardio_sessions,
            total: events.len(),
            classes_detected,
            warnings,
        },
        events,
        suggested,
    })
}

// ============================================================================
// Description rendering
// ============================================================================

fn render_full_description(template: &WorkoutTemplate, prescription: &Prescription) -> String {
    let mut lines = vec![
        template.title.to_uppercase(),
        format!("Focus: {}", template.focus),
        String::new(),
    ];

    if prescription.is_deload {
        lines.push("DELOAD - all weights reduced 20% (reps unchanged)".into());
        lines.push(String::new());
    }

    lines.push(format!("WARMUP ({} min):", template.warmup.duration_minutes));
    for exercise in &template.warmup.exercises {
        lines.push(format!("- {}", exercise));
    }
    lines.push(String::new());

    lines.push("MAIN WORKOUT:".into());
    lines.push(String::new());
    lines.extend(prescription.exercise_lines.iter().cloned());

    lines.push("CARDIO:".into());
    lines.push(format!(
        "{} - {} minutes ({})",
        template.cardio.kind, template.cardio.duration_minutes, template.cardio.intensity
    ));
    lines.push(format!("Note: {}", template.cardio.notes));
    lines.push(String::new());

    lines.push(format!(
        "COOLDOWN ({} min):",
        template.cooldown.duration_minutes
    ));
    lines.push(template.cooldown.notes.clone());

    lines.join("\n")
}

fn render_cardio_description(session: &CardioOnlySession) -> String {
    let lines = vec![
        session.title.to_uppercase(),
        String::new(),
        session.description.clone(),
        String::new(),
        "CARDIO:".into(),
        format!(
            "{} - {} minutes ({})",
            session.cardio.kind, session.cardio.duration_minutes, session.cardio.intensity
        ),
        format!("Note: {}", session.cardio.notes),
    ];

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotConfig;
    use crate::plan::build_default_plan;
    use chrono::Weekday;

    struct Fixture {
        plan: WorkoutPlan,
        snapshot: ProgressionSnapshot,
        matcher: ClassMatcher,
        slots: SlotTable,
        progression: ProgressionConfig,
        existing: Vec<ExistingEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                plan: build_default_plan(),
                snapshot: ProgressionSnapshot::default(),
                matcher: ClassMatcher::default(),
                slots: SlotTable::from_config(&SlotConfig::default()).unwrap(),
                progression: ProgressionConfig::default(),
                existing: Vec::new(),
            }
        }

        fn generate(&self, month: &str) -> MonthSchedule {
            let ctx = ScheduleContext {
                month: month.parse().unwrap(),
                existing_events: &self.existing,
                snapshot: &self.snapshot,
                matcher: &self.matcher,
                slots: &self.slots,
                progression: &self.progression,
            };
            generate_month(&self.plan, &ctx).unwrap()
        }
    }

    fn class(day: NaiveDate, start: (u32, u32), end: (u32, u32)) -> ExistingEvent {
        ExistingEvent {
            title: "Solidcore Signature50".into(),
            start: day.and_hms_opt(start.0, start.1, 0).unwrap(),
            end: day.and_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn test_month_parsing() {
        let month: Month = "2026-09".parse().unwrap();
        assert_eq!(month.year(), 2026);
        assert_eq!(month.month(), 9);
        assert_eq!(month.days(), 30);
        assert_eq!(month.to_string(), "2026-09");

        assert!("2026-13".parse::<Month>().is_err());
        assert!("202609".parse::<Month>().is_err());
        assert!("sept-2026".parse::<Month>().is_err());
    }

    #[test]
    fn test_one_event_per_calendar_day() {
        let fixture = Fixture::new();
        for month in ["2026-02", "2026-09", "2026-10", "2028-02"] {
            let schedule = fixture.generate(month);
            let parsed: Month = month.parse().unwrap();
            assert_eq!(schedule.events.len() as u32, parsed.days());
            assert_eq!(schedule.summary.total, schedule.events.len());
        }
    }

    #[test]
    fn test_month_with_no_classes_is_all_full_workouts() {
        let fixture = Fixture::new();
        let schedule = fixture.generate("2026-09");

        assert_eq!(schedule.summary.full_workouts, 30);
        assert_eq!(schedule.summary.cardio_sessions, 0);
        assert_eq!(schedule.summary.classes_detected, 0);

        for event in &schedule.events {
            assert_eq!(event.kind, EventKind::FullWorkout);
            let expected = match event.date.weekday() {
                Weekday::Mon | Weekday::Fri => (7, 15),
                Weekday::Tue | Weekday::Wed | Weekday::Thu => (20, 0),
                Weekday::Sat | Weekday::Sun => (15, 0),
            };
            assert_eq!(
                event.start,
                event.date.and_hms_opt(expected.0, expected.1, 0).unwrap(),
                "wrong start on {}",
                event.date
            );
        }
    }

    #[test]
    fn test_rotation_cycles_in_fixed_order() {
        let fixture = Fixture::new();
        let schedule = fixture.generate("2026-09");

        let expected = [
            "upper_push",
            "lower_hamstring_posterior",
            "upper_pull",
            "lower_quad_glute",
        ];
        for (i, event) in schedule.events.iter().enumerate() {
            assert_eq!(
                event.template_id.as_deref(),
                Some(expected[i % 4]),
                "wrong template at position {}",
                i
            );
        }
    }

    #[test]
    fn test_rotation_seeded_from_snapshot_counter() {
        let mut fixture = Fixture::new();
        fixture.snapshot.total_full_workouts = 2;
        // Keep the seeded counter clear of the deload boundary
        fixture.snapshot.next_deload_at = 80;
        let schedule = fixture.generate("2026-09");

        assert_eq!(schedule.events[0].template_id.as_deref(), Some("upper_pull"));
        assert_eq!(
            schedule.events[1].template_id.as_deref(),
            Some("lower_quad_glute")
        );
        assert_eq!(schedule.events[2].template_id.as_deref(), Some("upper_push"));
    }

    #[test]
    fn test_wednesday_class_becomes_cardio_and_skips_rotation() {
        let mut fixture = Fixture::new();
        // Wednesday 2026-09-02, class ending 19:10
        let wednesday = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        fixture.existing = vec![class(wednesday, (18, 20), (19, 10))];

        let schedule = fixture.generate("2026-09");
        let event = schedule
            .events
            .iter()
            .find(|e| e.date == wednesday)
            .unwrap();

        assert_eq!(event.kind, EventKind::CardioOnly);
        assert_eq!(event.start, wednesday.and_hms_opt(19, 40, 0).unwrap());
        assert_eq!(event.duration_minutes, 25);
        assert_eq!(event.template_id, None);
        assert_eq!(event.title, "Cardio Session");

        // Rotation is unaffected: Thursday gets the template Wednesday
        // would have had
        let thursday = NaiveDate::from_ymd_opt(2026, 9, 3).unwrap();
        let next = schedule.events.iter().find(|e| e.date == thursday).unwrap();
        assert_eq!(
            next.template_id.as_deref(),
            Some("lower_hamstring_posterior")
        );

        assert_eq!(schedule.summary.full_workouts, 29);
        assert_eq!(schedule.summary.cardio_sessions, 1);
        assert_eq!(schedule.summary.classes_detected, 1);
    }

    #[test]
    fn test_deload_occurrence_renders_reduced_weights() {
        let mut fixture = Fixture::new();
        fixture.snapshot.total_full_workouts = 7;
        fixture.snapshot.next_deload_at = 8;
        fixture.snapshot.exercise_state.insert(
            "squats".into(),
            ExerciseState::Ramping {
                current_ramp: vec![30.0, 40.0, 55.0],
                current_reps: 8,
            },
        );

        let schedule = fixture.generate("2026-09");

        // Seeded at 7: the first scheduled workout is the 8th and deloads
        let first = &schedule.events[0];
        assert_eq!(first.template_id.as_deref(), Some("lower_quad_glute"));
        assert!(first.description.contains("DELOAD"));
        assert!(first.description.contains("Set 1: 8 reps @ 24 lbs"));

        // The next occurrence of the same template is back to full weight
        let next = schedule
            .events
            .iter()
            .skip(1)
            .find(|e| e.template_id.as_deref() == Some("lower_quad_glute"))
            .unwrap();
        assert!(!next.description.contains("DELOAD"));
        assert!(next.description.contains("Set 1: 8 reps @ 30 lbs"));
    }

    #[test]
    fn test_zero_deload_spacing_is_rejected() {
        let mut fixture = Fixture::new();
        fixture.progression.deload_every = 0;
        fixture.snapshot.total_full_workouts = 8;
        fixture.snapshot.next_deload_at = 8;

        let ctx = ScheduleContext {
            month: "2026-09".parse().unwrap(),
            existing_events: &fixture.existing,
            snapshot: &fixture.snapshot,
            matcher: &fixture.matcher,
            slots: &fixture.slots,
            progression: &fixture.progression,
        };

        let err = generate_month(&fixture.plan, &ctx).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got: {:?}", err);
    }

    #[test]
    fn test_idempotent_regeneration() {
        let mut fixture = Fixture::new();
        let saturday = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        fixture.existing = vec![class(saturday, (9, 0), (9, 50))];
        fixture.snapshot.total_full_workouts = 5;

        let first = fixture.generate("2026-09");
        let second = fixture.generate("2026-09");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_state_surfaces_warnings_not_errors() {
        let fixture = Fixture::new();
        let schedule = fixture.generate("2026-09");
        assert!(!schedule.summary.warnings.is_empty());
        // Deduplicated: one warning per exercise, not per occurrence
        let squat_warnings = schedule
            .summary
            .warnings
            .iter()
            .filter(|w| w.contains("squats"))
            .count();
        assert_eq!(squat_warnings, 1);
    }

    #[test]
    fn test_suggested_update_matches_generated_month() {
        let mut fixture = Fixture::new();
        fixture.snapshot.total_full_workouts = 3;
        fixture.snapshot.next_deload_at = 8;

        let schedule = fixture.generate("2026-09");
        assert_eq!(
            schedule.suggested.total_full_workouts,
            3 + schedule.summary.full_workouts as u32
        );
        let incremented: u32 = schedule.suggested.per_template_increment.values().sum();
        assert_eq!(incremented, schedule.summary.full_workouts as u32);
        assert!(schedule.suggested.next_deload_at > schedule.suggested.total_full_workouts);
    }

    #[test]
    fn test_descriptions_have_all_sections() {
        let fixture = Fixture::new();
        let schedule = fixture.generate("2026-09");

        let full = &schedule.events[0];
        for section in ["Focus:", "WARMUP", "MAIN WORKOUT:", "CARDIO:", "COOLDOWN"] {
            assert!(
                full.description.contains(section),
                "missing section {} in:\n{}",
                section,
                full.description
            );
        }
    }
}
