//! Time-slot rule engine.
//!
//! The weekday/class-present timing logic is kept as an explicit decision
//! table (data, not nested branching) so the rule set is independently
//! testable and extensible:
//!
//! | Day type    | Class | Kind        | Start                 |
//! |-------------|-------|-------------|-----------------------|
//! | Mon/Fri     | no    | full        | 07:15                 |
//! | Mon/Fri     | yes   | cardio-only | class end + 30 min    |
//! | Tue/Wed/Thu | yes   | cardio-only | class end + 30 min    |
//! | Tue/Wed/Thu | no    | full        | 20:00                 |
//! | Sat/Sun     | yes   | full        | class end + 30 min    |
//! | Sat/Sun     | no    | full        | 15:00                 |

use crate::classes::{latest_end, ClassWindow};
use crate::config::SlotConfig;
use crate::types::EventKind;
use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// How a rule anchors the start time
#[derive(Clone, Copy, Debug, PartialEq)]
enum StartRule {
    Fixed(NaiveTime),
    AfterClasses,
}

/// One row of the decision table
#[derive(Clone, Debug)]
struct SlotRule {
    days: &'static [Weekday],
    with_class: bool,
    kind: EventKind,
    start: StartRule,
}

const MON_FRI: &[Weekday] = &[Weekday::Mon, Weekday::Fri];
const TUE_THU: &[Weekday] = &[Weekday::Tue, Weekday::Wed, Weekday::Thu];
const WEEKEND: &[Weekday] = &[Weekday::Sat, Weekday::Sun];

/// A resolved slot for one day
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub kind: EventKind,
    pub start: NaiveDateTime,
}

/// The full decision table plus timing parameters
#[derive(Clone, Debug)]
pub struct SlotTable {
    rules: Vec<SlotRule>,
    buffer: Duration,
    pub cardio_only_minutes: u32,
}

fn parse_hhmm(s: &str, field: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| Error::Config(format!("Invalid {} time '{}': {}", field, s, e)))
}

impl SlotTable {
    /// Build the table from slot configuration
    pub fn from_config(cfg: &SlotConfig) -> Result<Self> {
        let morning = parse_hhmm(&cfg.weekday_morning, "weekday_morning")?;
        let evening = parse_hhmm(&cfg.weekday_evening, "weekday_evening")?;
        let afternoon = parse_hhmm(&cfg.weekend_afternoon, "weekend_afternoon")?;

        let rules = vec![
            SlotRule {
                days: MON_FRI,
                with_class: false,
                kind: EventKind::FullWorkout,
                start: StartRule::Fixed(morning),
            },
            SlotRule {
                days: MON_FRI,
                with_class: true,
                kind: EventKind::CardioOnly,
                start: StartRule::AfterClasses,
            },
            SlotRule {
                days: TUE_THU,
                with_class: true,
                kind: EventKind::CardioOnly,
                start: StartRule::AfterClasses,
            },
            SlotRule {
                days: TUE_THU,
                with_class: false,
                kind: EventKind::FullWorkout,
                start: StartRule::Fixed(evening),
            },
            SlotRule {
                days: WEEKEND,
                with_class: true,
                kind: EventKind::FullWorkout,
                start: StartRule::AfterClasses,
            },
            SlotRule {
                days: WEEKEND,
                with_class: false,
                kind: EventKind::FullWorkout,
                start: StartRule::Fixed(afternoon),
            },
        ];

        Ok(Self {
            rules,
            buffer: Duration::minutes(i64::from(cfg.post_class_buffer_minutes)),
            cardio_only_minutes: cfg.cardio_only_minutes,
        })
    }

    /// Resolve the slot for one calendar day given its detected classes
    pub fn decide(&self, date: NaiveDate, windows: &[ClassWindow]) -> Result<Slot> {
        let weekday = date.weekday();
        let has_class = !windows.is_empty();

        let rule = self
            .rules
            .iter()
            .find(|r| r.with_class == has_class && r.days.contains(&weekday))
            .ok_or_else(|| {
                Error::Schedule(format!("No slot rule for {:?} (class: {})", weekday, has_class))
            })?;

        let start = match rule.start {
            StartRule::Fixed(time) => date.and_time(time),
            StartRule::AfterClasses => {
                let anchor = latest_end(windows).ok_or_else(|| {
                    Error::Schedule(format!("Post-class rule on {} without classes", date))
                })?;
                anchor + self.buffer
            }
        };

        tracing::debug!(
            "Slot for {} ({:?}, class: {}): {:?} at {}",
            date,
            weekday,
            has_class,
            rule.kind,
            start.time()
        );

        Ok(Slot {
            kind: rule.kind,
            start,
        })
    }
}
