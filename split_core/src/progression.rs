//! Progression state machine: computes the effective prescription for the
//! next occurrence of a template.
//!
//! All computation here is display-only. The engine renders what the user
//! should lift next time; the authoritative counters and weights in the
//! persisted snapshot are edited by the user after completing workouts,
//! never by this code.

use crate::config::ProgressionConfig;
use crate::types::{
    ExerciseSpec, ExerciseState, ProgressionRule, ProgressionSnapshot, ScheduledEvent,
    SuggestedUpdate, WorkoutTemplate,
};
use crate::EventKind;
use std::collections::HashMap;

/// Rendered prescription for one occurrence of a template
#[derive(Clone, Debug)]
pub struct Prescription {
    pub exercise_lines: Vec<String>,
    pub is_deload: bool,
    pub warnings: Vec<String>,
}

/// True when the full workout about to be scheduled lands on the deload
/// boundary (it would be the 8th since the last deload).
pub fn deload_pending(local_total: u32, next_deload_at: u32) -> bool {
    local_total + 1 == next_deload_at
}

/// Format a weight without a trailing `.0`
fn fmt_weight(lbs: f64) -> String {
    if (lbs - lbs.round()).abs() < 1e-9 {
        format!("{}", lbs.round() as i64)
    } else {
        format!("{:.1}", lbs)
    }
}

/// Compute the rendered prescription for the next occurrence of `template`.
///
/// `is_deload` is decided by the caller from the local running counter; when
/// set, every displayed weight (ramping included) is multiplied by the
/// configured deload factor with reps unchanged, for this occurrence only.
pub fn next_prescription(
    template: &WorkoutTemplate,
    snapshot: &ProgressionSnapshot,
    is_deload: bool,
    cfg: &ProgressionConfig,
) -> Prescription {
    let mut lines = Vec::new();
    let mut warnings = Vec::new();

    for (i, exercise) in template.exercises.iter().enumerate() {
        match &exercise.rule {
            ProgressionRule::Linear { .. } => {
                render_linear(i + 1, exercise, snapshot, is_deload, cfg, &mut lines, &mut warnings)
            }
            ProgressionRule::Ramping { .. } => render_ramping(
                i + 1,
                template,
                exercise,
                snapshot,
                is_deload,
                cfg,
                &mut lines,
                &mut warnings,
            ),
        }
    }

    if is_deload {
        tracing::info!("Deload occurrence for template '{}'", template.id);
    }

    Prescription {
        exercise_lines: lines,
        is_deload,
        warnings,
    }
}

#[allow(clippy::too_many_arguments)]
fn render_linear(
    position: usize,
    exercise: &ExerciseSpec,
    snapshot: &ProgressionSnapshot,
    is_deload: bool,
    cfg: &ProgressionConfig,
    lines: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let (sets, base_reps, target_reps, step) = match exercise.rule {
        ProgressionRule::Linear {
            sets,
            base_reps,
            target_reps,
            weight_step_lbs,
        } => (sets, base_reps, target_reps, weight_step_lbs),
        _ => unreachable!("render_linear called for non-linear rule"),
    };

    let stored = snapshot.exercise_state.get(&exercise.id);

    let (mut weight, mut reps, fresh) = match stored {
        Some(ExerciseState::Linear {
            current_weight_lbs,
            current_reps,
        }) => (*current_weight_lbs, *current_reps, false),
        _ => {
            warnings.push(format!(
                "No progression state for '{}'; prescribing base reps at zero weight",
                exercise.id
            ));
            tracing::warn!("Missing progression state for exercise '{}'", exercise.id);
            (0.0, base_reps, true)
        }
    };

    // Rep target hit: step the weight and reset reps, unless a deload is
    // pending for this occurrence
    if !fresh && reps >= target_reps && !is_deload {
        weight += step;
        reps = base_reps;
        tracing::debug!(
            "Linear progression for '{}': weight stepped to {}",
            exercise.id,
            weight
        );
    }

    if is_deload {
        weight *= cfg.deload_factor;
    }

    lines.push(format!("{}. {} ({})", position, exercise.name, exercise.equipment));
    let mut work_line = format!(
        "   {} sets x {} reps @ {} lbs | Rest: {}s",
        sets,
        reps,
        fmt_weight(weight),
        exercise.rest_seconds
    );
    if fresh {
        work_line.push_str(" (no recorded weight - start light)");
    }
    lines.push(work_line);
    lines.push(format!("   -> {}", exercise.notes));
    lines.push(String::new());
}

#[allow(clippy::too_many_arguments)]
fn render_ramping(
    position: usize,
    template: &WorkoutTemplate,
    exercise: &ExerciseSpec,
    snapshot: &ProgressionSnapshot,
    is_deload: bool,
    cfg: &ProgressionConfig,
    lines: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let (base_reps, default_ramp, step_lbs, step_every) = match &exercise.rule {
        ProgressionRule::Ramping {
            base_reps,
            default_ramp,
            step_lbs,
            step_every,
        } => (*base_reps, default_ramp, *step_lbs, *step_every),
        _ => unreachable!("render_ramping called for non-ramping rule"),
    };

    let (ramp, reps) = match snapshot.exercise_state.get(&exercise.id) {
        Some(ExerciseState::Ramping {
            current_ramp,
            current_reps,
        }) => (current_ramp.clone(), *current_reps),
        _ => {
            warnings.push(format!(
                "No progression state for '{}'; using the default ramp",
                exercise.id
            ));
            tracing::warn!("Missing ramping state for exercise '{}'", exercise.id);
            (default_ramp.clone(), base_reps)
        }
    };

    // The ladder steps up as a unit every `step_every` completed
    // occurrences of the owning template
    let occurrences = snapshot
        .per_template_count
        .get(&template.id)
        .copied()
        .unwrap_or(0);
    let bump = step_lbs * f64::from(occurrences / step_every);

    lines.push(format!("{}. {} ({})", position, exercise.name, exercise.equipment));
    for (set, base) in ramp.iter().enumerate() {
        let mut weight = base + bump;
        if is_deload {
            weight *= cfg.deload_factor;
        }
        lines.push(format!(
            "   Set {}: {} reps @ {} lbs",
            set + 1,
            reps,
            fmt_weight(weight)
        ));
    }
    lines.push(format!("   Rest: {}s", exercise.rest_seconds));
    lines.push(format!("   -> {}", exercise.notes));
    lines.push(String::new());
}

/// Build the suggested snapshot update for a generated month.
///
/// Reflects the state the user should record once every scheduled full
/// workout is completed: per-template increments, the new total, and the
/// deload boundary advanced past it.
pub fn suggested_update(
    snapshot: &ProgressionSnapshot,
    scheduled: &[ScheduledEvent],
    cfg: &ProgressionConfig,
) -> SuggestedUpdate {
    let mut increments: HashMap<String, u32> = HashMap::new();
    let mut fulls = 0u32;

    for event in scheduled {
        if event.kind == EventKind::FullWorkout {
            if let Some(id) = &event.template_id {
                *increments.entry(id.clone()).or_insert(0) += 1;
            }
            fulls += 1;
        }
    }

    let total = snapshot.total_full_workouts + fulls;
    let mut next_deload_at = snapshot.next_deload_at;
    // A zero spacing is rejected by the engine; leave the boundary where
    // it is rather than loop without advancing
    if cfg.deload_every > 0 {
        while total >= next_deload_at {
            next_deload_at += cfg.deload_every;
        }
    }

    SuggestedUpdate {
        per_template_increment: increments,
        total_full_workouts: total,
        next_deload_at,
    }
}
