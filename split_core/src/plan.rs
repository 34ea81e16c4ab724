//! Built-in workout plan: the fixed 4-template rotation plus the
//! post-class cardio session.
//!
//! Rotation order is fixed configuration, loaded once and never mutated.

use crate::classes::ClassMatcher;
use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default plan - built once and reused across all operations
static DEFAULT_PLAN: Lazy<WorkoutPlan> = Lazy::new(build_default_plan);

/// Get a reference to the cached default plan
pub fn default_plan() -> &'static WorkoutPlan {
    &DEFAULT_PLAN
}

fn linear(
    id: &str,
    name: &str,
    equipment: &str,
    rest_seconds: u32,
    notes: &str,
) -> ExerciseSpec {
    ExerciseSpec {
        id: id.into(),
        name: name.into(),
        equipment: equipment.into(),
        rest_seconds,
        notes: notes.into(),
        rule: ProgressionRule::Linear {
            sets: 3,
            base_reps: 12,
            target_reps: 15,
            weight_step_lbs: 5.0,
        },
    }
}

fn stairmaster_25() -> CardioSpec {
    CardioSpec {
        kind: "Stairmaster".into(),
        duration_minutes: 25,
        intensity: "moderate".into(),
        notes: "Steady pace, no handrail leaning".into(),
    }
}

fn incline_walk_45() -> CardioSpec {
    CardioSpec {
        kind: "Incline treadmill walk".into(),
        duration_minutes: 45,
        intensity: "easy".into(),
        notes: "12% incline, conversational pace".into(),
    }
}

/// Builds the default plan with the built-in rotation and exercises
pub fn build_default_plan() -> WorkoutPlan {
    let upper_push = WorkoutTemplate {
        id: "upper_push".into(),
        title: "Upper Push".into(),
        focus: "Chest, shoulders, triceps".into(),
        duration_minutes: 85,
        warmup: WarmupSpec {
            duration_minutes: 8,
            exercises: vec![
                "Arm circles".into(),
                "Band pull-aparts".into(),
                "Push-ups x 10".into(),
            ],
        },
        exercises: vec![
            linear(
                "incline_db_press",
                "Incline Dumbbell Press",
                "dumbbells",
                90,
                "Keep elbows at 45 degrees",
            ),
            linear(
                "seated_shoulder_press",
                "Seated Shoulder Press",
                "dumbbells",
                90,
                "No lower-back arch",
            ),
            linear(
                "cable_chest_fly",
                "Cable Chest Fly",
                "cable stack",
                60,
                "Slight bend in elbows, squeeze at the midline",
            ),
            linear(
                "overhead_triceps_ext",
                "Overhead Triceps Extension",
                "rope attachment",
                60,
                "Full stretch at the bottom",
            ),
        ],
        cardio: stairmaster_25(),
        cooldown: CooldownSpec {
            duration_minutes: 5,
            notes: "Doorway pec stretch, overhead triceps stretch".into(),
        },
    };

    let lower_hamstring = WorkoutTemplate {
        id: "lower_hamstring_posterior".into(),
        title: "Lower Body - Hamstrings".into(),
        focus: "Hamstrings, glutes, posterior chain".into(),
        duration_minutes: 105,
        warmup: WarmupSpec {
            duration_minutes: 8,
            exercises: vec![
                "Leg swings".into(),
                "Bodyweight good mornings x 12".into(),
                "Glute bridges x 15".into(),
            ],
        },
        exercises: vec![
            linear(
                "romanian_deadlift",
                "Romanian Deadlift",
                "barbell",
                120,
                "Hinge, soft knees, bar close to the legs",
            ),
            linear(
                "lying_leg_curl",
                "Lying Leg Curl",
                "machine",
                60,
                "Slow eccentric, no hip lift",
            ),
            linear(
                "hip_thrust",
                "Hip Thrust",
                "barbell + bench",
                90,
                "Full lockout, chin tucked",
            ),
            linear(
                "seated_calf_raise",
                "Seated Calf Raise",
                "machine",
                45,
                "Pause at the stretch",
            ),
        ],
        cardio: incline_walk_45(),
        cooldown: CooldownSpec {
            duration_minutes: 5,
            notes: "Standing hamstring stretch, figure-four stretch".into(),
        },
    };

    let upper_pull = WorkoutTemplate {
        id: "upper_pull".into(),
        title: "Upper Pull".into(),
        focus: "Back, rear delts, biceps".into(),
        duration_minutes: 85,
        warmup: WarmupSpec {
            duration_minutes: 8,
            exercises: vec![
                "Scapular pull-ups x 8".into(),
                "Band face pulls x 15".into(),
                "Dead hang 30s".into(),
            ],
        },
        exercises: vec![
            linear(
                "lat_pulldown",
                "Lat Pulldown",
                "cable stack",
                90,
                "Drive elbows down, no swinging",
            ),
            linear(
                "seated_cable_row",
                "Seated Cable Row",
                "cable stack",
                90,
                "Chest up, pull to the sternum",
            ),
            linear(
                "face_pull",
                "Face Pull",
                "rope attachment",
                60,
                "External rotation at the top",
            ),
            linear(
                "db_curl",
                "Dumbbell Curl",
                "dumbbells",
                60,
                "No shoulder swing",
            ),
        ],
        cardio: stairmaster_25(),
        cooldown: CooldownSpec {
            duration_minutes: 5,
            notes: "Lat stretch on the rig, cross-body shoulder stretch".into(),
        },
    };

    let lower_quad = WorkoutTemplate {
        id: "lower_quad_glute".into(),
        title: "Lower Body - Quads".into(),
        focus: "Quads, glutes".into(),
        duration_minutes: 105,
        warmup: WarmupSpec {
            duration_minutes: 8,
            exercises: vec![
                "Bodyweight squats x 15".into(),
                "Walking lunges x 10".into(),
                "Ankle rocks".into(),
            ],
        },
        exercises: vec![
            ExerciseSpec {
                id: "squats".into(),
                name: "Squats".into(),
                equipment: "barbell".into(),
                rest_seconds: 120,
                notes: "Ramp up across the three sets; brace hard".into(),
                rule: ProgressionRule::Ramping {
                    base_reps: 8,
                    default_ramp: vec![30.0, 40.0, 55.0],
                    step_lbs: 5.0,
                    step_every: 2,
                },
            },
            linear(
                "leg_press",
                "Leg Press",
                "machine",
                90,
                "Feet mid-platform, full depth without tucking",
            ),
            linear(
                "leg_extension",
                "Leg Extension",
                "machine",
                60,
                "Pause at the top",
            ),
            linear(
                "walking_lunge",
                "Walking Lunge",
                "dumbbells",
                90,
                "Reps counted per leg",
            ),
        ],
        cardio: incline_walk_45(),
        cooldown: CooldownSpec {
            duration_minutes: 5,
            notes: "Couch stretch, standing quad stretch".into(),
        },
    };

    WorkoutPlan {
        rotation: vec![upper_push, lower_hamstring, upper_pull, lower_quad],
        cardio_only: CardioOnlySession {
            title: "Cardio Session".into(),
            description: "Short cardio slot after a class. Does not advance the rotation.".into(),
            cardio: CardioSpec {
                kind: "Stairmaster".into(),
                duration_minutes: 25,
                intensity: "moderate".into(),
                notes: "Legs are pre-fatigued; keep it steady".into(),
            },
        },
    }
}

impl WorkoutPlan {
    /// Pick the template for the nth full workout (rotation wraps)
    pub fn rotation_template(&self, n: u32) -> &WorkoutTemplate {
        &self.rotation[n as usize % self.rotation.len()]
    }

    /// Title keywords the external sink uses to find and delete previously
    /// generated workout events before recreating the month.
    pub fn generated_title_markers(&self) -> Vec<String> {
        let mut markers: Vec<String> = self.rotation.iter().map(|t| t.title.clone()).collect();
        markers.push(self.cardio_only.title.clone());
        markers
    }

    /// Validate the plan for consistency and completeness.
    ///
    /// Returns a list of validation errors, or empty Vec if valid. The
    /// matcher is needed to enforce the naming namespace: generated event
    /// titles must never contain a class-marker substring, otherwise a
    /// regenerated event would be misclassified as a class next run.
    pub fn validate(&self, matcher: &ClassMatcher) -> Vec<String> {
        let mut errors = Vec::new();

        if self.rotation.is_empty() {
            errors.push("Plan has an empty rotation".to_string());
        }

        let mut seen_ids = std::collections::HashSet::new();
        for template in &self.rotation {
            if template.id.is_empty() {
                errors.push("Template has empty id".to_string());
            }
            if !seen_ids.insert(template.id.clone()) {
                errors.push(format!("Duplicate template id '{}'", template.id));
            }
            if template.title.is_empty() {
                errors.push(format!("Template '{}' has empty title", template.id));
            }
            if template.duration_minutes == 0 {
                errors.push(format!("Template '{}' has zero duration", template.id));
            }
            if template.exercises.is_empty() {
                errors.push(format!("Template '{}' has no exercises", template.id));
            }
            if matcher.title_is_class(&template.title) {
                errors.push(format!(
                    "Template title '{}' collides with a class marker",
                    template.title
                ));
            }

            for exercise in &template.exercises {
                match &exercise.rule {
                    ProgressionRule::Linear {
                        base_reps,
                        target_reps,
                        ..
                    } => {
                        if target_reps < base_reps {
                            errors.push(format!(
                                "Exercise '{}': target reps {} < base reps {}",
                                exercise.id, target_reps, base_reps
                            ));
                        }
                    }
                    ProgressionRule::Ramping {
                        default_ramp,
                        step_every,
                        ..
                    } => {
                        if default_ramp.is_empty() {
                            errors.push(format!(
                                "Exercise '{}': ramping rule has empty default ramp",
                                exercise.id
                            ));
                        }
                        if *step_every == 0 {
                            errors.push(format!(
                                "Exercise '{}': ramping step_every must be > 0",
                                exercise.id
                            ));
                        }
                    }
                }
            }
        }

        if matcher.title_is_class(&self.cardio_only.title) {
            errors.push(format!(
                "Cardio-only title '{}' collides with a class marker",
                self.cardio_only.title
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_has_four_templates() {
        let plan = build_default_plan();
        assert_eq!(plan.rotation.len(), 4);
        assert_eq!(plan.rotation[0].id, "upper_push");
        assert_eq!(plan.rotation[1].id, "lower_hamstring_posterior");
        assert_eq!(plan.rotation[2].id, "upper_pull");
        assert_eq!(plan.rotation[3].id, "lower_quad_glute");
    }

    #[test]
    fn test_rotation_wraps() {
        let plan = build_default_plan();
        assert_eq!(plan.rotation_template(0).id, "upper_push");
        assert_eq!(plan.rotation_template(4).id, "upper_push");
        assert_eq!(plan.rotation_template(6).id, "upper_pull");
    }

    #[test]
    fn test_durations_match_rotation() {
        let plan = build_default_plan();
        assert_eq!(plan.rotation[0].duration_minutes, 85);
        assert_eq!(plan.rotation[1].duration_minutes, 105);
        assert_eq!(plan.rotation[2].duration_minutes, 85);
        assert_eq!(plan.rotation[3].duration_minutes, 105);
        assert_eq!(plan.cardio_only.cardio.duration_minutes, 25);
    }

    #[test]
    fn test_quad_day_has_ramping_squats() {
        let plan = build_default_plan();
        let quad = &plan.rotation[3];
        let squats = quad.exercises.iter().find(|e| e.id == "squats").unwrap();
        match &squats.rule {
            ProgressionRule::Ramping {
                default_ramp,
                step_lbs,
                step_every,
                ..
            } => {
                assert_eq!(default_ramp, &vec![30.0, 40.0, 55.0]);
                assert_eq!(*step_lbs, 5.0);
                assert_eq!(*step_every, 2);
            }
            _ => panic!("Squats should be a ramping exercise"),
        }
    }

    #[test]
    fn test_default_plan_validates() {
        let plan = build_default_plan();
        let errors = plan.validate(&ClassMatcher::default());
        assert!(errors.is_empty(), "Default plan has validation errors: {:?}", errors);
    }

    #[test]
    fn test_generated_titles_stay_out_of_class_namespace() {
        let plan = build_default_plan();
        let matcher = ClassMatcher::default();
        for marker in plan.generated_title_markers() {
            assert!(
                !matcher.title_is_class(&marker),
                "Generated title '{}' would be misclassified as a class",
                marker
            );
        }
    }

    #[test]
    fn test_title_markers_cover_all_generated_events() {
        let plan = build_default_plan();
        let markers = plan.generated_title_markers();
        assert!(markers.contains(&"Upper Push".to_string()));
        assert!(markers.contains(&"Cardio Session".to_string()));
        assert_eq!(markers.len(), 5);
    }
}
