//! Built-in exercise reference data.

use tracing::warn;
use workout_core::model::{Exercise, ExerciseCategory, ExerciseDraft, ExerciseId};

struct Seed {
    id: &'static str,
    name: &'static str,
    category: ExerciseCategory,
    muscles: &'static [&'static str],
    description: &'static str,
    instructions: &'static [&'static str],
    tips: &'static [&'static str],
    safety_tips: &'static [&'static str],
}

use ExerciseCategory::{Arms, Back, Chest, Core, Legs, Shoulders};

const SEEDS: &[Seed] = &[
    // ─── CHEST ───
    Seed {
        id: "bench-press",
        name: "Bench Press",
        category: Chest,
        muscles: &["Pectorals", "Triceps", "Front Deltoids"],
        description: "Barbell press from a flat bench.",
        instructions: &[
            "Lie flat with eyes under the bar",
            "Lower the bar to mid-chest",
            "Press back up to lockout",
        ],
        tips: &["Keep shoulder blades pinched"],
        safety_tips: &["Use a spotter for heavy sets"],
    },
    Seed {
        id: "incline-bench-press",
        name: "Incline Bench Press",
        category: Chest,
        muscles: &["Upper Pectorals", "Front Deltoids"],
        description: "Bench press on a 30-45 degree incline.",
        instructions: &["Set the bench to an incline", "Lower to upper chest", "Press up"],
        tips: &["Avoid flaring elbows"],
        safety_tips: &["Use a spotter for heavy sets"],
    },
    Seed {
        id: "chest-press",
        name: "Chest Press",
        category: Chest,
        muscles: &["Pectorals", "Triceps"],
        description: "Machine-guided horizontal press.",
        instructions: &["Adjust the seat so handles sit at chest height", "Press forward"],
        tips: &["Control the return"],
        safety_tips: &["Do not lock elbows hard"],
    },
    Seed {
        id: "dumbbell-fly",
        name: "Dumbbell Fly",
        category: Chest,
        muscles: &["Pectorals"],
        description: "Wide-arc dumbbell movement on a flat bench.",
        instructions: &["Start with arms extended over chest", "Open arms in an arc", "Squeeze back up"],
        tips: &["Keep a slight bend in the elbows"],
        safety_tips: &["Stop at a comfortable stretch"],
    },
    Seed {
        id: "push-up",
        name: "Push-Up",
        category: Chest,
        muscles: &["Pectorals", "Triceps", "Core"],
        description: "Bodyweight press from the floor.",
        instructions: &["Hands under shoulders", "Lower chest to the floor", "Push back up"],
        tips: &["Keep a straight line from head to heels"],
        safety_tips: &[],
    },
    Seed {
        id: "cable-crossover",
        name: "Cable Crossover",
        category: Chest,
        muscles: &["Pectorals"],
        description: "Standing cable fly between two pulleys.",
        instructions: &["Step forward from the pulleys", "Bring handles together in front of chest"],
        tips: &["Lean slightly forward"],
        safety_tips: &[],
    },
    // ─── BACK ───
    Seed {
        id: "deadlift",
        name: "Deadlift",
        category: Back,
        muscles: &["Erector Spinae", "Glutes", "Hamstrings"],
        description: "Barbell lift from the floor to hip height.",
        instructions: &["Bar over mid-foot", "Brace and grip", "Stand up by driving through the floor"],
        tips: &["Keep the bar close to the body"],
        safety_tips: &["Keep a neutral spine throughout"],
    },
    Seed {
        id: "pull-up",
        name: "Pull-Up",
        category: Back,
        muscles: &["Latissimus Dorsi", "Biceps"],
        description: "Bodyweight vertical pull.",
        instructions: &["Hang with an overhand grip", "Pull chin over the bar", "Lower under control"],
        tips: &["Avoid kipping"],
        safety_tips: &[],
    },
    Seed {
        id: "barbell-row",
        name: "Barbell Row",
        category: Back,
        muscles: &["Latissimus Dorsi", "Rhomboids", "Rear Deltoids"],
        description: "Bent-over barbell pull to the torso.",
        instructions: &["Hinge at the hips", "Row the bar to the lower ribs"],
        tips: &["Lead with the elbows"],
        safety_tips: &["Keep the lower back flat"],
    },
    Seed {
        id: "lat-pulldown",
        name: "Lat Pulldown",
        category: Back,
        muscles: &["Latissimus Dorsi", "Biceps"],
        description: "Cable vertical pull to the upper chest.",
        instructions: &["Grip wider than shoulders", "Pull the bar to the upper chest"],
        tips: &["Do not lean far back"],
        safety_tips: &[],
    },
    Seed {
        id: "seated-cable-row",
        name: "Seated Cable Row",
        category: Back,
        muscles: &["Rhomboids", "Latissimus Dorsi"],
        description: "Seated horizontal cable pull.",
        instructions: &["Sit tall", "Pull the handle to the stomach"],
        tips: &["Squeeze shoulder blades together"],
        safety_tips: &[],
    },
    Seed {
        id: "t-bar-row",
        name: "T-Bar Row",
        category: Back,
        muscles: &["Latissimus Dorsi", "Trapezius"],
        description: "Landmine-style row with a close grip.",
        instructions: &["Straddle the bar", "Row the handle to the chest"],
        tips: &[],
        safety_tips: &["Keep the spine neutral"],
    },
    // ─── LEGS ───
    Seed {
        id: "squat",
        name: "Squat",
        category: Legs,
        muscles: &["Quadriceps", "Glutes", "Hamstrings"],
        description: "Barbell back squat.",
        instructions: &["Bar on upper back", "Sit down between the hips", "Drive back up"],
        tips: &["Knees track over toes"],
        safety_tips: &["Squat inside a rack with safeties"],
    },
    Seed {
        id: "leg-press",
        name: "Leg Press",
        category: Legs,
        muscles: &["Quadriceps", "Glutes"],
        description: "Machine press with the legs.",
        instructions: &["Feet shoulder-width on the platform", "Lower until knees reach 90 degrees", "Press"],
        tips: &[],
        safety_tips: &["Never lock the knees"],
    },
    Seed {
        id: "lunge",
        name: "Lunge",
        category: Legs,
        muscles: &["Quadriceps", "Glutes"],
        description: "Alternating forward lunge.",
        instructions: &["Step forward", "Lower the back knee toward the floor", "Push back"],
        tips: &["Keep the torso upright"],
        safety_tips: &[],
    },
    Seed {
        id: "romanian-deadlift",
        name: "Romanian Deadlift",
        category: Legs,
        muscles: &["Hamstrings", "Glutes"],
        description: "Hip hinge with soft knees.",
        instructions: &["Push hips back", "Lower the bar along the legs", "Return to standing"],
        tips: &["Feel the stretch in the hamstrings"],
        safety_tips: &["Keep a neutral spine"],
    },
    Seed {
        id: "leg-extension",
        name: "Leg Extension",
        category: Legs,
        muscles: &["Quadriceps"],
        description: "Seated machine knee extension.",
        instructions: &["Pad above the ankles", "Extend the knees"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "leg-curl",
        name: "Leg Curl",
        category: Legs,
        muscles: &["Hamstrings"],
        description: "Machine knee flexion.",
        instructions: &["Pad above the heels", "Curl toward the glutes"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "calf-raise",
        name: "Calf Raise",
        category: Legs,
        muscles: &["Calves"],
        description: "Standing heel raise.",
        instructions: &["Balls of feet on a step", "Rise onto toes", "Lower below the step"],
        tips: &["Pause at the top"],
        safety_tips: &[],
    },
    // ─── SHOULDERS ───
    Seed {
        id: "overhead-press",
        name: "Overhead Press",
        category: Shoulders,
        muscles: &["Deltoids", "Triceps"],
        description: "Standing barbell press overhead.",
        instructions: &["Bar at collarbone height", "Press overhead to lockout"],
        tips: &["Squeeze glutes to stay stable"],
        safety_tips: &["Avoid arching the lower back"],
    },
    Seed {
        id: "lateral-raise",
        name: "Lateral Raise",
        category: Shoulders,
        muscles: &["Side Deltoids"],
        description: "Dumbbell raise out to the sides.",
        instructions: &["Raise arms to shoulder height", "Lower slowly"],
        tips: &["Lead with the elbows"],
        safety_tips: &[],
    },
    Seed {
        id: "front-raise",
        name: "Front Raise",
        category: Shoulders,
        muscles: &["Front Deltoids"],
        description: "Dumbbell raise in front of the body.",
        instructions: &["Raise to eye level", "Lower slowly"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "rear-delt-fly",
        name: "Rear Delt Fly",
        category: Shoulders,
        muscles: &["Rear Deltoids", "Rhomboids"],
        description: "Bent-over reverse fly.",
        instructions: &["Hinge forward", "Open arms out to the sides"],
        tips: &["Use light weight"],
        safety_tips: &[],
    },
    Seed {
        id: "shrugs",
        name: "Shrugs",
        category: Shoulders,
        muscles: &["Trapezius"],
        description: "Shoulder elevation holding weights.",
        instructions: &["Lift shoulders toward ears", "Hold briefly", "Lower"],
        tips: &["Do not roll the shoulders"],
        safety_tips: &[],
    },
    // ─── ARMS ───
    Seed {
        id: "bicep-curl",
        name: "Bicep Curl",
        category: Arms,
        muscles: &["Biceps"],
        description: "Dumbbell or barbell curl.",
        instructions: &["Elbows at sides", "Curl the weight up", "Lower under control"],
        tips: &["Avoid swinging"],
        safety_tips: &[],
    },
    Seed {
        id: "hammer-curl",
        name: "Hammer Curl",
        category: Arms,
        muscles: &["Brachialis", "Forearms"],
        description: "Neutral-grip dumbbell curl.",
        instructions: &["Palms facing each other", "Curl up"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "tricep-pushdown",
        name: "Tricep Pushdown",
        category: Arms,
        muscles: &["Triceps"],
        description: "Cable elbow extension.",
        instructions: &["Elbows pinned at sides", "Push the bar down to full extension"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "dips",
        name: "Dips",
        category: Arms,
        muscles: &["Triceps", "Pectorals"],
        description: "Bodyweight press between parallel bars.",
        instructions: &["Lower until elbows reach 90 degrees", "Press back up"],
        tips: &["Stay upright to bias the triceps"],
        safety_tips: &["Stop if the shoulders hurt"],
    },
    Seed {
        id: "skull-crushers",
        name: "Skull Crushers",
        category: Arms,
        muscles: &["Triceps"],
        description: "Lying barbell elbow extension.",
        instructions: &["Lower the bar toward the forehead", "Extend the elbows"],
        tips: &[],
        safety_tips: &["Use an EZ bar to spare the wrists"],
    },
    // ─── CORE ───
    Seed {
        id: "plank",
        name: "Plank",
        category: Core,
        muscles: &["Abdominals", "Obliques"],
        description: "Static forearm hold.",
        instructions: &["Forearms under shoulders", "Hold a straight line"],
        tips: &["Breathe steadily"],
        safety_tips: &[],
    },
    Seed {
        id: "crunches",
        name: "Crunches",
        category: Core,
        muscles: &["Abdominals"],
        description: "Floor trunk flexion.",
        instructions: &["Knees bent", "Curl shoulders off the floor"],
        tips: &[],
        safety_tips: &["Do not pull on the neck"],
    },
    Seed {
        id: "russian-twists",
        name: "Russian Twists",
        category: Core,
        muscles: &["Obliques"],
        description: "Seated trunk rotation.",
        instructions: &["Lean back slightly", "Rotate side to side"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "leg-raises",
        name: "Leg Raises",
        category: Core,
        muscles: &["Lower Abdominals", "Hip Flexors"],
        description: "Lying straight-leg raise.",
        instructions: &["Lie flat", "Raise legs to vertical", "Lower without touching the floor"],
        tips: &[],
        safety_tips: &["Keep the lower back pressed down"],
    },
    Seed {
        id: "cable-crunches",
        name: "Cable Crunches",
        category: Core,
        muscles: &["Abdominals"],
        description: "Kneeling crunch against cable resistance.",
        instructions: &["Kneel below the pulley", "Crunch the elbows toward the knees"],
        tips: &[],
        safety_tips: &[],
    },
    Seed {
        id: "mountain-climbers",
        name: "Mountain Climbers",
        category: Core,
        muscles: &["Abdominals", "Hip Flexors"],
        description: "Alternating knee drives from a push-up position.",
        instructions: &["Start in a high plank", "Drive knees toward the chest in turn"],
        tips: &["Keep hips level"],
        safety_tips: &[],
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn build(seed: &Seed) -> Option<Exercise> {
    let id = match ExerciseId::new(seed.id) {
        Ok(id) => id,
        Err(err) => {
            warn!(id = seed.id, error = %err, "skipping catalog entry with bad id");
            return None;
        }
    };
    let mut draft = ExerciseDraft::new(id, seed.name, seed.category);
    draft.target_muscles = to_strings(seed.muscles);
    draft.description = seed.description.to_string();
    draft.instructions = to_strings(seed.instructions);
    draft.tips = to_strings(seed.tips);
    draft.safety_tips = to_strings(seed.safety_tips);

    match draft.validate() {
        Ok(exercise) => Some(exercise),
        Err(err) => {
            warn!(id = seed.id, error = %err, "skipping invalid catalog entry");
            None
        }
    }
}

/// The catalog shipped with the tracker.
#[must_use]
pub fn builtin_exercises() -> Vec<Exercise> {
    SEEDS.iter().filter_map(build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_seed_is_valid() {
        assert_eq!(builtin_exercises().len(), SEEDS.len());
    }

    #[test]
    fn category_counts() {
        let exercises = builtin_exercises();
        let count = |c: ExerciseCategory| exercises.iter().filter(|e| e.category() == c).count();
        assert_eq!(count(Chest), 6);
        assert_eq!(count(Back), 6);
        assert_eq!(count(Legs), 7);
        assert_eq!(count(Shoulders), 5);
        assert_eq!(count(Arms), 5);
        assert_eq!(count(Core), 6);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = SEEDS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), SEEDS.len());
    }
}
