//! In-progress set list for the exercise being performed.

use workout_core::model::{
    MAX_EFFORT, SetField, WorkoutSession, WorkoutSet, coerce_count, coerce_weight,
};
use workout_core::voice::{SetPatch, VoiceError};

/// Ordered, editable list of sets. Ordinals are always `1..=N`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetEditor {
    sets: Vec<WorkoutSet>,
}

impl SetEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the previous session for this exercise, or one default set.
    pub fn initialize(&mut self, last_session: Option<&WorkoutSession>) {
        self.sets = match last_session {
            Some(session) if !session.sets().is_empty() => session
                .sets()
                .iter()
                .zip(1_u32..)
                .map(|(set, ordinal)| set.renumbered(ordinal))
                .collect(),
            _ => vec![WorkoutSet::with_defaults(1)],
        };
    }

    /// Append a set copying the previous one's values, or defaults when empty.
    pub fn add_set(&mut self) -> WorkoutSet {
        let ordinal = self.next_ordinal();
        let set = self
            .sets
            .last()
            .map_or_else(|| WorkoutSet::with_defaults(ordinal), |prev| prev.renumbered(ordinal));
        self.sets.push(set);
        set
    }

    /// Set one field from raw text. Unparsable input becomes 0.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn update_set(&mut self, index: usize, field: SetField, raw: &str) -> bool {
        let Some(set) = self.sets.get_mut(index) else {
            return false;
        };
        match field {
            SetField::Reps => set.reps = coerce_count(raw),
            SetField::Weight => set.weight = coerce_weight(raw),
            SetField::Effort => {
                let effort = coerce_count(raw).min(u32::from(MAX_EFFORT));
                set.effort = u8::try_from(effort).unwrap_or(MAX_EFFORT);
            }
        }
        true
    }

    /// Remove the set at `index` and renumber the rest.
    ///
    /// Returns `None` when `index` is out of range or the list holds a single
    /// set; the last remaining set is never removed.
    pub fn remove_set(&mut self, index: usize) -> Option<WorkoutSet> {
        if index >= self.sets.len() || self.sets.len() == 1 {
            return None;
        }
        let removed = self.sets.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Merge a voice update into the last set.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::NothingToUpdate` when there are no sets.
    pub fn apply_patch(&mut self, patch: SetPatch) -> Result<&WorkoutSet, VoiceError> {
        let last = self.sets.last_mut().ok_or(VoiceError::NothingToUpdate)?;
        if let Some(reps) = patch.reps {
            last.reps = reps;
        }
        if let Some(weight) = patch.weight {
            last.weight = if weight.is_finite() && weight > 0.0 {
                weight
            } else {
                0.0
            };
        }
        Ok(last)
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    #[must_use]
    pub fn sets(&self) -> &[WorkoutSet] {
        &self.sets
    }

    #[must_use]
    pub fn last(&self) -> Option<&WorkoutSet> {
        self.sets.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Live volume of the list, recomputed from current values.
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        workout_core::metrics::sets_volume(&self.sets)
    }

    fn next_ordinal(&self) -> u32 {
        u32::try_from(self.sets.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    fn renumber(&mut self) {
        for (set, ordinal) in self.sets.iter_mut().zip(1_u32..) {
            set.ordinal = ordinal;
        }
    }
}
