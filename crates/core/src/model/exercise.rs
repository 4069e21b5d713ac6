use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::ExerciseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise name cannot be empty")]
    EmptyName,

    #[error("unknown exercise category: {0}")]
    UnknownCategory(String),

    #[error("invalid media URL: {0}")]
    InvalidMediaUrl(String),
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Fixed catalog grouping for exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExerciseCategory {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 6] = [
        ExerciseCategory::Chest,
        ExerciseCategory::Back,
        ExerciseCategory::Legs,
        ExerciseCategory::Shoulders,
        ExerciseCategory::Arms,
        ExerciseCategory::Core,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseCategory::Chest => "Chest",
            ExerciseCategory::Back => "Back",
            ExerciseCategory::Legs => "Legs",
            ExerciseCategory::Shoulders => "Shoulders",
            ExerciseCategory::Arms => "Arms",
            ExerciseCategory::Core => "Core",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = ExerciseError;

    /// Parses a category name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ExerciseError::UnknownCategory(needle.to_string()))
    }
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// Immutable reference data for one catalog exercise.
///
/// Built through [`ExerciseDraft::validate`]; the tracking core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    id: ExerciseId,
    name: String,
    category: ExerciseCategory,
    target_muscles: Vec<String>,
    description: String,
    instructions: Vec<String>,
    tips: Vec<String>,
    safety_tips: Vec<String>,
    image_url: Option<Url>,
}

impl Exercise {
    #[must_use]
    pub fn id(&self) -> &ExerciseId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> ExerciseCategory {
        self.category
    }

    #[must_use]
    pub fn target_muscles(&self) -> &[String] {
        &self.target_muscles
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Step-by-step instructional text.
    #[must_use]
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    #[must_use]
    pub fn tips(&self) -> &[String] {
        &self.tips
    }

    #[must_use]
    pub fn safety_tips(&self) -> &[String] {
        &self.safety_tips
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }
}

/// Unvalidated exercise fields, as they arrive from a catalog source.
#[derive(Clone, Debug)]
pub struct ExerciseDraft {
    pub id: ExerciseId,
    pub name: String,
    pub category: ExerciseCategory,
    pub target_muscles: Vec<String>,
    pub description: String,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub safety_tips: Vec<String>,
    pub image_url: Option<String>,
}

impl ExerciseDraft {
    #[must_use]
    pub fn new(id: ExerciseId, name: impl Into<String>, category: ExerciseCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            target_muscles: Vec::new(),
            description: String::new(),
            instructions: Vec::new(),
            tips: Vec::new(),
            safety_tips: Vec::new(),
            image_url: None,
        }
    }

    /// Validate and normalize the draft into catalog data.
    ///
    /// Blank list entries are dropped and text is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::EmptyName` for a blank name, or
    /// `ExerciseError::InvalidMediaUrl` if the image URL does not parse.
    pub fn validate(self) -> Result<Exercise, ExerciseError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ExerciseError::EmptyName);
        }

        let image_url = match normalize_optional(self.image_url) {
            Some(raw) => {
                Some(Url::parse(&raw).map_err(|_| ExerciseError::InvalidMediaUrl(raw.clone()))?)
            }
            None => None,
        };

        Ok(Exercise {
            id: self.id,
            name,
            category: self.category,
            target_muscles: normalize_list(self.target_muscles),
            description: self.description.trim().to_string(),
            instructions: normalize_list(self.instructions),
            tips: normalize_list(self.tips),
            safety_tips: normalize_list(self.safety_tips),
            image_url,
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExerciseDraft {
        ExerciseDraft::new(
            ExerciseId::new("bench-press").unwrap(),
            " Bench Press ",
            ExerciseCategory::Chest,
        )
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("chest".parse::<ExerciseCategory>(), Ok(ExerciseCategory::Chest));
        assert_eq!(" SHOULDERS ".parse::<ExerciseCategory>(), Ok(ExerciseCategory::Shoulders));
        assert_eq!(
            "Cardio".parse::<ExerciseCategory>(),
            Err(ExerciseError::UnknownCategory("Cardio".into()))
        );
    }

    #[test]
    fn validate_trims_and_drops_blank_entries() {
        let mut d = draft();
        d.target_muscles = vec!["Pectorals".into(), "  ".into(), " Triceps".into()];
        let exercise = d.validate().unwrap();
        assert_eq!(exercise.name(), "Bench Press");
        assert_eq!(exercise.target_muscles(), ["Pectorals", "Triceps"]);
        assert!(exercise.image_url().is_none());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut d = draft();
        d.name = "   ".into();
        assert_eq!(d.validate().unwrap_err(), ExerciseError::EmptyName);
    }

    #[test]
    fn validate_rejects_bad_media_url() {
        let mut d = draft();
        d.image_url = Some("not a url".into());
        assert!(matches!(
            d.validate(),
            Err(ExerciseError::InvalidMediaUrl(_))
        ));
    }

    #[test]
    fn validate_accepts_media_url() {
        let mut d = draft();
        d.image_url = Some("https://images.example.com/bench.jpg".into());
        let exercise = d.validate().unwrap();
        assert_eq!(
            exercise.image_url().map(Url::as_str),
            Some("https://images.example.com/bench.jpg")
        );
    }
}
