use std::collections::BTreeSet;

use derive_more::{AsRef, Deref, Display};
use strum::{AsRefStr, EnumIter, EnumString};
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

/// Access to the exercise catalog.
///
/// `read_exercises` is the lookup the generator depends on. Filters are exact matches, so
/// requesting `dumbbells` does not include equipment-free exercises.
#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        category: Category,
        description: String,
        equipment: Equipment,
    ) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        category: Category,
        description: String,
        equipment: Equipment,
    ) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
    async fn get_equipment_options(&self) -> Result<Vec<Equipment>, ReadError>;
    async fn get_categories(&self) -> Result<Vec<Category>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub description: String,
    pub equipment: Equipment,
    /// Advisory duration in seconds. Generated workouts use their own exercise duration.
    pub duration: Option<u32>,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(
    AsRefStr,
    EnumIter,
    EnumString,
    strum::Display,
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Warmup,
    Core,
    Strength,
    Cardio,
    Flexibility,
    Balance,
    #[default]
    General,
}

impl Category {
    /// Strength and cardio share one pool when sequencing a workout.
    #[must_use]
    pub fn is_strength_cardio(self) -> bool {
        matches!(self, Category::Strength | Category::Cardio)
    }
}

#[derive(AsRef, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Equipment(String);

impl Equipment {
    pub const NONE: &'static str = "none";

    #[must_use]
    pub fn new(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            Self::none()
        } else {
            Self(tag)
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self(Self::NONE.to_string())
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Equipment {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub category: Option<Category>,
    pub equipment: Option<Equipment>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn equipment(equipment: Equipment) -> Self {
        Self {
            category: None,
            equipment: Some(equipment),
        }
    }

    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.category.is_none_or(|c| c == exercise.category)
            && self
                .equipment
                .as_ref()
                .is_none_or(|e| *e == exercise.equipment)
    }
}

/// Distinct equipment tags of the catalog, `none` first and the rest in alphabetical order.
#[must_use]
pub fn equipment_options(exercises: &[Exercise]) -> Vec<Equipment> {
    let tags = exercises
        .iter()
        .map(|e| e.equipment.clone())
        .filter(|e| !e.is_none())
        .collect::<BTreeSet<_>>();
    std::iter::once(Equipment::none()).chain(tags).collect()
}

#[must_use]
pub fn categories(exercises: &[Exercise]) -> Vec<Category> {
    exercises
        .iter()
        .map(|e| e.category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
