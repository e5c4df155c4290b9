use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{
    Category, CreateError, DeleteError, Equipment, Exercise, ExerciseID, GenerateError, Name,
    ReadError,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    /// Saved workouts, most recent first.
    async fn read_workouts(&self, limit: usize) -> Result<Vec<SavedWorkout>, ReadError>;
    async fn read_workout(&self, id: WorkoutID) -> Result<SavedWorkout, ReadError>;
    async fn create_workout(&self, workout: Workout) -> Result<SavedWorkout, CreateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn generate_workout(
        &self,
        parameters: &GenerationParameters,
    ) -> Result<Workout, GenerateError>;
    async fn get_workouts(&self, limit: Option<usize>) -> Result<Vec<SavedWorkout>, ReadError>;
    async fn get_workout(&self, id: WorkoutID) -> Result<SavedWorkout, ReadError>;
    async fn save_workout(&self, workout: Workout) -> Result<SavedWorkout, CreateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

/// Input of a single generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    /// Upper bound of the workout duration in seconds.
    pub total_time: u32,
    /// Equipment the user has available. `none` entries are ignored.
    pub equipment: BTreeSet<Equipment>,
    /// Rest in seconds between consecutive exercises.
    pub rest_time: u32,
    /// Duration in seconds of every selected exercise. Zero selects the configured default.
    pub exercise_duration: u32,
    /// Optional category allow-list applied to the catalog before partitioning.
    pub categories: Option<BTreeSet<Category>>,
}

impl GenerationParameters {
    #[must_use]
    pub fn new(total_time: u32) -> Self {
        Self {
            total_time,
            equipment: BTreeSet::new(),
            rest_time: 0,
            exercise_duration: 0,
            categories: None,
        }
    }

    #[must_use]
    pub fn with_equipment<I, E>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Equipment>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_rest_time(mut self, rest_time: u32) -> Self {
        self.rest_time = rest_time;
        self
    }

    #[must_use]
    pub fn with_exercise_duration(mut self, exercise_duration: u32) -> Self {
        self.exercise_duration = exercise_duration;
        self
    }

    #[must_use]
    pub fn with_categories<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// The requested equipment without `none`.
    #[must_use]
    pub fn requested_equipment(&self) -> BTreeSet<Equipment> {
        self.equipment
            .iter()
            .filter(|e| !e.is_none())
            .cloned()
            .collect()
    }
}

/// A generated workout. Entries are ordered and numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub entries: Vec<WorkoutEntry>,
    /// Accounted duration in seconds, never more than the requested total time.
    pub total_time: u32,
    pub rest_time: u32,
    pub exercise_duration: u32,
    pub equipment: BTreeSet<Equipment>,
    pub generated_at: DateTime<Utc>,
}

impl Workout {
    #[must_use]
    pub fn total_time_minutes(&self) -> u32 {
        (self.total_time + 30) / 60
    }

    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn exercises(&self) -> BTreeSet<ExerciseID> {
        self.entries.iter().map(|e| e.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEntry {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub description: String,
    pub equipment: Equipment,
    pub duration: u32,
    pub order: u32,
}

impl WorkoutEntry {
    #[must_use]
    pub fn new(exercise: &Exercise, duration: u32, order: u32) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            category: exercise.category,
            description: exercise.description.clone(),
            equipment: exercise.equipment.clone(),
            duration,
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedWorkout {
    pub id: WorkoutID,
    pub created_at: DateTime<Utc>,
    pub workout: Workout,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn workout(total_time: u32) -> Workout {
        let exercise = Exercise {
            id: 1.into(),
            name: Name::new("Arm Circles").unwrap(),
            category: Category::Warmup,
            description: String::from("Loosen the shoulders"),
            equipment: Equipment::none(),
            duration: Some(30),
        };
        Workout {
            entries: vec![
                WorkoutEntry::new(&exercise, 60, 1),
                WorkoutEntry::new(&exercise, 60, 2),
            ],
            total_time,
            rest_time: 0,
            exercise_duration: 60,
            equipment: BTreeSet::new(),
            generated_at: DateTime::UNIX_EPOCH,
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(29, 0)]
    #[case(30, 1)]
    #[case(89, 1)]
    #[case(90, 2)]
    #[case(300, 5)]
    #[case(1000, 17)]
    fn test_workout_total_time_minutes(#[case] total_time: u32, #[case] expected: u32) {
        assert_eq!(workout(total_time).total_time_minutes(), expected);
    }

    #[test]
    fn test_workout_exercises() {
        let workout = workout(120);
        assert_eq!(workout.exercise_count(), 2);
        assert_eq!(workout.exercises(), BTreeSet::from([ExerciseID::from(1)]));
    }

    #[test]
    fn test_workout_entry_new() {
        let entry = &workout(120).entries[1];
        assert_eq!(entry.name.as_ref(), "Arm Circles");
        assert_eq!(entry.category, Category::Warmup);
        assert_eq!(entry.description, "Loosen the shoulders");
        assert_eq!(entry.duration, 60);
        assert_eq!(entry.order, 2);
    }

    #[test]
    fn test_generation_parameters() {
        let parameters = GenerationParameters::new(600)
            .with_equipment(["Dumbbells", "none", "kettlebells"])
            .with_rest_time(10)
            .with_exercise_duration(45)
            .with_categories([Category::Warmup, Category::Core]);

        assert_eq!(parameters.total_time, 600);
        assert_eq!(parameters.equipment.len(), 3);
        assert_eq!(
            parameters.requested_equipment(),
            BTreeSet::from([Equipment::new("dumbbells"), Equipment::new("kettlebells")])
        );
        assert_eq!(parameters.rest_time, 10);
        assert_eq!(parameters.exercise_duration, 45);
        assert_eq!(
            parameters.categories,
            Some(BTreeSet::from([Category::Warmup, Category::Core]))
        );
    }

    #[test]
    fn test_generation_parameters_defaults() {
        let parameters = GenerationParameters::new(300);
        assert!(parameters.requested_equipment().is_empty());
        assert_eq!(parameters.rest_time, 0);
        assert_eq!(parameters.exercise_duration, 0);
        assert_eq!(parameters.categories, None);
    }
}
