use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use roulette_domain as domain;
use uuid::Uuid;

/// Volatile storage, e.g. for a catalog bundled with the application.
pub struct MemoryStorage {
    exercises: RwLock<Vec<domain::Exercise>>,
    workouts: RwLock<Vec<domain::SavedWorkout>>,
    settings: RwLock<domain::Settings>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(exercises: Vec<domain::Exercise>) -> Self {
        Self {
            exercises: RwLock::new(exercises),
            workouts: RwLock::new(vec![]),
            settings: RwLock::new(domain::Settings::default()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(vec![])
    }
}

fn poisoned<T>(err: PoisonError<T>) -> domain::StorageError {
    domain::StorageError::Other(err.to_string().into())
}

impl domain::ExerciseRepository for MemoryStorage {
    async fn read_exercises(
        &self,
        filter: &domain::ExerciseFilter,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .exercises
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.exercises
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
        category: domain::Category,
        description: String,
        equipment: domain::Equipment,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let exercise = domain::Exercise {
            id: Uuid::new_v4().into(),
            name,
            category,
            description,
            equipment,
            duration: None,
        };
        self.exercises
            .write()
            .map_err(poisoned)?
            .push(exercise.clone());
        Ok(exercise)
    }

    async fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        let mut exercises = self.exercises.write().map_err(poisoned)?;
        let Some(existing) = exercises.iter_mut().find(|e| e.id == exercise.id) else {
            return Err(domain::UpdateError::NotFound);
        };
        *existing = exercise.clone();
        Ok(exercise)
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        let mut exercises = self.exercises.write().map_err(poisoned)?;
        let Some(index) = exercises.iter().position(|e| e.id == id) else {
            return Err(domain::DeleteError::NotFound);
        };
        exercises.remove(index);
        Ok(id)
    }
}

impl domain::WorkoutRepository for MemoryStorage {
    async fn read_workouts(
        &self,
        limit: usize,
    ) -> Result<Vec<domain::SavedWorkout>, domain::ReadError> {
        Ok(self
            .workouts
            .read()
            .map_err(poisoned)?
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::SavedWorkout, domain::ReadError> {
        self.workouts
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn create_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::SavedWorkout, domain::CreateError> {
        let saved = domain::SavedWorkout {
            id: Uuid::new_v4().into(),
            created_at: Utc::now(),
            workout,
        };
        self.workouts.write().map_err(poisoned)?.push(saved.clone());
        Ok(saved)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        let mut workouts = self.workouts.write().map_err(poisoned)?;
        let Some(index) = workouts.iter().position(|w| w.id == id) else {
            return Err(domain::DeleteError::NotFound);
        };
        workouts.remove(index);
        Ok(id)
    }
}

impl domain::SettingsRepository for MemoryStorage {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        Ok(*self.settings.read().map_err(poisoned)?)
    }

    async fn write_settings(
        &self,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        *self.settings.write().map_err(poisoned)? = settings;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roulette_domain::{
        ExerciseRepository, SettingsRepository, WorkoutRepository, WorkoutService,
    };

    use crate::tests::data::{CORE, EXERCISE, EXERCISE_2, EXERCISES, WARMUP, WARMUP_2, WORKOUT};

    use super::*;

    #[tokio::test]
    async fn test_read_exercises() {
        let storage = MemoryStorage::new(EXERCISES.clone());

        assert_eq!(
            storage
                .read_exercises(&domain::ExerciseFilter::all())
                .await
                .unwrap(),
            *EXERCISES
        );
        assert_eq!(
            storage
                .read_exercises(&domain::ExerciseFilter::equipment(
                    domain::Equipment::none()
                ))
                .await
                .unwrap(),
            vec![
                WARMUP.clone(),
                WARMUP_2.clone(),
                EXERCISE_2.clone(),
                CORE.clone()
            ]
        );
        assert_eq!(
            storage
                .read_exercises(&domain::ExerciseFilter {
                    category: Some(domain::Category::Strength),
                    equipment: None,
                })
                .await
                .unwrap(),
            vec![EXERCISE.clone()]
        );
    }

    #[tokio::test]
    async fn test_exercise_lifecycle() {
        let storage = MemoryStorage::default();

        let exercise = storage
            .create_exercise(
                domain::Name::new("Jumping Jacks").unwrap(),
                domain::Category::Cardio,
                String::new(),
                domain::Equipment::none(),
            )
            .await
            .unwrap();
        assert_eq!(storage.read_exercise(exercise.id).await.unwrap(), exercise);

        let replaced = domain::Exercise {
            description: String::from("Jump and spread the arms"),
            ..exercise.clone()
        };
        assert_eq!(
            storage.replace_exercise(replaced.clone()).await.unwrap(),
            replaced
        );
        assert_eq!(storage.read_exercise(exercise.id).await.unwrap(), replaced);

        assert_eq!(
            storage.delete_exercise(exercise.id).await.unwrap(),
            exercise.id
        );
        assert!(matches!(
            storage.read_exercise(exercise.id).await,
            Err(domain::ReadError::NotFound)
        ));
        assert!(matches!(
            storage.replace_exercise(replaced).await,
            Err(domain::UpdateError::NotFound)
        ));
        assert!(matches!(
            storage.delete_exercise(exercise.id).await,
            Err(domain::DeleteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_workout_history() {
        let storage = MemoryStorage::default();

        let first = storage.create_workout(WORKOUT.clone()).await.unwrap();
        let second = storage.create_workout(WORKOUT.clone()).await.unwrap();

        assert_eq!(
            storage.read_workouts(10).await.unwrap(),
            vec![second.clone(), first.clone()]
        );
        assert_eq!(storage.read_workouts(1).await.unwrap(), vec![second.clone()]);
        assert_eq!(storage.read_workout(first.id).await.unwrap(), first);

        assert_eq!(storage.delete_workout(second.id).await.unwrap(), second.id);
        assert_eq!(storage.read_workouts(10).await.unwrap(), vec![first]);
        assert!(matches!(
            storage.delete_workout(second.id).await,
            Err(domain::DeleteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_settings() {
        let storage = MemoryStorage::default();
        assert_eq!(
            storage.read_settings().await.unwrap(),
            domain::Settings::default()
        );

        let settings = domain::Settings {
            rest_time: 20,
            ..domain::Settings::default()
        };
        assert_eq!(storage.write_settings(settings).await.unwrap(), settings);
        assert_eq!(storage.read_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_generate_workout_from_memory() {
        let service = domain::Service::new(MemoryStorage::new(EXERCISES.clone()));
        let parameters = domain::GenerationParameters::new(600)
            .with_equipment(["dumbbells"])
            .with_rest_time(10);

        let workout = service.generate_workout(&parameters).await.unwrap();

        assert!(workout.total_time <= 600);
        assert_eq!(
            workout.entries[..domain::WARMUP_COUNT]
                .iter()
                .map(|e| e.category)
                .collect::<Vec<_>>(),
            vec![domain::Category::Warmup, domain::Category::Warmup]
        );
        assert!(workout.exercise_count() > domain::WARMUP_COUNT);
    }
}
