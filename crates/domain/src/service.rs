use log::{debug, error, warn};

use crate::{
    Category, CreateError, DeleteError, Equipment, Exercise, ExerciseFilter, ExerciseID,
    ExerciseRepository, ExerciseService, GenerateError, GenerationParameters, Name, ReadError,
    SavedWorkout, Settings, SettingsRepository, SettingsService, StorageError, UpdateError,
    Workout, WorkoutGenerator, WorkoutID, WorkoutRepository, WorkoutService, categories,
    equipment_options,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(filter),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }

    async fn create_exercise(
        &self,
        name: Name,
        category: Category,
        description: String,
        equipment: Equipment,
    ) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository
                .create_exercise(name, category, description, equipment),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(exercise),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }

    async fn get_equipment_options(&self) -> Result<Vec<Equipment>, ReadError> {
        let exercises = self.get_exercises(&ExerciseFilter::all()).await?;
        Ok(equipment_options(&exercises))
    }

    async fn get_categories(&self) -> Result<Vec<Category>, ReadError> {
        let exercises = self.get_exercises(&ExerciseFilter::all()).await?;
        Ok(categories(&exercises))
    }
}

impl<R> WorkoutService for Service<R>
where
    R: ExerciseRepository + WorkoutRepository + SettingsRepository,
{
    async fn generate_workout(
        &self,
        parameters: &GenerationParameters,
    ) -> Result<Workout, GenerateError> {
        let result = match self.repository.read_settings().await {
            Ok(settings) => {
                WorkoutGenerator::new(settings)
                    .generate(&self.repository, parameters)
                    .await
            }
            Err(err) => Err(err.into()),
        };
        match result {
            Ok(ref workout) => {
                debug!(
                    "generated workout with {} exercises in {} seconds",
                    workout.exercise_count(),
                    workout.total_time
                );
            }
            Err(GenerateError::Read(ReadError::Storage(StorageError::NoConnection))) => {
                debug!("failed to generate workout: no connection");
            }
            Err(GenerateError::Read(ref err)) => {
                error!("failed to generate workout: {err}");
            }
            Err(ref err) => {
                warn!("failed to generate workout: {err}");
            }
        }
        result
    }

    async fn get_workouts(&self, limit: Option<usize>) -> Result<Vec<SavedWorkout>, ReadError> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.get_settings().await?.history_limit,
        };
        log_on_error!(
            self.repository.read_workouts(limit),
            ReadError,
            "get",
            "workouts"
        )
    }

    async fn get_workout(&self, id: WorkoutID) -> Result<SavedWorkout, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    async fn save_workout(&self, workout: Workout) -> Result<SavedWorkout, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "save",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
        log_on_error!(
            self.repository.write_settings(settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct FakeRepository {
        exercises: RefCell<Vec<Exercise>>,
        workouts: RefCell<Vec<SavedWorkout>>,
        settings: RefCell<Settings>,
        offline: bool,
    }

    impl FakeRepository {
        fn check_connection(&self) -> Result<(), StorageError> {
            if self.offline {
                return Err(StorageError::NoConnection);
            }
            Ok(())
        }
    }

    impl ExerciseRepository for FakeRepository {
        async fn read_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError> {
            self.check_connection()?;
            Ok(self
                .exercises
                .borrow()
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect())
        }

        async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
            self.check_connection()?;
            self.exercises
                .borrow()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or(ReadError::NotFound)
        }

        async fn create_exercise(
            &self,
            name: Name,
            category: Category,
            description: String,
            equipment: Equipment,
        ) -> Result<Exercise, CreateError> {
            self.check_connection()?;
            let mut exercises = self.exercises.borrow_mut();
            let exercise = Exercise {
                id: (exercises.len() as u128 + 1).into(),
                name,
                category,
                description,
                equipment,
                duration: None,
            };
            exercises.push(exercise.clone());
            Ok(exercise)
        }

        async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
            self.check_connection()?;
            let mut exercises = self.exercises.borrow_mut();
            let Some(existing) = exercises.iter_mut().find(|e| e.id == exercise.id) else {
                return Err(UpdateError::NotFound);
            };
            *existing = exercise.clone();
            Ok(exercise)
        }

        async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
            self.check_connection()?;
            let mut exercises = self.exercises.borrow_mut();
            let len = exercises.len();
            exercises.retain(|e| e.id != id);
            if exercises.len() == len {
                return Err(DeleteError::NotFound);
            }
            Ok(id)
        }
    }

    impl WorkoutRepository for FakeRepository {
        async fn read_workouts(&self, limit: usize) -> Result<Vec<SavedWorkout>, ReadError> {
            self.check_connection()?;
            Ok(self
                .workouts
                .borrow()
                .iter()
                .rev()
                .take(limit)
                .cloned()
                .collect())
        }

        async fn read_workout(&self, id: WorkoutID) -> Result<SavedWorkout, ReadError> {
            self.check_connection()?;
            self.workouts
                .borrow()
                .iter()
                .find(|w| w.id == id)
                .cloned()
                .ok_or(ReadError::NotFound)
        }

        async fn create_workout(&self, workout: Workout) -> Result<SavedWorkout, CreateError> {
            self.check_connection()?;
            let mut workouts = self.workouts.borrow_mut();
            let saved = SavedWorkout {
                id: (workouts.len() as u128 + 1).into(),
                created_at: DateTime::UNIX_EPOCH,
                workout,
            };
            workouts.push(saved.clone());
            Ok(saved)
        }

        async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
            self.check_connection()?;
            let mut workouts = self.workouts.borrow_mut();
            let len = workouts.len();
            workouts.retain(|w| w.id != id);
            if workouts.len() == len {
                return Err(DeleteError::NotFound);
            }
            Ok(id)
        }
    }

    impl SettingsRepository for FakeRepository {
        async fn read_settings(&self) -> Result<Settings, ReadError> {
            self.check_connection()?;
            Ok(*self.settings.borrow())
        }

        async fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
            self.check_connection()?;
            *self.settings.borrow_mut() = settings;
            Ok(settings)
        }
    }

    async fn service() -> Service<FakeRepository> {
        let service = Service::new(FakeRepository::default());
        for (name, category, equipment) in [
            ("Arm Circles", Category::Warmup, "none"),
            ("Forward Fold", Category::Warmup, "none"),
            ("Plank", Category::Core, "none"),
            ("Push-ups", Category::Strength, "none"),
            ("Dumbbell Curls", Category::Strength, "dumbbells"),
            ("Kettlebell Swings", Category::Cardio, "kettlebells"),
        ] {
            service
                .create_exercise(
                    Name::new(name).unwrap(),
                    category,
                    String::new(),
                    Equipment::new(equipment),
                )
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_get_equipment_options() {
        assert_eq!(
            service().await.get_equipment_options().await.unwrap(),
            vec![
                Equipment::none(),
                Equipment::new("dumbbells"),
                Equipment::new("kettlebells"),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_categories() {
        assert_eq!(
            service().await.get_categories().await.unwrap(),
            vec![
                Category::Warmup,
                Category::Core,
                Category::Strength,
                Category::Cardio,
            ]
        );
    }

    #[tokio::test]
    async fn test_replace_and_delete_exercise() {
        let service = service().await;
        let mut exercise = service.get_exercise(3.into()).await.unwrap();
        exercise.description = String::from("Hold a straight line");

        assert_eq!(
            service.replace_exercise(exercise.clone()).await.unwrap(),
            exercise
        );
        assert_eq!(service.get_exercise(3.into()).await.unwrap(), exercise);
        assert_eq!(
            service.delete_exercise(3.into()).await.unwrap(),
            ExerciseID::from(3)
        );
        assert!(matches!(
            service.get_exercise(3.into()).await,
            Err(ReadError::NotFound)
        ));
        assert!(matches!(
            service.delete_exercise(3.into()).await,
            Err(DeleteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_generate_workout() {
        let service = service().await;
        let parameters = GenerationParameters::new(600).with_equipment(["dumbbells"]);

        let workout = service.generate_workout(&parameters).await.unwrap();

        assert_eq!(workout.exercise_duration, 60);
        assert!(workout.total_time <= 600);
        assert!(
            workout
                .entries
                .iter()
                .all(|e| e.equipment.as_str() != "kettlebells")
        );
    }

    #[tokio::test]
    async fn test_generate_workout_uses_settings() {
        let service = service().await;
        service
            .set_settings(Settings {
                exercise_duration: 30,
                ..Settings::default()
            })
            .await
            .unwrap();

        let workout = service
            .generate_workout(&GenerationParameters::new(300))
            .await
            .unwrap();

        assert_eq!(workout.exercise_duration, 30);
        assert!(workout.entries.iter().all(|e| e.duration == 30));
    }

    #[tokio::test]
    async fn test_generate_workout_insufficient_warmup() {
        let service = service().await;
        service.delete_exercise(1.into()).await.unwrap();

        assert!(matches!(
            service
                .generate_workout(&GenerationParameters::new(600))
                .await,
            Err(GenerateError::InsufficientWarmup { available: 1 })
        ));
    }

    #[tokio::test]
    async fn test_generate_workout_no_connection() {
        let service = Service::new(FakeRepository {
            offline: true,
            ..FakeRepository::default()
        });

        assert!(matches!(
            service
                .generate_workout(&GenerationParameters::new(600))
                .await,
            Err(GenerateError::Read(ReadError::Storage(
                StorageError::NoConnection
            )))
        ));
    }

    #[tokio::test]
    async fn test_save_and_get_workouts() {
        let service = service().await;
        service
            .set_settings(Settings {
                history_limit: 2,
                ..Settings::default()
            })
            .await
            .unwrap();
        for _ in 0..3 {
            let workout = service
                .generate_workout(&GenerationParameters::new(300))
                .await
                .unwrap();
            service.save_workout(workout).await.unwrap();
        }

        let workouts = service.get_workouts(None).await.unwrap();
        assert_eq!(
            workouts.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![WorkoutID::from(3), WorkoutID::from(2)]
        );
        assert_eq!(service.get_workouts(Some(5)).await.unwrap().len(), 3);
        assert_eq!(
            service.get_workout(1.into()).await.unwrap().id,
            WorkoutID::from(1)
        );

        assert_eq!(
            service.delete_workout(2.into()).await.unwrap(),
            WorkoutID::from(2)
        );
        assert!(matches!(
            service.get_workout(2.into()).await,
            Err(ReadError::NotFound)
        ));
    }
}
