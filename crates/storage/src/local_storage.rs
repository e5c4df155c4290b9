//! Local storage
//!
//! Every collection is kept in a JSON file inside one directory. Files are read on each access
//! and rewritten completely on each modification. A missing file is treated as empty.

use std::{
    collections::VecDeque,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use log::debug;
use roulette_domain as domain;
use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;
use uuid::Uuid;

use crate::{json, log as app_log};

const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    directory: PathBuf,
}

#[derive(AsRefStr, Debug, Clone, Copy)]
enum File {
    #[strum(serialize = "exercises.json")]
    Exercises,
    #[strum(serialize = "workouts.json")]
    Workouts,
    #[strum(serialize = "settings.json")]
    Settings,
    #[strum(serialize = "log.json")]
    Log,
}

impl LocalStorage {
    /// Open the storage in `directory`, creating the directory if it does not exist.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, LocalStorageError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `exercises` as catalog unless a catalog exists already. Returns whether the catalog
    /// was written.
    pub fn seed_exercises(&self, exercises: &[domain::Exercise]) -> Result<bool, LocalStorageError> {
        if self.path(File::Exercises).exists() {
            return Ok(false);
        }
        debug!("seeding catalog with {} exercises", exercises.len());
        self.store_exercises(exercises)?;
        Ok(true)
    }

    /// Replace the whole catalog by `exercises`.
    pub fn reset_exercises(&self, exercises: &[domain::Exercise]) -> Result<(), LocalStorageError> {
        debug!("resetting catalog to {} exercises", exercises.len());
        self.store_exercises(exercises)
    }

    fn path(&self, file: File) -> PathBuf {
        self.directory.join(file.as_ref())
    }

    fn read<T: DeserializeOwned + Default>(&self, file: File) -> Result<T, LocalStorageError> {
        match fs::read_to_string(self.path(file)) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, file: File, value: &T) -> Result<(), LocalStorageError> {
        let content = serde_json::to_string_pretty(value)?;
        let path = self.path(file);
        let temporary = path.with_extension("json.tmp");
        fs::write(&temporary, content)?;
        fs::rename(temporary, path)?;
        Ok(())
    }

    fn load_exercises(&self) -> Result<Vec<domain::Exercise>, LocalStorageError> {
        self.read::<Vec<json::Exercise>>(File::Exercises)?
            .into_iter()
            .map(|e| {
                let id = e.id;
                domain::Exercise::try_from(e).map_err(|err| {
                    LocalStorageError::from(anyhow::anyhow!("invalid exercise {id}: {err}"))
                })
            })
            .collect()
    }

    fn store_exercises(&self, exercises: &[domain::Exercise]) -> Result<(), LocalStorageError> {
        self.write(
            File::Exercises,
            &exercises.iter().map(json::Exercise::from).collect::<Vec<_>>(),
        )
    }

    fn load_workouts(&self) -> Result<Vec<domain::SavedWorkout>, LocalStorageError> {
        self.read::<Vec<json::SavedWorkout>>(File::Workouts)?
            .into_iter()
            .map(|w| {
                let id = w.id;
                domain::SavedWorkout::try_from(w).map_err(|err| {
                    LocalStorageError::from(anyhow::anyhow!("invalid workout {id}: {err}"))
                })
            })
            .collect()
    }

    fn store_workouts(&self, workouts: &[domain::SavedWorkout]) -> Result<(), LocalStorageError> {
        self.write(
            File::Workouts,
            &workouts
                .iter()
                .map(json::SavedWorkout::from)
                .collect::<Vec<_>>(),
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LocalStorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<LocalStorageError> for domain::StorageError {
    fn from(value: LocalStorageError) -> Self {
        domain::StorageError::Other(Box::new(value))
    }
}

macro_rules! impl_from_local_storage_error {
    ($($error: ty),*) => {
        $(
            impl From<LocalStorageError> for $error {
                fn from(value: LocalStorageError) -> Self {
                    domain::StorageError::from(value).into()
                }
            }
        )*
    };
}

impl_from_local_storage_error!(
    domain::ReadError,
    domain::CreateError,
    domain::UpdateError,
    domain::DeleteError
);

impl domain::ExerciseRepository for LocalStorage {
    async fn read_exercises(
        &self,
        filter: &domain::ExerciseFilter,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self.load_exercises()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.load_exercises()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(domain::ReadError::NotFound)
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
        category: domain::Category,
        description: String,
        equipment: domain::Equipment,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let mut exercises = self.load_exercises()?;
        let exercise = domain::Exercise {
            id: Uuid::new_v4().into(),
            name,
            category,
            description,
            equipment,
            duration: None,
        };
        exercises.push(exercise.clone());
        self.store_exercises(&exercises)?;
        Ok(exercise)
    }

    async fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        let mut exercises = self.load_exercises()?;
        let Some(existing) = exercises.iter_mut().find(|e| e.id == exercise.id) else {
            return Err(domain::UpdateError::NotFound);
        };
        *existing = exercise.clone();
        self.store_exercises(&exercises)?;
        Ok(exercise)
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        let mut exercises = self.load_exercises()?;
        let Some(index) = exercises.iter().position(|e| e.id == id) else {
            return Err(domain::DeleteError::NotFound);
        };
        exercises.remove(index);
        self.store_exercises(&exercises)?;
        Ok(id)
    }
}

impl domain::WorkoutRepository for LocalStorage {
    async fn read_workouts(
        &self,
        limit: usize,
    ) -> Result<Vec<domain::SavedWorkout>, domain::ReadError> {
        let mut workouts = self.load_workouts()?;
        workouts.reverse();
        workouts.truncate(limit);
        Ok(workouts)
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::SavedWorkout, domain::ReadError> {
        self.load_workouts()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(domain::ReadError::NotFound)
    }

    async fn create_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::SavedWorkout, domain::CreateError> {
        let mut workouts = self.load_workouts()?;
        let saved = domain::SavedWorkout {
            id: Uuid::new_v4().into(),
            created_at: Utc::now(),
            workout,
        };
        workouts.push(saved.clone());
        self.store_workouts(&workouts)?;
        Ok(saved)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        let mut workouts = self.load_workouts()?;
        let Some(index) = workouts.iter().position(|w| w.id == id) else {
            return Err(domain::DeleteError::NotFound);
        };
        workouts.remove(index);
        self.store_workouts(&workouts)?;
        Ok(id)
    }
}

impl domain::SettingsRepository for LocalStorage {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        Ok(self.read::<json::Settings>(File::Settings)?.into())
    }

    async fn write_settings(
        &self,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        self.write(File::Settings, &json::Settings::from(settings))?;
        Ok(settings)
    }
}

impl app_log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<app_log::Entry>, app_log::Error> {
        self.read(File::Log)
            .map_err(|err| app_log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: app_log::Entry) -> Result<(), app_log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(LOG_CAPACITY);
        self.write(File::Log, &entries)
            .map_err(|err| app_log::Error::Unknown(err.to_string()))
    }
}
