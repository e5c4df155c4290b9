#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod generator;
mod name;
mod service;
mod settings;
mod workout;

pub use error::{CreateError, DeleteError, GenerateError, ReadError, StorageError, UpdateError};
pub use exercise::{
    Category, Equipment, Exercise, ExerciseFilter, ExerciseID, ExerciseRepository,
    ExerciseService, categories, equipment_options,
};
pub use generator::{WARMUP_COUNT, WorkoutGenerator, fetch_exercises};
pub use name::{Name, NameError};
pub use service::Service;
pub use settings::{Settings, SettingsRepository, SettingsService};
pub use workout::{
    GenerationParameters, SavedWorkout, Workout, WorkoutEntry, WorkoutID, WorkoutRepository,
    WorkoutService,
};
