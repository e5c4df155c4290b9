//! Serialized representation shared by the file and network backends.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use roulette_domain as domain;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Record identifier.
///
/// The catalog server numbers its records, records created locally get random UUIDs. A number
/// `n` is mapped to the UUID with the integer value `n`, so both kinds share one domain ID type.
/// Identifiers are written as numbers whenever they fit into a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ID(Uuid);

impl ID {
    fn number(self) -> Option<u64> {
        u64::try_from(self.0.as_u128()).ok()
    }
}

impl From<Uuid> for ID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u64> for ID {
    fn from(value: u64) -> Self {
        Self(Uuid::from_u128(u128::from(value)))
    }
}

impl From<ID> for Uuid {
    fn from(value: ID) -> Self {
        value.0
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number() {
            Some(number) => write!(f, "{number}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for ID {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(number) => Ok(Self::from(number)),
            Err(_) => Ok(Self(Uuid::parse_str(s)?)),
        }
    }
}

impl Serialize for ID {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.number() {
            Some(number) => serializer.serialize_u64(number),
            None => self.0.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(number) => Ok(Self::from(number)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Missing and null strings become empty strings.
fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ID,
    pub name: String,
    pub category: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default = "equipment_none")]
    pub equipment: String,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

fn equipment_none() -> String {
    domain::Equipment::NONE.to_string()
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: (*value.id).into(),
            name: value.name.to_string(),
            category: value.category.to_string(),
            description: value.description.clone(),
            equipment: value.equipment.to_string(),
            duration_seconds: value.duration,
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ExerciseError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from(value.id).into(),
            name: domain::Name::new(&value.name)?,
            category: parse_category(&value.category)?,
            description: value.description,
            equipment: domain::Equipment::new(&value.equipment),
            duration: value.duration_seconds,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

fn parse_category(category: &str) -> Result<domain::Category, ExerciseError> {
    domain::Category::from_str(category)
        .map_err(|_| ExerciseError::InvalidCategory(category.to_string()))
}

/// Body of requests creating an exercise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub name: String,
    pub category: String,
    pub description: String,
    pub equipment: String,
}

/// Exercise of a workout. The catalog server keeps the exercise fields as they are in the
/// catalog, so the duration may also be named `duration_seconds`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEntry {
    pub id: ID,
    pub name: String,
    pub category: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default = "equipment_none")]
    pub equipment: String,
    #[serde(alias = "duration_seconds")]
    pub duration: u32,
    pub order: u32,
}

impl From<&domain::WorkoutEntry> for WorkoutEntry {
    fn from(value: &domain::WorkoutEntry) -> Self {
        Self {
            id: (*value.id).into(),
            name: value.name.to_string(),
            category: value.category.to_string(),
            description: value.description.clone(),
            equipment: value.equipment.to_string(),
            duration: value.duration,
            order: value.order,
        }
    }
}

impl TryFrom<WorkoutEntry> for domain::WorkoutEntry {
    type Error = ExerciseError;

    fn try_from(value: WorkoutEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from(value.id).into(),
            name: domain::Name::new(&value.name)?,
            category: parse_category(&value.category)?,
            description: value.description,
            equipment: domain::Equipment::new(&value.equipment),
            duration: value.duration,
            order: value.order,
        })
    }
}

/// Body of requests saving a workout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub exercises: Vec<WorkoutEntry>,
    pub total_time_seconds: u32,
    pub rest_time: u32,
    pub exercise_duration: u32,
    pub equipment: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            exercises: value.entries.iter().map(WorkoutEntry::from).collect(),
            total_time_seconds: value.total_time,
            rest_time: value.rest_time,
            exercise_duration: value.exercise_duration,
            equipment: value.equipment.iter().map(ToString::to_string).collect(),
            generated_at: value.generated_at,
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = ExerciseError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            entries: value
                .exercises
                .into_iter()
                .map(domain::WorkoutEntry::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total_time: value.total_time_seconds,
            rest_time: value.rest_time,
            exercise_duration: value.exercise_duration,
            equipment: value
                .equipment
                .iter()
                .map(|e| domain::Equipment::new(e))
                .collect::<BTreeSet<_>>(),
            generated_at: value.generated_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedWorkout {
    pub id: ID,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub workout: Workout,
}

impl From<&domain::SavedWorkout> for SavedWorkout {
    fn from(value: &domain::SavedWorkout) -> Self {
        Self {
            id: (*value.id).into(),
            created_at: value.created_at,
            workout: Workout::from(&value.workout),
        }
    }
}

impl TryFrom<SavedWorkout> for domain::SavedWorkout {
    type Error = ExerciseError;

    fn try_from(value: SavedWorkout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from(value.id).into(),
            created_at: value.created_at,
            workout: value.workout.try_into()?,
        })
    }
}

/// Intensity sent to the catalog server, which requires one for every saved workout.
pub const INTENSITY: &str = "medium";

fn intensity() -> String {
    INTENSITY.to_string()
}

/// Workout as accepted by the catalog server.
///
/// The server stores the equipment as one comma separated string. Rest time and exercise
/// duration are not stored by the server and read as zero.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerWorkout {
    pub total_time_seconds: u32,
    #[serde(default = "intensity")]
    pub intensity: String,
    pub equipment: String,
    pub exercises: Vec<WorkoutEntry>,
    #[serde(default)]
    pub rest_time: u32,
    #[serde(default)]
    pub exercise_duration: u32,
}

impl From<&domain::Workout> for ServerWorkout {
    fn from(value: &domain::Workout) -> Self {
        let equipment = value
            .equipment
            .iter()
            .map(domain::Equipment::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            total_time_seconds: value.total_time,
            intensity: intensity(),
            equipment: if equipment.is_empty() {
                equipment_none()
            } else {
                equipment
            },
            exercises: value.entries.iter().map(WorkoutEntry::from).collect(),
            rest_time: value.rest_time,
            exercise_duration: value.exercise_duration,
        }
    }
}

/// Saved workout as returned by the catalog server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerSavedWorkout {
    pub id: ID,
    pub created_at: String,
    #[serde(flatten)]
    pub workout: ServerWorkout,
}

impl TryFrom<ServerSavedWorkout> for domain::SavedWorkout {
    type Error = ExerciseError;

    fn try_from(value: ServerSavedWorkout) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&value.created_at)?;
        let workout = value.workout;
        let entries = workout
            .exercises
            .into_iter()
            .map(domain::WorkoutEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let exercise_duration = match workout.exercise_duration {
            0 => entries.first().map_or(0, |e| e.duration),
            duration => duration,
        };
        Ok(Self {
            id: Uuid::from(value.id).into(),
            created_at,
            workout: domain::Workout {
                entries,
                total_time: workout.total_time_seconds,
                rest_time: workout.rest_time,
                exercise_duration,
                equipment: workout
                    .equipment
                    .split(',')
                    .filter(|e| !e.trim().is_empty())
                    .map(domain::Equipment::new)
                    .collect(),
                generated_at: created_at,
            },
        })
    }
}

/// Parse a server timestamp. SQLite writes `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ExerciseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|timestamp| timestamp.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|timestamp| timestamp.to_utc()))
        .map_err(|_| ExerciseError::InvalidTimestamp(value.to_string()))
}

/// Response of the catalog server to a created record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: ID,
}

/// Stored settings. Missing fields take their default value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub exercise_duration: u32,
    pub rest_time: u32,
    pub equipment_weight: u32,
    pub final_equipment_weight: u32,
    pub core_interval: u32,
    pub max_attempts: u32,
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(domain::Settings::default())
    }
}

impl From<domain::Settings> for Settings {
    fn from(value: domain::Settings) -> Self {
        Self {
            exercise_duration: value.exercise_duration,
            rest_time: value.rest_time,
            equipment_weight: value.equipment_weight,
            final_equipment_weight: value.final_equipment_weight,
            core_interval: value.core_interval,
            max_attempts: value.max_attempts,
            history_limit: value.history_limit,
        }
    }
}

impl From<Settings> for domain::Settings {
    fn from(value: Settings) -> Self {
        Self {
            exercise_duration: value.exercise_duration,
            rest_time: value.rest_time,
            equipment_weight: value.equipment_weight,
            final_equipment_weight: value.final_equipment_weight,
            core_interval: value.core_interval,
            max_attempts: value.max_attempts,
            history_limit: value.history_limit,
        }
    }
}
