use crate::{GenerationParameters, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, ReadError>;
    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

/// Generation policy and defaults for workout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Seconds per exercise if the parameters do not specify a duration.
    pub exercise_duration: u32,
    /// Default rest between exercises in seconds.
    pub rest_time: u32,
    /// Selection weight of exercises using requested equipment, relative to weight 1 for
    /// equipment-free exercises.
    pub equipment_weight: u32,
    /// Like `equipment_weight`, but for the last exercise of a workout.
    pub final_equipment_weight: u32,
    /// Every `core_interval`-th exercise after the warmup is taken from the core pool, starting
    /// with the first one. Zero disables the core preference.
    pub core_interval: u32,
    /// Upper bound for iterations of the sequencing loop.
    pub max_attempts: u32,
    /// Number of saved workouts returned when no limit is given.
    pub history_limit: usize,
}

impl Settings {
    /// Parameters for a workout of `total_time` seconds using the configured defaults.
    #[must_use]
    pub fn parameters(&self, total_time: u32) -> GenerationParameters {
        GenerationParameters::new(total_time)
            .with_rest_time(self.rest_time)
            .with_exercise_duration(self.exercise_duration)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exercise_duration: 60,
            rest_time: 0,
            equipment_weight: 5,
            final_equipment_weight: 10,
            core_interval: 4,
            max_attempts: 1000,
            history_limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_settings_parameters() {
        let settings = Settings {
            exercise_duration: 45,
            rest_time: 15,
            ..Settings::default()
        };
        assert_eq!(
            settings.parameters(900),
            GenerationParameters::new(900)
                .with_rest_time(15)
                .with_exercise_duration(45)
        );
    }
}
