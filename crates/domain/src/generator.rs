//! Workout generator
//!
//! A workout starts with two warmup exercises. The remaining time is filled with exercises from
//! the core pool and the merged strength/cardio pool, where every `core_interval`-th slot prefers
//! core. Exercises using requested equipment are drawn with a higher weight than equipment-free
//! ones. No exercise is repeated before all eligible exercises have been used. After that the
//! post-warmup part of the workout is replayed in its original order.
//!
//! Time accounting: every exercise takes the configured exercise duration. A slot that still
//! leaves room for a rest and another exercise is charged exercise duration plus rest time. The
//! last exercise is charged its duration only.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use futures_util::future::try_join_all;
use log::{debug, warn};
use rand::{
    Rng,
    distributions::WeightedError,
    seq::SliceRandom,
};

use crate::{
    Category, Equipment, Exercise, ExerciseFilter, ExerciseID, ExerciseRepository, GenerateError,
    GenerationParameters, ReadError, Settings, Workout, WorkoutEntry,
};

pub const WARMUP_COUNT: usize = 2;

pub struct WorkoutGenerator {
    settings: Settings,
}

impl WorkoutGenerator {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn generate<R: ExerciseRepository>(
        &self,
        repository: &R,
        parameters: &GenerationParameters,
    ) -> Result<Workout, GenerateError> {
        let exercises = fetch_exercises(repository, &parameters.requested_equipment()).await?;
        self.assemble(exercises, parameters, &mut rand::thread_rng())
    }

    /// Put together a workout from already fetched catalog entries.
    pub fn assemble<G: Rng + ?Sized>(
        &self,
        exercises: Vec<Exercise>,
        parameters: &GenerationParameters,
        rng: &mut G,
    ) -> Result<Workout, GenerateError> {
        if exercises.is_empty() {
            return Err(GenerateError::EmptyCatalog);
        }

        let equipment = parameters.requested_equipment();
        let duration = if parameters.exercise_duration == 0 {
            self.settings.exercise_duration
        } else {
            parameters.exercise_duration
        };
        let rest = parameters.rest_time;

        let (warmup, core, strength_cardio) = partition(exercises, &equipment, parameters);

        debug!(
            "partitioned catalog into {} warmup, {} core and {} strength/cardio exercises",
            warmup.len(),
            core.len(),
            strength_cardio.len()
        );

        if warmup.len() < WARMUP_COUNT {
            return Err(GenerateError::InsufficientWarmup {
                available: warmup.len(),
            });
        }

        if core.is_empty() && strength_cardio.is_empty() {
            return Err(GenerateError::InsufficientCatalog);
        }

        match duration.checked_mul(2).and_then(|d| d.checked_add(rest)) {
            Some(required) if required <= parameters.total_time => {}
            required => {
                return Err(GenerateError::InsufficientTime {
                    required: required.unwrap_or(u32::MAX),
                });
            }
        }

        let warmup = Pool::new(warmup, &equipment, rng);
        let core = Pool::new(core, &equipment, rng);
        let strength_cardio = Pool::new(strength_cardio, &equipment, rng);

        let mut sequence = Sequence::new(duration, rest);

        for i in 0..WARMUP_COUNT {
            let candidates = warmup.available(&sequence.used);
            let Some(exercise) =
                choose(&candidates, &equipment, self.settings.equipment_weight, rng)
            else {
                return Err(GenerateError::InsufficientWarmup {
                    available: warmup.len(),
                });
            };
            sequence.push(WorkoutEntry::new(exercise, duration, 0));
            sequence.elapsed += duration;
            if i + 1 < WARMUP_COUNT {
                sequence.elapsed += rest;
            }
        }

        self.fill(
            &mut sequence,
            &core,
            &strength_cardio,
            &equipment,
            parameters.total_time,
            rng,
        );

        Ok(Workout {
            total_time: sequence.elapsed - sequence.trailing_rest,
            entries: sequence.entries,
            rest_time: rest,
            exercise_duration: duration,
            equipment: parameters.equipment.clone(),
            generated_at: Utc::now(),
        })
    }

    fn fill<G: Rng + ?Sized>(
        &self,
        sequence: &mut Sequence,
        core: &Pool,
        strength_cardio: &Pool,
        equipment: &BTreeSet<Equipment>,
        total_time: u32,
        rng: &mut G,
    ) {
        let mut post_warmup_count: u32 = 0;
        let mut repeat: Option<Vec<WorkoutEntry>> = None;
        let mut repeat_index = 0;
        let mut attempts = 0;

        while sequence.elapsed < total_time {
            if attempts >= self.settings.max_attempts {
                warn!(
                    "stopped workout generation after {attempts} attempts with {} exercises",
                    sequence.entries.len()
                );
                break;
            }
            attempts += 1;

            let Some(slot) = sequence.slot(total_time - sequence.elapsed) else {
                break;
            };

            let available_core = core.available(&sequence.used);
            let available_strength_cardio = strength_cardio.available(&sequence.used);

            let entry = if available_core.is_empty() && available_strength_cardio.is_empty() {
                let replay = repeat.get_or_insert_with(|| {
                    debug!("all eligible exercises used, repeating sequence");
                    sequence.entries[WARMUP_COUNT..].to_vec()
                });
                if replay.is_empty() {
                    break;
                }
                let entry = replay[repeat_index % replay.len()].clone();
                repeat_index += 1;
                entry
            } else {
                let prefer_core = self.settings.core_interval != 0
                    && post_warmup_count % self.settings.core_interval == 0;
                let (preferred, other) = if prefer_core {
                    (available_core, available_strength_cardio)
                } else {
                    (available_strength_cardio, available_core)
                };
                let candidates = if preferred.is_empty() {
                    other
                } else {
                    preferred
                };
                let weight = match slot {
                    Slot::Regular => self.settings.equipment_weight,
                    Slot::Final => self.settings.final_equipment_weight,
                };
                let Some(exercise) = choose(&candidates, equipment, weight, rng) else {
                    break;
                };
                WorkoutEntry::new(exercise, sequence.duration, 0)
            };

            sequence.push(entry);

            match slot {
                Slot::Regular => {
                    sequence.elapsed += sequence.duration + sequence.rest;
                    sequence.trailing_rest = sequence.rest;
                    post_warmup_count += 1;
                }
                Slot::Final => {
                    sequence.elapsed += sequence.duration;
                    sequence.trailing_rest = 0;
                    break;
                }
            }
        }
    }
}

/// Fetch all exercises usable with the given equipment.
///
/// The catalog is queried once per equipment tag and once for `none`. Exercises returned by
/// several queries are kept once.
pub async fn fetch_exercises<R: ExerciseRepository>(
    repository: &R,
    equipment: &BTreeSet<Equipment>,
) -> Result<Vec<Exercise>, ReadError> {
    let filters = equipment
        .iter()
        .filter(|e| !e.is_none())
        .cloned()
        .chain(std::iter::once(Equipment::none()))
        .map(ExerciseFilter::equipment)
        .collect::<Vec<_>>();

    let results = try_join_all(filters.iter().map(|f| repository.read_exercises(f))).await?;

    let mut seen = HashSet::new();
    let exercises = results
        .into_iter()
        .flatten()
        .filter(|e| seen.insert(e.id))
        .collect::<Vec<_>>();

    debug!(
        "fetched {} exercises for equipment {:?}",
        exercises.len(),
        equipment.iter().map(Equipment::as_str).collect::<Vec<_>>()
    );

    Ok(exercises)
}

fn partition(
    exercises: Vec<Exercise>,
    equipment: &BTreeSet<Equipment>,
    parameters: &GenerationParameters,
) -> (Vec<Exercise>, Vec<Exercise>, Vec<Exercise>) {
    let mut warmup = vec![];
    let mut core = vec![];
    let mut strength_cardio = vec![];

    for exercise in exercises {
        if !exercise.equipment.is_none() && !equipment.contains(&exercise.equipment) {
            continue;
        }
        if let Some(categories) = &parameters.categories {
            if !categories.contains(&exercise.category) {
                continue;
            }
        }
        match exercise.category {
            Category::Warmup => warmup.push(exercise),
            Category::Core => core.push(exercise),
            category if category.is_strength_cardio() => strength_cardio.push(exercise),
            _ => {}
        }
    }

    (warmup, core, strength_cardio)
}

/// Draw one exercise. Exercises using requested equipment have weight `equipment_weight`, all
/// others weight 1. If every candidate weighs zero, the draw is uniform.
fn choose<'a, G: Rng + ?Sized>(
    candidates: &[&'a Exercise],
    equipment: &BTreeSet<Equipment>,
    equipment_weight: u32,
    rng: &mut G,
) -> Option<&'a Exercise> {
    let weighted = candidates.choose_weighted(&mut *rng, |e| {
        if equipment.contains(&e.equipment) {
            equipment_weight
        } else {
            1
        }
    });
    match weighted {
        Ok(exercise) => Some(*exercise),
        Err(WeightedError::AllWeightsZero) => candidates.choose(rng).copied(),
        Err(_) => None,
    }
}

/// Exercises of one category bucket, split by equipment usage and shuffled once.
struct Pool {
    with_equipment: Vec<Exercise>,
    without_equipment: Vec<Exercise>,
}

impl Pool {
    fn new<G: Rng + ?Sized>(
        exercises: Vec<Exercise>,
        equipment: &BTreeSet<Equipment>,
        rng: &mut G,
    ) -> Self {
        let (mut with_equipment, mut without_equipment): (Vec<_>, Vec<_>) = exercises
            .into_iter()
            .partition(|e| equipment.contains(&e.equipment));
        with_equipment.shuffle(rng);
        without_equipment.shuffle(rng);
        Self {
            with_equipment,
            without_equipment,
        }
    }

    fn len(&self) -> usize {
        self.with_equipment.len() + self.without_equipment.len()
    }

    fn available(&self, used: &HashSet<ExerciseID>) -> Vec<&Exercise> {
        self.with_equipment
            .iter()
            .chain(&self.without_equipment)
            .filter(|e| !used.contains(&e.id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Another exercise fits after this one and the following rest.
    Regular,
    /// Only this exercise fits.
    Final,
}

struct Sequence {
    duration: u32,
    rest: u32,
    entries: Vec<WorkoutEntry>,
    used: HashSet<ExerciseID>,
    elapsed: u32,
    trailing_rest: u32,
}

impl Sequence {
    fn new(duration: u32, rest: u32) -> Self {
        Self {
            duration,
            rest,
            entries: vec![],
            used: HashSet::new(),
            elapsed: 0,
            trailing_rest: 0,
        }
    }

    fn slot(&self, remaining: u32) -> Option<Slot> {
        let regular = self
            .duration
            .checked_mul(2)
            .and_then(|d| d.checked_add(self.rest));
        if regular.is_some_and(|regular| regular <= remaining) {
            Some(Slot::Regular)
        } else if self.duration <= remaining {
            Some(Slot::Final)
        } else {
            None
        }
    }

    fn push(&mut self, mut entry: WorkoutEntry) {
        #[allow(clippy::cast_possible_truncation)]
        let order = self.entries.len() as u32 + 1;
        entry.order = order;
        self.used.insert(entry.id);
        self.entries.push(entry);
    }
}
