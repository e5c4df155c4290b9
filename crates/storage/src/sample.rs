//! Starter catalog used when no catalog exists yet.

use roulette_domain as domain;

use domain::Category::{Balance, Cardio, Core, Flexibility, General, Strength, Warmup};

const EXERCISES: &[(&str, domain::Category, &str, u32, &str)] = &[
    ("Arm Circles", Warmup, "Circle the arms forwards and backwards", 30, "none"),
    ("Forward Fold", Warmup, "Standing forward bend stretch", 30, "none"),
    ("Hip Circles", Warmup, "Circular hip mobility movement", 30, "none"),
    ("Marching in Place", Warmup, "Lift the knees at a steady pace", 30, "none"),
    ("Jumping Jacks", Cardio, "Full body jumping exercise", 30, "none"),
    ("High Knees", Cardio, "Running in place with high knees", 30, "none"),
    ("Burpees", Cardio, "Full body explosive movement", 30, "none"),
    ("Mountain Climbers", Cardio, "Core and cardio exercise", 30, "none"),
    ("Jump Squats", Cardio, "Explosive squat jumps", 30, "none"),
    ("Butt Kicks", Cardio, "Running in place kicking heels to glutes", 30, "none"),
    ("Star Jumps", Cardio, "Jumping jacks with arms and legs spread wide", 30, "none"),
    ("Sprint in Place", Cardio, "Fast running in place", 30, "none"),
    ("Dumbbell Thrusters", Cardio, "Squat to overhead press with dumbbells", 30, "dumbbells"),
    ("Kettlebell Snatches", Cardio, "Explosive overhead movement", 30, "kettlebells"),
    ("Band Jumping Jacks", Cardio, "Jumping jacks with resistance band overhead", 30, "resistance-bands"),
    ("Push-ups", Strength, "Upper body strength exercise", 30, "none"),
    ("Squats", Strength, "Lower body strength exercise", 30, "none"),
    ("Lunges", Strength, "Leg strength and balance", 30, "none"),
    ("Dips", Strength, "Tricep dips using body weight", 30, "none"),
    ("Wall Sit", Strength, "Isometric squat against wall", 45, "none"),
    ("Glute Bridges", Strength, "Hip thrust exercise", 30, "none"),
    ("Calf Raises", Strength, "Rising onto toes", 30, "none"),
    ("Dumbbell Curls", Strength, "Bicep curls with weights", 30, "dumbbells"),
    ("Dumbbell Press", Strength, "Chest press with weights", 30, "dumbbells"),
    ("Dumbbell Rows", Strength, "Bent-over row with dumbbells", 30, "dumbbells"),
    ("Dumbbell Shoulder Press", Strength, "Overhead press with dumbbells", 30, "dumbbells"),
    ("Dumbbell Lunges", Strength, "Lunges holding dumbbells", 30, "dumbbells"),
    ("Dumbbell Squats", Strength, "Squats holding dumbbells", 30, "dumbbells"),
    ("Dumbbell Tricep Extensions", Strength, "Overhead tricep extension", 30, "dumbbells"),
    ("Kettlebell Swings", Strength, "Hip hinge movement with kettlebell", 30, "kettlebells"),
    ("Kettlebell Goblet Squats", Strength, "Squats holding a kettlebell", 30, "kettlebells"),
    ("Kettlebell Rows", Strength, "Bent-over row with kettlebell", 30, "kettlebells"),
    ("Kettlebell Press", Strength, "Overhead press with kettlebell", 30, "kettlebells"),
    ("Kettlebell Lunges", Strength, "Lunges holding kettlebell", 30, "kettlebells"),
    ("Kettlebell Deadlift", Strength, "Hip hinge movement with kettlebell", 30, "kettlebells"),
    ("Band Rows", Strength, "Back exercise with resistance band", 30, "resistance-bands"),
    ("Band Chest Press", Strength, "Chest exercise with resistance band", 30, "resistance-bands"),
    ("Band Pull-Aparts", Strength, "Shoulder and upper back exercise", 30, "resistance-bands"),
    ("Band Bicep Curls", Strength, "Bicep curls with resistance band", 30, "resistance-bands"),
    ("Band Tricep Extensions", Strength, "Tricep extension with resistance band", 30, "resistance-bands"),
    ("Band Squats", Strength, "Squats with resistance band", 30, "resistance-bands"),
    ("Band Lateral Raises", Strength, "Shoulder lateral raises with band", 30, "resistance-bands"),
    ("Plank", Core, "Core strength hold", 45, "none"),
    ("Crunches", Core, "Abdominal crunches", 30, "none"),
    ("Leg Raises", Core, "Lower ab exercise", 30, "none"),
    ("Russian Twists", Core, "Rotational core exercise", 30, "none"),
    ("Bicycle Crunches", Core, "Alternating knee-to-elbow crunches", 30, "none"),
    ("Side Plank", Core, "Lateral core strength hold", 45, "none"),
    ("Dead Bug", Core, "Core stability exercise on back", 30, "none"),
    ("Hollow Body Hold", Core, "Full body core isometric hold", 45, "none"),
    ("Kettlebell Turkish Get-Up", Core, "Full body movement with kettlebell", 60, "kettlebells"),
    ("Single Leg Stand", Balance, "Balance on one leg", 30, "none"),
    ("Tree Pose", Balance, "Yoga balance pose", 30, "none"),
    ("Single Leg Deadlift", Balance, "Balance and hamstring exercise", 30, "none"),
    ("Dumbbell Single Leg Deadlift", Balance, "Single leg deadlift with weight", 30, "dumbbells"),
    ("Kettlebell Single Leg Deadlift", Balance, "Single leg deadlift with kettlebell", 30, "kettlebells"),
    ("Warrior III", Balance, "Yoga balance pose", 30, "none"),
    ("Stretching", Flexibility, "General stretching", 60, "none"),
    ("Yoga Flow", Flexibility, "Gentle yoga sequence", 60, "none"),
    ("Quad Stretch", Flexibility, "Standing quadricep stretch", 30, "none"),
    ("Hamstring Stretch", Flexibility, "Seated or standing hamstring stretch", 30, "none"),
    ("Shoulder Stretch", Flexibility, "Cross-body shoulder stretch", 30, "none"),
    ("Cat-Cow Stretch", Flexibility, "Spinal mobility movement", 30, "none"),
    ("Child's Pose", Flexibility, "Restorative yoga pose", 60, "none"),
    ("Band Assisted Stretches", Flexibility, "Stretching with resistance band assistance", 60, "resistance-bands"),
    ("Jump Rope", General, "Simulated jump rope movement", 30, "none"),
    ("Bear Crawl", General, "Quadrupedal movement exercise", 30, "none"),
    ("Crab Walk", General, "Reverse tabletop movement", 30, "none"),
    ("Donkey Kicks", General, "Kneeling leg kick exercise", 30, "none"),
    ("Fire Hydrants", General, "Quadruped hip abduction exercise", 30, "none"),
    ("Dumbbell Complex", General, "Multi-movement sequence with dumbbells", 60, "dumbbells"),
    ("Kettlebell Complex", General, "Multi-movement sequence with kettlebell", 60, "kettlebells"),
];

#[must_use]
pub fn exercises() -> Vec<domain::Exercise> {
    EXERCISES
        .iter()
        .zip(1u128..)
        .filter_map(|(&(name, category, description, duration, equipment), id)| {
            Some(domain::Exercise {
                id: id.into(),
                name: domain::Name::new(name).ok()?,
                category,
                description: description.to_string(),
                equipment: domain::Equipment::new(equipment),
                duration: Some(duration),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exercises() {
        let exercises = exercises();

        assert_eq!(exercises.len(), EXERCISES.len());
        assert_eq!(
            exercises.iter().map(|e| e.id).collect::<HashSet<_>>().len(),
            exercises.len()
        );
        assert!(
            exercises
                .iter()
                .filter(|e| e.category == Warmup && e.equipment.is_none())
                .count()
                >= domain::WARMUP_COUNT
        );
        assert_eq!(
            domain::equipment_options(&exercises),
            vec![
                domain::Equipment::none(),
                domain::Equipment::new("dumbbells"),
                domain::Equipment::new("kettlebells"),
                domain::Equipment::new("resistance-bands"),
            ]
        );
    }
}
