use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentClass {
    #[default]
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
    Bands,
    Kettlebell,
}

impl EquipmentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentClass::Barbell => "barbell",
            EquipmentClass::Dumbbell => "dumbbell",
            EquipmentClass::Machine => "machine",
            EquipmentClass::Cable => "cable",
            EquipmentClass::Bodyweight => "bodyweight",
            EquipmentClass::Bands => "bands",
            EquipmentClass::Kettlebell => "kettlebell",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "dumbbell" => EquipmentClass::Dumbbell,
            "machine" => EquipmentClass::Machine,
            "cable" => EquipmentClass::Cable,
            "bodyweight" => EquipmentClass::Bodyweight,
            "bands" => EquipmentClass::Bands,
            "kettlebell" => EquipmentClass::Kettlebell,
            _ => EquipmentClass::Barbell,
        }
    }

    /// Bodyweight movements start without a weight field; the user may still add one.
    pub fn shows_weight_input(&self) -> bool {
        !matches!(self, EquipmentClass::Bodyweight)
    }
}

/// Planned reps, either a numeric range ("8-12") or free text ("AMRAP").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawRepsPlanned")]
pub enum RepsPlanned {
    Range { min: u32, max: u32 },
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRepsPlanned {
    Range { min: u32, max: u32 },
    Count(u32),
    Text(String),
}

impl From<RawRepsPlanned> for RepsPlanned {
    fn from(raw: RawRepsPlanned) -> Self {
        match raw {
            RawRepsPlanned::Range { min, max } => RepsPlanned::Range { min, max },
            RawRepsPlanned::Count(n) => RepsPlanned::Range { min: n, max: n },
            RawRepsPlanned::Text(s) => RepsPlanned::parse(&s),
        }
    }
}

impl RepsPlanned {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let range = trimmed
            .split_once('-')
            .and_then(|(lo, hi)| Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?)));
        match range {
            Some((min, max)) if min <= max => RepsPlanned::Range { min, max },
            _ => match trimmed.parse::<u32>() {
                Ok(n) => RepsPlanned::Range { min: n, max: n },
                Err(_) => RepsPlanned::Text(trimmed.to_string()),
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            RepsPlanned::Range { min, max } if min == max => min.to_string(),
            RepsPlanned::Range { min, max } => format!("{}-{}", min, max),
            RepsPlanned::Text(s) => s.clone(),
        }
    }
}

impl Default for RepsPlanned {
    fn default() -> Self {
        RepsPlanned::Range { min: 8, max: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub equipment_class: EquipmentClass,
    pub sets_planned: u32,
    #[serde(default)]
    pub reps_planned: RepsPlanned,
    pub rest_seconds: u32,
    #[serde(default)]
    pub order_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub workout_id: String,
    #[serde(default)]
    pub name: String,
    pub exercises: Vec<ExerciseSpec>,
}

impl WorkoutPlan {
    /// Exercises sorted by `order_index`, ties kept in the order given.
    pub fn normalized(mut self) -> Self {
        self.exercises.sort_by_key(|e| e.order_index);
        self
    }

    pub fn total_sets_planned(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets_planned).sum()
    }

    pub fn exercise(&self, index: usize) -> Option<&ExerciseSpec> {
        self.exercises.get(index)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
