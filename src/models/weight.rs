use serde::{Deserialize, Serialize};

const LBS_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" => WeightUnit::Kg,
            _ => WeightUnit::Lbs,
        }
    }

    pub fn convert(&self, value: f64, to: WeightUnit) -> f64 {
        match (self, to) {
            (WeightUnit::Lbs, WeightUnit::Kg) => value / LBS_PER_KG,
            (WeightUnit::Kg, WeightUnit::Lbs) => value * LBS_PER_KG,
            _ => value,
        }
    }
}
