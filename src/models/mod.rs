pub mod completion;
pub mod from_row;
pub mod set_record;
pub mod weight;
pub mod workout_plan;

pub use completion::{CompletionSummary, ExerciseCompletion, SessionOutcome, SessionStatus};
pub use from_row::FromSqliteRow;
pub use set_record::{SetInput, SetRecord, WeightInput};
pub use weight::WeightUnit;
pub use workout_plan::{EquipmentClass, ExerciseSpec, RepsPlanned, WorkoutPlan};
