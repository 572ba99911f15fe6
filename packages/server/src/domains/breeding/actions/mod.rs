pub mod birth;
pub mod diagnosis;
pub mod mating;

pub use birth::{record_birth, RecordBirth};
pub use diagnosis::{delete_diagnosis, record_diagnosis, update_diagnosis, RecordDiagnosis};
pub use mating::{delete_mating, register_mating, update_mating, RegisterMating, UpdateMating};
