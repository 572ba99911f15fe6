pub mod birth;
pub mod diagnosis;
pub mod mating;
