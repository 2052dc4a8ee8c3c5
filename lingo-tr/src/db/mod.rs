//! Database access for lingo-tr

pub mod trainings;

pub use trainings::TrainingItem;
