pub mod duration;
pub mod rules;
pub mod types;
