//! Generation of transitions by querying a dynamics model.
mod config;
mod generator;
pub use config::SyntheticGeneratorConfig;
pub use generator::SyntheticExperienceGenerator;
