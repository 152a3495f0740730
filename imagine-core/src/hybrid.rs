//! Training on real and model-generated transitions.
mod config;
mod trainer;
pub use config::HybridConfig;
pub use trainer::HybridExperienceTrainer;
