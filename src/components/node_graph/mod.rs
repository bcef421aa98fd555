//! Animated node-graph surfaces: a point-mass integrator, proximity linking,
//! a visibility-gated frame loop and the visualization that composes them.

mod component;
pub mod error;
pub mod physics;
pub mod presets;
pub mod proximity;
pub mod render;
pub mod scheduler;
pub mod skill_tree;
pub mod state;
pub mod types;
pub mod web;

pub use component::{DriftingParticles, NeuralBackground, ParticleField, SkillTreeCanvas};
pub use error::GraphError;
pub use skill_tree::SkillDetails;
pub use state::NodeGraphVisualization;
