use thiserror::Error;

/// Errors raised while configuring or mounting a visualization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	#[error("surface bounds must be finite and positive, got {0:?}")]
	InvalidBounds(Vec<f64>),

	#[error("node {index} has invalid radius {radius}")]
	InvalidRadius { index: usize, radius: f64 },

	#[error("node {index} has a non-finite layout position")]
	NonFinitePosition { index: usize },

	#[error("damping must lie in (0, 1], got {0}")]
	InvalidDamping(f64),

	#[error("spring factor must lie in [0, 1), got {0}")]
	InvalidSpring(f64),

	#[error("step weight must be finite and positive, got {0}")]
	InvalidStep(f64),

	#[error("{name} must be finite, got {value}")]
	NonFinite { name: &'static str, value: f64 },

	#[error("random node count range {min}..={max} is empty")]
	EmptyCountRange { min: usize, max: usize },

	#[error("random radius range {min}..{max} is invalid")]
	InvalidRadiusRange { min: f64, max: f64 },

	#[error("random nodes need at least one palette entry")]
	EmptyPalette,

	#[error("static edge ({from}, {to}) references a missing node, only {len} exist")]
	EdgeOutOfRange { from: usize, to: usize, len: usize },

	#[error("no drawing surface: {0}")]
	SurfaceUnavailable(String),

	#[error("browser host unavailable: {0}")]
	HostUnavailable(&'static str),
}
