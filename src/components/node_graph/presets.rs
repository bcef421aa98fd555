use super::skill_tree::{CHILD_SKILLS, CORE_NODE_RADIUS, CORE_SKILL, SKILL_NODE_RADIUS, SkillDetails};
use super::state::{EdgeMode, GraphConfig, LayoutNode, NodeSource, RandomNodes};
use super::types::{BoundaryMode, Bounds, Dot};

const NEON: &[(u8, u8, u8)] = &[(57, 255, 20), (123, 77, 255), (255, 0, 255), (0, 245, 255)];

/// Half-width of the particle cloud; the cloud is twice as wide as it is deep.
pub const PARTICLE_SPREAD: f64 = 80.0;
pub const PARTICLE_COUNT: usize = 48;
/// Dots in a drifting overlay. No links are derived, so the pairwise bound does not apply.
pub const DRIFT_COUNT: usize = 100;

fn neon_palette(alpha: f64) -> Vec<Dot> {
	NEON.iter()
		.map(|(r, g, b)| Dot {
			color: format!("rgba({r}, {g}, {b}, {alpha})"),
		})
		.collect()
}

/// Core node first, then each speciality linked back to it.
pub fn skill_tree_config() -> GraphConfig<2, SkillDetails> {
	let mut nodes = vec![LayoutNode {
		fraction: CORE_SKILL.fraction(),
		radius: CORE_SKILL.radius(CORE_NODE_RADIUS),
		meta: SkillDetails::from(&CORE_SKILL),
	}];
	nodes.extend(CHILD_SKILLS.iter().map(|e| LayoutNode {
		fraction: e.fraction(),
		radius: e.radius(SKILL_NODE_RADIUS),
		meta: SkillDetails::from(e),
	}));

	GraphConfig {
		nodes: NodeSource::Layout(nodes),
		boundary: BoundaryMode::Reflect,
		spring: 0.08,
		damping: 0.85,
		step: 1.0,
		edges: EdgeMode::Static((1..=CHILD_SKILLS.len()).map(|c| (0, c)).collect()),
		float_amplitude: 5.0,
		seed: 0,
	}
}

/// Slow free-roaming dots bouncing off the section edges.
pub fn neural_background_config(seed: u64) -> GraphConfig<2, Dot> {
	GraphConfig {
		nodes: NodeSource::Random(RandomNodes {
			count: 20..=49,
			radius: (1.0, 3.0),
			speed: 0.5,
			anchored: false,
			palette: neon_palette(0.5),
		}),
		boundary: BoundaryMode::Reflect,
		spring: 0.0,
		damping: 1.0,
		step: 1.0,
		edges: EdgeMode::Proximity { threshold: 150.0 },
		float_amplitude: 0.0,
		seed,
	}
}

/// Unlinked green dots gliding in straight lines and wrapping at the edges.
pub fn drifting_particles_config(seed: u64) -> GraphConfig<2, Dot> {
	GraphConfig {
		nodes: NodeSource::Random(RandomNodes {
			count: DRIFT_COUNT..=DRIFT_COUNT,
			radius: (1.0, 3.0),
			speed: 2.0,
			anchored: false,
			palette: [0.25, 0.375, 0.5, 0.625, 0.75]
				.iter()
				.map(|a| Dot {
					color: format!("rgba(57, 255, 20, {a})"),
				})
				.collect(),
		}),
		boundary: BoundaryMode::Wrap,
		spring: 0.0,
		damping: 1.0,
		step: 1.0,
		edges: EdgeMode::Static(Vec::new()),
		float_amplitude: 0.0,
		seed,
	}
}

/// Particles tethered to their spawn point inside [`particle_bounds`].
pub fn particle_field_config(seed: u64) -> GraphConfig<3, Dot> {
	GraphConfig {
		nodes: NodeSource::Random(RandomNodes {
			count: PARTICLE_COUNT..=PARTICLE_COUNT,
			radius: (1.0, 2.0),
			speed: 0.2,
			anchored: true,
			palette: neon_palette(0.8),
		}),
		boundary: BoundaryMode::None,
		spring: 0.0008,
		damping: 0.99,
		step: 1.0,
		edges: EdgeMode::Proximity { threshold: 30.0 },
		float_amplitude: 0.0,
		seed,
	}
}

pub fn particle_bounds() -> Bounds<3> {
	Bounds([PARTICLE_SPREAD * 2.0, PARTICLE_SPREAD, PARTICLE_SPREAD])
}
