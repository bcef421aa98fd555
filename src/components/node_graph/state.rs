use std::ops::RangeInclusive;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::GraphError;
use super::physics::{PhysicsParams, integrate};
use super::proximity::{Link, proximity_links};
use super::render::DrawSurface;
use super::types::{BoundaryMode, Bounds, Node, Point};

/// Phase advance of the floating motion, radians per tick.
pub const FLOAT_RATE: f64 = 0.0167;
/// Pulse travel along an edge per tick, as a fraction of its length.
pub const PULSE_RATE: f64 = 0.01;

/// A node placed at a fraction of the surface size.
#[derive(Clone, Debug)]
pub struct LayoutNode<const N: usize, M> {
	pub fraction: Point<N>,
	pub radius: f64,
	pub meta: M,
}

/// Request for a randomly scattered population.
#[derive(Clone, Debug)]
pub struct RandomNodes<M> {
	pub count: RangeInclusive<usize>,
	/// Inclusive lower, exclusive upper radius; equal ends give a fixed radius.
	pub radius: (f64, f64),
	/// Initial velocity per axis is uniform in `±speed / 2`.
	pub speed: f64,
	/// Spring back to the spawn point instead of roaming free.
	pub anchored: bool,
	pub palette: Vec<M>,
}

#[derive(Clone, Debug)]
pub enum NodeSource<const N: usize, M> {
	Layout(Vec<LayoutNode<N, M>>),
	Random(RandomNodes<M>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EdgeMode {
	/// Link every pair closer than `threshold`, re-derived each tick.
	Proximity { threshold: f64 },
	/// Fixed `(from, to)` pairs.
	Static(Vec<(usize, usize)>),
}

#[derive(Clone, Debug)]
pub struct GraphConfig<const N: usize, M> {
	pub nodes: NodeSource<N, M>,
	pub boundary: BoundaryMode,
	pub spring: f64,
	pub damping: f64,
	pub step: f64,
	pub edges: EdgeMode,
	/// Amplitude of the anchor bob along the second axis; 0 disables it.
	pub float_amplitude: f64,
	pub seed: u64,
}

impl<const N: usize, M> GraphConfig<N, M> {
	fn physics(&self) -> PhysicsParams {
		PhysicsParams {
			spring: self.spring,
			damping: self.damping,
			step: self.step,
			boundary: self.boundary,
		}
	}

	fn validate(&self) -> Result<(), GraphError> {
		if !(self.damping > 0.0 && self.damping <= 1.0) {
			return Err(GraphError::InvalidDamping(self.damping));
		}
		if !(0.0..1.0).contains(&self.spring) {
			return Err(GraphError::InvalidSpring(self.spring));
		}
		if !(self.step.is_finite() && self.step > 0.0) {
			return Err(GraphError::InvalidStep(self.step));
		}
		if !self.float_amplitude.is_finite() {
			return Err(GraphError::NonFinite {
				name: "float amplitude",
				value: self.float_amplitude,
			});
		}
		if let EdgeMode::Proximity { threshold } = self.edges {
			if !threshold.is_finite() {
				return Err(GraphError::NonFinite {
					name: "proximity threshold",
					value: threshold,
				});
			}
		}
		match &self.nodes {
			NodeSource::Layout(list) => {
				for (index, n) in list.iter().enumerate() {
					if !n.fraction.is_finite() {
						return Err(GraphError::NonFinitePosition { index });
					}
					if !(n.radius.is_finite() && n.radius >= 0.0) {
						return Err(GraphError::InvalidRadius {
							index,
							radius: n.radius,
						});
					}
				}
			}
			NodeSource::Random(random) => {
				if random.count.is_empty() {
					return Err(GraphError::EmptyCountRange {
						min: *random.count.start(),
						max: *random.count.end(),
					});
				}
				let (min, max) = random.radius;
				if !(min.is_finite() && max.is_finite() && min >= 0.0 && min <= max) {
					return Err(GraphError::InvalidRadiusRange { min, max });
				}
				if !random.speed.is_finite() {
					return Err(GraphError::NonFinite {
						name: "speed",
						value: random.speed,
					});
				}
				if random.palette.is_empty() {
					return Err(GraphError::EmptyPalette);
				}
			}
		}
		Ok(())
	}
}

fn check_bounds<const N: usize>(bounds: &Bounds<N>) -> Result<(), GraphError> {
	if bounds.is_valid() {
		Ok(())
	} else {
		Err(GraphError::InvalidBounds(bounds.0.to_vec()))
	}
}

/// One animated surface: nodes, their physics, their links and the pointer
/// state used for highlighting.
pub struct NodeGraphVisualization<const N: usize, M> {
	config: GraphConfig<N, M>,
	bounds: Bounds<N>,
	nodes: Vec<Node<N, M>>,
	links: Vec<Link>,
	rng: ChaCha8Rng,
	ticks: u64,
	hovered: Option<usize>,
	focused: Option<usize>,
	on_select: Option<Box<dyn FnMut(&M)>>,
}

impl<const N: usize, M: Clone> NodeGraphVisualization<N, M> {
	pub fn initialize(config: GraphConfig<N, M>, bounds: Bounds<N>) -> Result<Self, GraphError> {
		config.validate()?;
		check_bounds(&bounds)?;

		let mut graph = Self {
			rng: ChaCha8Rng::seed_from_u64(config.seed),
			config,
			bounds,
			nodes: Vec::new(),
			links: Vec::new(),
			ticks: 0,
			hovered: None,
			focused: None,
			on_select: None,
		};
		graph.nodes = graph.spawn(&bounds);
		graph.check_static_edges(graph.nodes.len())?;
		graph.refresh_links();
		debug!(
			"node graph initialized: {} nodes, {} links, bounds {:?}",
			graph.nodes.len(),
			graph.links.len(),
			graph.bounds.0
		);
		Ok(graph)
	}

	/// Fresh node set for `bounds`. Random populations draw from the graph's rng.
	fn spawn(&mut self, bounds: &Bounds<N>) -> Vec<Node<N, M>> {
		let size = bounds.size();
		match &self.config.nodes {
			NodeSource::Layout(list) => list
				.iter()
				.map(|n| {
					let home = n.fraction.scale_by(&size);
					Node {
						position: home,
						velocity: Point::ZERO,
						home: Some(home),
						radius: n.radius,
						meta: n.meta.clone(),
					}
				})
				.collect(),
			NodeSource::Random(random) => {
				let rng = &mut self.rng;
				let count = rng.gen_range(random.count.clone());
				(0..count)
					.map(|_| {
						let mut position = Point::ZERO;
						let mut velocity = Point::ZERO;
						for axis in 0..N {
							position.0[axis] = rng.r#gen::<f64>() * size.0[axis];
							velocity.0[axis] = (rng.r#gen::<f64>() - 0.5) * random.speed;
						}
						let (min, max) = random.radius;
						let radius = if min < max { rng.gen_range(min..max) } else { min };
						let meta = random.palette[rng.gen_range(0..random.palette.len())].clone();
						Node {
							position,
							velocity,
							home: random.anchored.then_some(position),
							radius,
							meta,
						}
					})
					.collect()
			}
		}
	}

	/// Every static pair must index into a population of `len` nodes.
	fn check_static_edges(&self, len: usize) -> Result<(), GraphError> {
		if let EdgeMode::Static(pairs) = &self.config.edges {
			if let Some(&(from, to)) = pairs.iter().find(|(a, b)| *a >= len || *b >= len) {
				return Err(GraphError::EdgeOutOfRange { from, to, len });
			}
		}
		Ok(())
	}

	fn refresh_links(&mut self) {
		self.links.clear();
		match &self.config.edges {
			EdgeMode::Proximity { threshold } => {
				self.links
					.extend(proximity_links::<N, _>(&self.nodes, *threshold));
			}
			EdgeMode::Static(pairs) => {
				self.links.extend(pairs.iter().map(|&(a, b)| Link {
					a,
					b,
					intensity: 1.0,
				}));
			}
		}
	}

	pub fn nodes(&self) -> &[Node<N, M>] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn bounds(&self) -> Bounds<N> {
		self.bounds
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn focused(&self) -> Option<usize> {
		self.focused
	}

	/// Register the listener fed with a node's metadata when it is selected.
	pub fn set_on_select(&mut self, listener: impl FnMut(&M) + 'static) {
		self.on_select = Some(Box::new(listener));
	}

	/// Physics for every node, then edge derivation.
	pub fn step(&mut self) {
		self.ticks += 1;
		let params = self.config.physics();
		let (t, amplitude) = (self.ticks as f64 * self.config.step, self.config.float_amplitude);
		for node in self.nodes.iter_mut() {
			let anchor = node.home.map(|h| float_anchor(h, t, amplitude));
			integrate(&mut node.position, &mut node.velocity, anchor, &params, &self.bounds);
		}
		if matches!(self.config.edges, EdgeMode::Proximity { .. }) {
			self.refresh_links();
		}
	}

	/// Advance one tick and draw the result.
	pub fn tick<S: DrawSurface<N, M> + ?Sized>(&mut self, surface: &mut S) {
		self.step();
		self.render(surface);
	}

	pub fn render<S: DrawSurface<N, M> + ?Sized>(&self, surface: &mut S) {
		surface.clear();
		let pulse = (self.ticks as f64 * self.config.step * PULSE_RATE).fract();
		for link in &self.links {
			surface.draw_edge(&self.nodes[link.a], &self.nodes[link.b], link, pulse);
		}
		for (i, node) in self.nodes.iter().enumerate() {
			let emphasized = self.hovered == Some(i) || self.focused == Some(i);
			surface.draw_node(node, emphasized);
		}
	}

	/// First node, in index order, whose disc contains `pointer`.
	pub fn hit_test(&self, pointer: Point<N>) -> Option<usize> {
		self.nodes
			.iter()
			.position(|n| n.position.distance(&pointer) <= n.radius)
	}

	pub fn hover(&mut self, pointer: Point<N>) -> Option<usize> {
		self.hovered = self.hit_test(pointer);
		self.hovered
	}

	pub fn clear_hover(&mut self) {
		self.hovered = None;
	}

	/// Focus the node under `pointer` and hand its metadata to the listener.
	pub fn select(&mut self, pointer: Point<N>) -> Option<usize> {
		let idx = self.hit_test(pointer)?;
		self.focused = Some(idx);
		if let Some(listener) = self.on_select.as_mut() {
			listener(&self.nodes[idx].meta);
		}
		Some(idx)
	}

	/// Rebuild the node set for new bounds. Rejected bounds, or a random
	/// population too small for the static pairs, leave nodes, links and
	/// pointer state untouched.
	pub fn resize(&mut self, bounds: Bounds<N>) -> Result<(), GraphError> {
		check_bounds(&bounds)?;
		let nodes = self.spawn(&bounds);
		self.check_static_edges(nodes.len())?;

		if matches!(self.config.nodes, NodeSource::Random(_)) {
			self.hovered = None;
			self.focused = None;
		}
		self.bounds = bounds;
		self.nodes = nodes;
		self.refresh_links();
		debug!("node graph resized to {:?}: {} nodes", bounds.0, self.nodes.len());
		Ok(())
	}
}

fn float_anchor<const N: usize>(home: Point<N>, t: f64, amplitude: f64) -> Point<N> {
	if amplitude == 0.0 || N < 2 {
		return home;
	}
	let mut anchor = home;
	anchor.0[1] += (t * FLOAT_RATE + home.0[0]).sin() * amplitude;
	anchor
}
