use super::types::{BoundaryMode, Bounds, Point};

/// Per-instance constants for the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
	/// Spring pull toward `home`, in `[0, 1)`.
	pub spring: f64,
	/// Velocity retained per tick, in `(0, 1]`.
	pub damping: f64,
	/// Per-tick step weight; 1.0 is one display frame.
	pub step: f64,
	pub boundary: BoundaryMode,
}

impl Default for PhysicsParams {
	fn default() -> Self {
		Self {
			spring: 0.0,
			damping: 1.0,
			step: 1.0,
			boundary: BoundaryMode::None,
		}
	}
}

/// Advance one node's kinematic state by one tick.
///
/// Spring toward `home` (if any), move, damp, then constrain to `bounds`.
/// Touches nothing but `position` and `velocity`.
pub fn integrate<const N: usize>(
	position: &mut Point<N>,
	velocity: &mut Point<N>,
	home: Option<Point<N>>,
	params: &PhysicsParams,
	bounds: &Bounds<N>,
) {
	let w = params.step;
	if let Some(home) = home {
		*velocity += (home - *position) * (params.spring * w);
	}
	*position += *velocity * w;
	*velocity *= params.damping.powf(w);
	constrain(position, velocity, params.boundary, bounds);
}

fn constrain<const N: usize>(
	position: &mut Point<N>,
	velocity: &mut Point<N>,
	mode: BoundaryMode,
	bounds: &Bounds<N>,
) {
	for axis in 0..N {
		let size = bounds.0[axis];
		let (p, v) = (&mut position.0[axis], &mut velocity.0[axis]);
		match mode {
			BoundaryMode::Reflect => {
				if *p < 0.0 {
					*p = 0.0;
					*v = v.abs();
				} else if *p > size {
					*p = size;
					*v = -v.abs();
				}
			}
			BoundaryMode::Wrap => {
				if *p < 0.0 {
					*p = size;
				} else if *p > size {
					*p = 0.0;
				}
			}
			BoundaryMode::None => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::{Rng, SeedableRng};
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::components::node_graph::types::Point2;

	fn params(boundary: BoundaryMode) -> PhysicsParams {
		PhysicsParams {
			boundary,
			..PhysicsParams::default()
		}
	}

	#[test]
	fn free_particle_moves_by_velocity() {
		let (mut p, mut v) = (Point2::new(10.0, 10.0), Point2::new(1.5, -2.0));
		integrate(&mut p, &mut v, None, &params(BoundaryMode::None), &Bounds::new(100.0, 100.0));
		assert_eq!(p, Point2::new(11.5, 8.0));
		assert_eq!(v, Point2::new(1.5, -2.0));
	}

	#[test]
	fn spring_applies_before_move_and_damping_after() {
		let (mut p, mut v) = (Point2::new(0.0, 0.0), Point2::ZERO);
		let params = PhysicsParams {
			spring: 0.1,
			damping: 0.5,
			..PhysicsParams::default()
		};
		integrate(&mut p, &mut v, Some(Point2::new(10.0, 0.0)), &params, &Bounds::new(100.0, 100.0));
		assert_eq!(p, Point2::new(1.0, 0.0));
		assert_eq!(v, Point2::new(0.5, 0.0));
	}

	#[test]
	fn reflect_clamps_and_turns_inward() {
		let bounds = Bounds::new(100.0, 50.0);
		let (mut p, mut v) = (Point2::new(99.0, 1.0), Point2::new(5.0, -3.0));
		integrate(&mut p, &mut v, None, &params(BoundaryMode::Reflect), &bounds);
		assert_eq!(p, Point2::new(100.0, 0.0));
		assert_eq!(v, Point2::new(-5.0, 3.0));
	}

	#[test]
	fn wrap_teleports_to_opposite_edge() {
		let bounds = Bounds::new(100.0, 50.0);
		let (mut p, mut v) = (Point2::new(99.0, 1.0), Point2::new(5.0, -3.0));
		integrate(&mut p, &mut v, None, &params(BoundaryMode::Wrap), &bounds);
		assert_eq!(p, Point2::new(0.0, 50.0));
		assert_eq!(v, Point2::new(5.0, -3.0));
	}

	#[test]
	fn positions_stay_in_bounds_over_many_ticks() {
		let bounds = Bounds::new(320.0, 180.0);
		for mode in [BoundaryMode::Reflect, BoundaryMode::Wrap] {
			let mut rng = ChaCha8Rng::seed_from_u64(7);
			let mut nodes: Vec<(Point2, Point2)> = (0..20)
				.map(|_| {
					(
						Point2::new(rng.gen_range(0.0..=320.0), rng.gen_range(0.0..=180.0)),
						Point2::new(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0)),
					)
				})
				.collect();
			for _ in 0..10_000 {
				for (p, v) in nodes.iter_mut() {
					integrate(p, v, None, &params(mode), &bounds);
					assert!(bounds.contains(p), "{mode:?} escaped: {p:?}");
				}
			}
		}
	}

	#[test]
	fn damped_spring_settles_at_home() {
		let home = Point2::new(200.0, 150.0);
		let (mut p, mut v) = (Point2::new(20.0, 40.0), Point2::new(3.0, -1.0));
		let initial = p.distance(&home);
		let params = PhysicsParams {
			spring: 0.05,
			damping: 0.9,
			..PhysicsParams::default()
		};
		for _ in 0..500 {
			integrate(&mut p, &mut v, Some(home), &params, &Bounds::new(400.0, 300.0));
		}
		assert!(p.distance(&home) < 0.01 * initial);
	}

	#[test]
	fn integrator_is_pure() {
		let params = PhysicsParams {
			spring: 0.02,
			damping: 0.95,
			step: 1.0,
			boundary: BoundaryMode::Reflect,
		};
		let bounds = Bounds::new(50.0, 50.0);
		let run = || {
			let (mut p, mut v) = (Point2::new(5.0, 45.0), Point2::new(2.0, 2.0));
			for _ in 0..100 {
				integrate(&mut p, &mut v, Some(Point2::new(25.0, 25.0)), &params, &bounds);
			}
			(p, v)
		};
		assert_eq!(run(), run());
	}
}
