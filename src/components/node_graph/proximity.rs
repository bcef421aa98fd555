use std::marker::PhantomData;

use super::types::Positioned;

/// A drawn connection between two nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Lower node index.
	pub a: usize,
	/// Higher node index.
	pub b: usize,
	/// `1 - distance / threshold` for derived links, 1.0 for static ones.
	pub intensity: f64,
}

/// Lazily walks every pair `(i, j)` with `i < j` closer than `threshold`.
///
/// Holds no state beyond the cursor, so calling [`proximity_links`] again on
/// the same slice restarts the walk.
pub struct ProximityLinks<'a, const N: usize, T> {
	items: &'a [T],
	threshold: f64,
	i: usize,
	j: usize,
	_dim: PhantomData<[(); N]>,
}

pub fn proximity_links<const N: usize, T: Positioned<N>>(
	items: &[T],
	threshold: f64,
) -> ProximityLinks<'_, N, T> {
	// A non-positive threshold starts the cursor past the end.
	let start = if threshold > 0.0 { 0 } else { items.len() };
	ProximityLinks {
		items,
		threshold,
		i: start,
		j: start + 1,
		_dim: PhantomData,
	}
}

impl<const N: usize, T: Positioned<N>> Iterator for ProximityLinks<'_, N, T> {
	type Item = Link;

	fn next(&mut self) -> Option<Link> {
		let n = self.items.len();
		while self.i < n {
			if self.j >= n {
				self.i += 1;
				self.j = self.i + 1;
				continue;
			}
			let (i, j) = (self.i, self.j);
			self.j += 1;
			let dist = self.items[i].position().distance(&self.items[j].position());
			if dist < self.threshold {
				return Some(Link {
					a: i,
					b: j,
					intensity: (1.0 - dist / self.threshold).clamp(0.0, 1.0),
				});
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::{Rng, SeedableRng};
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::components::node_graph::types::{Point2, Point3};

	fn scatter(seed: u64, n: usize) -> Vec<Point2> {
		let mut rng = ChaCha8Rng::seed_from_u64(seed);
		(0..n)
			.map(|_| Point2::new(rng.gen_range(0.0..300.0), rng.gen_range(0.0..300.0)))
			.collect()
	}

	#[test]
	fn links_close_pairs_with_fading_intensity() {
		let pts = [
			Point2::new(0.0, 0.0),
			Point2::new(30.0, 40.0),
			Point2::new(500.0, 500.0),
		];
		let links: Vec<_> = proximity_links(&pts, 100.0).collect();
		assert_eq!(links.len(), 1);
		assert_eq!((links[0].a, links[0].b), (0, 1));
		assert!((links[0].intensity - 0.5).abs() < 1e-12);
	}

	#[test]
	fn non_positive_threshold_yields_nothing() {
		let pts = scatter(1, 40);
		assert_eq!(proximity_links(&pts, 0.0).count(), 0);
		assert_eq!(proximity_links(&pts, -5.0).count(), 0);
	}

	#[test]
	fn pairs_are_ordered_unique_and_order_independent() {
		let pts = scatter(3, 50);
		let forward: Vec<_> = proximity_links(&pts, 80.0).collect();
		assert!(!forward.is_empty());
		let mut seen = HashSet::new();
		for l in &forward {
			assert!(l.a < l.b);
			assert!(seen.insert((l.a, l.b)), "duplicate pair {:?}", (l.a, l.b));
			assert!((0.0..=1.0).contains(&l.intensity));
		}

		// Reversing the slice must link exactly the same unordered pairs.
		let n = pts.len();
		let reversed: Vec<_> = pts.iter().rev().copied().collect();
		let mirrored: HashSet<_> = proximity_links(&reversed, 80.0)
			.map(|l| {
				let (a, b) = (n - 1 - l.a, n - 1 - l.b);
				(a.min(b), a.max(b))
			})
			.collect();
		assert_eq!(seen, mirrored);
	}

	#[test]
	fn walk_restarts_from_scratch() {
		let pts = scatter(9, 30);
		let first: Vec<_> = proximity_links(&pts, 60.0).collect();
		let second: Vec<_> = proximity_links(&pts, 60.0).collect();
		assert_eq!(first, second);
	}

	#[test]
	fn works_in_three_dimensions() {
		let pts = [Point3::new3(0.0, 0.0, 0.0), Point3::new3(0.0, 0.0, 20.0)];
		assert_eq!(proximity_links(&pts, 30.0).count(), 1);
		assert_eq!(proximity_links(&pts, 20.0).count(), 0);
	}
}
