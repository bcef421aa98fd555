use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

/// A coordinate (or displacement) in `N` dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<const N: usize>(pub [f64; N]);

pub type Point2 = Point<2>;
pub type Point3 = Point<3>;

impl<const N: usize> Point<N> {
	pub const ZERO: Self = Self([0.0; N]);

	pub fn distance(&self, other: &Self) -> f64 {
		self.0
			.iter()
			.zip(other.0.iter())
			.map(|(a, b)| (a - b) * (a - b))
			.sum::<f64>()
			.sqrt()
	}

	pub fn is_finite(&self) -> bool {
		self.0.iter().all(|c| c.is_finite())
	}

	/// Component-wise product, used to map layout fractions onto a surface.
	pub fn scale_by(&self, other: &Self) -> Self {
		let mut out = *self;
		for (c, s) in out.0.iter_mut().zip(other.0.iter()) {
			*c *= s;
		}
		out
	}
}

impl Point2 {
	pub fn new(x: f64, y: f64) -> Self {
		Self([x, y])
	}
}

impl Point3 {
	pub fn new3(x: f64, y: f64, z: f64) -> Self {
		Self([x, y, z])
	}
}

impl<const N: usize> Point<N> {
	pub fn x(&self) -> f64 {
		self.0[0]
	}

	pub fn y(&self) -> f64 {
		self.0[1]
	}
}

impl<const N: usize> Add for Point<N> {
	type Output = Self;

	fn add(mut self, rhs: Self) -> Self {
		self += rhs;
		self
	}
}

impl<const N: usize> AddAssign for Point<N> {
	fn add_assign(&mut self, rhs: Self) {
		for (a, b) in self.0.iter_mut().zip(rhs.0) {
			*a += b;
		}
	}
}

impl<const N: usize> Sub for Point<N> {
	type Output = Self;

	fn sub(mut self, rhs: Self) -> Self {
		for (a, b) in self.0.iter_mut().zip(rhs.0) {
			*a -= b;
		}
		self
	}
}

impl<const N: usize> Mul<f64> for Point<N> {
	type Output = Self;

	fn mul(mut self, rhs: f64) -> Self {
		self *= rhs;
		self
	}
}

impl<const N: usize> MulAssign<f64> for Point<N> {
	fn mul_assign(&mut self, rhs: f64) {
		for c in self.0.iter_mut() {
			*c *= rhs;
		}
	}
}

/// Surface extent per axis. Valid positions lie in `[0, size]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<const N: usize>(pub [f64; N]);

impl Bounds<2> {
	pub fn new(width: f64, height: f64) -> Self {
		Self([width, height])
	}
}

impl<const N: usize> Bounds<N> {
	pub fn size(&self) -> Point<N> {
		Point(self.0)
	}

	pub fn is_valid(&self) -> bool {
		self.0.iter().all(|s| s.is_finite() && *s > 0.0)
	}

	pub fn contains(&self, p: &Point<N>) -> bool {
		p.0.iter().zip(self.0.iter()).all(|(c, s)| (0.0..=*s).contains(c))
	}
}

/// What happens when a node leaves the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryMode {
	/// Clamp to the edge and send the velocity component back inwards.
	Reflect,
	/// Teleport to the opposite edge.
	Wrap,
	#[default]
	None,
}

/// A point mass with display metadata the core never looks at.
#[derive(Clone, Debug)]
pub struct Node<const N: usize, M> {
	pub position: Point<N>,
	pub velocity: Point<N>,
	pub home: Option<Point<N>>,
	pub radius: f64,
	pub meta: M,
}

/// Anything with a position the proximity pass can measure.
pub trait Positioned<const N: usize> {
	fn position(&self) -> Point<N>;
}

impl<const N: usize> Positioned<N> for Point<N> {
	fn position(&self) -> Point<N> {
		*self
	}
}

impl<const N: usize, M> Positioned<N> for Node<N, M> {
	fn position(&self) -> Point<N> {
		self.position
	}
}

/// How a payload wants to be painted.
pub trait Appearance {
	fn color(&self) -> &str;

	fn label(&self) -> Option<&str> {
		None
	}

	fn icon(&self) -> Option<&str> {
		None
	}
}

/// Payload for decorative dots and particles: a colour and nothing else.
#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
	pub color: String,
}

impl Appearance for Dot {
	fn color(&self) -> &str {
		&self.color
	}
}
