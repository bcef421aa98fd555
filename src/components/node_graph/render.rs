use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::GraphError;
use super::proximity::Link;
use super::types::{Appearance, Bounds, Node, Point2, Point3};

/// Where a visualization paints itself each tick.
pub trait DrawSurface<const N: usize, M> {
	fn clear(&mut self);
	/// `pulse` is the shared travel phase in `[0, 1)` for edge decorations.
	fn draw_edge(&mut self, from: &Node<N, M>, to: &Node<N, M>, link: &Link, pulse: f64);
	fn draw_node(&mut self, node: &Node<N, M>, emphasized: bool);
}

/// A surface whose pixel size follows its canvas element.
pub trait ResizeSurface {
	fn resize(&mut self, width: f64, height: f64);
}

/// Re-express `#RRGGBB` or `rgba(r, g, b, a)` with a new alpha.
/// Anything else is returned unchanged.
pub fn with_alpha(color: &str, alpha: f64) -> String {
	if let Some(hex) = color.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii()) {
		let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
		if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
			return format!("rgba({r}, {g}, {b}, {alpha})");
		}
	}
	if let Some(body) = color.strip_prefix("rgba(").and_then(|c| c.strip_suffix(')')) {
		if let Some((rgb, _)) = body.rsplit_once(',') {
			return format!("rgba({rgb}, {alpha})");
		}
	}
	color.to_string()
}

/// Per-surface look.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasStyle {
	/// Solid backdrop; `None` clears to transparent.
	pub backdrop: Option<String>,
	/// Fixed edge colour; `None` takes the colour of the edge's target node.
	pub edge_color: Option<String>,
	pub edge_alpha: f64,
	pub edge_width: f64,
	pub pulses: bool,
	/// Gradient body, border, icon and caption instead of a flat dot.
	pub decorated_nodes: bool,
}

impl CanvasStyle {
	pub fn skill_tree() -> Self {
		Self {
			backdrop: None,
			edge_color: None,
			edge_alpha: 1.0,
			edge_width: 3.0,
			pulses: true,
			decorated_nodes: true,
		}
	}

	pub fn neural_background() -> Self {
		Self {
			backdrop: None,
			edge_color: Some("rgba(57, 255, 20, 1)".into()),
			edge_alpha: 0.1,
			edge_width: 0.5,
			pulses: false,
			decorated_nodes: false,
		}
	}

	/// Unlinked flat dots.
	pub fn drifting_particles() -> Self {
		Self {
			backdrop: None,
			edge_color: None,
			edge_alpha: 0.0,
			edge_width: 0.0,
			pulses: false,
			decorated_nodes: false,
		}
	}

	pub fn particle_field() -> Self {
		Self {
			backdrop: None,
			edge_color: None,
			edge_alpha: 0.2,
			edge_width: 1.0,
			pulses: false,
			decorated_nodes: false,
		}
	}
}

/// Thin wrapper over a 2D context that knows its pixel size.
struct Canvas2d {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl Canvas2d {
	fn attach(canvas: &HtmlCanvasElement) -> Result<Self, GraphError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|_| GraphError::SurfaceUnavailable("2d context request failed".into()))?
			.ok_or_else(|| GraphError::SurfaceUnavailable("canvas has no 2d context".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| GraphError::SurfaceUnavailable("context is not 2d".into()))?;
		Ok(Self {
			ctx,
			width: canvas.width() as f64,
			height: canvas.height() as f64,
		})
	}

	fn clear(&self, backdrop: Option<&str>) {
		match backdrop {
			Some(color) => {
				self.ctx.set_fill_style_str(color);
				self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
			}
			None => self.ctx.clear_rect(0.0, 0.0, self.width, self.height),
		}
	}

	fn line(&self, a: Point2, b: Point2, color: &str, width: f64) {
		let ctx = &self.ctx;
		ctx.begin_path();
		ctx.move_to(a.x(), a.y());
		ctx.line_to(b.x(), b.y());
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.stroke();
	}

	fn disc(&self, at: Point2, radius: f64, color: &str) {
		let ctx = &self.ctx;
		ctx.begin_path();
		let _ = ctx.arc(at.x(), at.y(), radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();
	}

	/// Radial fade from `inner` colour at `r0` to `outer` at `r1`.
	fn glow(&self, at: Point2, r0: f64, r1: f64, inner: &str, outer: &str) {
		let ctx = &self.ctx;
		let Ok(gradient) = ctx.create_radial_gradient(at.x(), at.y(), r0, at.x(), at.y(), r1) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, inner);
		let _ = gradient.add_color_stop(1.0, outer);
		ctx.begin_path();
		let _ = ctx.arc(at.x(), at.y(), r1, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}

	fn text(&self, text: &str, at: Point2, font: &str, color: &str, baseline: &str) {
		let ctx = &self.ctx;
		ctx.set_font(font);
		ctx.set_fill_style_str(color);
		ctx.set_text_align("center");
		ctx.set_text_baseline(baseline);
		let _ = ctx.fill_text(text, at.x(), at.y());
	}
}

/// 2D canvas painter for the skill tree and background patterns.
pub struct CanvasSurface {
	canvas: Canvas2d,
	style: CanvasStyle,
}

impl CanvasSurface {
	pub fn new(canvas: &HtmlCanvasElement, style: CanvasStyle) -> Result<Self, GraphError> {
		Ok(Self {
			canvas: Canvas2d::attach(canvas)?,
			style,
		})
	}

	fn edge_color<M: Appearance>(&self, to: &Node<2, M>, intensity: f64) -> String {
		let alpha = self.style.edge_alpha * intensity;
		match &self.style.edge_color {
			Some(c) => with_alpha(c, alpha),
			None => with_alpha(to.meta.color(), alpha),
		}
	}

	fn pulse(&self, from: Point2, to: Point2, t: f64, color: &str) {
		let at = from + (to - from) * t;
		self.canvas.disc(at, 4.0, color);
		self.canvas.glow(at, 0.0, 15.0, color, "transparent");
	}
}

impl ResizeSurface for CanvasSurface {
	fn resize(&mut self, width: f64, height: f64) {
		self.canvas.width = width;
		self.canvas.height = height;
	}
}

impl<M: Appearance> DrawSurface<2, M> for CanvasSurface {
	fn clear(&mut self) {
		self.canvas.clear(self.style.backdrop.as_deref());
	}

	fn draw_edge(&mut self, from: &Node<2, M>, to: &Node<2, M>, link: &Link, pulse: f64) {
		let color = self.edge_color(to, link.intensity);
		self.canvas
			.line(from.position, to.position, &color, self.style.edge_width);
		if self.style.pulses {
			self.pulse(from.position, to.position, pulse, &color);
			self.pulse(from.position, to.position, (pulse + 0.5).fract(), &color);
		}
	}

	fn draw_node(&mut self, node: &Node<2, M>, emphasized: bool) {
		let (at, r, color) = (node.position, node.radius, node.meta.color());
		if !self.style.decorated_nodes {
			let r = if emphasized { r * 1.5 } else { r };
			self.canvas.disc(at, r, color);
			return;
		}

		self.canvas.glow(at, 0.0, r, color, &with_alpha(color, 0.6));
		let ctx = &self.canvas.ctx;
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(2.0);
		ctx.stroke();

		if emphasized {
			self.canvas
				.glow(at, r, r + 10.0, &with_alpha(color, 0.5), "transparent");
		}
		if let Some(icon) = node.meta.icon() {
			let size = (r * 0.6).max(12.0);
			self.canvas.text(
				icon,
				at,
				&format!("{size}px sans-serif"),
				"rgba(26, 31, 43, 0.9)",
				"middle",
			);
		}
		if let Some(label) = node.meta.label() {
			if r > 25.0 || emphasized {
				self.canvas.text(
					label,
					Point2::new(at.x(), at.y() + r + 10.0),
					"14px Arial, sans-serif",
					"white",
					"top",
				);
			}
		}
	}
}

/// Distance from the camera to the centre of the particle cloud.
pub const CAMERA_DISTANCE: f64 = 300.0;
/// Vertical field of view, degrees.
pub const FIELD_OF_VIEW: f64 = 75.0;
const SPIN_X: f64 = 0.0005;
const SPIN_Y: f64 = 0.001;

/// Perspective view of a 3D cloud centred in `extent`, rotated by `spin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub extent: Bounds<3>,
	/// Rotation about x and y, radians.
	pub spin: (f64, f64),
	pub viewport: (f64, f64),
}

impl Camera {
	/// Screen position and scale factor, or `None` behind the camera.
	pub fn project(&self, p: Point3) -> Option<(Point2, f64)> {
		let [x, y, z] = (p - self.extent.size() * 0.5).0;
		let (sx, cx) = self.spin.0.sin_cos();
		let (sy, cy) = self.spin.1.sin_cos();
		// Rotate about y, then about x.
		let (x, z) = (x * cy + z * sy, -x * sy + z * cy);
		let (y, z) = (y * cx - z * sx, y * sx + z * cx);

		let depth = CAMERA_DISTANCE - z;
		if depth <= 0.0 {
			return None;
		}
		let (w, h) = self.viewport;
		let focal = (h / 2.0) / (FIELD_OF_VIEW.to_radians() / 2.0).tan();
		let scale = focal / depth;
		Some((Point2::new(w / 2.0 + x * scale, h / 2.0 - y * scale), scale))
	}
}

/// Paints 3D nodes onto a 2D canvas through a slowly spinning [`Camera`].
pub struct ProjectedSurface {
	canvas: Canvas2d,
	style: CanvasStyle,
	pub camera: Camera,
}

impl ProjectedSurface {
	pub fn new(
		canvas: &HtmlCanvasElement,
		extent: Bounds<3>,
		style: CanvasStyle,
	) -> Result<Self, GraphError> {
		let canvas = Canvas2d::attach(canvas)?;
		let viewport = (canvas.width, canvas.height);
		Ok(Self {
			canvas,
			style,
			camera: Camera {
				extent,
				spin: (0.0, 0.0),
				viewport,
			},
		})
	}
}

impl ResizeSurface for ProjectedSurface {
	fn resize(&mut self, width: f64, height: f64) {
		self.canvas.width = width;
		self.canvas.height = height;
		self.camera.viewport = (width, height);
	}
}

impl<M: Appearance> DrawSurface<3, M> for ProjectedSurface {
	/// Each cleared frame also advances the scene spin.
	fn clear(&mut self) {
		self.canvas.clear(self.style.backdrop.as_deref());
		self.camera.spin.0 += SPIN_X;
		self.camera.spin.1 += SPIN_Y;
	}

	fn draw_edge(&mut self, from: &Node<3, M>, to: &Node<3, M>, link: &Link, _pulse: f64) {
		let (Some((a, _)), Some((b, _))) = (
			self.camera.project(from.position),
			self.camera.project(to.position),
		) else {
			return;
		};
		let color = with_alpha(from.meta.color(), self.style.edge_alpha * link.intensity);
		self.canvas.line(a, b, &color, self.style.edge_width);
	}

	fn draw_node(&mut self, node: &Node<3, M>, emphasized: bool) {
		let Some((at, scale)) = self.camera.project(node.position) else {
			return;
		};
		let r = node.radius * scale * if emphasized { 1.5 } else { 1.0 };
		self.canvas.disc(at, r, node.meta.color());
	}
}
