//! Browser bindings: `requestAnimationFrame`, viewport checks and the
//! per-surface runtime that ties a visualization to its canvas.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, Window};

use super::error::GraphError;
use super::render::{DrawSurface, ResizeSurface};
use super::scheduler::{
	FrameBudget, FrameDecision, FrameHost, RenderLoopScheduler, VisibilityGate, VisibilityOracle,
};
use super::state::NodeGraphVisualization;
use super::types::{Bounds, Point, Point2};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameHost`] over `window.requestAnimationFrame`.
pub struct AnimationFrames {
	window: Window,
	callback: FrameCallback,
}

impl FrameHost for AnimationFrames {
	type Handle = i32;

	fn request_frame(&mut self) -> Option<i32> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&mut self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

pub fn viewport_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

/// True when a client rect overlaps a `vw` × `vh` viewport.
pub fn rect_in_viewport(top: f64, bottom: f64, left: f64, right: f64, vw: f64, vh: f64) -> bool {
	top < vh && bottom > 0.0 && left < vw && right > 0.0
}

/// Visibility from the element's bounding rect and `document.hidden`.
pub struct DocumentVisibility {
	window: Window,
}

impl VisibilityOracle<Element> for DocumentVisibility {
	fn is_visible(&self, surface: &Element) -> bool {
		let rect = surface.get_bounding_client_rect();
		let (vw, vh) = viewport_size(&self.window);
		rect_in_viewport(rect.top(), rect.bottom(), rect.left(), rect.right(), vw, vh)
	}

	fn is_document_hidden(&self) -> bool {
		self.window.document().is_some_and(|d| d.hidden())
	}
}

pub fn detect_budget(window: &Window) -> FrameBudget {
	let user_agent = window.navigator().user_agent().unwrap_or_default();
	FrameBudget::detect(&user_agent, viewport_size(window).0)
}

/// Fresh seed for random populations.
pub fn random_seed() -> u64 {
	(js_sys::Math::random() * (1u64 << 53) as f64) as u64
}

/// Pointer position relative to `surface`'s top-left corner.
pub fn pointer_position(ev: &MouseEvent, surface: &Element) -> Point2 {
	let rect = surface.get_bounding_client_rect();
	Point2::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Everything one animated canvas owns.
pub struct GraphRuntime<const N: usize, M, S> {
	graph: NodeGraphVisualization<N, M>,
	surface: S,
	element: Element,
	scheduler: RenderLoopScheduler<i32>,
	frames: AnimationFrames,
	visibility: DocumentVisibility,
	bounds_for: fn(f64, f64) -> Bounds<N>,
}

pub type SharedRuntime<const N: usize, M, S> = Rc<RefCell<GraphRuntime<N, M, S>>>;

impl<const N: usize, M, S> GraphRuntime<N, M, S>
where
	M: Clone + 'static,
	S: DrawSurface<N, M> + ResizeSurface + 'static,
{
	/// Wire `graph` to `surface` and start its loop.
	///
	/// `bounds_for` maps a new canvas size to simulation bounds on resize.
	pub fn launch(
		graph: NodeGraphVisualization<N, M>,
		surface: S,
		element: Element,
		gate: VisibilityGate,
		bounds_for: fn(f64, f64) -> Bounds<N>,
	) -> Result<SharedRuntime<N, M, S>, GraphError> {
		let window = web_sys::window().ok_or(GraphError::HostUnavailable("window"))?;
		if window.document().is_none() {
			return Err(GraphError::HostUnavailable("document"));
		}
		let budget = detect_budget(&window);
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let runtime = Rc::new(RefCell::new(Self {
			graph,
			surface,
			element,
			scheduler: RenderLoopScheduler::new(budget, gate),
			frames: AnimationFrames {
				window: window.clone(),
				callback: callback.clone(),
			},
			visibility: DocumentVisibility { window },
			bounds_for,
		}));

		let weak: Weak<RefCell<Self>> = Rc::downgrade(&runtime);
		*callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if let Some(rt) = weak.upgrade() {
				rt.borrow_mut().on_frame(timestamp);
			}
		}));

		runtime.borrow_mut().start();
		info!(
			"graph surface running: {} nodes, frame budget {:?}",
			runtime.borrow().graph.nodes().len(),
			budget
		);
		Ok(runtime)
	}

	fn on_frame(&mut self, timestamp: f64) {
		let decision =
			self.scheduler
				.on_frame(timestamp, &self.visibility, &self.element, &mut self.frames);
		if decision == FrameDecision::Render {
			self.graph.tick(&mut self.surface);
		}
	}

	/// Stop the old loop, rebuild for the new size, then start again.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.stop();
		self.surface.resize(width, height);
		if let Err(e) = self.graph.resize((self.bounds_for)(width, height)) {
			warn!("graph surface kept previous layout: {e}");
		}
		self.start();
	}

	pub fn graph_mut(&mut self) -> &mut NodeGraphVisualization<N, M> {
		&mut self.graph
	}

	pub fn hover(&mut self, pointer: Point<N>) -> bool {
		self.graph.hover(pointer).is_some()
	}

	pub fn clear_hover(&mut self) {
		self.graph.clear_hover();
	}

	pub fn select(&mut self, pointer: Point<N>) -> Option<usize> {
		self.graph.select(pointer)
	}
}

impl<const N: usize, M, S> GraphRuntime<N, M, S> {
	pub fn start(&mut self) {
		self.scheduler.start(&mut self.frames);
	}

	pub fn stop(&mut self) {
		self.scheduler.stop(&mut self.frames);
	}
}

impl<const N: usize, M, S> Drop for GraphRuntime<N, M, S> {
	fn drop(&mut self) {
		self.stop();
	}
}
