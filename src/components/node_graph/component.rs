use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::error::GraphError;
use super::presets::{
	drifting_particles_config, neural_background_config, particle_bounds, particle_field_config,
	skill_tree_config,
};
use super::render::{CanvasStyle, CanvasSurface, DrawSurface, ProjectedSurface, ResizeSurface};
use super::scheduler::VisibilityGate;
use super::skill_tree::SkillDetails;
use super::state::{GraphConfig, NodeGraphVisualization};
use super::types::{Bounds, Dot};
use super::web::{GraphRuntime, SharedRuntime, pointer_position, random_seed};

type RuntimeSlot<const N: usize, M, S> = Rc<RefCell<Option<SharedRuntime<N, M, S>>>>;
type ResizeSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Size the canvas to its parent and return the new pixel size.
fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0));
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

fn mount<const N: usize, M, S>(
	canvas: &HtmlCanvasElement,
	config: GraphConfig<N, M>,
	bounds_for: fn(f64, f64) -> Bounds<N>,
	surface: impl FnOnce(&HtmlCanvasElement) -> Result<S, GraphError>,
	gate: VisibilityGate,
) -> Result<SharedRuntime<N, M, S>, GraphError>
where
	M: Clone + 'static,
	S: DrawSurface<N, M> + ResizeSurface + 'static,
{
	let (w, h) = fit_canvas(canvas);
	let graph = NodeGraphVisualization::initialize(config, bounds_for(w, h))?;
	let surface = surface(canvas)?;
	GraphRuntime::launch(graph, surface, canvas.clone().into(), gate, bounds_for)
}

/// Re-fit the canvas and rebuild the graph whenever the window resizes.
fn follow_window_resize<const N: usize, M, S>(
	runtime: &SharedRuntime<N, M, S>,
	canvas: HtmlCanvasElement,
	slot: &ResizeSlot,
) where
	M: Clone + 'static,
	S: DrawSurface<N, M> + ResizeSurface + 'static,
{
	let weak = Rc::downgrade(runtime);
	*slot.borrow_mut() = Some(Closure::new(move || {
		let (w, h) = fit_canvas(&canvas);
		if let Some(rt) = weak.upgrade() {
			rt.borrow_mut().resize(w, h);
		}
	}));
	if let (Some(window), Some(cb)) = (web_sys::window(), slot.borrow().as_ref()) {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
}

/// Take whatever `slot` holds and halt it. Later calls find the slot empty.
fn release<R>(slot: &RefCell<Option<Rc<RefCell<R>>>>, halt: impl FnOnce(&mut R)) -> bool {
	let taken = slot.borrow_mut().take();
	match taken {
		Some(held) => {
			halt(&mut held.borrow_mut());
			true
		}
		None => false,
	}
}

/// Stop the surface's loop and detach its window resize listener on unmount.
fn teardown_on_cleanup<const N: usize, M, S>(
	runtime: RuntimeSlot<N, M, S>,
	resize: ResizeSlot,
	name: &'static str,
) where
	M: 'static,
	S: 'static,
{
	let (runtime, resize) = (SendWrapper::new(runtime), SendWrapper::new(resize));
	on_cleanup(move || {
		if let (Some(window), Some(cb)) = (web_sys::window(), resize.borrow_mut().take()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if release(&**runtime, |rt| rt.stop()) {
			debug!("{name} torn down");
		}
	});
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}

/// Interactive skill tree. Clicking a node publishes its details.
#[component]
pub fn SkillTreeCanvas(selected: WriteSignal<Option<SkillDetails>>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: RuntimeSlot<2, SkillDetails, CanvasSurface> = Rc::new(RefCell::new(None));
	let resize_cb: ResizeSlot = Rc::new(RefCell::new(None));
	let (runtime_init, resize_init) = (runtime.clone(), resize_cb.clone());
	teardown_on_cleanup(runtime.clone(), resize_cb, "skill tree");

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let mounted = mount(
			&canvas,
			skill_tree_config(),
			Bounds::<2>::new,
			|c| CanvasSurface::new(c, CanvasStyle::skill_tree()),
			VisibilityGate::OnceEntered,
		);
		match mounted {
			Ok(rt) => {
				rt.borrow_mut()
					.graph_mut()
					.set_on_select(move |d: &SkillDetails| selected.set(Some(d.clone())));
				follow_window_resize(&rt, canvas, &resize_init);
				*runtime_init.borrow_mut() = Some(rt);
			}
			Err(e) => error!("skill tree disabled: {e}"),
		}
	});

	let runtime_mm = runtime.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Some(rt) = runtime_mm.borrow().as_ref() {
			let over_node = rt.borrow_mut().hover(pointer_position(&ev, &canvas));
			set_cursor(&canvas, if over_node { "pointer" } else { "default" });
		}
	};

	let runtime_ml = runtime.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(rt) = runtime_ml.borrow().as_ref() {
			rt.borrow_mut().clear_hover();
		}
	};

	let runtime_click = runtime.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Some(rt) = runtime_click.borrow().as_ref() {
			rt.borrow_mut().select(pointer_position(&ev, &canvas));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="skill-tree-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:click=on_click
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}

/// Drifting, self-linking dots behind a section. Purely decorative.
#[component]
pub fn NeuralBackground() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: RuntimeSlot<2, Dot, CanvasSurface> = Rc::new(RefCell::new(None));
	let resize_cb: ResizeSlot = Rc::new(RefCell::new(None));
	teardown_on_cleanup(runtime.clone(), resize_cb.clone(), "neural background");

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(
			&canvas,
			neural_background_config(random_seed()),
			Bounds::<2>::new,
			|c| CanvasSurface::new(c, CanvasStyle::neural_background()),
			VisibilityGate::Continuous,
		) {
			Ok(rt) => {
				follow_window_resize(&rt, canvas, &resize_cb);
				*runtime.borrow_mut() = Some(rt);
			}
			Err(e) => error!("neural background disabled: {e}"),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-background"
			style="position: absolute; inset: 0; width: 100%; height: 100%; pointer-events: none; opacity: 0.35; z-index: 0;"
		/>
	}
}

/// Unlinked dots drifting across their parent and wrapping at its edges.
#[component]
pub fn DriftingParticles() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: RuntimeSlot<2, Dot, CanvasSurface> = Rc::new(RefCell::new(None));
	let resize_cb: ResizeSlot = Rc::new(RefCell::new(None));
	teardown_on_cleanup(runtime.clone(), resize_cb.clone(), "drifting particles");

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(
			&canvas,
			drifting_particles_config(random_seed()),
			Bounds::<2>::new,
			|c| CanvasSurface::new(c, CanvasStyle::drifting_particles()),
			VisibilityGate::Continuous,
		) {
			Ok(rt) => {
				follow_window_resize(&rt, canvas, &resize_cb);
				*runtime.borrow_mut() = Some(rt);
			}
			Err(e) => error!("drifting particles disabled: {e}"),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="drifting-particles"
			style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none;"
		/>
	}
}

/// Slowly spinning 3D particle cloud.
#[component]
pub fn ParticleField() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: RuntimeSlot<3, Dot, ProjectedSurface> = Rc::new(RefCell::new(None));
	let resize_cb: ResizeSlot = Rc::new(RefCell::new(None));
	teardown_on_cleanup(runtime.clone(), resize_cb.clone(), "particle field");

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(
			&canvas,
			particle_field_config(random_seed()),
			|_, _| particle_bounds(),
			|c| ProjectedSurface::new(c, particle_bounds(), CanvasStyle::particle_field()),
			VisibilityGate::Continuous,
		) {
			Ok(rt) => {
				follow_window_resize(&rt, canvas, &resize_cb);
				*runtime.borrow_mut() = Some(rt);
			}
			Err(e) => error!("particle field disabled: {e}"),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field"
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::release;

	#[test]
	fn release_halts_once_and_empties_the_slot() {
		let held = Rc::new(RefCell::new(0));
		let slot = RefCell::new(Some(held.clone()));

		assert!(release(&slot, |n| *n += 1));
		assert!(slot.borrow().is_none());
		assert!(!release(&slot, |n| *n += 1));
		assert_eq!(*held.borrow(), 1);
		// Only the test's handle is left; the slot no longer keeps the value alive.
		assert_eq!(Rc::strong_count(&held), 1);
	}
}
