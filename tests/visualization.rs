//! Drives a visualization through the frame scheduler the way the browser
//! runtime does, with in-memory stand-ins for the host.

use node_graph_canvas::components::node_graph::presets::{neural_background_config, skill_tree_config};
use node_graph_canvas::components::node_graph::proximity::Link;
use node_graph_canvas::components::node_graph::render::DrawSurface;
use node_graph_canvas::components::node_graph::scheduler::{
	FrameBudget, FrameDecision, FrameHost, RenderLoopScheduler, VisibilityGate, VisibilityOracle,
};
use node_graph_canvas::components::node_graph::types::{Bounds, Node, Point2};
use node_graph_canvas::components::node_graph::{NodeGraphVisualization, SkillDetails};

#[derive(Default)]
struct Frames {
	pending: Option<u32>,
	next: u32,
}

impl FrameHost for Frames {
	type Handle = u32;

	fn request_frame(&mut self) -> Option<u32> {
		self.next += 1;
		self.pending = Some(self.next);
		self.pending
	}

	fn cancel_frame(&mut self, handle: u32) {
		if self.pending == Some(handle) {
			self.pending = None;
		}
	}
}

struct AlwaysVisible;

impl VisibilityOracle<()> for AlwaysVisible {
	fn is_visible(&self, _: &()) -> bool {
		true
	}

	fn is_document_hidden(&self) -> bool {
		false
	}
}

#[derive(Default)]
struct Counter {
	frames: usize,
	edges: usize,
	nodes: usize,
}

impl<M> DrawSurface<2, M> for Counter {
	fn clear(&mut self) {
		self.frames += 1;
	}

	fn draw_edge(&mut self, _: &Node<2, M>, _: &Node<2, M>, _: &Link, pulse: f64) {
		assert!((0.0..1.0).contains(&pulse));
		self.edges += 1;
	}

	fn draw_node(&mut self, _: &Node<2, M>, _: bool) {
		self.nodes += 1;
	}
}

/// Fire pending callbacks 16 ms apart, ticking the graph on each render.
fn run<M: Clone>(
	graph: &mut NodeGraphVisualization<2, M>,
	scheduler: &mut RenderLoopScheduler<u32>,
	frames: &mut Frames,
	surface: &mut Counter,
	count: usize,
) -> usize {
	let mut rendered = 0;
	for i in 0..count {
		if frames.pending.take().is_none() {
			break;
		}
		if scheduler.on_frame(i as f64 * 16.0, &AlwaysVisible, &(), frames) == FrameDecision::Render {
			graph.tick(surface);
			rendered += 1;
		}
	}
	rendered
}

#[test]
fn skill_tree_renders_until_stopped_then_resumes() {
	let mut graph =
		NodeGraphVisualization::initialize(skill_tree_config(), Bounds::new(800.0, 600.0)).unwrap();
	let mut scheduler = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::OnceEntered);
	let (mut frames, mut surface) = (Frames::default(), Counter::default());

	scheduler.start(&mut frames);
	assert_eq!(run(&mut graph, &mut scheduler, &mut frames, &mut surface, 10), 10);
	assert_eq!(surface.frames, 10);
	assert_eq!(surface.edges, 60);
	assert_eq!(surface.nodes, 70);

	scheduler.stop(&mut frames);
	scheduler.stop(&mut frames);
	assert_eq!(run(&mut graph, &mut scheduler, &mut frames, &mut surface, 10), 0);

	scheduler.start(&mut frames);
	assert_eq!(run(&mut graph, &mut scheduler, &mut frames, &mut surface, 3), 3);
}

#[test]
fn resize_restart_leaves_a_single_loop() {
	let mut graph =
		NodeGraphVisualization::initialize(neural_background_config(21), Bounds::new(800.0, 600.0))
			.unwrap();
	let mut scheduler = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
	let (mut frames, mut surface) = (Frames::default(), Counter::default());
	scheduler.start(&mut frames);

	for (w, h) in [(640.0, 480.0), (1024.0, 768.0), (320.0, 568.0)] {
		scheduler.stop(&mut frames);
		graph.resize(Bounds::new(w, h)).unwrap();
		scheduler.start(&mut frames);
		assert!(frames.pending.is_some());
		assert!(graph.nodes().iter().all(|n| Bounds::new(w, h).contains(&n.position)));
	}
	assert_eq!(run(&mut graph, &mut scheduler, &mut frames, &mut surface, 5), 5);
}

#[test]
fn clicking_a_child_reports_its_details() {
	let mut graph =
		NodeGraphVisualization::initialize(skill_tree_config(), Bounds::new(800.0, 600.0)).unwrap();
	let seen = std::rc::Rc::new(std::cell::RefCell::new(None::<SkillDetails>));
	let sink = seen.clone();
	graph.set_on_select(move |d: &SkillDetails| *sink.borrow_mut() = Some(d.clone()));

	// Deep Learning sits at (0.75, 0.6) of the surface.
	assert_eq!(graph.select(Point2::new(600.0, 360.0)), Some(2));
	let details = seen.borrow().clone().unwrap();
	assert_eq!(details.name, "Deep Learning");
	assert_eq!(details.skills.len(), 5);
	assert_eq!(details.color, "#FF00FF");
}
