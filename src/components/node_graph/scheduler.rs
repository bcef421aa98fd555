use log::debug;

/// Minimum spacing between renders on a constrained device (20 fps).
pub const CONSTRAINED_FRAME_INTERVAL_MS: f64 = 50.0;
/// Viewports narrower than this are treated as constrained.
pub const NARROW_VIEWPORT_PX: f64 = 768.0;

const MOBILE_TOKENS: &[&str] = &["Mobi", "Android", "iPhone", "iPad", "iPod"];

/// The host's per-frame callback primitive.
pub trait FrameHost {
	type Handle;

	/// Ask for one callback on the next display refresh.
	fn request_frame(&mut self) -> Option<Self::Handle>;
	fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Viewport and document visibility, queried once per frame.
pub trait VisibilityOracle<S: ?Sized> {
	fn is_visible(&self, surface: &S) -> bool;
	fn is_document_hidden(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityGate {
	/// Re-check the viewport every frame; pause while off screen.
	#[default]
	Continuous,
	/// Wait for the surface to be seen once, then never gate again.
	OnceEntered,
}

/// Frame-rate ceiling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameBudget {
	pub min_interval_ms: Option<f64>,
}

impl FrameBudget {
	pub fn unthrottled() -> Self {
		Self::default()
	}

	pub fn capped(fps: f64) -> Self {
		Self {
			min_interval_ms: Some(1000.0 / fps),
		}
	}

	/// Cap constrained devices at 20 fps, leave everything else uncapped.
	pub fn detect(user_agent: &str, viewport_width: f64) -> Self {
		if is_constrained_device(user_agent, viewport_width) {
			Self::capped(1000.0 / CONSTRAINED_FRAME_INTERVAL_MS)
		} else {
			Self::unthrottled()
		}
	}
}

pub fn is_constrained_device(user_agent: &str, viewport_width: f64) -> bool {
	MOBILE_TOKENS.iter().any(|t| user_agent.contains(t)) || viewport_width < NARROW_VIEWPORT_PX
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
	DocumentHidden,
	OffScreen,
	Throttled,
}

/// Outcome of one frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
	Render,
	/// Work skipped, next frame already requested.
	Skipped(SkipReason),
	/// The loop was stopped; nothing rescheduled.
	Halted,
}

/// Cooperative render loop with a visibility gate, a hidden-document gate
/// and a frame-rate ceiling.
#[derive(Debug)]
pub struct RenderLoopScheduler<H> {
	pending: Option<H>,
	running: bool,
	budget: FrameBudget,
	gate: VisibilityGate,
	entered: bool,
	last_render: Option<f64>,
}

impl<H> RenderLoopScheduler<H> {
	pub fn new(budget: FrameBudget, gate: VisibilityGate) -> Self {
		Self {
			pending: None,
			running: false,
			budget,
			gate,
			entered: false,
			last_render: None,
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn start<F: FrameHost<Handle = H>>(&mut self, host: &mut F) {
		if self.running {
			return;
		}
		self.running = true;
		self.pending = host.request_frame();
		debug!("render loop started");
	}

	/// Cancel the pending callback. Safe to call when already stopped.
	pub fn stop<F: FrameHost<Handle = H>>(&mut self, host: &mut F) {
		if let Some(handle) = self.pending.take() {
			host.cancel_frame(handle);
		}
		if self.running {
			debug!("render loop stopped");
		}
		self.running = false;
	}

	/// Handle one host callback fired at `timestamp` (milliseconds).
	pub fn on_frame<S, O, F>(
		&mut self,
		timestamp: f64,
		oracle: &O,
		surface: &S,
		host: &mut F,
	) -> FrameDecision
	where
		S: ?Sized,
		O: VisibilityOracle<S>,
		F: FrameHost<Handle = H>,
	{
		self.pending = None;
		if !self.running {
			return FrameDecision::Halted;
		}
		self.pending = host.request_frame();

		if oracle.is_document_hidden() {
			return FrameDecision::Skipped(SkipReason::DocumentHidden);
		}
		match self.gate {
			VisibilityGate::Continuous => {
				if !oracle.is_visible(surface) {
					return FrameDecision::Skipped(SkipReason::OffScreen);
				}
			}
			VisibilityGate::OnceEntered => {
				if !self.entered {
					if !oracle.is_visible(surface) {
						return FrameDecision::Skipped(SkipReason::OffScreen);
					}
					self.entered = true;
				}
			}
		}
		if let (Some(min), Some(last)) = (self.budget.min_interval_ms, self.last_render) {
			if timestamp - last < min {
				return FrameDecision::Skipped(SkipReason::Throttled);
			}
		}
		self.last_render = Some(timestamp);
		FrameDecision::Render
	}
}


#[cfg(test)]
mod tests {
	use super::testing::{ManualFrames, Oracle};
	use super::*;

	fn pump(
		s: &mut RenderLoopScheduler<u32>,
		host: &mut ManualFrames,
		oracle: &Oracle,
		ts: f64,
	) -> Option<FrameDecision> {
		host.fire()?;
		Some(s.on_frame(ts, oracle, &(), host))
	}

	#[test]
	fn renders_each_frame_when_visible() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		for i in 0..5 {
			assert_eq!(pump(&mut s, &mut host, &oracle, i as f64 * 16.0), Some(FrameDecision::Render));
		}
		assert_eq!(host.outstanding.len(), 1);
	}

	#[test]
	fn stop_is_idempotent_and_start_resumes() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		s.stop(&mut host);
		s.stop(&mut host);
		assert!(!s.is_running());
		assert_eq!(host.cancelled, 1);
		assert_eq!(pump(&mut s, &mut host, &oracle, 0.0), None);

		s.start(&mut host);
		assert_eq!(pump(&mut s, &mut host, &oracle, 16.0), Some(FrameDecision::Render));
	}

	#[test]
	fn stale_callback_after_stop_does_not_reschedule() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		s.stop(&mut host);
		let requested = host.requested;
		assert_eq!(s.on_frame(0.0, &oracle, &(), &mut host), FrameDecision::Halted);
		assert_eq!(host.requested, requested);
	}

	#[test]
	fn start_twice_keeps_a_single_callback() {
		let mut host = ManualFrames::default();
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		s.start(&mut host);
		assert_eq!(host.outstanding.len(), 1);
	}

	#[test]
	fn hidden_document_skips_but_keeps_ticking() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		oracle.hidden.set(true);
		assert_eq!(
			pump(&mut s, &mut host, &oracle, 0.0),
			Some(FrameDecision::Skipped(SkipReason::DocumentHidden))
		);
		oracle.hidden.set(false);
		assert_eq!(pump(&mut s, &mut host, &oracle, 16.0), Some(FrameDecision::Render));
	}

	#[test]
	fn continuous_gate_follows_viewport() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::Continuous);
		s.start(&mut host);
		assert_eq!(pump(&mut s, &mut host, &oracle, 0.0), Some(FrameDecision::Render));
		oracle.visible.set(false);
		assert_eq!(
			pump(&mut s, &mut host, &oracle, 16.0),
			Some(FrameDecision::Skipped(SkipReason::OffScreen))
		);
	}

	#[test]
	fn once_entered_gate_latches_open() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(FrameBudget::unthrottled(), VisibilityGate::OnceEntered);
		s.start(&mut host);
		oracle.visible.set(false);
		assert_eq!(
			pump(&mut s, &mut host, &oracle, 0.0),
			Some(FrameDecision::Skipped(SkipReason::OffScreen))
		);
		oracle.visible.set(true);
		assert_eq!(pump(&mut s, &mut host, &oracle, 16.0), Some(FrameDecision::Render));
		oracle.visible.set(false);
		assert_eq!(pump(&mut s, &mut host, &oracle, 32.0), Some(FrameDecision::Render));
	}

	#[test]
	fn ceiling_throttles_close_frames() {
		let (mut host, oracle) = (ManualFrames::default(), Oracle::default());
		let mut s = RenderLoopScheduler::new(
			FrameBudget::detect("Mozilla/5.0 (Linux; Android 14) Mobile", 1024.0),
			VisibilityGate::Continuous,
		);
		s.start(&mut host);
		assert_eq!(pump(&mut s, &mut host, &oracle, 0.0), Some(FrameDecision::Render));
		assert_eq!(
			pump(&mut s, &mut host, &oracle, 16.7),
			Some(FrameDecision::Skipped(SkipReason::Throttled))
		);
		assert_eq!(
			pump(&mut s, &mut host, &oracle, 33.4),
			Some(FrameDecision::Skipped(SkipReason::Throttled))
		);
		assert_eq!(pump(&mut s, &mut host, &oracle, 50.1), Some(FrameDecision::Render));
		assert_eq!(host.outstanding.len(), 1);
	}

	#[test]
	fn device_detection() {
		let desktop = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/131.0";
		assert!(!is_constrained_device(desktop, 1440.0));
		assert!(is_constrained_device(desktop, 600.0));
		assert!(is_constrained_device("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)", 1440.0));
		assert_eq!(FrameBudget::detect(desktop, 1440.0), FrameBudget::unthrottled());
		assert_eq!(FrameBudget::capped(20.0).min_interval_ms, Some(50.0));
		assert_eq!(FrameBudget::detect(desktop, 600.0), FrameBudget::capped(20.0));
	}
}
