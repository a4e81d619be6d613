use crate::camera::OrthographicCamera;
use crate::clock::{FrameClock, FrameStep};
use crate::constants::MAX_STEP_SECONDS;
use crate::layout::Viewport;
use crate::scene::{NodeEvent, SceneGraph, SceneNode};

/// What the driver needs from a front-end each frame.
pub trait Stage {
    type Node: SceneNode + ?Sized;

    /// Paint, swap and re-aim the trail. Must be a no-op when the trail is
    /// unavailable.
    fn advance_trail(&mut self, step: FrameStep);

    fn scene_mut(&mut self) -> &mut SceneGraph<Self::Node>;

    /// Draw the scene to the screen. Transient surface trouble is handled
    /// inside; a frame never fails.
    fn render(&mut self, step: FrameStep);
}

/// Turns wall-clock timestamps into rendered frames.
///
/// Invoked once per display refresh by whoever owns the scheduler
/// (`requestAnimationFrame`, winit's redraw loop). Order per tick: trail,
/// scene `update`, render.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    clock: FrameClock,
    frames: u64,
}

impl FrameDriver {
    pub fn new(max_step: f32) -> Self {
        Self::with_clock(FrameClock::new(max_step))
    }

    /// Driver with the default 1/30 s clamp.
    pub fn standard() -> Self {
        Self::new(MAX_STEP_SECONDS)
    }

    pub fn with_clock(clock: FrameClock) -> Self {
        Self { clock, frames: 0 }
    }

    pub fn tick<S: Stage + ?Sized>(&mut self, now_ms: f64, stage: &mut S) -> FrameStep {
        let step = self.clock.advance(now_ms);
        stage.advance_trail(step);
        stage.scene_mut().dispatch(NodeEvent::Update(step));
        stage.render(step);
        self.frames += 1;
        step
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Camera and scene half of a viewport resize: recompute the orthographic
/// bounds, then fan `on_resize` out to every node that handles it.
///
/// Safe to call redundantly. Degenerate sizes (minimised windows) are
/// ignored and return `false`.
pub fn resize_scene<N: SceneNode + ?Sized>(
    camera: &mut OrthographicCamera,
    scene: &mut SceneGraph<N>,
    viewport: Viewport,
) -> bool {
    if !viewport.is_valid() {
        return false;
    }
    camera.set_viewport(viewport.width, viewport.height);
    scene.dispatch(NodeEvent::Resize(viewport));
    true
}
