// Frame protocol: clock clamping, per-tick ordering, resize fan-out.

use std::cell::RefCell;
use std::rc::Rc;

use oil_core::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX: f32 = 1.0 / 30.0;

#[test]
fn clamp_step_stays_in_range_for_any_sample() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut samples: Vec<f32> = (0..2000).map(|_| rng.gen_range(-1.0e6..1.0e6)).collect();
    samples.extend([f32::INFINITY, f32::NEG_INFINITY, f32::NAN, 0.0, -0.0, f32::MAX]);
    for raw in samples {
        let dt = clamp_step(raw, MAX);
        assert!((0.0..=MAX).contains(&dt), "{raw} -> {dt}");
    }
}

#[test]
fn clock_scenario_first_frame_then_small_then_stall() {
    let mut clock = FrameClock::new(MAX);
    let steps: Vec<f32> = [0.0, 10.0, 1000.0]
        .into_iter()
        .map(|t| clock.advance(t).dt)
        .collect();
    assert!((steps[0] - MAX).abs() < 1e-6);
    assert!((steps[1] - 0.01).abs() < 1e-6);
    assert!((steps[2] - MAX).abs() < 1e-6);
    assert!((clock.elapsed() - (2.0 * MAX + 0.01)).abs() < 1e-6);
}

#[test]
fn clock_survives_backwards_and_random_timestamps() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut clock = FrameClock::starting_at(5_000.0, MAX);
    let mut elapsed = 0.0;
    for _ in 0..500 {
        let now = rng.gen_range(0.0..20_000.0);
        let step = clock.advance(now);
        assert!((0.0..=MAX).contains(&step.dt));
        assert!(step.time >= elapsed);
        elapsed = step.time;
    }
}

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl SceneNode for Recorder {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with_update().with_resize()
    }

    fn update(&mut self, step: FrameStep) {
        self.log
            .borrow_mut()
            .push(format!("update {} {:.3}", self.name, step.time));
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.log
            .borrow_mut()
            .push(format!("resize {} {}", self.name, viewport.width));
    }
}

struct Inert;

impl SceneNode for Inert {}

struct MockStage {
    scene: SceneGraph<dyn SceneNode>,
    log: Log,
}

impl MockStage {
    fn new() -> Self {
        let log: Log = Rc::default();
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let root = scene.add_root(Box::new(Recorder {
            name: "root",
            log: log.clone(),
        }));
        scene.add_child(root, Box::new(Inert)).unwrap();
        scene
            .add_child(
                root,
                Box::new(Recorder {
                    name: "child",
                    log: log.clone(),
                }),
            )
            .unwrap();
        Self { scene, log }
    }
}

impl Stage for MockStage {
    type Node = dyn SceneNode;

    fn advance_trail(&mut self, _step: FrameStep) {
        self.log.borrow_mut().push("trail".into());
    }

    fn scene_mut(&mut self) -> &mut SceneGraph<dyn SceneNode> {
        &mut self.scene
    }

    fn render(&mut self, _step: FrameStep) {
        self.log.borrow_mut().push("render".into());
    }
}

#[test]
fn tick_runs_trail_then_updates_then_render() {
    let mut stage = MockStage::new();
    let mut driver = FrameDriver::standard();
    driver.tick(0.0, &mut stage);
    assert_eq!(
        *stage.log.borrow(),
        vec![
            "trail".to_string(),
            "update root 0.033".into(),
            "update child 0.033".into(),
            "render".into(),
        ]
    );
    assert_eq!(driver.frames(), 1);
    assert!((driver.clock().elapsed() - MAX_STEP_SECONDS).abs() < 1e-6);
}

#[test]
fn resize_is_idempotent_and_tracks_half_extent() {
    let mut stage = MockStage::new();
    let mut camera = OrthographicCamera::new(800.0, 450.0, SCENE_CAMERA_Z);

    assert!(resize_scene(&mut camera, &mut stage.scene, Viewport::new(800.0, 450.0)));
    let once = camera.clone();
    assert!(resize_scene(&mut camera, &mut stage.scene, Viewport::new(800.0, 450.0)));
    assert_eq!(camera, once);
    assert_eq!((camera.left, camera.right), (-400.0, 400.0));

    resize_scene(&mut camera, &mut stage.scene, Viewport::new(1600.0, 900.0));
    assert_eq!((camera.left, camera.right), (-800.0, 800.0));
    assert_eq!((camera.bottom, camera.top), (-450.0, 450.0));

    assert!(!resize_scene(&mut camera, &mut stage.scene, Viewport::new(0.0, 900.0)));
    assert_eq!(camera.right, 800.0);

    let resizes = stage
        .log
        .borrow()
        .iter()
        .filter(|l| l.starts_with("resize"))
        .count();
    assert_eq!(resizes, 6);
}
