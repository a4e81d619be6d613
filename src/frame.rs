use std::cell::RefCell;
use std::rc::Rc;

use oil_core::FrameDriver;
use oil_render::OilStage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the animation frame callback and the DOM handlers share.
pub struct App {
    pub stage: OilStage,
    pub driver: FrameDriver,
    pub canvas: web::HtmlCanvasElement,
    /// Last canvas size reported since the previous frame.
    pub pending_resize: Option<(u32, u32)>,
}

impl App {
    pub fn new(stage: OilStage, canvas: web::HtmlCanvasElement, max_step: f32) -> Self {
        Self {
            stage,
            driver: FrameDriver::new(max_step),
            canvas,
            pending_resize: None,
        }
    }

    pub fn frame(&mut self, now_ms: f64) {
        if let Some((width, height)) = self.pending_resize.take() {
            self.stage.resize(width, height);
        }
        self.driver.tick(now_ms, &mut self.stage);
    }
}

pub fn start_loop(app: Rc<RefCell<App>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        app.borrow_mut().frame(instant::now());
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
