use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use oil_core::PointerKind;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::frame::App;

/// Client position in canvas backing-store pixels.
#[inline]
fn canvas_px(client_x: f64, client_y: f64, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = (client_x - rect.left()) as f32;
    let y_css = (client_y - rect.top()) as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

pub fn wire(app: &Rc<RefCell<App>>) {
    wire_pointermove(app);
    wire_touch(app);
    wire_resize(app);
}

fn listen<E>(target: &web::EventTarget, name: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
        log::warn!("[events] could not listen for {name}: {e:?}");
    }
    closure.forget();
}

fn wire_pointermove(app: &Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    listen(&window, "pointermove", move |ev: web::PointerEvent| {
        let mut app = app.borrow_mut();
        let pos = canvas_px(ev.client_x() as f64, ev.client_y() as f64, &app.canvas);
        let kind = if ev.pointer_type() == "touch" {
            PointerKind::Touch
        } else {
            PointerKind::Mouse
        };
        app.stage.pointer_move(kind, pos);
    });
}

fn wire_touch(app: &Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    for name in ["touchstart", "touchmove"] {
        let app = app.clone();
        listen(&window, name, move |ev: web::TouchEvent| {
            let Some(touch) = ev.changed_touches().get(0) else {
                return;
            };
            let mut app = app.borrow_mut();
            let pos = canvas_px(touch.client_x() as f64, touch.client_y() as f64, &app.canvas);
            app.stage.pointer_move(PointerKind::Touch, pos);
        });
    }
}

fn wire_resize(app: &Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    listen(&window, "resize", move |_: web::Event| {
        let mut app = app.borrow_mut();
        let size = dom::sync_canvas_backing_size(&app.canvas);
        app.pending_resize = Some(size);
    });
}
