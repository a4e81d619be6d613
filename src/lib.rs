#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use oil_render::{OilStage, RendererContext, StageOptions, SurfaceAssets};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod preset;

use constants::*;
use frame::App;

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {e:?}");
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;
    let (width, height) = dom::sync_canvas_backing_size(&canvas);

    let fallback = SurfaceAssets::placeholder();
    let assets = SurfaceAssets {
        base: assets::load_image_or(BASE_TEXTURE_URL, fallback.base).await,
        flow_map: assets::load_image_or(FLOW_MAP_URL, fallback.flow_map).await,
    };

    let ctx = RendererContext::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), width, height)
        .await
        .map_err(|e| anyhow::anyhow!("renderer: {e}"))?;
    let options = StageOptions::default();
    let mut stage =
        OilStage::new(ctx, &assets, &options).map_err(|e| anyhow::anyhow!("stage: {e}"))?;

    if let Some(stored) = preset::parse_stored(dom::load_string(PRESET_STORAGE_KEY).as_deref()) {
        let applied = stage.apply_preset(&stored);
        log::info!("[tuning] restored {applied} stored values");
    }

    let app = Rc::new(RefCell::new(App::new(stage, canvas, options.max_step)));
    events::wire(&app);
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
    frame::start_loop(app);
    Ok(())
}

fn with_stage<T>(f: impl FnOnce(&mut OilStage) -> Result<T, JsValue>) -> Result<T, JsValue> {
    APP.with(|slot| {
        let slot = slot.borrow();
        let app = slot
            .as_ref()
            .ok_or_else(|| JsValue::from_str("renderer not ready"))?;
        let mut app = app.borrow_mut();
        f(&mut app.stage)
    })
}

/// Sets one tuning value (`group.name`), persists the live preset and
/// returns the value actually applied after clamping.
#[wasm_bindgen]
pub fn set_param(key: &str, value: f32) -> Result<f32, JsValue> {
    with_stage(|stage| {
        let applied = stage
            .apply(key, value)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        dom::store_string(PRESET_STORAGE_KEY, &preset::to_stored(&stage.preset()));
        Ok(applied)
    })
}

/// Every tunable value with its range, as JSON.
#[wasm_bindgen]
pub fn params() -> Result<String, JsValue> {
    with_stage(|stage| {
        serde_json::to_string(&stage.params()).map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// Drops the stored preset; defaults return on the next load.
#[wasm_bindgen]
pub fn reset_params() {
    dom::store_string(PRESET_STORAGE_KEY, "");
}
