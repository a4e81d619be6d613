use oil_core::ImageData;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(context: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{context}: {e:?}")
}

/// Fetches and decodes an image through the browser, then reads its RGBA
/// pixels back via a scratch 2D canvas.
pub async fn load_image(url: &str) -> anyhow::Result<ImageData> {
    let img = web::HtmlImageElement::new().map_err(|e| js_err("create img", e))?;
    img.set_cross_origin(Some("anonymous"));
    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(url);
    JsFuture::from(loaded)
        .await
        .map_err(|e| js_err(&format!("load {url}"), e))?;
    img.set_onload(None);
    img.set_onerror(None);

    let (width, height) = (img.natural_width(), img.natural_height());
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| js_err("create canvas", e))?
        .dyn_into()
        .map_err(|e| js_err("canvas cast", e.into()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| js_err("2d context", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into()
        .map_err(|e| js_err("2d context cast", e.into()))?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
        .map_err(|e| js_err("draw image", e))?;
    let pixels = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| js_err("read pixels", e))?
        .data()
        .0;
    Ok(ImageData::new(width, height, pixels)?)
}

pub async fn load_image_or(url: &str, fallback: ImageData) -> ImageData {
    match load_image(url).await {
        Ok(image) => {
            log::info!("[assets] loaded {url} ({}x{})", image.width(), image.height());
            image
        }
        Err(e) => {
            log::warn!("[assets] {e:#}; using placeholder");
            fallback
        }
    }
}
