//! Browser image loading: decode through an `<img>`, read pixels back through
//! a throwaway 2D canvas.

use showcase_core::{ImageData, ImageSource, LoadResult, TextureLoadError, TextureRequest};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Default)]
pub struct HtmlImageSource;

impl ImageSource for HtmlImageSource {
    fn request(&mut self, request: TextureRequest) {
        spawn_local(async move {
            if !request.is_alive() {
                return;
            }
            let result = load_image(request.url()).await;
            request.complete(result);
        });
    }
}

async fn load_image(url: &str) -> LoadResult {
    let img = web::HtmlImageElement::new()
        .map_err(|e| TextureLoadError::Fetch(format!("{:?}", e)))?;
    // readback from a tainted canvas fails without CORS
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| TextureLoadError::Fetch(format!("{}: {:?}", url, e)))?;

    let (w, h) = (img.natural_width(), img.natural_height());
    if w == 0 || h == 0 {
        return Err(TextureLoadError::Decode(format!("{} has no pixels", url)));
    }
    let decode_err = |e: wasm_bindgen::JsValue| TextureLoadError::Decode(format!("{:?}", e));
    let document = crate::dom::window_document()
        .ok_or_else(|| TextureLoadError::Decode("no document".into()))?;
    let canvas = document
        .create_element("canvas")
        .map_err(decode_err)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| TextureLoadError::Decode("canvas element".into()))?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = canvas
        .get_context("2d")
        .map_err(decode_err)?
        .ok_or_else(|| TextureLoadError::Decode("no 2d context".into()))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| TextureLoadError::Decode("2d context type".into()))?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
        .map_err(decode_err)?;
    let pixels = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(decode_err)?;
    ImageData::new(w, h, pixels.data().0)
}
