#![cfg(target_arch = "wasm32")]
pub mod dom;
mod frame;
mod input;
mod loader;

use frame::{FrameContext, JsHooks};
use instant::Instant;
use showcase_core::wgpu_backend::WgpuBackend;
use showcase_core::{parse_hex_color, ProductDescriptor, SceneInputs, SharedBackend, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showcase-web loaded");
    Ok(())
}

/// Mount a showcase on `canvas_id`. Scroll progress is read from
/// `scroll_container_id` when given, otherwise from the page itself.
#[wasm_bindgen]
pub async fn mount(
    canvas_id: String,
    scroll_container_id: Option<String>,
    name: String,
    image_url: String,
    theme_hex: String,
    description: String,
) -> Result<ShowcaseHandle, JsValue> {
    let product = ProductDescriptor::new(name, image_url, &theme_hex, description);
    mount_inner(&canvas_id, scroll_container_id.as_deref(), product)
        .await
        .map_err(|e| {
            log::error!("mount error: {:?}", e);
            JsValue::from_str(&format!("{:#}", e))
        })
}

async fn mount_inner(
    canvas_id: &str,
    scroll_container_id: Option<&str>,
    product: ProductDescriptor,
) -> anyhow::Result<ShowcaseHandle> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;

    let (css_w, css_h) = dom::sync_canvas_backing_size(&canvas);
    let mut listeners: Vec<dom::Listener> = frame::watch_resize(&canvas).into_iter().collect();

    let backend = WgpuBackend::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        canvas.width(),
        canvas.height(),
    )
    .await?;
    let backend = Rc::new(RefCell::new(backend));

    let viewport = Viewport::classify(css_w);
    let hooks = JsHooks::default();
    let shared: SharedBackend = backend.clone();
    let aspect = css_w.max(1) as f32 / css_h.max(1) as f32;
    let scene = frame::build_scene(&product, viewport, aspect, shared, &hooks)?;

    let inputs = Rc::new(RefCell::new(SceneInputs::default()));

    // Scroll progress from the container (or the document when none is given)
    {
        let (source, target): (web::Element, web::EventTarget) = match scroll_container_id {
            Some(id) => {
                let el = document
                    .get_element_by_id(id)
                    .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
                (el.clone(), el.into())
            }
            None => {
                let el = document
                    .document_element()
                    .ok_or_else(|| anyhow::anyhow!("no document element"))?;
                (el, window.clone().into())
            }
        };
        let read = move |el: &web::Element| {
            input::scroll_progress(
                el.scroll_top() as f64,
                el.scroll_height() as f64,
                el.client_height() as f64,
            )
        };
        inputs.borrow_mut().scroll = read(&source);
        let inputs_s = inputs.clone();
        listeners.extend(dom::add_listener(&target, "scroll", move |_ev| {
            inputs_s.borrow_mut().scroll = read(&source);
        }));
    }

    // Pointer relative to the canvas
    {
        let inputs_p = inputs.clone();
        let canvas_p = canvas.clone();
        listeners.extend(dom::add_listener(&window, "pointermove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let rect = canvas_p.get_bounding_client_rect();
            inputs_p.borrow_mut().pointer = input::pointer_ndc(
                ev.client_x() as f32 - rect.left() as f32,
                ev.client_y() as f32 - rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
        }));
    }

    let dispose_requested = Rc::new(Cell::new(false));
    let ctx = Rc::new(RefCell::new(FrameContext {
        scene: Some(scene),
        backend: Some(backend),
        canvas,
        product,
        viewport,
        hooks: hooks.clone(),
        inputs: inputs.clone(),
        listeners,
        dispose_requested: dispose_requested.clone(),
        last_instant: Instant::now(),
    }));
    frame::start_loop(ctx.clone());
    log::info!("[scene] mounted on #{} ({:?})", canvas_id, viewport);

    Ok(ShowcaseHandle {
        ctx,
        inputs,
        hooks,
        dispose_requested,
    })
}

/// JS-facing control surface for one mounted showcase.
#[wasm_bindgen]
pub struct ShowcaseHandle {
    ctx: Rc<RefCell<FrameContext>>,
    inputs: Rc<RefCell<SceneInputs>>,
    hooks: JsHooks,
    dispose_requested: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl ShowcaseHandle {
    /// Override the scroll progress, e.g. when the page drives it itself.
    pub fn set_scroll(&self, progress: f32) {
        if progress.is_finite() {
            self.inputs.borrow_mut().scroll = progress.clamp(0.0, 1.0);
        }
    }

    /// Pointer in \[-1, 1\]², +y up.
    pub fn set_pointer(&self, x: f32, y: f32) {
        self.inputs.borrow_mut().pointer = glam::Vec2::new(x, y);
    }

    /// Call-to-action click; only does anything during the Offer phase.
    pub fn activate_offer(&self) -> bool {
        match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.scene.as_mut().is_some_and(|s| s.activate_offer()),
            Err(_) => {
                log::warn!("[scene] activate_offer called re-entrantly, ignored");
                false
            }
        }
    }

    pub fn on_phase_change(&self, f: js_sys::Function) {
        *self.hooks.phase.borrow_mut() = Some(f);
    }

    pub fn on_store_locator(&self, f: js_sys::Function) {
        *self.hooks.store_locator.borrow_mut() = Some(f);
    }

    pub fn set_theme_color(&self, hex: &str) -> bool {
        let Some(color) = parse_hex_color(hex) else {
            return false;
        };
        let Ok(mut ctx) = self.ctx.try_borrow_mut() else {
            return false;
        };
        ctx.product.theme_color = color;
        if let Some(scene) = ctx.scene.as_mut() {
            scene.set_theme_color(color);
        }
        true
    }

    /// Current phase label, if a frame has run.
    pub fn phase(&self) -> Option<String> {
        let ctx = self.ctx.try_borrow().ok()?;
        ctx.scene
            .as_ref()
            .and_then(|s| s.phase())
            .map(|p| p.label().to_owned())
    }

    /// Re-sync the canvas backing size; the next frame picks it up.
    pub fn resize(&self) {
        if let Ok(ctx) = self.ctx.try_borrow() {
            dom::sync_canvas_backing_size(&ctx.canvas);
        }
    }

    /// Release every GPU resource, detach page listeners and stop the frame loop.
    pub fn dispose(&self) {
        self.dispose_requested.set(true);
        if let Ok(mut ctx) = self.ctx.try_borrow_mut() {
            ctx.dispose();
        }
    }
}
