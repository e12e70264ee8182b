use crate::dom;
use crate::input;
use crate::loader::HtmlImageSource;
use instant::Instant;
use showcase_core::wgpu_backend::WgpuBackend;
use showcase_core::{
    GpuError, ProductDescriptor, Scene, SceneBuilder, SceneError, SceneInputs, SharedBackend,
    ShowcaseParams, Viewport,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// JS callbacks, filled in after mount. The scene's own callbacks are
/// registered once at build time and forward here.
#[derive(Clone, Default)]
pub struct JsHooks {
    pub phase: Rc<RefCell<Option<js_sys::Function>>>,
    pub store_locator: Rc<RefCell<Option<js_sys::Function>>>,
}

pub fn build_scene(
    product: &ProductDescriptor,
    viewport: Viewport,
    aspect: f32,
    backend: SharedBackend,
    hooks: &JsHooks,
) -> Result<Scene, SceneError> {
    let phase_hook = hooks.phase.clone();
    let store_hook = hooks.store_locator.clone();
    SceneBuilder::new(product.clone())
        .params(ShowcaseParams::for_viewport(viewport))
        .aspect(aspect)
        .on_phase_change(move |phase| {
            // cloned out so the callback may replace the hook
            let hook = phase_hook.borrow().clone();
            if let Some(f) = hook {
                if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(phase.label())) {
                    log::warn!("[phase] callback threw: {:?}", e);
                }
            }
        })
        .on_store_locator(move || {
            let hook = store_hook.borrow().clone();
            if let Some(f) = hook {
                if let Err(e) = f.call0(&JsValue::NULL) {
                    log::warn!("[scene] store locator callback threw: {:?}", e);
                }
            }
        })
        .build(backend, Box::new(HtmlImageSource))
}

pub struct FrameContext {
    pub scene: Option<Scene>,
    /// Dropped on dispose so the device and surface go with the scene.
    pub backend: Option<Rc<RefCell<WgpuBackend<'static>>>>,
    pub canvas: web::HtmlCanvasElement,
    pub product: ProductDescriptor,
    pub viewport: Viewport,
    pub hooks: JsHooks,
    pub inputs: Rc<RefCell<SceneInputs>>,
    /// Page listeners feeding `inputs`; detached on dispose.
    pub listeners: Vec<dom::Listener>,
    /// Set by the handle when it could not borrow us (e.g. from inside a callback).
    pub dispose_requested: Rc<Cell<bool>>,
    pub last_instant: Instant,
}

impl FrameContext {
    /// One rAF tick. Returns false once the showcase is torn down.
    pub fn frame(&mut self) -> bool {
        if self.dispose_requested.get() {
            self.dispose();
        }
        let Some(backend) = self.backend.clone() else {
            return false;
        };
        if self.scene.is_none() {
            return false;
        }
        let now = Instant::now();
        let dt = input::frame_dt((now - self.last_instant).as_secs_f32());
        self.last_instant = now;

        let (w, h) = (self.canvas.width(), self.canvas.height());
        if (w, h) != backend.borrow().size() {
            backend.borrow_mut().resize(w, h);
            let rect = self.canvas.get_bounding_client_rect();
            let (css_w, css_h) = (rect.width() as u32, rect.height() as u32);
            let class_changed = self
                .scene
                .as_mut()
                .is_some_and(|s| s.resize(css_w, css_h));
            if class_changed {
                self.rebuild();
            }
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        let inputs = *self.inputs.borrow();
        match scene.tick(dt, inputs) {
            Ok(_) => {}
            Err(SceneError::Gpu(GpuError::Lost)) => log::warn!("[gpu] surface lost, reconfigured"),
            Err(SceneError::Disposed) => return false,
            Err(e) => log::error!("[scene] frame error: {}", e),
        }
        true
    }

    /// Tear down and build again for the current viewport class.
    pub fn rebuild(&mut self) {
        // release the old scene's GPU resources before acquiring new ones
        self.scene = None;
        let Some(backend) = self.backend.clone() else {
            return;
        };
        let rect = self.canvas.get_bounding_client_rect();
        self.viewport = Viewport::classify(rect.width() as u32);
        let aspect = (rect.width() / rect.height().max(1.0)) as f32;
        let shared: SharedBackend = backend;
        match build_scene(&self.product, self.viewport, aspect, shared, &self.hooks) {
            Ok(scene) => {
                log::info!("[scene] rebuilt for {:?}", self.viewport);
                self.scene = Some(scene);
            }
            Err(e) => log::error!("[scene] rebuild failed: {}", e),
        }
    }

    /// Scene first, so its resources are released through a live backend.
    pub fn dispose(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.dispose();
        }
        let detached = self.listeners.len();
        self.listeners.clear();
        if self.backend.take().is_some() {
            log::info!("[gpu] backend released, {} listeners detached", detached);
        }
        self.dispose_requested.set(false);
        *self.hooks.phase.borrow_mut() = None;
        *self.hooks.store_locator.borrow_mut() = None;
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep_going = match frame_ctx_tick.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => true,
        };
        if !keep_going {
            log::info!("[frame] loop stopped");
            // drop our own closure to break the self-reference
            let _ = tick_clone.borrow_mut().take();
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Keep the canvas backing store in step with layout.
pub fn watch_resize(canvas: &web::HtmlCanvasElement) -> Option<dom::Listener> {
    let window = web::window()?;
    let canvas = canvas.clone();
    dom::add_listener(&window, "resize", move |_ev| {
        dom::sync_canvas_backing_size(&canvas);
    })
}
