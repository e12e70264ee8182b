mod input;
mod loader;

use glam::Vec2;
use input::{cursor_ndc, VirtualScroll};
use loader::ThreadImageSource;
use showcase_core::wgpu_backend::WgpuBackend;
use showcase_core::{
    GpuError, ProductDescriptor, Scene, SceneBuilder, SceneError, SceneInputs, SharedBackend,
    ShowcaseParams, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

struct App {
    window: Arc<Window>,
    backend: Rc<RefCell<WgpuBackend<'static>>>,
    product: ProductDescriptor,
    scene: Option<Scene>,
    viewport: Viewport,
    scroll: VirtualScroll,
    pointer: Vec2,
    last_frame: Instant,
}

impl App {
    fn logical_width(&self) -> u32 {
        let size = self.window.inner_size();
        size.to_logical::<f64>(self.window.scale_factor()).width as u32
    }

    fn rebuild(&mut self) -> Result<(), SceneError> {
        self.scene = None;
        self.viewport = Viewport::classify(self.logical_width());
        let size = self.window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let shared: SharedBackend = self.backend.clone();
        let scene = SceneBuilder::new(self.product.clone())
            .params(ShowcaseParams::for_viewport(self.viewport))
            .aspect(aspect)
            .on_phase_change(|phase| log::info!("[phase] now {}", phase.label()))
            .on_store_locator(|| log::info!("[scene] store locator opened"))
            .build(shared, Box::new(ThreadImageSource::default()))?;
        log::info!("[scene] built for {:?}", self.viewport);
        self.scene = Some(scene);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.backend.borrow_mut().resize(size.width, size.height);
        let logical = size.to_logical::<f64>(self.window.scale_factor());
        let class_changed = self
            .scene
            .as_mut()
            .is_some_and(|s| s.resize(logical.width as u32, logical.height as u32));
        if class_changed {
            if let Err(e) = self.rebuild() {
                log::error!("[scene] rebuild failed: {}", e);
            }
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let inputs = SceneInputs {
            scroll: self.scroll.progress(),
            pointer: self.pointer,
        };
        match scene.tick(dt, inputs) {
            Ok(_) => {}
            Err(SceneError::Gpu(GpuError::Lost)) => {
                let size = self.window.inner_size();
                self.backend.borrow_mut().resize(size.width, size.height);
            }
            Err(e) => log::error!("[scene] frame error: {}", e),
        }
    }

    fn key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Enter) => {
                let fired = self.scene.as_mut().is_some_and(|s| s.activate_offer());
                if !fired {
                    log::info!("[scene] offer not active yet");
                }
            }
            Key::Named(NamedKey::Escape) => {
                // dispose and rebuild, the same path a product switch takes
                if let Some(mut scene) = self.scene.take() {
                    scene.dispose();
                }
                log::info!(
                    "[gpu] {} resources live after dispose",
                    self.backend.borrow().live_resources()
                );
                if let Err(e) = self.rebuild() {
                    log::error!("[scene] rebuild failed: {}", e);
                }
            }
            Key::Named(NamedKey::Home) => self.scroll.jump_to(0.0),
            Key::Named(NamedKey::End) => self.scroll.jump_to(1.0),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let image_url = args.next().unwrap_or_else(|| "gradient:512x768".to_owned());
    let theme = args.next().unwrap_or_else(|| "#6b4f3a".to_owned());
    let product = ProductDescriptor::new("Showcase", image_url, &theme, "Native preview");

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Product Showcase (native)")
            .with_inner_size(LogicalSize::new(1280.0, 800.0))
            .build(&event_loop)?,
    );
    let size = window.inner_size();
    let backend = pollster::block_on(WgpuBackend::new(window.clone(), size.width, size.height))?;

    let mut app = App {
        window,
        backend: Rc::new(RefCell::new(backend)),
        product,
        scene: None,
        viewport: Viewport::default(),
        scroll: VirtualScroll::default(),
        pointer: Vec2::ZERO,
        last_frame: Instant::now(),
    };
    app.rebuild()?;
    log::info!("wheel to scroll, Enter for the offer, Esc to rebuild, Home/End to jump");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::CloseRequested => {
                if let Some(mut scene) = app.scene.take() {
                    scene.dispose();
                }
                elwt.exit();
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                // wheel-down arrives as negative y and moves forward
                MouseScrollDelta::LineDelta(_, y) => app.scroll.scroll_lines(-y),
                MouseScrollDelta::PixelDelta(p) => app.scroll.scroll_pixels(-p.y),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let size = app.window.inner_size();
                app.pointer = cursor_ndc(position.x, position.y, size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => app.key(&logical_key),
            _ => {}
        },
        Event::AboutToWait => {
            app.frame();
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
