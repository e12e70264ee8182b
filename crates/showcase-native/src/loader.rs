//! Image loading off the render thread. Requests are handed to short-lived
//! worker threads; results come back over a channel and are delivered from
//! `poll`, which the scene calls at the top of every frame.

use showcase_core::{ImageData, ImageSource, LoadResult, TextureLoadError, TextureRequest};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

const MAX_SYNTHETIC_DIM: u32 = 4096;

pub struct ThreadImageSource {
    tx: Sender<(u64, LoadResult)>,
    rx: Receiver<(u64, LoadResult)>,
    waiting: Vec<(u64, TextureRequest)>,
    next_id: u64,
}

impl Default for ThreadImageSource {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            waiting: Vec::new(),
            next_id: 0,
        }
    }
}

impl ImageSource for ThreadImageSource {
    fn request(&mut self, request: TextureRequest) {
        self.next_id += 1;
        let id = self.next_id;
        let url = request.url().to_owned();
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || {
                // receiver gone means the source was dropped with the scene
                let _ = tx.send((id, load(&url)));
            });
        match spawned {
            Ok(_) => self.waiting.push((id, request)),
            Err(e) => {
                request.complete(Err(TextureLoadError::Fetch(format!("spawn failed: {}", e))));
            }
        }
    }

    fn poll(&mut self) {
        while let Ok((id, result)) = self.rx.try_recv() {
            if let Some(pos) = self.waiting.iter().position(|(i, _)| *i == id) {
                let (_, request) = self.waiting.swap_remove(pos);
                request.complete(result);
            }
        }
    }
}

/// Resolve a product image url: `gradient:WxH` builds the synthetic bottle,
/// `file://` urls and bare paths are decoded from disk. Network urls have no
/// loader here and fail, which leaves the scene rendering without an image.
pub fn load(url: &str) -> LoadResult {
    if let Some(dims) = url.strip_prefix("gradient:") {
        let (w, h) = parse_dims(dims)
            .ok_or_else(|| TextureLoadError::Decode(format!("bad dimensions {:?}", dims)))?;
        return synthetic_product(w, h);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Err(TextureLoadError::Fetch(format!(
            "no network loader for {:?} (pass a file path or gradient:512x768)",
            url
        )));
    }
    decode_file(Path::new(url.strip_prefix("file://").unwrap_or(url)))
}

fn decode_file(path: &Path) -> LoadResult {
    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => {
            TextureLoadError::Fetch(format!("{}: {}", path.display(), io))
        }
        other => TextureLoadError::Decode(format!("{}: {}", path.display(), other)),
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    ImageData::new(w, h, rgba.into_raw())
}

pub fn parse_dims(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    let ok = |v: u32| (1..=MAX_SYNTHETIC_DIM).contains(&v);
    (ok(w) && ok(h)).then_some((w, h))
}

/// Bottle silhouette: narrow neck over a wide body, transparent outside.
pub fn synthetic_product(width: u32, height: u32) -> LoadResult {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        let v = (y as f32 + 0.5) / height as f32;
        let half_width = if v < 0.22 { 0.3 } else { 0.78 };
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
            let inside = u.abs() <= half_width && v > 0.04 && v < 0.97;
            let shade = (0.35 + 0.55 * (1.0 - v)) * (1.0 - 0.45 * u.abs());
            let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
            rgba.extend_from_slice(&[
                to_u8(shade),
                to_u8(shade * 0.86),
                to_u8(shade * 0.7),
                if inside { 255 } else { 0 },
            ]);
        }
    }
    ImageData::new(width, height, rgba)
}
