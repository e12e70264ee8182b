//! Product image loading boundary.
//!
//! The engine never fetches anything itself. It hands the host an
//! [`ImageSource`] request carrying a weak "still alive" token; the host
//! completes it whenever its fetch/decode finishes. If the scene was torn down
//! in the meantime the completion is dropped on the floor.

use crate::error::TextureLoadError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Decoded RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, TextureLoadError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4));
        match expected {
            Some(n) if n != 0 && rgba.len() == n => Ok(Self {
                width,
                height,
                rgba,
            }),
            _ => Err(TextureLoadError::Size {
                // usize::MAX stands in for a size that does not fit
                expected: expected.unwrap_or(usize::MAX),
                got: rgba.len(),
            }),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

pub type LoadResult = Result<ImageData, TextureLoadError>;

type Slot = RefCell<Option<LoadResult>>;

/// Handed to the host for one load attempt.
pub struct TextureRequest {
    url: String,
    attempt: u8,
    slot: Weak<Slot>,
}

impl TextureRequest {
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 1 for the first attempt, 2 for the retry.
    #[inline]
    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    /// False once the owning scene has been disposed.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.slot.strong_count() > 0
    }

    /// Deliver the result. Returns false (and does nothing) if the scene is gone.
    pub fn complete(self, result: LoadResult) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                *slot.borrow_mut() = Some(result);
                true
            }
            None => {
                log::debug!("[texture] late completion for {} ignored", self.url);
                false
            }
        }
    }
}

/// Engine-side end of an in-flight request; dropping it invalidates the request.
pub(crate) struct PendingTexture {
    slot: Rc<Slot>,
    pub(crate) attempt: u8,
}

impl PendingTexture {
    pub(crate) fn start(url: &str, attempt: u8) -> (Self, TextureRequest) {
        let slot = Rc::new(RefCell::new(None));
        let request = TextureRequest {
            url: url.to_owned(),
            attempt,
            slot: Rc::downgrade(&slot),
        };
        (Self { slot, attempt }, request)
    }

    /// Non-blocking poll; `None` while still in flight.
    pub(crate) fn poll(&self) -> Option<LoadResult> {
        self.slot.borrow_mut().take()
    }
}

/// Host asset facility. `request` must not block; `poll` is called at the top
/// of every frame for hosts that deliver completions from the render thread.
pub trait ImageSource {
    fn request(&mut self, request: TextureRequest);

    fn poll(&mut self) {}
}

/// Source for hosts with no product imagery; every request fails immediately.
pub struct NoImageSource;

impl ImageSource for NoImageSource {
    fn request(&mut self, request: TextureRequest) {
        request.complete(Err(TextureLoadError::Fetch("no image source".into())));
    }
}
