//! Nullable presentation surface: records lifecycle calls.

use agegate_surface::{DismissHandle, Layout, PresentationSurface, SurfaceError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// A surface that mounts nothing and remembers everything.
#[derive(Default)]
pub struct NullSurface {
    open: AtomicBool,
    block_opens: AtomicBool,
    opened: Mutex<Vec<(Url, Layout)>>,
    redirects: Mutex<Vec<Url>>,
    heights: Mutex<Vec<u32>>,
    dismiss: Mutex<Option<DismissHandle>>,
    closes: AtomicUsize,
    loading_hidden: AtomicUsize,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a popup blocker: subsequent opens fail.
    pub fn block_opens(&self, block: bool) {
        self.block_opens.store(block, Ordering::SeqCst);
    }

    /// Simulate the user pressing the close control.
    pub fn user_dismiss(&self) {
        let handle = self.dismiss.lock().unwrap().clone();
        if let Some(handle) = handle {
            handle.dismiss();
        }
    }

    /// Every successful open, in order.
    pub fn opened(&self) -> Vec<(Url, Layout)> {
        self.opened.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn last_url(&self) -> Option<Url> {
        self.opened.lock().unwrap().last().map(|(u, _)| u.clone())
    }

    pub fn redirects(&self) -> Vec<Url> {
        self.redirects.lock().unwrap().clone()
    }

    pub fn heights(&self) -> Vec<u32> {
        self.heights.lock().unwrap().clone()
    }

    /// Calls to `close` that found the surface open.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn loading_hidden_count(&self) -> usize {
        self.loading_hidden.load(Ordering::SeqCst)
    }
}

impl PresentationSurface for NullSurface {
    fn open(&self, url: &Url, layout: Layout, on_dismiss: DismissHandle) -> Result<(), SurfaceError> {
        if self.block_opens.load(Ordering::SeqCst) {
            return Err(SurfaceError::Blocked("popup blocked".into()));
        }
        self.opened.lock().unwrap().push((url.clone(), layout));
        *self.dismiss.lock().unwrap() = Some(on_dismiss);
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.dismiss.lock().unwrap().take();
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn update_height(&self, px: u32) {
        self.heights.lock().unwrap().push(px);
    }

    fn hide_loading(&self) {
        self.loading_hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn redirect(&self, url: &Url) -> Result<(), SurfaceError> {
        if self.block_opens.load(Ordering::SeqCst) {
            return Err(SurfaceError::Blocked("navigation blocked".into()));
        }
        self.redirects.lock().unwrap().push(url.clone());
        Ok(())
    }
}
