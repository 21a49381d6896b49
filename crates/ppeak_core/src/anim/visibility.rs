//! One-shot "activate once visible" trigger.
//!
//! # Responsibility
//! - Defer expensive work (embeds, particle engines) until a target element
//!   first intersects the viewport.
//!
//! # Invariants
//! - `is_visible`/`has_loaded` flip to `true` at most once and never back.
//! - The observer is disconnected after the first intersection and on
//!   unmount; disconnecting twice is harmless.

use log::debug;

/// Observer options, mirroring `IntersectionObserver` init.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    pub root_margin_px: u32,
    pub threshold: f32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin_px: 100,
            threshold: 0.1,
        }
    }
}

/// Host viewport-intersection facility.
pub trait ViewportObserver {
    fn observe(&mut self, target: &str, options: ObserveOptions);
    fn disconnect(&mut self);
}

pub struct LazyVisibilityTrigger<O: ViewportObserver> {
    observer: O,
    target: Option<String>,
    connected: bool,
    is_visible: bool,
    has_loaded: bool,
}

impl<O: ViewportObserver> LazyVisibilityTrigger<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            target: None,
            connected: false,
            is_visible: false,
            has_loaded: false,
        }
    }

    /// Starts observing `target`. Without a target (element not rendered)
    /// nothing is observed and the trigger stays idle.
    pub fn mount(&mut self, target: Option<&str>) {
        let Some(target) = target else {
            return;
        };
        if self.connected || self.has_loaded {
            return;
        }
        self.observer.observe(target, ObserveOptions::default());
        self.target = Some(target.to_string());
        self.connected = true;
    }

    /// Intersection callback. Returns `true` on the call that activated.
    pub fn on_intersection(&mut self, is_intersecting: bool) -> bool {
        if !is_intersecting || self.has_loaded {
            return false;
        }
        self.is_visible = true;
        self.has_loaded = true;
        self.disconnect();
        debug!(
            "event=lazy_visible module=anim status=ok target={}",
            self.target.as_deref().unwrap_or("unknown")
        );
        true
    }

    pub fn unmount(&mut self) {
        self.disconnect();
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn is_observing(&self) -> bool {
        self.connected
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.observer.disconnect();
            self.connected = false;
        }
    }
}
