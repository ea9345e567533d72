/// Emitted by `ScrollDriver::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    /// A programmatic scroll-to-top landed on offset 0 this frame.
    ReachedTop,
}

/// Page scroll state plus the programmatic smooth scroll.
///
/// Offsets are in logical pixels, 0 = top of the page.
#[derive(Debug, Clone)]
pub struct ScrollDriver {
    offset: f32,
    max_offset: f32,
    viewport_height: f32,
    /// Exponential ease rate (1/s) of the smooth scroll.
    rate: f32,
    animating: bool,
    locked: bool,
}

/// Below this the smooth scroll snaps to 0.
const SNAP_PX: f32 = 0.5;

impl ScrollDriver {
    pub fn new(viewport_height: f32, max_offset: f32) -> Self {
        Self {
            offset: 0.0,
            max_offset: max_offset.max(0.0),
            viewport_height: viewport_height.max(1.0),
            rate: 10.0,
            animating: false,
            locked: false,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.max(0.1);
        self
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// While locked, user wheel input is ignored.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Jump to an offset (restoring a position, tests, scripted runs).
    /// Non-finite offsets are ignored.
    pub fn set_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = offset.clamp(0.0, self.max_offset);
        }
    }

    /// User scroll. Cancels an unlocked smooth scroll, like a browser does.
    /// Returns false when the input was ignored (locked, or not a finite delta).
    pub fn wheel(&mut self, delta: f32) -> bool {
        if self.locked || !delta.is_finite() {
            return false;
        }
        self.animating = false;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset);
        true
    }

    /// Start a smooth scroll to offset 0.
    pub fn scroll_to_top(&mut self) {
        self.animating = true;
    }

    pub fn tick(&mut self, dt_sec: f32) -> Option<ScrollEvent> {
        if !self.animating {
            return None;
        }

        if dt_sec > 0.0 {
            let alpha = 1.0 - (-self.rate * dt_sec).exp();
            self.offset -= self.offset * alpha;
        }

        if self.offset < SNAP_PX {
            self.offset = 0.0;
            self.animating = false;
            return Some(ScrollEvent::ReachedTop);
        }

        None
    }
}
