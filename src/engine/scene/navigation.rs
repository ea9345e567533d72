use serde::Serialize;

use crate::engine::scene::routes::normalize_path;
use crate::engine::scene::{CameraStore, RouteTable, SceneKey, ScrollDriver, ScrollEvent};

/// A route change that reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCommitted {
    pub path: String,
    pub scene: SceneKey,
    /// Waited for a scroll-to-top before committing.
    pub deferred: bool,
    /// False when the new route shares the previous route's scene.
    pub scene_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Committed(RouteCommitted),
    /// Held until the page is back at the top.
    Deferred { path: String, scene: SceneKey },
    /// Already there.
    Ignored,
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    path: String,
    scene: SceneKey,
    generation: u64,
}

/// Turns pathname changes into scene transitions.
///
/// Near the top of the page a navigation commits at once and the page eases
/// to the top. Scrolled further than `threshold` (default: one viewport), the
/// navigation waits for the scroll driver's `ReachedTop` event so the camera
/// never jumps while content is mid-scroll. While waiting, wheel input is
/// locked out and a newer navigation replaces the pending one.
#[derive(Debug, Clone)]
pub struct NavigationController {
    routes: RouteTable,
    current_path: String,
    pending: Option<PendingNavigation>,
    generation: u64,
    threshold: Option<f32>,
}

impl NavigationController {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            current_path: "/".to_string(),
            pending: None,
            generation: 0,
            threshold: None,
        }
    }

    /// Fixed scroll threshold in pixels instead of the viewport height.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold.max(0.0));
        self
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn pending_path(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.path.as_str())
    }

    /// Number of navigations that have been deferred so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn navigate(
        &mut self,
        path: &str,
        scroll: &mut ScrollDriver,
        store: &mut CameraStore,
    ) -> NavigationOutcome {
        let path = normalize_path(path);
        let scene = self.routes.scene_for(&path);

        if self.pending.is_none() && path == self.current_path {
            return NavigationOutcome::Ignored;
        }

        let threshold = self.threshold.unwrap_or(scroll.viewport_height());
        if self.pending.is_some() || scroll.offset() > threshold {
            self.generation += 1;
            if let Some(replaced) = self.pending.take() {
                log::info!(
                    "navigation to {} superseded by {} (#{})",
                    replaced.path,
                    path,
                    self.generation
                );
            } else {
                log::info!(
                    "deferring navigation to {} until scrolled to top (offset {:.0}px)",
                    path,
                    scroll.offset()
                );
            }

            self.pending = Some(PendingNavigation {
                path: path.clone(),
                scene,
                generation: self.generation,
            });
            scroll.set_locked(true);
            scroll.scroll_to_top();
            return NavigationOutcome::Deferred { path, scene };
        }

        scroll.scroll_to_top();
        NavigationOutcome::Committed(self.commit(path, scene, false, store))
    }

    /// Feed scroll events back in. Commits the pending navigation on `ReachedTop`.
    pub fn on_scroll_event(
        &mut self,
        event: ScrollEvent,
        scroll: &mut ScrollDriver,
        store: &mut CameraStore,
    ) -> Option<RouteCommitted> {
        match event {
            ScrollEvent::ReachedTop => {
                let pending = self.pending.take()?;
                scroll.set_locked(false);
                log::debug!("committing deferred navigation #{}", pending.generation);
                Some(self.commit(pending.path, pending.scene, true, store))
            }
        }
    }

    /// Drop a pending navigation (teardown or navigating away).
    /// Returns the path that was pending.
    pub fn cancel(&mut self, scroll: &mut ScrollDriver) -> Option<String> {
        let pending = self.pending.take()?;
        scroll.set_locked(false);
        log::info!("cancelled pending navigation to {}", pending.path);
        Some(pending.path)
    }

    fn commit(
        &mut self,
        path: String,
        scene: SceneKey,
        deferred: bool,
        store: &mut CameraStore,
    ) -> RouteCommitted {
        let scene_changed = store.set_scene(scene);
        self.current_path = path.clone();
        RouteCommitted {
            path,
            scene,
            deferred,
            scene_changed,
        }
    }
}
