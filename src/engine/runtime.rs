//! The scene runtime: one explicit context object that owns the store, the
//! navigation controller, the scroll driver and the camera rig, and runs one
//! frame at a time. The host (window, headless loop, tests) owns it and
//! passes it around by `&mut`.

use std::time::Duration;

use serde::Serialize;

use crate::engine::camera::{CameraPose, LiveCamera};
use crate::engine::camera_rig::CameraRig;
use crate::engine::command_queue::{CommandQueue, FlushReport};
use crate::engine::config::SceneSettings;
use crate::engine::preferences::PreferenceStore;
use crate::engine::quality::{QualityScaler, QualitySettings, QualityTier};
use crate::engine::scene::{
    CameraStateTable, CameraStore, NavigationController, RouteCommitted, RouteTable, SceneKey,
    ScrollDriver, SubscriptionId,
};
use crate::engine::worker::{PoseChannel, RenderWorker};
use crate::engine::EngineResult;
use crate::services::Telemetry;

/// What happened during one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    pub committed: Vec<RouteCommitted>,
    pub deferred: Vec<String>,
    pub tier_changed: Option<QualityTier>,
}

/// Serializable snapshot for the console, the headless runner and logs.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStatus {
    pub path: String,
    pub pending: Option<String>,
    pub scene: SceneKey,
    pub previous: Option<SceneKey>,
    pub pose: CameraPose,
    pub camera: LiveCamera,
    pub distance_to_pose: f32,
    pub scroll_offset: f32,
    pub scroll_locked: bool,
    pub quality: QualityTier,
    pub pixel_ratio: f32,
    pub frames: u64,
    pub notifications: u64,
    pub navigation_generation: u64,
}

pub struct SceneRuntime {
    store: CameraStore,
    nav: NavigationController,
    scroll: ScrollDriver,
    rig: CameraRig,
    quality: QualityScaler,
    commands: CommandQueue,
    preferences: Option<PreferenceStore>,
    telemetry: Telemetry,
    worker_subscription: Option<SubscriptionId>,
    frames: u64,
}

impl SceneRuntime {
    pub fn new(
        table: CameraStateTable,
        routes: RouteTable,
        scene: &SceneSettings,
        quality: QualitySettings,
    ) -> Self {
        let store = CameraStore::new(table);
        let rig = CameraRig::new(store.pose());

        let mut nav = NavigationController::new(routes);
        if let Some(threshold) = scene.scroll_threshold {
            nav = nav.with_threshold(threshold);
        }

        let mut runtime = Self {
            store,
            nav,
            scroll: ScrollDriver::new(scene.window_height as f32, scene.page_height),
            rig,
            quality: QualityScaler::new(quality),
            commands: CommandQueue::new(),
            preferences: None,
            telemetry: Telemetry::disabled(),
            worker_subscription: None,
            frames: 0,
        };

        if scene.start_path != "/" {
            runtime.commands.queue_navigate(scene.start_path.clone());
        }
        runtime
    }

    /// Built-in office poses and site routes.
    pub fn with_defaults(scene: &SceneSettings, quality: QualitySettings) -> Self {
        Self::new(
            CameraStateTable::default(),
            RouteTable::default(),
            scene,
            quality,
        )
    }

    pub fn with_preferences(mut self, preferences: PreferenceStore) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn store(&self) -> &CameraStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CameraStore {
        &mut self.store
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollDriver {
        &mut self.scroll
    }

    pub fn quality(&self) -> &QualityScaler {
        &self.quality
    }

    pub fn commands_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.commands.queue_navigate(path);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.scroll.set_viewport_height(height);
    }

    /// Camera has arrived and no navigation is waiting on the scroll.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.nav.pending_path().is_none()
            && !self.scroll.is_animating()
            && self.commands.is_empty()
            && self.rig.distance_to(self.store.pose()) <= epsilon
    }

    /// Start a render worker fed from this runtime's store.
    pub fn spawn_worker(&mut self, frame_interval: Duration) -> EngineResult<RenderWorker> {
        let (publisher, rx) = PoseChannel::new(self.store.current(), *self.store.pose());
        let worker = RenderWorker::spawn(rx, frame_interval)?;
        self.detach_worker();
        self.worker_subscription = Some(publisher.attach(&mut self.store));
        Ok(worker)
    }

    /// Stop publishing to the worker. Dropping the publisher lets the worker exit.
    pub fn detach_worker(&mut self) {
        if let Some(id) = self.worker_subscription.take() {
            self.store.unsubscribe(id);
        }
    }

    /// First user interaction: persisted once, later calls do nothing.
    pub fn mark_interaction(&mut self) {
        let Some(prefs) = self.preferences.as_mut() else {
            return;
        };
        match prefs.mark_interacted() {
            Ok(true) => log::info!("first interaction recorded"),
            Ok(false) => {}
            Err(e) => log::warn!("could not persist interaction flag: {e}"),
        }
    }

    pub fn has_interacted(&self) -> bool {
        self.preferences
            .as_ref()
            .is_some_and(|p| p.get().has_interacted)
    }

    /// Run one frame: commands, scroll, deferred commits, quality, camera.
    pub fn frame(&mut self, dt_sec: f32) -> FrameReport {
        let FlushReport {
            mut committed,
            deferred,
            ignored_scroll,
        } = self.commands.flush(
            &mut self.nav,
            &mut self.scroll,
            &mut self.store,
            &mut self.rig,
        );
        if ignored_scroll > 0 {
            log::debug!("ignored {ignored_scroll} wheel input(s) while navigation pending");
        }

        if let Some(event) = self.scroll.tick(dt_sec) {
            if let Some(c) = self
                .nav
                .on_scroll_event(event, &mut self.scroll, &mut self.store)
            {
                committed.push(c);
            }
        }

        let tier_changed = self.quality.record_frame(dt_sec);

        self.rig.follow(self.store.pose(), dt_sec);
        self.frames += 1;

        for c in &committed {
            self.telemetry.capture_event(
                "navigation",
                serde_json::json!({
                    "path": c.path,
                    "scene": c.scene,
                    "deferred": c.deferred,
                }),
            );
        }

        FrameReport {
            committed,
            deferred,
            tier_changed,
        }
    }

    pub fn status(&self) -> RuntimeStatus {
        let state = self.store.state();
        RuntimeStatus {
            path: self.nav.current_path().to_string(),
            pending: self.nav.pending_path().map(str::to_string),
            scene: state.current,
            previous: state.previous,
            pose: state.pose,
            camera: *self.rig.live(),
            distance_to_pose: self.rig.distance_to(&state.pose),
            scroll_offset: self.scroll.offset(),
            scroll_locked: self.scroll.is_locked(),
            quality: self.quality.tier(),
            pixel_ratio: self.quality.pixel_ratio(),
            frames: self.frames,
            notifications: self.store.notifications(),
            navigation_generation: self.nav.generation(),
        }
    }
}

impl Drop for SceneRuntime {
    fn drop(&mut self) {
        self.nav.cancel(&mut self.scroll);
        self.detach_worker();
    }
}
