//! Render worker: a second thread with its own copy of the camera.
//!
//! The worker never shares memory with the scene runtime. It receives
//! versioned poses over a `watch` channel, which keeps only the newest
//! value: if the worker falls behind, intermediate poses are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;

use crate::engine::camera::{CameraPose, LiveCamera};
use crate::engine::camera_rig::CameraRig;
use crate::engine::scene::{CameraStore, CameraStoreState, SceneKey, SubscriptionId};
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VersionedPose {
    pub version: u64,
    pub scene: SceneKey,
    pub pose: CameraPose,
}

/// Sending half. Versions strictly increase per publisher.
#[derive(Debug)]
pub struct PosePublisher {
    tx: watch::Sender<VersionedPose>,
    version: u64,
}

pub type PoseReceiver = watch::Receiver<VersionedPose>;

pub struct PoseChannel;

impl PoseChannel {
    pub fn new(scene: SceneKey, pose: CameraPose) -> (PosePublisher, PoseReceiver) {
        let (tx, rx) = watch::channel(VersionedPose {
            version: 0,
            scene,
            pose,
        });
        (PosePublisher { tx, version: 0 }, rx)
    }
}

impl PosePublisher {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns false once every receiver is gone.
    pub fn publish(&mut self, scene: SceneKey, pose: CameraPose) -> bool {
        self.version += 1;
        self.tx
            .send(VersionedPose {
                version: self.version,
                scene,
                pose,
            })
            .is_ok()
    }

    /// Forward every store transition to the worker.
    pub fn attach(mut self, store: &mut CameraStore) -> SubscriptionId {
        store.subscribe(move |state: &CameraStoreState| {
            if !self.publish(state.current, state.pose) {
                log::debug!("render worker gone; dropping pose v{}", self.version);
            }
        })
    }
}

/// Final state of a stopped worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerReport {
    /// Every version the worker picked up, in order.
    pub observed_versions: Vec<u64>,
    pub frames: u64,
    pub scene: SceneKey,
    pub camera: LiveCamera,
    pub view: [[f32; 4]; 4],
}

pub struct RenderWorker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<WorkerReport>,
}

impl RenderWorker {
    /// Spawn the worker. It ticks every `frame_interval` until stopped or
    /// until the publisher is dropped.
    pub fn spawn(mut rx: PoseReceiver, frame_interval: Duration) -> EngineResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || {
                let first = *rx.borrow_and_update();
                let mut current = first;
                let mut rig = CameraRig::new(&first.pose);
                let mut observed = vec![first.version];
                let mut frames = 0u64;
                let mut last = Instant::now();

                loop {
                    let closed = rx.has_changed().is_err();
                    let latest = *rx.borrow_and_update();
                    if latest.version != current.version {
                        current = latest;
                        observed.push(current.version);
                    }
                    if closed {
                        break;
                    }

                    let now = Instant::now();
                    let dt = (now - last).as_secs_f32();
                    last = now;
                    rig.follow(&current.pose, dt);
                    frames += 1;

                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    std::thread::sleep(frame_interval);
                }

                let camera = *rig.live();
                WorkerReport {
                    observed_versions: observed,
                    frames,
                    scene: current.scene,
                    camera,
                    view: camera.view_matrix(),
                }
            })
            .map_err(|e| EngineError::Worker(e.to_string()))?;

        Ok(Self { stop, handle })
    }

    pub fn stop(self) -> EngineResult<WorkerReport> {
        self.stop.store(true, Ordering::Release);
        self.handle.join().map_err(|_| EngineError::WorkerPanicked)
    }

    /// Wait for the worker to exit on its own (publisher dropped).
    pub fn join(self) -> EngineResult<WorkerReport> {
        self.handle.join().map_err(|_| EngineError::WorkerPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::CameraStateTable;

    #[test]
    fn versions_increase_and_last_value_wins() {
        let table = CameraStateTable::default();
        let (mut publisher, rx) = PoseChannel::new(SceneKey::Home, table.resolve(SceneKey::Home));
        let worker = RenderWorker::spawn(rx, Duration::from_millis(5)).unwrap();

        for key in SceneKey::ALL.iter().cycle().take(60) {
            assert!(publisher.publish(*key, table.resolve(*key)));
        }
        publisher.publish(SceneKey::Hoop, table.resolve(SceneKey::Hoop));
        let final_version = publisher.version();
        drop(publisher);

        let report = worker.join().unwrap();
        assert!(report.observed_versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(report.observed_versions.last(), Some(&final_version));
        assert_eq!(report.scene, SceneKey::Hoop);
    }

    #[test]
    fn attached_publisher_follows_store() {
        let mut store = CameraStore::new(CameraStateTable::default());
        let state = store.state();
        let (publisher, rx) = PoseChannel::new(state.current, state.pose);
        let worker = RenderWorker::spawn(rx, Duration::from_millis(1)).unwrap();
        let sub = publisher.attach(&mut store);

        store.set_scene(SceneKey::Projects);
        store.set_scene(SceneKey::Projects);
        store.set_scene(SceneKey::Menu);

        // Dropping the subscription drops the publisher, which ends the worker.
        assert!(store.unsubscribe(sub));
        let report = worker.join().unwrap();

        assert_eq!(report.scene, SceneKey::Menu);
        assert_eq!(report.observed_versions.last(), Some(&2));
    }

    #[test]
    fn stop_returns_a_report() {
        let table = CameraStateTable::default();
        let (_publisher, rx) = PoseChannel::new(SceneKey::Home, table.resolve(SceneKey::Home));
        let worker = RenderWorker::spawn(rx, Duration::from_millis(1)).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let report = worker.stop().unwrap();
        assert!(report.frames > 0);
        assert_eq!(report.observed_versions, vec![0]);
    }
}
