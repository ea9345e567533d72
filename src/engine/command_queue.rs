/**
 * Queue for host commands (navigation, wheel, pointer)
 * which reach the scene after input has been gathered, before the next frame advances.
 *
 */
use glam::Vec2;

use crate::engine::camera_rig::CameraRig;
use crate::engine::scene::{
    CameraStore, NavigationController, NavigationOutcome, RouteCommitted, ScrollDriver,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Navigate { path: String },
    Scroll { delta: f32 },
    Pointer { ndc: Vec2 },
    CancelNavigation,
}

/// What a flush did, for logging and the console.
#[derive(Debug, Default)]
pub struct FlushReport {
    pub committed: Vec<RouteCommitted>,
    pub deferred: Vec<String>,
    /// Wheel input dropped while a navigation was pending.
    pub ignored_scroll: usize,
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<HostCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Queue a navigation to `path`.
    pub fn queue_navigate(&mut self, path: impl Into<String>) {
        self.commands.push(HostCommand::Navigate { path: path.into() });
    }

    /// Queue a wheel delta in pixels (positive scrolls down).
    pub fn queue_scroll(&mut self, delta: f32) {
        self.commands.push(HostCommand::Scroll { delta });
    }

    /// Queue a pointer position in normalized device coordinates.
    pub fn queue_pointer(&mut self, ndc: Vec2) {
        self.commands.push(HostCommand::Pointer { ndc });
    }

    pub fn queue_cancel(&mut self) {
        self.commands.push(HostCommand::CancelNavigation);
    }

    /// Flush all queued commands in order.
    pub fn flush(
        &mut self,
        nav: &mut NavigationController,
        scroll: &mut ScrollDriver,
        store: &mut CameraStore,
        rig: &mut CameraRig,
    ) -> FlushReport {
        let mut report = FlushReport::default();
        let commands = std::mem::take(&mut self.commands);
        for cmd in commands {
            match cmd {
                HostCommand::Navigate { path } => match nav.navigate(&path, scroll, store) {
                    NavigationOutcome::Committed(c) => report.committed.push(c),
                    NavigationOutcome::Deferred { path, .. } => report.deferred.push(path),
                    NavigationOutcome::Ignored => {}
                },
                HostCommand::Scroll { delta } => {
                    if !scroll.wheel(delta) {
                        report.ignored_scroll += 1;
                    }
                }
                HostCommand::Pointer { ndc } => rig.set_pointer(ndc),
                HostCommand::CancelNavigation => {
                    nav.cancel(scroll);
                }
            }
        }
        report
    }
}
