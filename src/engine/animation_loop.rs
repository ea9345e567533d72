use crate::engine::SceneRuntime;
use crate::engine::scene::RouteCommitted;

/// Fixed-step frame driver for runs without a window (the `route` command, tests).
pub struct AnimationLoop<'a> {
    runtime: &'a mut SceneRuntime,
    dt_sec: f32,
}

impl<'a> AnimationLoop<'a> {
    pub fn new(runtime: &'a mut SceneRuntime, dt_sec: f32) -> Self {
        Self { runtime, dt_sec }
    }

    pub fn runtime(&self) -> &SceneRuntime {
        self.runtime
    }

    /// Run exactly `frames` frames; returns every commit in order.
    pub fn run_frames(&mut self, frames: u64) -> Vec<RouteCommitted> {
        let mut committed = Vec::new();
        for _ in 0..frames {
            committed.extend(self.runtime.frame(self.dt_sec).committed);
        }
        committed
    }

    /// Run until `done` holds after a frame. Returns the number of frames run,
    /// or `None` if `max_frames` passed first.
    pub fn run_until(
        &mut self,
        max_frames: u64,
        mut done: impl FnMut(&SceneRuntime) -> bool,
    ) -> Option<u64> {
        for n in 1..=max_frames {
            self.runtime.frame(self.dt_sec);
            if done(self.runtime) {
                return Some(n);
            }
        }
        None
    }

    /// Run until nothing is pending and the camera is within `epsilon` of its pose.
    pub fn settle(&mut self, max_frames: u64, epsilon: f32) -> Option<u64> {
        self.run_until(max_frames, |rt| rt.is_settled(epsilon))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::config::SceneSettings;
    use crate::engine::quality::QualitySettings;
    use crate::engine::scene::SceneKey;

    const DT: f32 = 1.0 / 60.0;

    fn runtime() -> SceneRuntime {
        SceneRuntime::with_defaults(&SceneSettings::default(), QualitySettings::default())
    }

    #[test]
    fn deferred_commit_lands_on_the_frame_scroll_reaches_top() {
        let mut rt = runtime();
        rt.scroll_mut().set_offset(2000.0);
        rt.navigate("/about");

        let mut lp = AnimationLoop::new(&mut rt, DT);
        let frames = lp
            .run_until(600, |rt| rt.store().current() == SceneKey::Stairs)
            .unwrap();
        assert!(frames > 1);

        let status = lp.runtime().status();
        assert_eq!(status.scroll_offset, 0.0);
        assert_eq!(status.path, "/about");
        assert_eq!(status.pending, None);
        assert!(!status.scroll_locked);
    }

    #[test]
    fn rapid_navigation_commits_only_the_last() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut rt = runtime();
        let sink = Rc::clone(&seen);
        rt.store_mut().subscribe(move |s| sink.borrow_mut().push(s.current));
        rt.scroll_mut().set_offset(4000.0);
        rt.navigate("/about");
        rt.navigate("/lab");
        rt.navigate("/blog/first-post");

        let mut lp = AnimationLoop::new(&mut rt, DT);
        let committed = lp.run_frames(600);

        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].scene, SceneKey::Menu);
        assert!(committed[0].deferred);
        assert_eq!(*seen.borrow(), vec![SceneKey::Menu]);
        assert_eq!(lp.runtime().store().state().previous, Some(SceneKey::Home));
    }

    #[test]
    fn settle_reaches_the_new_pose() {
        let mut rt = runtime();
        rt.navigate("/basketball");
        let mut lp = AnimationLoop::new(&mut rt, DT);

        let frames = lp.settle(2000, 1e-3).unwrap();
        assert!(frames > 1);
        let status = lp.runtime().status();
        assert_eq!(status.scene, SceneKey::Hoop);
        assert!(status.distance_to_pose <= 1e-3);
    }
}
