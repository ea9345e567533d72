#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::engine::scene::{
        CameraStateTable, CameraStore, NavigationController, NavigationOutcome, RouteTable,
        SceneKey, ScrollDriver,
    };

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (NavigationController, ScrollDriver, CameraStore) {
        (
            NavigationController::new(RouteTable::default()),
            ScrollDriver::new(900.0, 10_000.0),
            CameraStore::new(CameraStateTable::default()),
        )
    }

    /// Tick the scroll driver, feeding events back like the frame loop does.
    /// Returns the frame index at which something committed.
    fn run_frames(
        nav: &mut NavigationController,
        scroll: &mut ScrollDriver,
        store: &mut CameraStore,
        frames: usize,
    ) -> Option<usize> {
        let mut committed_at = None;
        for frame in 0..frames {
            if let Some(event) = scroll.tick(DT) {
                if nav.on_scroll_event(event, scroll, store).is_some() && committed_at.is_none() {
                    committed_at = Some(frame);
                }
            }
        }
        committed_at
    }

    #[test]
    fn home_to_about_at_top_commits_immediately() {
        let (mut nav, mut scroll, mut store) = setup();

        let outcome = nav.navigate("/about", &mut scroll, &mut store);

        match outcome {
            NavigationOutcome::Committed(c) => {
                assert_eq!(c.scene, SceneKey::Stairs);
                assert!(!c.deferred);
                assert!(c.scene_changed);
            }
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(store.current(), SceneKey::Stairs);
        assert_eq!(nav.current_path(), "/about");
    }

    #[test]
    fn scrolled_navigation_waits_for_top() {
        let (mut nav, mut scroll, mut store) = setup();
        scroll.set_offset(2000.0);

        let outcome = nav.navigate("/about", &mut scroll, &mut store);
        assert!(matches!(outcome, NavigationOutcome::Deferred { scene: SceneKey::Stairs, .. }));
        assert_eq!(store.current(), SceneKey::Home);
        assert_eq!(nav.pending_path(), Some("/about"));

        // Nothing commits while the page is still above zero.
        for _ in 0..10 {
            if let Some(event) = scroll.tick(DT) {
                nav.on_scroll_event(event, &mut scroll, &mut store);
            }
            if scroll.offset() > 0.0 {
                assert_eq!(store.current(), SceneKey::Home);
            }
        }

        let committed = run_frames(&mut nav, &mut scroll, &mut store, 600);
        assert!(committed.is_some());
        assert_eq!(scroll.offset(), 0.0);
        assert_eq!(store.current(), SceneKey::Stairs);
        assert_eq!(nav.pending_path(), None);
        assert!(!scroll.is_locked());
    }

    #[test]
    fn deferred_commit_lands_on_the_frame_scroll_hits_zero() {
        let (mut nav, mut scroll, mut store) = setup();
        scroll.set_offset(2000.0);
        nav.navigate("/lab", &mut scroll, &mut store);

        let mut frames = 0;
        loop {
            frames += 1;
            assert!(frames < 1000, "scroll never reached the top");
            let event = scroll.tick(DT);
            let at_top = scroll.offset() == 0.0;
            if let Some(event) = event {
                nav.on_scroll_event(event, &mut scroll, &mut store);
            }
            if at_top {
                assert_eq!(store.current(), SceneKey::Arcade);
                break;
            }
            assert_eq!(store.current(), SceneKey::Home);
        }
    }

    #[test]
    fn last_navigation_wins_while_pending() {
        let (mut nav, mut scroll, mut store) = setup();
        let seen: Rc<RefCell<Vec<SceneKey>>> = Rc::default();
        let seen_cb = Rc::clone(&seen);
        store.subscribe(move |s| seen_cb.borrow_mut().push(s.current));

        scroll.set_offset(4000.0);
        nav.navigate("/about", &mut scroll, &mut store);
        run_frames(&mut nav, &mut scroll, &mut store, 5);
        nav.navigate("/showcase/project", &mut scroll, &mut store);
        nav.navigate("/blog", &mut scroll, &mut store);

        assert_eq!(nav.pending_path(), Some("/blog"));
        run_frames(&mut nav, &mut scroll, &mut store, 600);

        assert_eq!(*seen.borrow(), vec![SceneKey::Menu]);
        assert_eq!(nav.current_path(), "/blog");
        assert_eq!(nav.generation(), 3);
    }

    #[test]
    fn wheel_is_locked_out_while_pending() {
        let (mut nav, mut scroll, mut store) = setup();
        scroll.set_offset(3000.0);
        nav.navigate("/about", &mut scroll, &mut store);

        scroll.tick(DT);
        let before = scroll.offset();
        assert!(!scroll.wheel(500.0));
        assert_eq!(scroll.offset(), before);

        run_frames(&mut nav, &mut scroll, &mut store, 600);
        assert_eq!(store.current(), SceneKey::Stairs);
        assert!(scroll.wheel(10.0));
    }

    #[test]
    fn cancel_drops_pending_navigation() {
        let (mut nav, mut scroll, mut store) = setup();
        scroll.set_offset(3000.0);
        nav.navigate("/about", &mut scroll, &mut store);

        assert_eq!(nav.cancel(&mut scroll), Some("/about".to_string()));
        assert!(!scroll.is_locked());

        run_frames(&mut nav, &mut scroll, &mut store, 600);
        assert_eq!(store.current(), SceneKey::Home);
        assert_eq!(nav.current_path(), "/");
        assert_eq!(nav.cancel(&mut scroll), None);
    }

    #[test]
    fn unknown_path_resolves_to_home_pose() {
        let (mut nav, mut scroll, mut store) = setup();
        nav.navigate("/about", &mut scroll, &mut store);

        let outcome = nav.navigate("/unmapped-page", &mut scroll, &mut store);
        assert!(matches!(
            outcome,
            NavigationOutcome::Committed(ref c) if c.scene == SceneKey::Home
        ));
        assert_eq!(*store.pose(), store.table().default_pose());
    }

    #[test]
    fn same_path_is_ignored_and_same_scene_does_not_notify() {
        let (mut nav, mut scroll, mut store) = setup();

        assert_eq!(nav.navigate("/", &mut scroll, &mut store), NavigationOutcome::Ignored);

        nav.navigate("/about", &mut scroll, &mut store);
        let count = store.notifications();
        let outcome = nav.navigate("/services", &mut scroll, &mut store);
        match outcome {
            NavigationOutcome::Committed(c) => assert!(!c.scene_changed),
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(store.notifications(), count);
        assert_eq!(nav.current_path(), "/services");
    }

    #[test]
    fn paths_differing_only_in_case_are_distinct_routes() {
        let (mut nav, mut scroll, mut store) = setup();

        let first = match nav.navigate("/blog/Post-A", &mut scroll, &mut store) {
            NavigationOutcome::Committed(c) => c,
            other => panic!("expected commit, got {other:?}"),
        };
        assert_eq!(first.path, "/blog/Post-A");
        assert_eq!(first.scene, SceneKey::Menu);

        let second = match nav.navigate("/blog/post-a", &mut scroll, &mut store) {
            NavigationOutcome::Committed(c) => c,
            other => panic!("expected commit, got {other:?}"),
        };
        assert_eq!(second.path, "/blog/post-a");
        assert!(!second.scene_changed);
        assert_eq!(nav.current_path(), "/blog/post-a");

        assert_eq!(nav.navigate("/blog/post-a/", &mut scroll, &mut store), NavigationOutcome::Ignored);
    }

    #[test]
    fn threshold_override_controls_deferral() {
        let (nav, mut scroll, mut store) = setup();
        let mut nav = nav.with_threshold(100.0);
        scroll.set_offset(150.0);

        assert!(matches!(
            nav.navigate("/about", &mut scroll, &mut store),
            NavigationOutcome::Deferred { .. }
        ));
    }
}
