mod casts {
    use test_case::test_case;
    use tether_memory::{IntrusivePtr, cast};
    use tether_test_utils::{DropLog, Labelled, Tracked, TrackedChild};

    #[test_case(1; "once")]
    #[test_case(3; "several times")]
    fn static_cast_copies_retain(copies: usize) {
        let log = DropLog::new();
        let child = IntrusivePtr::new(TrackedChild::new(1, "a", &log));

        let labelled: Vec<IntrusivePtr<dyn Labelled>> =
            (0..copies).map(|_| cast::static_cast(&child)).collect();

        assert_eq!(IntrusivePtr::ref_count(&child), copies + 1);
        assert!(labelled.iter().all(|l| l.label() == "TrackedChild(1, a)"));

        drop(labelled);
        assert_eq!(IntrusivePtr::ref_count(&child), 1);
    }

    #[test]
    fn static_cast_move_transfers() {
        let log = DropLog::new();
        let child = IntrusivePtr::new(TrackedChild::new(1, "a", &log));

        let labelled: IntrusivePtr<dyn Labelled> = cast::static_cast_move(child);

        assert_eq!(IntrusivePtr::ref_count(&labelled), 1);
        drop(labelled);
        assert_eq!(log.times_destroyed(1), 1);
    }

    #[test]
    fn const_cast_copy_and_move() {
        let log = DropLog::new();
        let tracked = IntrusivePtr::new(Tracked::new(1, &log));

        let read_only = cast::read_only(&tracked);
        assert_eq!(IntrusivePtr::ref_count(&tracked), 2);
        assert_eq!(read_only.id, 1);

        let mutable = cast::const_cast(&read_only);
        assert_eq!(IntrusivePtr::ref_count(&tracked), 3);

        let moved = cast::const_cast_move(read_only);
        assert_eq!(IntrusivePtr::ref_count(&tracked), 3);
        assert_eq!(moved, mutable);

        drop((tracked, mutable));
        assert_eq!(log.count(), 0);
        drop(moved);
        assert_eq!(log.ids(), [1]);
    }

    #[test]
    fn read_only_move_transfers() {
        let log = DropLog::new();
        let tracked = IntrusivePtr::new(Tracked::new(1, &log));

        let read_only = cast::read_only_move(tracked);

        assert_eq!(IntrusivePtr::ref_count(&read_only), 1);
    }

    #[test]
    fn casting_empty_handles() {
        let empty = IntrusivePtr::<Tracked>::null();

        assert!(cast::read_only(&empty).is_null());
        assert!(cast::const_cast_move(cast::read_only_move(empty)).is_null());
    }

    #[test]
    fn reinterpret_cast_preserves_the_count() {
        let log = DropLog::new();
        let tracked = IntrusivePtr::new(Tracked::new(1, &log));

        // Tracked is trivially layout compatible with itself
        let copy: IntrusivePtr<Tracked> = unsafe { cast::reinterpret_cast(&tracked) };
        assert_eq!(IntrusivePtr::ref_count(&tracked), 2);

        let moved: IntrusivePtr<Tracked> = unsafe { cast::reinterpret_cast_move(copy) };
        assert_eq!(IntrusivePtr::ref_count(&tracked), 2);
        assert_eq!(moved, tracked);
    }
}
