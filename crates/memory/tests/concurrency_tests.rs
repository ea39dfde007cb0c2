#![cfg(feature = "arc")]

mod concurrency {
    use std::{sync::Barrier, thread};
    use tether_memory::IntrusivePtr;
    use tether_test_utils::{DropLog, Tracked};

    const THREADS: usize = 8;
    const ITERATIONS: usize = 10_000;

    #[test]
    fn clones_and_drops_from_many_threads() {
        let log = DropLog::new();
        let shared = IntrusivePtr::new(Tracked::new(1, &log));
        let barrier = Barrier::new(THREADS);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    barrier.wait();
                    let mut local = Vec::with_capacity(16);
                    for i in 0..ITERATIONS {
                        local.push(shared.clone());
                        if i % 16 == 15 {
                            local.clear();
                        }
                    }
                });
            }
        });

        assert_eq!(IntrusivePtr::ref_count(&shared), 1);
        assert_eq!(log.count(), 0);

        drop(shared);
        assert_eq!(log.times_destroyed(1), 1);
    }

    #[test]
    fn last_release_on_another_thread_destroys_once() {
        let log = DropLog::new();

        for id in 0..100 {
            let handles: Vec<_> = {
                let first = IntrusivePtr::new(Tracked::new(id, &log));
                (0..THREADS).map(|_| first.clone()).collect()
            };

            thread::scope(|s| {
                for handle in handles {
                    s.spawn(move || drop(handle));
                }
            });

            assert_eq!(log.times_destroyed(id), 1);
        }

        assert_eq!(log.count(), 100);
    }
}
