use ripple_brush::core::brush_pool::{BrushParams, BrushPool};
use ripple_brush::core::pointer::{PointerTracker, DEFAULT_THRESHOLD};

fn pool_of(size: usize) -> BrushPool {
    let params = BrushParams {
        pool_size: size,
        ..Default::default()
    };
    BrushPool::with_seed(params, Some(3)).unwrap()
}

/// Tracker over a 100x100 surface whose previous sample is the center
fn centered_tracker(pool: &mut BrushPool) -> PointerTracker {
    let mut tracker = PointerTracker::new(100.0, 100.0, DEFAULT_THRESHOLD);
    tracker.sample(50.0, 50.0);
    assert_eq!(tracker.step(pool), None);
    tracker
}

#[cfg(test)]
mod threshold_tests {
    use super::*;

    #[test]
    fn test_small_moves_do_nothing() {
        let mut pool = pool_of(10);
        let mut tracker = centered_tracker(&mut pool);

        for (x, y) in [(51.0, 50.0), (52.0, 52.0), (55.0, 55.0), (57.0, 58.0)] {
            tracker.sample(x, y);
            assert_eq!(tracker.step(&mut pool), None);
        }
        assert_eq!(pool.visible_count(), 0);
    }

    #[test]
    fn test_exact_threshold_is_not_enough() {
        let mut pool = pool_of(10);
        let mut tracker = centered_tracker(&mut pool);

        tracker.sample(54.0, 50.0);
        assert_eq!(tracker.step(&mut pool), None);

        tracker.sample(54.0, 46.0);
        assert_eq!(tracker.step(&mut pool), None);
    }

    #[test]
    fn test_either_axis_triggers_once() {
        let mut pool = pool_of(10);
        let mut tracker = centered_tracker(&mut pool);

        tracker.sample(55.0, 50.0);
        assert_eq!(tracker.step(&mut pool), Some(0));
        // no new sample: the same position is not stamped again
        assert_eq!(tracker.step(&mut pool), None);

        tracker.sample(55.0, 45.0);
        assert_eq!(tracker.step(&mut pool), Some(1));

        tracker.sample(56.0, 44.0);
        assert_eq!(tracker.step(&mut pool), None);

        assert_eq!(pool.visible_count(), 2);
        assert!(pool.get(0).unwrap().visible);
        assert!(pool.get(1).unwrap().visible);
    }

    #[test]
    fn test_stamp_lands_at_centered_position() {
        let mut pool = pool_of(4);
        let mut tracker = centered_tracker(&mut pool);

        tracker.sample(90.0, 10.0);
        tracker.step(&mut pool);

        assert_eq!(pool.get(0).unwrap().position, glam::Vec2::new(40.0, 40.0));
    }
}

#[cfg(test)]
mod round_robin_tests {
    use super::*;

    #[test]
    fn test_cursor_is_activation_count_mod_pool() {
        let mut pool = pool_of(7);
        let mut tracker = centered_tracker(&mut pool);

        for n in 0..30 {
            let x = if n % 2 == 0 { 10.0 } else { 90.0 };
            tracker.sample(x, 50.0 + (n % 3) as f32);
            assert_eq!(tracker.step(&mut pool), Some(n % 7));
            assert_eq!(tracker.cursor(), (n + 1) % 7);
        }
    }

    #[test]
    fn test_wraps_onto_live_slot() {
        let mut pool = pool_of(2);
        let mut tracker = centered_tracker(&mut pool);

        for x in [10.0, 90.0, 10.0] {
            tracker.sample(x, 50.0);
            tracker.step(&mut pool);
        }

        assert_eq!(tracker.cursor(), 1);
        assert_eq!(pool.get(0).unwrap().position.x, -40.0);
        assert_eq!(pool.visible_count(), 2);
    }
}
