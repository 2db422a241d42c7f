use glam::Vec2;
use ripple_brush::core::brush_pool::{BrushParams, BrushPool, DEFAULT_POOL_SIZE};

fn seeded_pool(params: BrushParams) -> BrushPool {
    BrushPool::with_seed(params, Some(42)).unwrap()
}

#[cfg(test)]
mod decay_tests {
    use super::*;

    #[test]
    fn test_hidden_slots_untouched_by_decay() {
        let mut pool = seeded_pool(BrushParams::default());
        let before = pool.instances().to_vec();

        for _ in 0..10 {
            pool.decay_step();
        }

        assert_eq!(pool.instances(), before.as_slice());
        assert_eq!(pool.visible_count(), 0);
    }

    #[test]
    fn test_decay_never_revives() {
        let mut pool = seeded_pool(BrushParams::default());
        pool.activate(Vec2::ZERO, 3).unwrap();

        for _ in 0..500 {
            pool.decay_step();
        }

        assert!(!pool.get(3).unwrap().visible);
        let frozen = *pool.get(3).unwrap();
        pool.decay_step();
        assert_eq!(*pool.get(3).unwrap(), frozen);
    }

    #[test]
    fn test_opacity_falls_off_geometrically() {
        let mut pool = seeded_pool(BrushParams::default());
        pool.activate(Vec2::ZERO, 0).unwrap();

        let mut expected = 0.5f32;
        for _ in 0..20 {
            pool.decay_step();
            expected *= 0.96;
            assert!((pool.get(0).unwrap().opacity - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hidden_after_136_steps() {
        let mut pool = seeded_pool(BrushParams::default());
        pool.activate(Vec2::ZERO, 0).unwrap();

        for _ in 0..135 {
            pool.decay_step();
        }
        assert!(pool.get(0).unwrap().visible, "still visible after 135 steps");

        pool.decay_step();
        assert!(!pool.get(0).unwrap().visible, "hidden after 136 steps");
    }

    #[test]
    fn test_scale_grows_monotonically_while_visible() {
        let mut pool = seeded_pool(BrushParams::default());
        pool.activate(Vec2::ZERO, 0).unwrap();

        let mut last = pool.get(0).unwrap().scale;
        while pool.get(0).unwrap().visible {
            pool.decay_step();
            let scale = pool.get(0).unwrap().scale;
            assert!(scale > last);
            assert!(scale < 6.0);
            last = scale;
        }
    }

    #[test]
    fn test_scale_converges_to_fixed_point() {
        let params = BrushParams {
            opacity_decay: 0.9999,
            visibility_floor: 1e-9,
            ..Default::default()
        };

        for start in [0.05f32, 0.5, 0.95] {
            let params = BrushParams {
                reset_scale: start,
                ..params
            };
            let mut pool = seeded_pool(params);
            pool.activate(Vec2::ZERO, 0).unwrap();
            for _ in 0..1000 {
                pool.decay_step();
            }
            let scale = pool.get(0).unwrap().scale;
            assert!((scale - params.scale_fixed_point()).abs() < 1e-2, "start {start}: {scale}");
        }
    }

    #[test]
    fn test_rotation_preserved_across_reactivation() {
        let mut pool = seeded_pool(BrushParams::default());
        let initial = pool.get(5).unwrap().rotation;

        pool.activate(Vec2::new(1.0, 2.0), 5).unwrap();
        for _ in 0..10 {
            pool.decay_step();
        }
        pool.activate(Vec2::new(3.0, 4.0), 5).unwrap();

        let rotation = pool.get(5).unwrap().rotation;
        assert!((rotation - (initial + 10.0 * 0.02)).abs() < 1e-4);
    }
}

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn test_default_pool_size() {
        let pool = seeded_pool(BrushParams::default());
        assert_eq!(pool.len(), DEFAULT_POOL_SIZE);
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_same_seed_same_rotations() {
        let a = seeded_pool(BrushParams::default());
        let b = seeded_pool(BrushParams::default());
        assert_eq!(a.instances(), b.instances());
    }

    #[test]
    fn test_reactivating_live_slot_restarts_it() {
        let mut pool = seeded_pool(BrushParams::default());
        pool.activate(Vec2::ZERO, 0).unwrap();
        pool.decay_step();
        pool.decay_step();

        pool.activate(Vec2::new(9.0, 9.0), 0).unwrap();

        let brush = pool.get(0).unwrap();
        assert_eq!(brush.opacity, 0.5);
        assert_eq!(brush.scale, 0.2);
        assert_eq!(brush.position, Vec2::new(9.0, 9.0));
        assert_eq!(pool.visible_count(), 1);
    }
}
