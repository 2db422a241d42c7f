use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POOL_SIZE: usize = 50;

/// Tunables for brush activation and per-frame decay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushParams {
    /// Number of pre-allocated brush slots
    pub pool_size: usize,
    /// Scale a slot is reset to on activation
    pub reset_scale: f32,
    /// Opacity a slot is reset to on activation
    pub reset_opacity: f32,
    /// Rotation added per decay step (radians)
    pub rotation_step: f32,
    /// Multiplicative opacity falloff per decay step
    pub opacity_decay: f32,
    /// Opacity below which a slot is hidden
    pub visibility_floor: f32,
    /// `a` in `scale' = a * scale + b`
    pub scale_factor: f32,
    /// `b` in `scale' = a * scale + b`
    pub scale_offset: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            reset_scale: 0.2,
            reset_opacity: 0.5,
            rotation_step: 0.02,
            opacity_decay: 0.96,
            visibility_floor: 0.002,
            scale_factor: 0.982,
            scale_offset: 0.108,
        }
    }
}

impl BrushParams {
    /// Scale the decay recurrence settles at
    pub fn scale_fixed_point(&self) -> f32 {
        self.scale_offset / (1.0 - self.scale_factor)
    }
}

/// A single stamped brush sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushInstance {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub visible: bool,
}

impl BrushInstance {
    fn hidden(rotation: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            rotation,
            scale: 1.0,
            opacity: 0.0,
            visible: false,
        }
    }

    fn reset(&mut self, position: Vec2, params: &BrushParams) {
        self.visible = true;
        self.position = position;
        self.scale = params.reset_scale;
        self.opacity = params.reset_opacity;
    }

    fn decay(&mut self, params: &BrushParams) {
        if !self.visible {
            return;
        }

        self.rotation += params.rotation_step;
        self.opacity *= params.opacity_decay;
        if self.opacity < params.visibility_floor {
            self.visible = false;
        }
        self.scale = params.scale_factor * self.scale + params.scale_offset;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// A pool needs at least one slot
    Empty,
    SlotOutOfRange { slot: usize, len: usize },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Empty => write!(f, "brush pool size must be at least 1"),
            PoolError::SlotOutOfRange { slot, len } => {
                write!(f, "brush slot {} out of range for pool of {}", slot, len)
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// Fixed-size pool of brush sprites reused round-robin
///
/// Every slot is allocated up front and lives for the lifetime of the pool.
/// Slots are only ever toggled visible, reset, and decayed.
#[derive(Debug, Clone)]
pub struct BrushPool {
    instances: Vec<BrushInstance>,
    params: BrushParams,
}

impl BrushPool {
    /// Create a pool whose slots start hidden with rotations drawn from `rng`
    pub fn new<R: Rng>(params: BrushParams, rng: &mut R) -> Result<Self, PoolError> {
        if params.pool_size == 0 {
            return Err(PoolError::Empty);
        }

        let instances = (0..params.pool_size)
            .map(|_| BrushInstance::hidden(rng.gen_range(0.0..TAU)))
            .collect();

        Ok(Self { instances, params })
    }

    /// Create a pool, seeding rotations from `seed` when given
    pub fn with_seed(params: BrushParams, seed: Option<u64>) -> Result<Self, PoolError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(params, &mut rng)
    }

    /// Stamp the brush in `slot` at `position`; rotation is left untouched
    pub fn activate(&mut self, position: Vec2, slot: usize) -> Result<(), PoolError> {
        let len = self.instances.len();
        let instance = self
            .instances
            .get_mut(slot)
            .ok_or(PoolError::SlotOutOfRange { slot, len })?;
        instance.reset(position, &self.params);
        Ok(())
    }

    /// Advance every visible slot by one frame of decay
    pub fn decay_step(&mut self) {
        let params = self.params;
        self.instances
            .iter_mut()
            .for_each(|instance| instance.decay(&params));
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&BrushInstance> {
        self.instances.get(slot)
    }

    pub fn instances(&self) -> &[BrushInstance] {
        &self.instances
    }

    pub fn visible_count(&self) -> usize {
        self.instances.iter().filter(|i| i.visible).count()
    }

    pub fn params(&self) -> &BrushParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize) -> BrushPool {
        let params = BrushParams {
            pool_size: size,
            ..Default::default()
        };
        BrushPool::with_seed(params, Some(7)).unwrap()
    }

    #[test]
    fn test_new_pool_all_hidden() {
        let pool = pool(50);
        assert_eq!(pool.len(), 50);
        assert_eq!(pool.visible_count(), 0);
        for instance in pool.instances() {
            assert!(instance.rotation >= 0.0 && instance.rotation < TAU);
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        let params = BrushParams {
            pool_size: 0,
            ..Default::default()
        };
        assert_eq!(BrushPool::with_seed(params, None).unwrap_err(), PoolError::Empty);
    }

    #[test]
    fn test_activate_resets_slot() {
        let mut pool = pool(4);
        let rotation = pool.get(2).unwrap().rotation;

        pool.activate(Vec2::new(10.0, -3.0), 2).unwrap();

        let brush = pool.get(2).unwrap();
        assert!(brush.visible);
        assert_eq!(brush.position, Vec2::new(10.0, -3.0));
        assert_eq!(brush.scale, 0.2);
        assert_eq!(brush.opacity, 0.5);
        assert_eq!(brush.rotation, rotation);
    }

    #[test]
    fn test_activate_out_of_range() {
        let mut pool = pool(4);
        let err = pool.activate(Vec2::ZERO, 4).unwrap_err();
        assert_eq!(err, PoolError::SlotOutOfRange { slot: 4, len: 4 });
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_single_decay_step() {
        let mut pool = pool(1);
        pool.activate(Vec2::ZERO, 0).unwrap();
        let before = *pool.get(0).unwrap();

        pool.decay_step();

        let after = pool.get(0).unwrap();
        assert!((after.rotation - (before.rotation + 0.02)).abs() < 1e-5);
        assert!((after.opacity - 0.48).abs() < 1e-6);
        assert!((after.scale - (0.982 * 0.2 + 0.108)).abs() < 1e-6);
        assert!(after.visible);
    }

    #[test]
    fn test_fixed_point() {
        let params = BrushParams::default();
        assert!((params.scale_fixed_point() - 6.0).abs() < 1e-3);
    }
}
