use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::core::brush_pool::BrushParams;
use crate::core::clock::TimeMode;
use crate::core::pointer::DEFAULT_THRESHOLD;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_DISPLACEMENT_STRENGTH: f32 = 0.1;

/// Everything the sketch can be tuned with. Missing JSON fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub title: String,
    /// Initial window size in logical pixels
    pub width: u32,
    pub height: u32,
    pub brush: BrushParams,
    pub pointer_threshold: f32,
    pub time_mode: TimeMode,
    pub displacement_strength: f32,
    /// Seed for initial rotations; entropy when absent
    pub seed: Option<u64>,
    pub brush_texture: Option<PathBuf>,
    pub base_texture: Option<PathBuf>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            title: "Ripple Brush".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            brush: BrushParams::default(),
            pointer_threshold: DEFAULT_THRESHOLD,
            time_mode: TimeMode::default(),
            displacement_strength: DEFAULT_DISPLACEMENT_STRENGTH,
            seed: None,
            brush_texture: None,
            base_texture: None,
        }
    }
}

impl SketchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("parse sketch config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("load config {}", path.display()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize sketch config")
    }

    pub fn validate(&self) -> Result<()> {
        if self.brush.pool_size == 0 {
            bail!("brush.pool_size must be at least 1");
        }
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if !(self.pointer_threshold >= 0.0) {
            bail!("pointer_threshold must be non-negative, got {}", self.pointer_threshold);
        }
        let decay = self.brush.opacity_decay;
        if !(decay > 0.0 && decay < 1.0) {
            bail!("brush.opacity_decay must be in (0, 1), got {}", decay);
        }
        if !(self.brush.visibility_floor > 0.0) {
            bail!("brush.visibility_floor must be positive");
        }
        Ok(())
    }

    /// Overlay command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.brush {
            self.brush_texture = Some(path.clone());
        }
        if let Some(path) = &cli.texture {
            self.base_texture = Some(path.clone());
        }
        if let Some(pool_size) = cli.pool_size {
            self.brush.pool_size = pool_size;
        }
        if let Some(mode) = cli.time_mode {
            self.time_mode = mode;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
    }

    /// Config file (if any) with command-line overrides applied, validated
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SketchConfig::default();
        assert_eq!(config.brush.pool_size, 50);
        assert_eq!(config.pointer_threshold, 4.0);
        assert_eq!(config.time_mode, TimeMode::Elapsed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let mut config = SketchConfig::default();
        config.brush.pool_size = 0;
        assert!(config.validate().is_err());
    }
}
